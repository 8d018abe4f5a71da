//! Application state controller.
//!
//! Drives the `Upload -> Loading -> Results` flow, owns the staged images and
//! their display handles, and holds the latest extraction result together
//! with the active dietary filter. Presentation code reads from it and sends
//! user intents (stage, remove, analyze, filter, reset) back to it.

mod handles;
mod loader;

pub use handles::{DisplayHandle, HandleRegistry};
pub use loader::{LoadingMessages, LOADING_MESSAGES, MESSAGE_INTERVAL};

pub use crate::error::NO_IMAGES_MESSAGE;

use log::{error, info, warn};
use std::sync::Arc;

use crate::encoder::ImageResource;
use crate::error::FridgeWiseError;
use crate::model::{DietaryFilter, ExtractionResult, Recipe};
use crate::pipelines::RecipeService;

/// Number of staged previews shown by the loading view
const LOADER_PREVIEWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Upload,
    Loading,
    Results,
}

/// An image picked by the user, with its preview handle
#[derive(Debug)]
pub struct StagedImage {
    resource: ImageResource,
    handle: DisplayHandle,
}

impl StagedImage {
    pub fn resource(&self) -> &ImageResource {
        &self.resource
    }

    pub fn preview_url(&self) -> &str {
        self.handle.url()
    }
}

#[derive(Debug)]
pub struct App {
    state: AppState,
    staged: Vec<StagedImage>,
    ingredients: Vec<String>,
    recipes: Vec<Recipe>,
    active_filter: DietaryFilter,
    error: Option<String>,
    registry: Arc<HandleRegistry>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::with_registry(HandleRegistry::new())
    }

    pub fn with_registry(registry: Arc<HandleRegistry>) -> Self {
        Self {
            state: AppState::Upload,
            staged: Vec::new(),
            ingredients: Vec::new(),
            recipes: Vec::new(),
            active_filter: DietaryFilter::All,
            error: None,
            registry,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn staged_images(&self) -> &[StagedImage] {
        &self.staged
    }

    pub fn preview_urls(&self) -> Vec<&str> {
        self.staged.iter().map(StagedImage::preview_url).collect()
    }

    /// Previews stacked in the loading view
    pub fn loader_previews(&self) -> Vec<&str> {
        self.staged
            .iter()
            .take(LOADER_PREVIEWS)
            .map(StagedImage::preview_url)
            .collect()
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn active_filter(&self) -> DietaryFilter {
        self.active_filter
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn registry(&self) -> &Arc<HandleRegistry> {
        &self.registry
    }

    /// Adds images to the staging area, skipping anything that is not an image.
    /// Returns how many were staged. Outside the upload view it does nothing.
    pub fn stage_images(&mut self, images: impl IntoIterator<Item = ImageResource>) -> usize {
        if self.state != AppState::Upload {
            warn!("Ignoring staged images while in {:?} state", self.state);
            return 0;
        }
        let before = self.staged.len();
        for resource in images {
            if !resource.is_image() {
                warn!("Skipping '{}': not an image", resource.name());
                continue;
            }
            let handle = self.registry.create();
            self.staged.push(StagedImage { resource, handle });
        }
        self.error = None;
        self.staged.len() - before
    }

    /// Removes one staged image and revokes its preview handle
    pub fn remove_image(&mut self, index: usize) -> bool {
        if index >= self.staged.len() {
            return false;
        }
        let removed = self.staged.remove(index);
        removed.handle.revoke();
        true
    }

    /// Moves to `Loading` and returns the images to analyze.
    ///
    /// With nothing staged this only sets the error message and returns
    /// `None`. Outside the upload view it does nothing.
    pub fn begin_analysis(&mut self) -> Option<Vec<ImageResource>> {
        if self.state != AppState::Upload {
            warn!("Ignoring analyze request while in {:?} state", self.state);
            return None;
        }
        if self.staged.is_empty() {
            self.error = Some(NO_IMAGES_MESSAGE.to_string());
            return None;
        }

        self.state = AppState::Loading;
        self.error = None;
        Some(self.staged.iter().map(|s| s.resource.clone()).collect())
    }

    /// Applies the outcome of an analysis started with [`App::begin_analysis`]
    pub fn complete_analysis(&mut self, result: Result<ExtractionResult, FridgeWiseError>) {
        if self.state != AppState::Loading {
            // Reset while the request was in flight; the result is no longer wanted
            info!("Discarding analysis result, no longer loading");
            return;
        }

        match result {
            Ok(result) => {
                self.ingredients = result.ingredients;
                self.recipes = result.recipes;
                self.state = AppState::Results;
            }
            Err(e) => {
                error!("Failed to generate recipes: {}", e);
                self.error = Some(e.user_message().to_string());
                self.state = AppState::Upload;
            }
        }
    }

    /// Runs a full analysis of the staged images. Returns true on success.
    pub async fn analyze(&mut self, service: &RecipeService) -> bool {
        let Some(images) = self.begin_analysis() else {
            return false;
        };
        let result = service.generate_recipes_from_images(&images).await;
        self.complete_analysis(result);
        self.state == AppState::Results
    }

    pub fn set_filter(&mut self, filter: DietaryFilter) {
        self.active_filter = filter;
    }

    /// Recipes matching the active filter, in result order
    pub fn visible_recipes(&self) -> Vec<&Recipe> {
        self.active_filter.apply(&self.recipes)
    }

    /// Back to an empty upload view, revoking every preview handle
    pub fn reset(&mut self) {
        for staged in self.staged.drain(..) {
            staged.handle.revoke();
        }
        self.state = AppState::Upload;
        self.ingredients.clear();
        self.recipes.clear();
        self.error = None;
        self.active_filter = DietaryFilter::All;
    }
}
