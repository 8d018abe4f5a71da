use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// How hard a recipe is to cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "easy", alias = "EASY")]
    Easy,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "hard", alias = "HARD")]
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// A recipe as returned by the extraction call, before it gets an id and image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    /// Preparation and cooking time in minutes
    #[serde(deserialize_with = "deserialize_minutes")]
    pub prep_time: u32,
    pub difficulty: Difficulty,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub dietary_tags: Vec<String>,
}

/// A recipe ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(flatten)]
    pub draft: RecipeDraft,
    /// Data URL of the generated photo, or a placeholder URL
    pub image: String,
}

impl Recipe {
    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.draft.dietary_tags.iter().any(|t| t == tag)
    }
}

/// Raw shape of the extraction response
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionPayload {
    pub ingredients: Vec<String>,
    pub recipes: Vec<RecipeDraft>,
}

/// Ingredients found in the photos and the recipes suggested for them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub ingredients: Vec<String>,
    pub recipes: Vec<Recipe>,
}

/// Filter applied to the recipe list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DietaryFilter {
    #[default]
    All,
    QuickMeals,
    Vegetarian,
    GlutenFree,
    Vegan,
}

impl DietaryFilter {
    /// Filters in the order they are offered to the user
    pub const ALL: [DietaryFilter; 5] = [
        DietaryFilter::All,
        DietaryFilter::QuickMeals,
        DietaryFilter::Vegetarian,
        DietaryFilter::GlutenFree,
        DietaryFilter::Vegan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryFilter::All => "All",
            DietaryFilter::QuickMeals => "Quick Meals",
            DietaryFilter::Vegetarian => "Vegetarian",
            DietaryFilter::GlutenFree => "Gluten-Free",
            DietaryFilter::Vegan => "Vegan",
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            DietaryFilter::All => true,
            tag => recipe.has_tag(tag.as_str()),
        }
    }

    /// Recipes visible under this filter, in their original order
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|r| self.matches(r)).collect()
    }
}

impl fmt::Display for DietaryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        DietaryFilter::ALL
            .into_iter()
            .find(|f| f.as_str().to_lowercase().replace('-', " ") == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown filter '{}'. Expected one of: {}",
                    s,
                    DietaryFilter::ALL.map(|f| f.as_str()).join(", ")
                )
            })
    }
}

// The backend declares prepTime as a JSON number, so 25.0 and 24.6 both show up
fn deserialize_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let minutes = f64::deserialize(deserializer)?;
    if !minutes.is_finite() || minutes < 0.0 || minutes > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "prepTime must be a non-negative number of minutes, got {}",
            minutes
        )));
    }
    Ok(minutes.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe(title: &str, tags: &[&str]) -> Recipe {
        Recipe {
            id: title.to_lowercase(),
            draft: RecipeDraft {
                title: title.to_string(),
                prep_time: 20,
                difficulty: Difficulty::Easy,
                ingredients: vec![],
                instructions: vec![],
                dietary_tags: tags.iter().map(|t| t.to_string()).collect(),
            },
            image: String::new(),
        }
    }

    #[test]
    fn test_draft_reads_camel_case() {
        let draft: RecipeDraft = serde_json::from_value(json!({
            "title": "Onion Soup",
            "prepTime": 24.6,
            "difficulty": "medium",
            "ingredients": ["onion", "stock"],
            "instructions": ["Slice", "Simmer"],
            "dietaryTags": ["Vegetarian"]
        }))
        .unwrap();

        assert_eq!(draft.prep_time, 25);
        assert_eq!(draft.difficulty, Difficulty::Medium);
        assert_eq!(draft.dietary_tags, vec!["Vegetarian"]);
    }

    #[test]
    fn test_negative_prep_time_rejected() {
        let result: Result<RecipeDraft, _> = serde_json::from_value(json!({
            "title": "Time Travel Toast",
            "prepTime": -5,
            "difficulty": "Easy",
            "ingredients": [],
            "instructions": [],
            "dietaryTags": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_recipe_serializes_flat() {
        let value = serde_json::to_value(recipe("Pasta X", &["Vegan"])).unwrap();
        assert_eq!(value["title"], "Pasta X");
        assert_eq!(value["prepTime"], 20);
        assert_eq!(value["dietaryTags"][0], "Vegan");
        assert_eq!(value["id"], "pasta x");
    }

    #[test]
    fn test_filter_all_is_identity() {
        let recipes = vec![recipe("A", &[]), recipe("B", &["Vegan"])];
        assert_eq!(DietaryFilter::All.apply(&recipes).len(), 2);
    }

    #[test]
    fn test_filter_keeps_order() {
        let recipes = vec![
            recipe("A", &["Vegan", "Gluten-Free"]),
            recipe("B", &["Quick Meals"]),
            recipe("C", &["Gluten-Free"]),
        ];
        let visible: Vec<&str> = DietaryFilter::GlutenFree
            .apply(&recipes)
            .into_iter()
            .map(|r| r.title())
            .collect();
        assert_eq!(visible, vec!["A", "C"]);
        assert!(DietaryFilter::Vegetarian.apply(&recipes).is_empty());
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("quick-meals".parse::<DietaryFilter>(), Ok(DietaryFilter::QuickMeals));
        assert_eq!("Gluten-Free".parse::<DietaryFilter>(), Ok(DietaryFilter::GlutenFree));
        assert_eq!("gluten_free".parse::<DietaryFilter>(), Ok(DietaryFilter::GlutenFree));
        assert_eq!(" all ".parse::<DietaryFilter>(), Ok(DietaryFilter::All));
        assert!("keto".parse::<DietaryFilter>().is_err());
    }
}
