use log::debug;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Tracks display handles that have been issued and not yet revoked
#[derive(Debug, Default)]
pub struct HandleRegistry {
    live: Mutex<HashSet<String>>,
}

impl HandleRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Issues a new handle for a staged image
    pub fn create(self: &Arc<Self>) -> DisplayHandle {
        let url = format!("blob:fridgewise/{}", Uuid::new_v4());
        self.lock().insert(url.clone());
        DisplayHandle {
            url,
            registry: Arc::clone(self),
        }
    }

    /// Number of handles issued and not yet revoked
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    // Returns true only for the call that actually removed the handle
    fn revoke(&self, url: &str) -> bool {
        self.lock().remove(url)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock cannot leave the set half-updated
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Local reference to staged image bytes, released on drop
#[derive(Debug)]
pub struct DisplayHandle {
    url: String,
    registry: Arc<HandleRegistry>,
}

impl DisplayHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_revoked(&self) -> bool {
        !self.registry.is_live(&self.url)
    }

    /// Releases the handle. Later calls are no-ops.
    pub fn revoke(&self) {
        if self.registry.revoke(&self.url) {
            debug!("Revoked display handle {}", self.url);
        }
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.revoke();
    }
}
