//! In-process registry behind `blob:` object URLs.
//!
//! A URL keeps its blob alive until [`ObjectUrlStore::revoke`] is called.
//! Nothing revokes URLs automatically.

use crate::file::Blob;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Maps `blob:<origin>/<uuid>` URLs to the blobs they address.
#[derive(Debug)]
pub struct ObjectUrlStore {
    origin: String,
    entries: Mutex<HashMap<String, Blob>>,
}

impl Default for ObjectUrlStore {
    fn default() -> Self {
        Self::new("null")
    }
}

impl ObjectUrlStore {
    /// A store minting URLs under `origin` (`"null"` for an opaque origin).
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(&self, blob: &Blob) -> String {
        let url = format!("blob:{}/{}", self.origin, Uuid::new_v4());
        self.lock().insert(url.clone(), blob.clone());
        debug!("Created object URL {} ({} bytes)", url, blob.size());
        url
    }

    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.lock().remove(url).is_some();
        if removed {
            debug!("Revoked object URL {}", url);
        }
        removed
    }

    /// The blob behind a live URL.
    pub fn get(&self, url: &str) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    /// Number of live URLs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Poisoning is ignored: every critical section is a single map call.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Blob>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
