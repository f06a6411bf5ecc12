//! In-memory content catalog.
//!
//! Serves fixed content per trigger point without any network access. Used
//! for offline demos and tests. The JSON file format maps trigger point names
//! to arrays of content items:
//!
//! ```json
//! {
//!   "payments": [
//!     {"triggerPoint": "payments", "viewUrl": "https://x/v1", "presentationType": "popup"}
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use waypoint_core::{ContentItem, ContentRequest, ContentSource, FetchError, TriggerPoint};

/// Content source backed by a fixed catalog.
#[derive(Debug, Default)]
pub struct StaticContentSource {
    catalog: HashMap<TriggerPoint, Vec<ContentItem>>,
    delay: Duration,
    requests: AtomicUsize,
}

impl StaticContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let catalog: HashMap<TriggerPoint, Vec<ContentItem>> =
            serde_json::from_str(json).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(Self {
            catalog,
            ..Self::default()
        })
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, FetchError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            FetchError::Io(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Add an item to the catalog under its own trigger point.
    pub fn with_item(mut self, item: ContentItem) -> Self {
        self.catalog
            .entry(item.trigger_point.clone())
            .or_default()
            .push(item);
        self
    }

    /// Delay every response, to model a slow service.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Trigger points that have content.
    pub fn trigger_points(&self) -> Vec<&TriggerPoint> {
        let mut points: Vec<_> = self.catalog.keys().collect();
        points.sort();
        points
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn request_content(
        &self,
        request: &ContentRequest,
    ) -> Result<Vec<ContentItem>, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let items = self
            .catalog
            .get(&request.trigger_point)
            .cloned()
            .unwrap_or_default();
        debug!(
            trigger_point = %request.trigger_point,
            items = items.len(),
            "Served content from static catalog"
        );
        Ok(items)
    }
}
