use std::sync::Arc;

use crate::config::Config;
use crate::resume::annotator::SharedAnnotator;
use crate::storage::DocumentStore;
use crate::store::PlacementStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PlacementStore>,
    pub documents: Arc<dyn DocumentStore>,
    /// Text annotator for resume parsing. `None` when the model failed to load;
    /// resume parsing then yields empty fields.
    pub annotator: SharedAnnotator,
    pub max_resume_bytes: usize,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn PlacementStore>,
        documents: Arc<dyn DocumentStore>,
        annotator: SharedAnnotator,
    ) -> Self {
        Self {
            store,
            documents,
            annotator,
            max_resume_bytes: config.max_resume_bytes,
        }
    }
}
