//! Application state shared by all handlers.
//!
//! Nothing here is per-request: each conversion gets its own workspace from
//! the manager and never publishes it back into shared state.

use audex_core::Config;
use audex_processing::{AudioExtractor, AudioProbe, WorkspaceManager};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub workspaces: WorkspaceManager,
    pub extractor: Arc<dyn AudioExtractor>,
    /// Inspects extracted audio for logging; `None` skips probing.
    pub probe: Option<Arc<AudioProbe>>,
}

impl AppState {
    pub fn new(
        config: Config,
        extractor: Arc<dyn AudioExtractor>,
        probe: Option<Arc<AudioProbe>>,
    ) -> Self {
        let workspaces = WorkspaceManager::new(config.scratch_dir.clone());
        Self {
            config,
            workspaces,
            extractor,
            probe,
        }
    }
}
