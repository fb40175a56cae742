//! Application state shared by all handlers

use crate::services::ingestion::IngestionPipeline;
use ingesta_core::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: IngestionPipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: IngestionPipeline) -> Self {
        Self { config, pipeline }
    }
}
