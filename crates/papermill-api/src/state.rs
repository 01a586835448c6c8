//! Application state.

use std::sync::Arc;

use papermill_core::request::ResearchRequest;
use papermill_core::stages::{LiteratureSource, ResearchStages, TextGenerator};
use papermill_engine::{JobQueries, JobRegistry, LogSink, PipelineOrchestrator};
use papermill_research::{ArxivClient, GeminiClient, ResearchSuite};

use crate::config::Config;

/// Builds the stage suite for one job, honoring its request parameters.
pub type SuiteFactory = Arc<dyn Fn(&ResearchRequest) -> Arc<dyn ResearchStages> + Send + Sync>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PipelineOrchestrator>,
    pub queries: JobQueries,
    pub suites: SuiteFactory,
}

impl AppState {
    /// State wired to the live Gemini and arXiv collaborators.
    pub fn new(config: &Config) -> Self {
        let api_key = config.gemini_api_key.clone();
        let default_model = config.default_model.clone();
        let suites: SuiteFactory = Arc::new(
            move |request: &ResearchRequest| -> Arc<dyn ResearchStages> {
                let model = request
                    .model_preference
                    .clone()
                    .unwrap_or_else(|| default_model.clone());
                let generator: Arc<dyn TextGenerator> =
                    Arc::new(GeminiClient::new(api_key.clone(), model));
                let source: Arc<dyn LiteratureSource> = Arc::new(ArxivClient::new());
                Arc::new(ResearchSuite::new(generator, source))
            },
        );
        Self::with_suites(suites)
    }

    /// State with a caller-supplied suite factory; the engine wiring is the
    /// same either way.
    pub fn with_suites(suites: SuiteFactory) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let logs = Arc::new(LogSink::new());
        let orchestrator = Arc::new(PipelineOrchestrator::new(registry.clone(), logs.clone()));
        let queries = JobQueries::new(registry, logs);

        Self {
            orchestrator,
            queries,
            suites,
        }
    }
}
