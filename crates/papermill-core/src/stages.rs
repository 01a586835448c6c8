//! Collaborator traits.
//!
//! The engine drives a job through `ResearchStages`; implementations sit in
//! their own crate and talk to external services. `TextGenerator` and
//! `LiteratureSource` are the narrower contracts those implementations build
//! on.

use async_trait::async_trait;

use crate::Result;
use crate::report::{
    AlgorithmDesign, Evaluation, GapAnalysis, Implementation, Paper, Refinement,
    ResearchDirection,
};
use crate::request::{PaperRecord, ResearchRequest};

/// Options for a single text-generation call.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub system_prompt: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

impl GenerationOptions {
    /// Options with a given sampling temperature and the default token limit.
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            ..Self::default()
        }
    }
}

/// A generative-text backend. Failures propagate as stage failures.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}

/// An academic-paper search backend.
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    /// Run each query and return the combined result set, at most
    /// `max_results` records per query.
    async fn search(&self, queries: &[String], max_results: usize) -> Result<Vec<PaperRecord>>;
}

/// The work behind each pipeline stage, one method per stage.
///
/// Methods take the outputs of prior stages as input; the orchestrator calls
/// them strictly in order and never concurrently for one job.
#[async_trait]
pub trait ResearchStages: Send + Sync {
    async fn collect_literature(&self, request: &ResearchRequest) -> Result<Vec<PaperRecord>>;

    async fn identify_gaps(&self, papers: &[PaperRecord]) -> Result<GapAnalysis>;

    async fn synthesize_direction(
        &self,
        gaps: &GapAnalysis,
        focus: Option<&str>,
    ) -> Result<ResearchDirection>;

    async fn design_algorithm(
        &self,
        direction: &ResearchDirection,
        papers: &[PaperRecord],
    ) -> Result<AlgorithmDesign>;

    async fn implement_algorithm(&self, design: &AlgorithmDesign) -> Result<Implementation>;

    async fn evaluate_algorithm(&self, implementation: &Implementation) -> Result<Evaluation>;

    async fn refine_algorithm(
        &self,
        implementation: &Implementation,
        evaluation: &Evaluation,
    ) -> Result<Refinement>;

    async fn write_paper(
        &self,
        direction: &ResearchDirection,
        design: &AlgorithmDesign,
        implementation: &Refinement,
        evaluation: &Evaluation,
        papers: &[PaperRecord],
    ) -> Result<Paper>;
}
