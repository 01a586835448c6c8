//! The full stage suite wired to live collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use papermill_core::Result;
use papermill_core::report::{
    AlgorithmDesign, Evaluation, GapAnalysis, Implementation, Paper, Refinement,
    ResearchDirection,
};
use papermill_core::request::{PaperRecord, ResearchRequest};
use papermill_core::stages::{LiteratureSource, ResearchStages, TextGenerator};

use crate::analyzer::ResearchAnalyzer;
use crate::collector::LiteratureCollector;
use crate::developer::AlgorithmDeveloper;
use crate::writer::PaperWriter;

/// One job's worth of stage workers sharing a text generator and a
/// literature source. Built per job so the request's model preference picks
/// the generator.
pub struct ResearchSuite {
    collector: LiteratureCollector,
    analyzer: ResearchAnalyzer,
    developer: AlgorithmDeveloper,
    writer: PaperWriter,
}

impl ResearchSuite {
    pub fn new(model: Arc<dyn TextGenerator>, source: Arc<dyn LiteratureSource>) -> Self {
        Self {
            collector: LiteratureCollector::new(model.clone(), source),
            analyzer: ResearchAnalyzer::new(model.clone()),
            developer: AlgorithmDeveloper::new(model.clone()),
            writer: PaperWriter::new(model),
        }
    }
}

#[async_trait]
impl ResearchStages for ResearchSuite {
    async fn collect_literature(&self, request: &ResearchRequest) -> Result<Vec<PaperRecord>> {
        self.collector
            .gather_papers(&request.domain, &request.seed_papers)
            .await
    }

    async fn identify_gaps(&self, papers: &[PaperRecord]) -> Result<GapAnalysis> {
        self.analyzer.identify_gaps(papers).await
    }

    async fn synthesize_direction(
        &self,
        gaps: &GapAnalysis,
        focus: Option<&str>,
    ) -> Result<ResearchDirection> {
        self.analyzer.generate_direction(gaps, focus).await
    }

    async fn design_algorithm(
        &self,
        direction: &ResearchDirection,
        papers: &[PaperRecord],
    ) -> Result<AlgorithmDesign> {
        self.developer.design_algorithm(direction, papers).await
    }

    async fn implement_algorithm(&self, design: &AlgorithmDesign) -> Result<Implementation> {
        self.developer.implement_algorithm(design).await
    }

    async fn evaluate_algorithm(&self, implementation: &Implementation) -> Result<Evaluation> {
        self.developer.evaluate_algorithm(implementation).await
    }

    async fn refine_algorithm(
        &self,
        implementation: &Implementation,
        evaluation: &Evaluation,
    ) -> Result<Refinement> {
        self.developer.refine_algorithm(implementation, evaluation).await
    }

    async fn write_paper(
        &self,
        direction: &ResearchDirection,
        design: &AlgorithmDesign,
        implementation: &Refinement,
        evaluation: &Evaluation,
        papers: &[PaperRecord],
    ) -> Result<Paper> {
        self.writer
            .generate_paper(direction, design, implementation, evaluation, papers)
            .await
    }
}
