//! Research gap analysis and direction synthesis.

use std::sync::Arc;

use papermill_core::Result;
use papermill_core::report::{GapAnalysis, ResearchDirection};
use papermill_core::request::PaperRecord;
use papermill_core::stages::{GenerationOptions, TextGenerator};

use crate::text::papers_context;

/// Papers included in the gap-analysis context window.
const GAP_ANALYSIS_PAPER_LIMIT: usize = 15;

/// Analyzes collected papers to identify gaps and derive a research
/// direction from them.
pub struct ResearchAnalyzer {
    model: Arc<dyn TextGenerator>,
}

impl ResearchAnalyzer {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    /// Identify research gaps across the collected papers.
    pub async fn identify_gaps(&self, papers: &[PaperRecord]) -> Result<GapAnalysis> {
        let context = papers_context(papers, GAP_ANALYSIS_PAPER_LIMIT);
        let prompt = format!(
            "Analyze these papers and identify key research gaps in this field:\n\n\
             {context}\n\n\
             Please identify:\n\
             1. Major unsolved problems\n\
             2. Methodological limitations in existing work\n\
             3. Areas where current approaches fail or underperform\n\
             4. Promising research directions that have been under-explored\n\n\
             Format your response as a structured analysis with clear sections."
        );

        let analysis = self
            .model
            .generate(&prompt, &GenerationOptions::with_temperature(0.2))
            .await?;

        Ok(GapAnalysis {
            analysis,
            papers_analyzed: papers.len(),
        })
    }

    /// Turn the gap analysis into a concrete research direction.
    pub async fn generate_direction(
        &self,
        gaps: &GapAnalysis,
        focus: Option<&str>,
    ) -> Result<ResearchDirection> {
        let focus_line = focus
            .map(|f| format!("And focusing specifically on: {f}\n\n"))
            .unwrap_or_default();
        let prompt = format!(
            "Based on the following analysis of research gaps:\n\n\
             {}\n\n\
             {focus_line}\
             Please generate a concrete research direction including:\n\
             1. A specific research question\n\
             2. The importance and potential impact of this research\n\
             3. A high-level approach to address this question\n\
             4. Anticipated challenges and how they might be overcome\n\n\
             Format your response as a structured proposal that could guide novel research.",
            gaps.analysis
        );

        let direction = self
            .model
            .generate(&prompt, &GenerationOptions::with_temperature(0.3))
            .await?;

        Ok(ResearchDirection {
            direction,
            focus: focus.unwrap_or("general").to_string(),
        })
    }
}
