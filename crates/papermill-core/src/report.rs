//! Stage output payloads and the final research report.

use serde::{Deserialize, Serialize};

use crate::request::PaperRecord;

/// Analysis of research gaps across the collected literature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Structured prose analysis of unsolved problems and limitations.
    pub analysis: String,
    /// How many papers went into the analysis.
    pub papers_analyzed: usize,
}

/// A concrete research direction derived from the gap analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchDirection {
    pub direction: String,
    /// The caller-requested focus, or "general" when none was given.
    pub focus: String,
}

/// Design document for the proposed algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmDesign {
    pub design_document: String,
}

/// First implementation of the designed algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub code: String,
    pub language: String,
}

/// Evaluation report over an implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub evaluation_report: String,
}

/// Refined implementation produced from the evaluation feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refinement {
    pub refined_code: String,
    pub explanation: String,
    pub language: String,
}

/// The generated research paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    /// Markdown body following the standard academic section structure.
    pub content: String,
    /// Number of reference papers cited.
    pub references: usize,
}

/// Output of a single pipeline stage.
///
/// Serialized without an inner tag; in a job's `details` each output sits
/// under its stage key, which is the tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageOutput {
    Literature { papers: Vec<PaperRecord> },
    Gaps(GapAnalysis),
    Direction(ResearchDirection),
    Design(AlgorithmDesign),
    Implementation(Implementation),
    Evaluation(Evaluation),
    Refinement(Refinement),
}

/// Final payload of a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub paper: Paper,
    pub implementation: Refinement,
    pub evaluation: Evaluation,
    pub research_direction: ResearchDirection,
    pub algorithm_design: AlgorithmDesign,
}
