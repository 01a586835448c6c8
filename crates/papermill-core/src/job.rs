//! Job record, status, and stage definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::JobId;
use crate::report::{ResearchReport, StageOutput};
use crate::request::ResearchRequest;

/// Lifecycle status of a job.
///
/// Transitions are monotone along
/// `initializing -> active -> {completed | error}`; nothing leaves a
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Initializing,
    Active,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Initializing => "initializing",
            JobStatus::Active => "active",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Pipeline position reported to callers: the eight ordered stages plus the
/// two terminal markers.
///
/// Declaration order of the stage variants is execution order, which `Ord`
/// relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LiteratureCollection,
    GapAnalysis,
    DirectionSynthesis,
    AlgorithmDesign,
    Implementation,
    Evaluation,
    Refinement,
    PaperSynthesis,
    Completed,
    Error,
}

impl Stage {
    /// The pipeline stages in execution order.
    pub const PIPELINE: [Stage; 8] = [
        Stage::LiteratureCollection,
        Stage::GapAnalysis,
        Stage::DirectionSynthesis,
        Stage::AlgorithmDesign,
        Stage::Implementation,
        Stage::Evaluation,
        Stage::Refinement,
        Stage::PaperSynthesis,
    ];

    /// Progress checkpoint written once this stage completes.
    ///
    /// The final stage has none; its completion is the terminal update at
    /// progress 1.0.
    pub fn checkpoint(self) -> Option<f64> {
        match self {
            Stage::LiteratureCollection => Some(0.1),
            Stage::GapAnalysis => Some(0.25),
            Stage::DirectionSynthesis => Some(0.4),
            Stage::AlgorithmDesign => Some(0.5),
            Stage::Implementation => Some(0.6),
            Stage::Evaluation => Some(0.7),
            Stage::Refinement => Some(0.8),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::LiteratureCollection => "literature_collection",
            Stage::GapAnalysis => "gap_analysis",
            Stage::DirectionSynthesis => "direction_synthesis",
            Stage::AlgorithmDesign => "algorithm_design",
            Stage::Implementation => "implementation",
            Stage::Evaluation => "evaluation",
            Stage::Refinement => "refinement",
            Stage::PaperSynthesis => "paper_synthesis",
            Stage::Completed => "completed",
            Stage::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a job's `details` field holds.
///
/// While the pipeline runs, per-stage outputs accumulate under their stage
/// keys. A failed job carries the error message; a completed job carries the
/// final report, mirrored in `results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobDetails {
    Failed { error: String },
    Report(ResearchReport),
    Partial(BTreeMap<Stage, StageOutput>),
}

/// Payload attached to a registry update.
#[derive(Debug, Clone)]
pub enum UpdatePayload {
    /// One stage's partial output, merged into `details` under the update's
    /// stage key.
    Stage(StageOutput),
    /// Terminal failure message.
    Error(String),
    /// Final report; replaces `details` wholesale and sets `results`.
    Final(ResearchReport),
}

/// One research job as held by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    pub current_stage: Stage,
    pub progress: f64,
    pub request: ResearchRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JobDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResearchReport>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// A fresh record for a just-submitted request.
    pub fn new(id: JobId, request: ResearchRequest) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Initializing,
            current_stage: Stage::LiteratureCollection,
            progress: 0.0,
            request,
            details: None,
            results: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&Stage::LiteratureCollection).unwrap();
        assert_eq!(json, "\"literature_collection\"");
        assert_eq!(Stage::PaperSynthesis.to_string(), "paper_synthesis");
    }

    #[test]
    fn checkpoints_are_monotone() {
        let mut last = 0.0;
        for stage in &Stage::PIPELINE[..7] {
            let cp = stage.checkpoint().unwrap();
            assert!(cp > last, "{stage} checkpoint not increasing");
            last = cp;
        }
        assert_eq!(Stage::PaperSynthesis.checkpoint(), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Initializing.is_terminal());
        assert!(!JobStatus::Active.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }
}
