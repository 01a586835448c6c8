//! Read-side projections over the registry and log sink.

use std::sync::Arc;

use papermill_core::JobId;
use papermill_core::job::{JobDetails, JobStatus, Stage};
use papermill_core::report::ResearchReport;
use serde::Serialize;
use thiserror::Error;

use crate::logsink::{LogEntry, LogSink};
use crate::registry::JobRegistry;

/// Why a read-side query could not be answered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("research job not found")]
    NotFound,

    #[error("research is not yet complete")]
    NotReady,

    #[error("research completed but no results were generated")]
    MissingResults,
}

/// Snapshot answering a status poll.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub job_id: JobId,
    pub status: JobStatus,
    pub current_stage: Stage,
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JobDetails>,
}

/// Log entries past a cursor plus the job's headline state.
#[derive(Debug, Clone, Serialize)]
pub struct LogsView {
    pub logs: Vec<String>,
    pub structured_logs: Vec<LogEntry>,
    pub total_count: usize,
    pub new_count: usize,
    pub job_status: JobStatus,
    pub job_stage: Stage,
    pub job_progress: f64,
}

/// Stateless, idempotent queries over the shared stores. Performs no
/// mutation; everything is a snapshot as of the call.
#[derive(Clone)]
pub struct JobQueries {
    registry: Arc<JobRegistry>,
    logs: Arc<LogSink>,
}

impl JobQueries {
    pub fn new(registry: Arc<JobRegistry>, logs: Arc<LogSink>) -> Self {
        Self { registry, logs }
    }

    /// What stage/progress/status a job is at.
    pub async fn status(&self, id: JobId) -> Result<StatusView, QueryError> {
        let job = self.registry.get(id).await.ok_or(QueryError::NotFound)?;
        Ok(StatusView {
            job_id: job.id,
            status: job.status,
            current_stage: job.current_stage,
            progress: job.progress,
            details: job.details,
        })
    }

    /// The final report of a completed job.
    pub async fn results(&self, id: JobId) -> Result<ResearchReport, QueryError> {
        let job = self.registry.get(id).await.ok_or(QueryError::NotFound)?;
        if job.status != JobStatus::Completed {
            return Err(QueryError::NotReady);
        }
        if let Some(report) = job.results {
            return Ok(report);
        }
        // results and details are written together on completion; tolerate
        // one of them missing before declaring the record inconsistent
        match job.details {
            Some(JobDetails::Report(report)) => Ok(report),
            _ => Err(QueryError::MissingResults),
        }
    }

    /// Log entries appended after `last_seen` (a structured-log sequence
    /// number), with the job's current status alongside.
    pub async fn logs(&self, id: JobId, last_seen: u64) -> Result<LogsView, QueryError> {
        let job = self.registry.get(id).await.ok_or(QueryError::NotFound)?;
        let batch = self.logs.read_since(id, last_seen).await;
        let new_count = batch.lines.len();
        Ok(LogsView {
            logs: batch.lines,
            structured_logs: batch.structured,
            total_count: batch.total_count,
            new_count,
            job_status: job.status,
            job_stage: job.current_stage,
            job_progress: job.progress,
        })
    }
}
