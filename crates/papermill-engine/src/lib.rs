//! Job orchestration and state tracking for Papermill.
//!
//! Owns the in-memory job registry, the per-job bounded log capture, the
//! pipeline orchestrator that drives each job through the research stages,
//! and the read-side query projections used by the HTTP layer.

pub mod logsink;
pub mod orchestrator;
pub mod query;
pub mod registry;

pub use logsink::{LOG_CAPACITY, LogBatch, LogEntry, LogLevel, LogSink};
pub use orchestrator::PipelineOrchestrator;
pub use query::{JobQueries, LogsView, QueryError, StatusView};
pub use registry::JobRegistry;
