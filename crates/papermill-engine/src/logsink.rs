//! Per-job bounded log capture.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use chrono::{DateTime, Utc};
use papermill_core::JobId;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Maximum log entries retained per job; older entries are evicted from the
/// front once the cap is reached.
pub const LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One structured log entry.
///
/// `sequence` is the insertion count at append time, 1-based and monotone
/// per job for the life of the process. It is independent of buffer
/// eviction, which is what makes it usable as a polling cursor; an index
/// into the retained array would silently drift once eviction starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(rename = "sequence_number")]
    pub sequence: u64,
}

#[derive(Default)]
struct JobLogBuffer {
    /// Formatted lines, in lockstep with `structured`.
    lines: VecDeque<String>,
    structured: VecDeque<LogEntry>,
    /// Lifetime append count; the next entry's sequence number.
    appended: u64,
}

/// Entries appended after a cursor, plus the retained-buffer size.
#[derive(Debug, Clone, Default)]
pub struct LogBatch {
    pub lines: Vec<String>,
    pub structured: Vec<LogEntry>,
    /// Lines currently retained (capped at [`LOG_CAPACITY`], not the
    /// lifetime total).
    pub total_count: usize,
}

/// Per-job, append-only, size-bounded log store.
///
/// Appended to by each job's pipeline task and read by concurrent pollers;
/// it shares the registry's lifetime and is scoped by job identifier.
pub struct LogSink {
    buffers: RwLock<HashMap<JobId, JobLogBuffer>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            buffers: RwLock::new(HashMap::new()),
        }
    }

    /// Append one entry to a job's log, evicting the oldest entry once the
    /// buffer is full.
    pub async fn append(&self, id: JobId, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        let timestamp = Utc::now();
        let mut buffers = self.buffers.write().await;
        let buf = buffers.entry(id).or_default();

        buf.appended += 1;
        buf.lines.push_back(format!(
            "{} [{}] {}",
            timestamp.format("%Y-%m-%d %H:%M:%S"),
            level,
            message
        ));
        buf.structured.push_back(LogEntry {
            timestamp,
            level,
            message,
            sequence: buf.appended,
        });
        if buf.lines.len() > LOG_CAPACITY {
            buf.lines.pop_front();
            buf.structured.pop_front();
        }
    }

    /// Everything appended after `cursor`, a [`LogEntry::sequence`] value.
    ///
    /// Unknown jobs and cursors at or past the newest entry yield an empty
    /// batch. Entries already evicted are gone; the batch starts at the
    /// oldest retained entry in that case.
    pub async fn read_since(&self, id: JobId, cursor: u64) -> LogBatch {
        let buffers = self.buffers.read().await;
        let Some(buf) = buffers.get(&id) else {
            return LogBatch::default();
        };
        // lines and structured move in lockstep, so one skip count serves both
        let skip = buf
            .structured
            .iter()
            .take_while(|e| e.sequence <= cursor)
            .count();
        LogBatch {
            lines: buf.lines.iter().skip(skip).cloned().collect(),
            structured: buf.structured.iter().skip(skip).cloned().collect(),
            total_count: buf.lines.len(),
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_since_returns_entries_after_cursor() {
        let sink = LogSink::new();
        let id = JobId::new();
        for i in 1..=5 {
            sink.append(id, LogLevel::Info, format!("line {i}")).await;
        }

        let batch = sink.read_since(id, 0).await;
        assert_eq!(batch.lines.len(), 5);
        assert_eq!(batch.total_count, 5);
        assert_eq!(batch.structured[0].sequence, 1);

        let batch = sink.read_since(id, 3).await;
        assert_eq!(batch.lines.len(), 2);
        assert_eq!(batch.structured[0].message, "line 4");
        assert_eq!(batch.structured[1].sequence, 5);
    }

    #[tokio::test]
    async fn exhausted_cursor_yields_empty_batch() {
        let sink = LogSink::new();
        let id = JobId::new();
        sink.append(id, LogLevel::Info, "only line").await;

        let batch = sink.read_since(id, 1).await;
        assert!(batch.lines.is_empty());
        assert_eq!(batch.total_count, 1);

        // a cursor past everything ever appended is not an error
        let batch = sink.read_since(id, 99).await;
        assert!(batch.lines.is_empty());
    }

    #[tokio::test]
    async fn unknown_job_yields_empty_batch() {
        let sink = LogSink::new();
        let batch = sink.read_since(JobId::new(), 0).await;
        assert!(batch.lines.is_empty());
        assert!(batch.structured.is_empty());
        assert_eq!(batch.total_count, 0);
    }

    #[tokio::test]
    async fn retention_is_bounded_and_sequences_survive_eviction() {
        let sink = LogSink::new();
        let id = JobId::new();
        for i in 1..=(LOG_CAPACITY as u64 + 40) {
            sink.append(id, LogLevel::Info, format!("line {i}")).await;
        }

        let batch = sink.read_since(id, 0).await;
        assert_eq!(batch.total_count, LOG_CAPACITY);
        assert_eq!(batch.lines.len(), LOG_CAPACITY);
        // the oldest 40 entries are no longer retrievable
        assert_eq!(batch.structured[0].sequence, 41);
        assert_eq!(batch.structured[0].message, "line 41");

        // a cursor taken before eviction still lands on the right entry
        let batch = sink.read_since(id, 100).await;
        assert_eq!(batch.structured[0].sequence, 101);
        assert_eq!(batch.structured[0].message, "line 101");
    }

    #[tokio::test]
    async fn levels_format_into_lines() {
        let sink = LogSink::new();
        let id = JobId::new();
        sink.append(id, LogLevel::Error, "boom").await;
        let batch = sink.read_since(id, 0).await;
        assert!(batch.lines[0].contains("[ERROR] boom"));
        assert_eq!(batch.structured[0].level, LogLevel::Error);
    }
}
