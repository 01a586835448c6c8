//! In-memory job registry.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use papermill_core::JobId;
use papermill_core::job::{JobDetails, JobRecord, JobStatus, Stage, UpdatePayload};
use papermill_core::request::ResearchRequest;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Process-wide store of all job records, the single source of truth for
/// status/progress/results queries.
///
/// Records are never deleted. The whole map sits behind one lock so every
/// read sees a record as of a single update, never a partially applied one;
/// job volume is low enough that finer-grained locking buys nothing.
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate an identifier and insert a fresh record for the request.
    pub async fn create(&self, request: ResearchRequest) -> JobId {
        let id = JobId::new();
        self.jobs.write().await.insert(id, JobRecord::new(id, request));
        info!(job_id = %id, "job created");
        id
    }

    /// Apply one status/stage/progress update with an optional payload.
    ///
    /// A `Final` payload replaces `details` wholesale and sets `results`;
    /// an `Error` payload replaces `details` with the failure; a `Stage`
    /// payload is merged into the per-stage map under the update's stage
    /// key, last writer wins. Updates to unknown jobs are logged and
    /// dropped, and jobs already in a terminal state are never modified.
    pub async fn update(
        &self,
        id: JobId,
        status: JobStatus,
        stage: Stage,
        progress: f64,
        payload: Option<UpdatePayload>,
    ) {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&id) else {
            error!(job_id = %id, "attempted to update non-existent job");
            return;
        };
        if job.status.is_terminal() {
            warn!(job_id = %id, status = %job.status, "ignoring update to finished job");
            return;
        }

        job.status = status;
        job.current_stage = stage;
        job.progress = progress;
        job.updated_at = Utc::now();

        match payload {
            Some(UpdatePayload::Final(report)) => {
                job.details = Some(JobDetails::Report(report.clone()));
                job.results = Some(report);
            }
            Some(UpdatePayload::Error(message)) => {
                job.details = Some(JobDetails::Failed { error: message });
            }
            Some(UpdatePayload::Stage(output)) => match &mut job.details {
                Some(JobDetails::Partial(map)) => {
                    map.insert(stage, output);
                }
                _ => {
                    let mut map = BTreeMap::new();
                    map.insert(stage, output);
                    job.details = Some(JobDetails::Partial(map));
                }
            },
            None => {}
        }

        info!(job_id = %id, status = %status, stage = %stage, progress, "job status updated");
    }

    /// A consistent snapshot of the record as of the call.
    pub async fn get(&self, id: JobId) -> Option<JobRecord> {
        self.jobs.read().await.get(&id).cloned()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
