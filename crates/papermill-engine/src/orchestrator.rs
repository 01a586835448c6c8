//! Pipeline orchestrator - drives one job through the research stages.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use papermill_core::job::{JobStatus, Stage, UpdatePayload};
use papermill_core::report::{ResearchReport, StageOutput};
use papermill_core::request::ResearchRequest;
use papermill_core::stages::ResearchStages;
use papermill_core::{JobId, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::logsink::{LogLevel, LogSink};
use crate::registry::JobRegistry;

/// Runs each job to completion or failure on its own tokio task.
///
/// Stages execute strictly one after another for a given job; jobs run
/// concurrently and share only the registry and the log sink. Any stage
/// failure is caught once here and becomes the job's single terminal error
/// transition - there is no retry and no partial rollback.
pub struct PipelineOrchestrator {
    registry: Arc<JobRegistry>,
    logs: Arc<LogSink>,
    /// Handles of spawned job tasks, so callers can await them.
    tasks: Mutex<HashMap<JobId, JoinHandle<()>>>,
}

impl PipelineOrchestrator {
    pub fn new(registry: Arc<JobRegistry>, logs: Arc<LogSink>) -> Self {
        Self {
            registry,
            logs,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Create the job record and spawn its pipeline task, returning without
    /// waiting for any stage to run.
    pub async fn start(
        &self,
        request: ResearchRequest,
        stages: Arc<dyn ResearchStages>,
    ) -> JobId {
        let id = self.registry.create(request.clone()).await;
        let registry = self.registry.clone();
        let logs = self.logs.clone();
        let handle = tokio::spawn(async move {
            Self::run_job(registry, logs, stages, id, request).await;
        });
        self.tasks.lock().await.insert(id, handle);
        info!(job_id = %id, "research pipeline started");
        id
    }

    /// Await a job's task and drop its handle. Returns false when the job is
    /// unknown or was already awaited.
    pub async fn wait(&self, id: JobId) -> bool {
        let handle = self.tasks.lock().await.remove(&id);
        match handle {
            Some(handle) => {
                let _ = handle.await;
                true
            }
            None => false,
        }
    }

    async fn run_job(
        registry: Arc<JobRegistry>,
        logs: Arc<LogSink>,
        stages: Arc<dyn ResearchStages>,
        id: JobId,
        request: ResearchRequest,
    ) {
        if let Err(e) = Self::run_pipeline(&registry, &logs, stages.as_ref(), id, &request).await
        {
            error!(job_id = %id, error = %e, "research pipeline failed");
            logs.append(id, LogLevel::Error, format!("Pipeline failed: {e}"))
                .await;
            registry
                .update(
                    id,
                    JobStatus::Error,
                    Stage::Error,
                    0.0,
                    Some(UpdatePayload::Error(e.to_string())),
                )
                .await;
        }
    }

    async fn run_pipeline(
        registry: &JobRegistry,
        logs: &LogSink,
        stages: &dyn ResearchStages,
        id: JobId,
        request: &ResearchRequest,
    ) -> Result<()> {
        logs.append(
            id,
            LogLevel::Info,
            format!("Starting research pipeline for domain '{}'", request.domain),
        )
        .await;

        logs.append(id, LogLevel::Info, "Collecting literature and relevant papers...")
            .await;
        let phase = Instant::now();
        let papers = stages.collect_literature(request).await?;
        logs.append(
            id,
            LogLevel::Info,
            format!(
                "Collected {} papers in {:.2} seconds",
                papers.len(),
                phase.elapsed().as_secs_f64()
            ),
        )
        .await;
        Self::checkpoint(
            registry,
            id,
            Stage::LiteratureCollection,
            StageOutput::Literature {
                papers: papers.clone(),
            },
        )
        .await;

        logs.append(id, LogLevel::Info, "Analyzing research gaps...").await;
        let gaps = stages.identify_gaps(&papers).await?;
        logs.append(
            id,
            LogLevel::Info,
            format!("Gap analysis covered {} papers", gaps.papers_analyzed),
        )
        .await;
        Self::checkpoint(registry, id, Stage::GapAnalysis, StageOutput::Gaps(gaps.clone())).await;

        logs.append(id, LogLevel::Info, "Generating research direction...").await;
        let direction = stages
            .synthesize_direction(&gaps, request.research_focus.as_deref())
            .await?;
        Self::checkpoint(
            registry,
            id,
            Stage::DirectionSynthesis,
            StageOutput::Direction(direction.clone()),
        )
        .await;

        logs.append(id, LogLevel::Info, "Designing algorithm...").await;
        let design = stages.design_algorithm(&direction, &papers).await?;
        Self::checkpoint(
            registry,
            id,
            Stage::AlgorithmDesign,
            StageOutput::Design(design.clone()),
        )
        .await;

        logs.append(id, LogLevel::Info, "Implementing algorithm...").await;
        let implementation = stages.implement_algorithm(&design).await?;
        Self::checkpoint(
            registry,
            id,
            Stage::Implementation,
            StageOutput::Implementation(implementation.clone()),
        )
        .await;

        logs.append(id, LogLevel::Info, "Evaluating algorithm...").await;
        let evaluation = stages.evaluate_algorithm(&implementation).await?;
        Self::checkpoint(
            registry,
            id,
            Stage::Evaluation,
            StageOutput::Evaluation(evaluation.clone()),
        )
        .await;

        logs.append(id, LogLevel::Info, "Refining implementation...").await;
        let refinement = stages.refine_algorithm(&implementation, &evaluation).await?;
        Self::checkpoint(
            registry,
            id,
            Stage::Refinement,
            StageOutput::Refinement(refinement.clone()),
        )
        .await;

        logs.append(id, LogLevel::Info, "Generating research paper...").await;
        let phase = Instant::now();
        let paper = stages
            .write_paper(&direction, &design, &refinement, &evaluation, &papers)
            .await?;
        logs.append(
            id,
            LogLevel::Info,
            format!(
                "Paper '{}' generated in {:.2} seconds",
                paper.title,
                phase.elapsed().as_secs_f64()
            ),
        )
        .await;

        let report = ResearchReport {
            paper,
            implementation: refinement,
            evaluation,
            research_direction: direction,
            algorithm_design: design,
        };
        logs.append(id, LogLevel::Info, "Research pipeline completed successfully")
            .await;
        registry
            .update(
                id,
                JobStatus::Completed,
                Stage::Completed,
                1.0,
                Some(UpdatePayload::Final(report)),
            )
            .await;
        info!(job_id = %id, "research pipeline completed");
        Ok(())
    }

    /// One post-stage registry update: active status, the stage's fixed
    /// progress checkpoint, and its output merged into the details map.
    async fn checkpoint(registry: &JobRegistry, id: JobId, stage: Stage, output: StageOutput) {
        // checkpoint() is Some for every stage this is called with; the
        // final stage goes through the terminal update instead
        let progress = stage.checkpoint().unwrap_or(1.0);
        registry
            .update(
                id,
                JobStatus::Active,
                stage,
                progress,
                Some(UpdatePayload::Stage(output)),
            )
            .await;
    }
}
