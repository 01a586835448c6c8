//! Research job endpoints.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use papermill_core::JobId;
use papermill_core::report::ResearchReport;
use papermill_core::request::ResearchRequest;
use papermill_engine::{LogsView, StatusView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::render;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_research))
        .route("/{id}/status", get(get_status))
        .route("/{id}/results", get(get_results))
        .route("/{id}/logs", get(get_logs))
        .route("/{id}/paper", get(get_paper))
}

#[derive(Debug, Serialize)]
struct StartResponse {
    job_id: JobId,
    message: String,
}

async fn start_research(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    if request.domain.trim().is_empty() {
        return Err(ApiError::BadRequest("domain must not be empty".to_string()));
    }

    let suite = (state.suites)(&request);
    let job_id = state.orchestrator.start(request, suite).await;

    Ok(Json(StartResponse {
        job_id,
        message: "Research pipeline initiated".to_string(),
    }))
}

async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusView>, ApiError> {
    let status = state.queries.status(JobId::from_uuid(id)).await?;
    Ok(Json(status))
}

async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResearchReport>, ApiError> {
    let report = state.queries.results(JobId::from_uuid(id)).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
struct GetLogsQuery {
    /// Sequence number of the last structured entry the client has seen.
    last_seen: Option<u64>,
}

async fn get_logs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<GetLogsQuery>,
) -> Result<Json<LogsView>, ApiError> {
    let view = state
        .queries
        .logs(JobId::from_uuid(id), query.last_seen.unwrap_or(0))
        .await?;
    Ok(Json(view))
}

async fn get_paper(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.queries.results(JobId::from_uuid(id)).await?;
    let document = render::paper_document(&report.paper);

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/html; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"research-paper-{id}.html\""),
            ),
        ],
        document,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use crate::state::SuiteFactory;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use papermill_core::report::{
        AlgorithmDesign, Evaluation, GapAnalysis, Implementation, Paper, Refinement,
        ResearchDirection,
    };
    use papermill_core::request::PaperRecord;
    use papermill_core::stages::ResearchStages;
    use papermill_core::{Error, Result};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct MockSuite {
        fail_evaluation: bool,
    }

    #[async_trait]
    impl ResearchStages for MockSuite {
        async fn collect_literature(
            &self,
            _request: &ResearchRequest,
        ) -> Result<Vec<PaperRecord>> {
            Ok(vec![])
        }

        async fn identify_gaps(&self, papers: &[PaperRecord]) -> Result<GapAnalysis> {
            Ok(GapAnalysis {
                analysis: "gaps".to_string(),
                papers_analyzed: papers.len(),
            })
        }

        async fn synthesize_direction(
            &self,
            _gaps: &GapAnalysis,
            focus: Option<&str>,
        ) -> Result<ResearchDirection> {
            Ok(ResearchDirection {
                direction: "onward".to_string(),
                focus: focus.unwrap_or("general").to_string(),
            })
        }

        async fn design_algorithm(
            &self,
            _direction: &ResearchDirection,
            _papers: &[PaperRecord],
        ) -> Result<AlgorithmDesign> {
            Ok(AlgorithmDesign {
                design_document: "design".to_string(),
            })
        }

        async fn implement_algorithm(&self, _design: &AlgorithmDesign) -> Result<Implementation> {
            Ok(Implementation {
                code: "pass".to_string(),
                language: "python".to_string(),
            })
        }

        async fn evaluate_algorithm(
            &self,
            _implementation: &Implementation,
        ) -> Result<Evaluation> {
            if self.fail_evaluation {
                return Err(Error::Generation("model unavailable".to_string()));
            }
            Ok(Evaluation {
                evaluation_report: "fine".to_string(),
            })
        }

        async fn refine_algorithm(
            &self,
            implementation: &Implementation,
            _evaluation: &Evaluation,
        ) -> Result<Refinement> {
            Ok(Refinement {
                refined_code: implementation.code.clone(),
                explanation: "unchanged".to_string(),
                language: "python".to_string(),
            })
        }

        async fn write_paper(
            &self,
            _direction: &ResearchDirection,
            _design: &AlgorithmDesign,
            _implementation: &Refinement,
            _evaluation: &Evaluation,
            papers: &[PaperRecord],
        ) -> Result<Paper> {
            Ok(Paper {
                title: "Generated Title".to_string(),
                content: "# Generated Title\n\nBody.".to_string(),
                references: papers.len(),
            })
        }
    }

    fn test_state(fail_evaluation: bool) -> AppState {
        let suites: SuiteFactory = Arc::new(
            move |_request: &ResearchRequest| -> Arc<dyn ResearchStages> {
                Arc::new(MockSuite { fail_evaluation })
            },
        );
        AppState::with_suites(suites)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn start_request(domain: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/research/start")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!("{{\"domain\": \"{domain}\"}}")))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let app = routes::router(test_state(false));
        let response = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let app = routes::router(test_state(false));
        let id = Uuid::now_v7();
        let response = app
            .oneshot(get(&format!("/api/research/{id}/status")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn empty_domain_is_rejected() {
        let app = routes::router(test_state(false));
        let response = app.oneshot(start_request("  ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn start_poll_results_round_trip() {
        let state = test_state(false);
        let app = routes::router(state.clone());

        let response = app
            .clone()
            .oneshot(start_request("graph neural networks"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let job_id: JobId = body["job_id"].as_str().unwrap().parse().unwrap();

        state.orchestrator.wait(job_id).await;

        let response = app
            .clone()
            .oneshot(get(&format!("/api/research/{job_id}/status")))
            .await
            .unwrap();
        let status = body_json(response).await;
        assert_eq!(status["status"], "completed");
        assert_eq!(status["progress"], 1.0);
        assert_eq!(status["current_stage"], "completed");

        let response = app
            .clone()
            .oneshot(get(&format!("/api/research/{job_id}/results")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let results = body_json(response).await;
        assert_eq!(results["paper"]["title"], "Generated Title");

        let response = app
            .clone()
            .oneshot(get(&format!("/api/research/{job_id}/logs?last_seen=0")))
            .await
            .unwrap();
        let logs = body_json(response).await;
        assert!(logs["total_count"].as_u64().unwrap() > 0);
        assert_eq!(logs["job_status"], "completed");

        let response = app
            .oneshot(get(&format!("/api/research/{job_id}/paper")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn failed_job_reports_error_and_withholds_results() {
        let state = test_state(true);
        let app = routes::router(state.clone());

        let response = app.clone().oneshot(start_request("graphs")).await.unwrap();
        let body = body_json(response).await;
        let job_id: JobId = body["job_id"].as_str().unwrap().parse().unwrap();

        state.orchestrator.wait(job_id).await;

        let response = app
            .clone()
            .oneshot(get(&format!("/api/research/{job_id}/status")))
            .await
            .unwrap();
        let status = body_json(response).await;
        assert_eq!(status["status"], "error");
        assert_eq!(status["current_stage"], "error");
        assert_eq!(status["progress"], 0.0);
        assert!(
            status["details"]["error"]
                .as_str()
                .unwrap()
                .contains("model unavailable")
        );

        let response = app
            .oneshot(get(&format!("/api/research/{job_id}/results")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
