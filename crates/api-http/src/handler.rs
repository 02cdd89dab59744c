//! Route Handlers

use crate::error::HttpError;
use crate::extract::ValidatedJson;
use crate::state::HttpState;
use crate::types::{ConfigResponse, PollRequest, PollResponse, TaskView};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use taskgate_core::application::poll;
use taskgate_core::domain::TaskReport;

/// GET /v1/queue/{queue}
#[tracing::instrument(skip(state))]
pub async fn get_config(
    State(state): State<HttpState>,
    Path(queue): Path<String>,
) -> Result<Json<ConfigResponse>, HttpError> {
    let handle = state.resolve(&queue).await?;

    Ok(Json(ConfigResponse {
        configuration: state.config_store.get_config(&handle),
    }))
}

/// POST /v1/queue/{queue}
///
/// Applies the reported outcomes in order, then claims the next eligible
/// task. The body is validated only after the queue resolved, so an unknown
/// queue always answers 404.
#[tracing::instrument(skip(state, body))]
pub async fn poll(
    State(state): State<HttpState>,
    Path(queue): Path<String>,
    body: Result<ValidatedJson<PollRequest>, HttpError>,
) -> Result<Response, HttpError> {
    let handle = state.resolve(&queue).await?;
    let ValidatedJson(request) = body?;

    let reports: Vec<TaskReport> = request.tasks.into_iter().map(TaskReport::from).collect();
    let outcome = poll::execute(handle.as_ref(), &reports).await?;

    Ok(match outcome.claimed {
        Some(task) => Json(PollResponse {
            tasks: vec![TaskView::from(task)],
        })
        .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
