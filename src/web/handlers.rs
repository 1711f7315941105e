//! Request handlers for the board API.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use super::server::AppState;
use crate::db::Database;
use crate::error::{BoardError, BoardResult};
use crate::types::{NewTask, TaskMove, TaskPlacement};

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let status = match &self {
            BoardError::Validation { .. } => StatusCode::BAD_REQUEST,
            BoardError::TaskNotFound(_) | BoardError::ColumnNotFound(_) => StatusCode::NOT_FOUND,
            BoardError::Store(_) | BoardError::Migration(_) | BoardError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Rejected request: {}", self);
        }

        (status, Json(self.to_body())).into_response()
    }
}

/// Health check response.
#[derive(serde::Serialize)]
pub(super) struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Run a synchronous database call on the blocking pool.
async fn run_db<F, T>(db: &Arc<Database>, f: F) -> BoardResult<T>
where
    F: FnOnce(&Database) -> BoardResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(BoardError::internal)?
}

fn body_error(rejection: JsonRejection) -> BoardError {
    BoardError::invalid("body", rejection.body_text())
}

fn path_error(rejection: PathRejection) -> BoardError {
    BoardError::invalid("task_id", rejection.body_text())
}

/// `GET /api/board`
pub(super) async fn get_board(State(state): State<AppState>) -> Result<Response, BoardError> {
    let board = run_db(state.db(), |db| db.get_board()).await?;
    Ok(([(header::CACHE_CONTROL, "no-cache")], Json(board)).into_response())
}

/// `POST /api/tasks`
pub(super) async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<Response, BoardError> {
    let Json(input) = body.map_err(body_error)?;
    let task = run_db(state.db(), move |db| db.create_task(&input)).await?;
    let location = format!("/api/tasks/{}", task.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(task),
    )
        .into_response())
}

/// `POST /api/tasks/{task_id}/move`
pub(super) async fn move_task(
    State(state): State<AppState>,
    task_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TaskMove>, JsonRejection>,
) -> Result<Json<TaskPlacement>, BoardError> {
    let Path(task_id) = task_id.map_err(path_error)?;
    let Json(target) = body.map_err(body_error)?;

    let task = run_db(state.db(), move |db| db.move_task(task_id, &target)).await?;
    Ok(Json(TaskPlacement::from(&task)))
}

/// `GET /api/health`
pub(super) async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
