//! Catch API endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use chrono::Local;

use super::{ApiResponse, ApiResult, DataResponse, OutcomeResponse};
use crate::errors::AppError;
use crate::models::{Catch, CatchInput};
use crate::AppState;

pub const CATCH_NOT_FOUND: &str = "Catch not found";
pub const CATCH_DELETED: &str = "Catch deleted successfully";

/// POST /log-catch - Record a new catch.
pub async fn log_catch(
    State(state): State<AppState>,
    payload: Result<Json<CatchInput>, JsonRejection>,
) -> ApiResult<ApiResponse<Vec<Catch>>> {
    let Json(input) = payload.map_err(reject_body)?;
    let record = input.into_new_record(Local::now().naive_local())?;

    let rows = state.store.insert(&record).await?;
    tracing::info!(
        "Logged catch {:?} at {}",
        rows.first().map(|c| c.id),
        record.location
    );

    Ok(ApiResponse::success(rows))
}

/// GET /catches - List all catches by ascending id.
pub async fn list_catches(State(state): State<AppState>) -> ApiResult<DataResponse<Vec<Catch>>> {
    let rows = state.store.list().await?;
    tracing::debug!("Listed {} catches", rows.len());

    Ok(DataResponse { data: rows })
}

/// PUT /edit-catch/:id - Replace the fields of a catch.
pub async fn edit_catch(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CatchInput>, JsonRejection>,
) -> ApiResult<ApiResponse<Vec<Catch>>> {
    let Path(id) = id.map_err(reject_path)?;
    let Json(input) = payload.map_err(reject_body)?;
    let changes = input.into_changes()?;

    let rows = state.store.update(id, &changes).await?;
    if rows.is_empty() {
        tracing::info!("Edit of catch {} matched no rows", id);
        return Ok(ApiResponse::unchanged(rows, CATCH_NOT_FOUND));
    }

    tracing::info!("Edited catch {}", id);
    Ok(ApiResponse::success(rows))
}

/// DELETE /delete-catch/:id - Remove a catch.
pub async fn delete_catch(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<OutcomeResponse> {
    let Path(id) = id.map_err(reject_path)?;

    match state.store.delete(id).await {
        Ok(rows) if rows.is_empty() => {
            tracing::info!("Delete of catch {} matched no rows", id);
            Ok(OutcomeResponse::new(false, CATCH_NOT_FOUND))
        }
        Ok(_) => {
            tracing::info!("Deleted catch {}", id);
            Ok(OutcomeResponse::new(true, CATCH_DELETED))
        }
        Err(e) => Err(AppError::store_with_context("Delete failed", e)),
    }
}

fn reject_body(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn reject_path(rejection: PathRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
