//! Version history endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use formkit_core::wire::{schema_from_wire, version_to_wire, ApiResponse, SchemaRequest, WireVersion};
use formkit_core::{FormsError, VersionStore};

use crate::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/forms/:id/versions",
            get(list_versions).post(create_version),
        )
        .route("/forms/:id/versions/:number", delete(delete_version))
        .route("/forms/:id/versions/:number/restore", post(restore_version))
}

/// Version numbers that do not parse name no existing version
fn version_number(form_id: &str, raw: &str) -> Result<u32, FormsError> {
    raw.parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| FormsError::NotFound(format!("version {} not found for form {}", raw, form_id)))
}

pub async fn list_versions(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<WireVersion>>>> {
    let versions = state.repo.list_versions(&id).await?;
    Ok(Json(ApiResponse::success(
        versions.iter().map(version_to_wire).collect(),
    )))
}

pub async fn create_version(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<SchemaRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WireVersion>>)> {
    let Json(request) = payload?;
    let schema = schema_from_wire(request.schema);
    let version = state.repo.create_version(&id, &schema).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(version_to_wire(&version))),
    ))
}

pub async fn restore_version(
    Path((id, number)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WireVersion>>)> {
    let number = version_number(&id, &number)?;
    let version = state.repo.restore_version(&id, number).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(version_to_wire(&version))),
    ))
}

pub async fn delete_version(
    Path((id, number)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let number = version_number(&id, &number)?;
    state.repo.delete_version(&id, number).await?;
    Ok(Json(ApiResponse::message(format!("version {} deleted", number))))
}
