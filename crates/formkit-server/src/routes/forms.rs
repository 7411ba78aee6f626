//! Form endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use formkit_core::wire::{form_to_wire, schema_from_wire, ApiResponse, SchemaRequest, WireForm};
use formkit_core::FormStore;

use crate::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/forms", get(list_forms).post(create_form))
        .route(
            "/forms/:id",
            get(get_form).put(save_schema).delete(delete_form),
        )
        .route("/forms/:id/publish", post(publish_form))
}

/// List all forms, most recently updated first
pub async fn list_forms(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<WireForm>>>> {
    let forms = state.repo.list_forms().await?;
    Ok(Json(ApiResponse::success(forms.iter().map(form_to_wire).collect())))
}

pub async fn create_form(
    State(state): State<AppState>,
    payload: Result<Json<SchemaRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WireForm>>)> {
    let Json(request) = payload?;
    let schema = schema_from_wire(request.schema);
    let form = state.repo.create_form(&schema).await?;
    tracing::info!(form_id = %form.id, title = %form.schema.title, "form created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(form_to_wire(&form)))))
}

pub async fn get_form(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<WireForm>>> {
    let form = state.repo.get_form(&id).await?;
    Ok(Json(ApiResponse::success(form_to_wire(&form))))
}

/// Replace the live schema without touching history
pub async fn save_schema(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<SchemaRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<WireForm>>> {
    let Json(request) = payload?;
    let schema = schema_from_wire(request.schema);
    let form = state.repo.save_schema(&id, &schema).await?;
    Ok(Json(ApiResponse::success(form_to_wire(&form))))
}

pub async fn publish_form(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<WireForm>>> {
    let form = state.repo.publish_form(&id).await?;
    tracing::info!(form_id = %form.id, version = ?form.current_version, "form published");
    Ok(Json(ApiResponse::success(form_to_wire(&form))))
}

pub async fn delete_form(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.repo.delete_form(&id).await?;
    Ok(Json(ApiResponse::message(format!("form {} deleted", id))))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use formkit_core::{FormStatus, InMemoryFormRepository};
    use serde_json::{json, Value};

    use super::*;
    use crate::build_router;

    fn server() -> TestServer {
        let state = AppState::new(Arc::new(InMemoryFormRepository::new()));
        TestServer::new(build_router(state)).unwrap()
    }

    fn contact_form() -> Value {
        json!({
            "schema": {
                "title": "Contact",
                "fields": [
                    { "id": "email", "type": "email", "label": "Email", "position": 2, "order": 2 },
                    { "id": "name", "type": "text", "label": "Name", "position": 1, "order": 1 }
                ]
            }
        })
    }

    async fn create(server: &TestServer) -> WireForm {
        let response = server.post("/api/forms").json(&contact_form()).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<ApiResponse<WireForm>>().data.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_form() {
        let server = server();
        let created = create(&server).await;

        assert_eq!(created.version_count, 0);
        assert_eq!(created.schema.fields[0].id, "name");

        let response = server.get(&format!("/api/forms/{}", created.id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let fetched = response.json::<ApiResponse<WireForm>>().data.unwrap();
        assert_eq!(fetched.schema.title, "Contact");
        assert_eq!(fetched.schema.fields[1].position, Some(2));
    }

    #[tokio::test]
    async fn test_invalid_schema_is_422() {
        let server = server();
        let response = server
            .post("/api/forms")
            .json(&json!({ "schema": { "title": "" } }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<ApiResponse<()>>();
        assert!(!body.success);
        assert_eq!(body.code.as_deref(), Some("invalid_schema"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_schema() {
        let server = server();
        let response = server
            .post("/api/forms")
            .json(&json!({ "title": "missing wrapper" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<ApiResponse<()>>().code.as_deref(),
            Some("invalid_schema")
        );
    }

    #[tokio::test]
    async fn test_unknown_form_is_404() {
        let server = server();
        let response = server.get("/api/forms/missing").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body = response.json::<ApiResponse<()>>();
        assert_eq!(body.code.as_deref(), Some("not_found"));
        assert_eq!(body.message.as_deref(), Some("form not found: missing"));
    }

    #[tokio::test]
    async fn test_save_publish_delete() {
        let server = server();
        let created = create(&server).await;
        let path = format!("/api/forms/{}", created.id);

        let response = server
            .put(&path)
            .json(&json!({ "schema": { "title": "Contact (edited)" } }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let saved = response.json::<ApiResponse<WireForm>>().data.unwrap();
        assert_eq!(saved.schema.title, "Contact (edited)");
        assert_eq!(saved.version_count, 0);

        let response = server.post(&format!("{}/publish", path)).await;
        let published = response.json::<ApiResponse<WireForm>>().data.unwrap();
        assert_eq!(published.status, FormStatus::Published);
        assert_eq!(published.current_version, Some(1));

        let response = server.delete(&path).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.json::<ApiResponse<()>>().success);

        let response = server.get(&path).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_forms() {
        let server = server();
        create(&server).await;
        create(&server).await;

        let forms = server
            .get("/api/forms")
            .await
            .json::<ApiResponse<Vec<WireForm>>>()
            .data
            .unwrap();
        assert_eq!(forms.len(), 2);
    }
}
