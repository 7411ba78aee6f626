//! HTTP mapping of domain errors

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use formkit_core::wire::ApiResponse;
use formkit_core::FormsError;

/// Handler error; renders the failure envelope with a matching status
#[derive(Debug)]
pub struct ApiError(pub FormsError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FormsError::InvalidSchema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FormsError::NotFound(_) | FormsError::FieldNotFound(_) => StatusCode::NOT_FOUND,
            FormsError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            FormsError::ActiveVersion(_) => StatusCode::BAD_REQUEST,
            FormsError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FormsError> for ApiError {
    fn from(err: FormsError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(FormsError::invalid_schema(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
        }
        (status, Json(ApiResponse::<()>::error(&self.0))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
