//! FormKit API server
//!
//! axum service exposing form CRUD and version history over the shared
//! in-memory repository. Every response uses the
//! [`ApiResponse`](formkit_core::wire::ApiResponse) envelope.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use formkit_core::InMemoryFormRepository;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<InMemoryFormRepository>,
    /// Static bearer token; `None` leaves the API open
    pub token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(repo: Arc<InMemoryFormRepository>) -> Self {
        Self { repo, token: None }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token: String = token.into();
        self.token = Some(Arc::from(token));
        self
    }
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::forms::router())
        .merge(routes::versions::router())
        .route_layer(from_fn_with_state(state.clone(), middleware::auth::require_token));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
