//! HTTP front door
//!
//! Thin transport layer over the dialogue core:
//! - GET  /              - health check
//! - GET  /product-types - the six product types
//! - GET  /products      - paginated catalog browsing
//! - POST /chat          - one user message, one stage result
//!
//! Owns session lifecycle (registry + per-session locks) and forwards one
//! message at a time into the orchestrator.

mod handlers;
mod sessions;
mod types;

pub use sessions::{SessionLocks, SessionRegistry, SessionSnapshot};
pub use types::{ChatRequest, ChatResponse, ProductListParams};

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::dialogue::Orchestrator;
use crate::products::ProductStore;

// ============================================================================
// Server State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub products: ProductStore,
    pub sessions: Arc<SessionRegistry>,
    pub locks: Arc<SessionLocks>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, products: ProductStore) -> Self {
        Self {
            orchestrator,
            products,
            sessions: Arc::new(SessionRegistry::new()),
            locks: Arc::new(SessionLocks::new()),
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::status_handler))
        .route("/product-types", get(handlers::product_types_handler))
        .route("/products", get(handlers::products_handler))
        .route("/chat", post(handlers::chat_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until shutdown.
pub async fn run(bind_address: &str, state: AppState) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("server listening on http://{}", bind_address);
    axum::serve(listener, app).await?;
    Ok(())
}
