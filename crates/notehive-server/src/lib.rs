#![forbid(unsafe_code)]
//! notehive HTTP server: axum router, bearer-token auth, and the service
//! layer that applies the workspace access policy to every operation.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;

pub mod assist;
pub mod auth;
pub mod config;
mod http;
mod middleware;
pub mod service;

pub use assist::{AssistProvider, CannedAssist};
pub use auth::{hash_password, verify_password, Caller, TokenSigner};
pub use config::ApiConfig;
pub use middleware::RequestId;

use notehive_store::Store;

pub const CRATE_NAME: &str = "notehive-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub api: Arc<ApiConfig>,
    pub tokens: TokenSigner,
    pub assist: Option<Arc<dyn AssistProvider>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store, api: ApiConfig, tokens: TokenSigner) -> Self {
        Self {
            store,
            api: Arc::new(api),
            tokens,
            assist: None,
        }
    }

    #[must_use]
    pub fn with_assist(mut self, provider: Arc<dyn AssistProvider>) -> Self {
        self.assist = Some(provider);
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/healthz", get(http::health::healthz_handler))
        .route("/auth/register", post(http::auth::register_handler))
        .route("/auth/login", post(http::auth::login_handler));

    let protected = Router::new()
        .route("/auth/me", get(http::auth::me_handler))
        .route(
            "/workspaces",
            get(http::workspaces::list_handler).post(http::workspaces::create_handler),
        )
        .route(
            "/workspaces/:id",
            get(http::workspaces::get_handler)
                .put(http::workspaces::update_handler)
                .delete(http::workspaces::delete_handler),
        )
        .route(
            "/workspaces/:id/members",
            post(http::workspaces::add_member_handler),
        )
        .route(
            "/workspaces/:id/members/:member_id",
            axum::routing::delete(http::workspaces::remove_member_handler),
        )
        .route(
            "/pages/workspace/:workspace_id",
            get(http::pages::list_handler),
        )
        .route(
            "/pages/workspace/:workspace_id/tree",
            get(http::pages::tree_handler),
        )
        .route("/pages", post(http::pages::create_handler))
        .route(
            "/pages/:id",
            get(http::pages::get_handler)
                .put(http::pages::update_handler)
                .delete(http::pages::delete_handler),
        )
        .route("/pages/:id/reorder", put(http::pages::reorder_handler))
        .route("/assist/summarize", post(http::assist::summarize_handler))
        .route("/assist/rewrite", post(http::assist::rewrite_handler))
        .route("/assist/query", post(http::assist::query_handler))
        .route(
            "/assist/suggestions",
            post(http::assist::suggestions_handler),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::require_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(http::not_found_handler)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
