pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Auth routes
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // API routes
        .nest("/api", api_routes(app_state.clone()))
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/videos", video_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest("/rewards", reward_routes(state.clone()))
        .nest("/topics", topic_routes(state.clone()))
        .nest("/payments", payment_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}

fn video_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::uploads::upload))
        .route("/mine", get(handlers::uploads::list_mine))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::users::me))
        .route("/me/payout", put(handlers::users::update_payout_details))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn reward_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::rewards::list_catalog))
        .route("/mine", get(handlers::rewards::list_mine))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn topic_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::topics::list_active))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

/// Catalog and topic administration. Payment management has its own gate
/// below; these only need the admin role.
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/rewards", post(handlers::rewards::create))
        .route("/rewards/:id/active", put(handlers::rewards::set_active))
        .route("/topics", post(handlers::topics::create))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}

fn payment_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::payments::list))
        .route("/", post(handlers::payments::create))
        .route("/stats", get(handlers::payments::stats))
        .route("/eligible-users", get(handlers::payments::eligible_users))
        .route("/:id", get(handlers::payments::get))
        .route("/:id/status", put(handlers::payments::update_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_payment_manager,
        ))
}
