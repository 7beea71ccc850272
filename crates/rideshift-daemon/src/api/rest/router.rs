//! API Router configuration

use super::handlers;
use super::state::AppState;
use crate::error::{internal_error_response, ApiError};
use axum::{
    extract::{OriginalUri, Request},
    http::{Method, Uri},
    response::Response,
    routing::get,
    Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Registries
        .route(
            "/rides",
            get(handlers::list_rides)
                .post(handlers::create_ride)
                .put(handlers::update_ride)
                .patch(handlers::ride_action),
        )
        .route(
            "/drivers",
            get(handlers::list_drivers)
                .post(handlers::create_driver)
                .put(handlers::update_driver)
                .patch(handlers::driver_action),
        )
        .route(
            "/governance",
            get(handlers::list_proposals)
                .post(handlers::create_proposal)
                .put(handlers::update_proposal)
                .patch(handlers::vote_on_proposal),
        )
        .route(
            "/users",
            get(handlers::list_users)
                .post(handlers::create_user)
                .put(handlers::update_user),
        )
        .route("/users/:farcaster_id", get(handlers::get_user))
        // Mock collaborators
        .route(
            "/payments",
            get(handlers::payment_status)
                .post(handlers::process_payment)
                .put(handlers::estimate_gas),
        )
        .route(
            "/nft",
            get(handlers::nft_metadata)
                .post(handlers::mint_nft)
                .put(handlers::transfer_nft),
        )
        .route(
            "/maps",
            get(handlers::maps_query).post(handlers::maps_command),
        )
        .route(
            "/ws",
            get(handlers::poll_updates).post(handlers::realtime_message),
        )
        .method_not_allowed_fallback(method_not_allowed);

    // Build router with middleware
    let router = Router::new()
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http().make_span_with(request_span));

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
    } else {
        router
    };

    router.with_state(state)
}

/// Per-request span. Identity headers are recorded, never verified.
fn request_span(request: &Request) -> tracing::Span {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string()
    };

    tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
        farcaster_id = %header("x-farcaster-id"),
        wallet_address = %header("x-wallet-address"),
    )
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");
    internal_error_response()
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} is not supported on {}", method, uri.path()))
}
