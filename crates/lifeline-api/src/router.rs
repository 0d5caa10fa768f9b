//! Axum router construction for the request API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for the mobile client.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness
/// - `GET /api/facilities` -- facility directory
/// - `PUT|GET /api/users/{id}/profile` -- user profile
/// - `POST|GET /api/users/{id}/sos` -- dispatch an SOS / read the SOS log
/// - `POST|GET /api/users/{id}/falls` -- log a fall / read the fall log
/// - `POST|GET /api/users/{id}/checkups` -- book a checkup / read bookings
/// - `GET /api/reports/sos` -- SOS summary across users
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/facilities", get(handlers::list_facilities))
        .route(
            "/api/users/{id}/profile",
            get(handlers::get_profile).put(handlers::put_profile),
        )
        .route(
            "/api/users/{id}/sos",
            get(handlers::list_sos).post(handlers::post_sos),
        )
        .route(
            "/api/users/{id}/falls",
            get(handlers::list_falls).post(handlers::post_fall),
        )
        .route(
            "/api/users/{id}/checkups",
            get(handlers::list_checkups).post(handlers::post_checkup),
        )
        .route("/api/reports/sos", get(handlers::sos_report))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
