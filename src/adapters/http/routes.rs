//! Route definitions for the honeypot REST surface

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    end_session, get_session, health, honeypot_turn, list_sessions, simulate, AppState,
};

/// Create the honeypot router with all endpoints
///
/// # Endpoints
///
/// - `POST /api/honeypot` - Process one inbound scammer message
/// - `GET  /health` - Liveness and active-session count
/// - `GET  /api/sessions` - List sessions
/// - `GET  /api/sessions/{id}` - Session detail
/// - `POST /api/sessions/{id}/end` - Manually end a session
/// - `POST /api/simulate` - Drive one scripted conversation
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/honeypot", post(honeypot_turn))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/end", post(end_session))
        .route("/api/simulate", post(simulate))
        .with_state(state)
}
