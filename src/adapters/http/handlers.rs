//! HTTP handlers for the honeypot endpoints
//!
//! These handlers connect Axum routes to the application layer handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use http::{HeaderMap, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::application::handlers::engage::{
    DriveConversationHandler, EndSessionError, EndSessionHandler, GetSessionError,
    GetSessionHandler, ListSessionsHandler, ProcessTurnError, ProcessTurnHandler, TurnCommand,
};
use crate::domain::detection::ScamType;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::SessionStore;

use super::dto::{
    ErrorResponse, HealthResponse, HoneypotRequest, HoneypotResponse, SessionDetailResponse,
    SessionListResponse, SimulateRequest, SimulateResponse,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    turn_handler: Arc<ProcessTurnHandler>,
    end_handler: Arc<EndSessionHandler>,
    get_handler: Arc<GetSessionHandler>,
    list_handler: Arc<ListSessionsHandler>,
    drive_handler: Arc<DriveConversationHandler>,
    store: Arc<dyn SessionStore>,
    api_key: Option<SecretString>,
}

impl AppState {
    pub fn new(
        turn_handler: Arc<ProcessTurnHandler>,
        drive_handler: Arc<DriveConversationHandler>,
        api_key: Option<SecretString>,
    ) -> Self {
        let store = turn_handler.store();
        let end_handler = Arc::new(EndSessionHandler::new(
            Arc::clone(&store),
            turn_handler.finalizer(),
        ));
        let get_handler = Arc::new(GetSessionHandler::new(Arc::clone(&store)));
        let list_handler = Arc::new(ListSessionsHandler::new(Arc::clone(&store)));

        Self {
            turn_handler,
            end_handler,
            get_handler,
            list_handler,
            drive_handler,
            store,
            api_key,
        }
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = &state.api_key else {
        return Ok(());
    };
    let provided = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if provided == Some(expected.expose_secret().as_str()) {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, Json(ErrorResponse::unauthorized())))
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    SessionId::new(raw).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Liveness check
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_sessions = state.store.count().await.unwrap_or(0);
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "honeylure".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions,
    })
}

/// Process one inbound scammer message
///
/// POST /api/honeypot
pub async fn honeypot_turn(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<HoneypotRequest>,
) -> Result<Json<HoneypotResponse>, ApiError> {
    authorize(&state, &headers)?;
    let session_id = parse_session_id(&request.session_id)?;

    if let Some(metadata) = &request.metadata {
        debug!(
            session_id = %session_id,
            channel = metadata.channel.as_deref().unwrap_or("unknown"),
            locale = metadata.locale.as_deref().unwrap_or("unknown"),
            "inbound turn metadata"
        );
    }

    let timestamp = request
        .message
        .timestamp
        .map(Timestamp::from_unix_millis)
        .unwrap_or_else(Timestamp::now);

    let command = TurnCommand {
        session_id,
        prior_turns: request.prior_scammer_turns(),
        text: request.message.text,
        timestamp,
    };

    match state.turn_handler.handle(command).await {
        Ok(outcome) if outcome.status.is_terminated() => Ok(Json(HoneypotResponse::terminal(
            outcome.reply,
            outcome.ended_reason.map(|r| r.to_string()),
        ))),
        Ok(outcome) => Ok(Json(HoneypotResponse::engaged(outcome.reply))),
        Err(ProcessTurnError::SessionClosed(id)) => Err((
            StatusCode::GONE,
            Json(ErrorResponse::session_closed(format!(
                "Session {} no longer accepts messages",
                id
            ))),
        )),
        Err(ProcessTurnError::Store(msg)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        )),
        Err(ProcessTurnError::Domain(err)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(err.to_string())),
        )),
    }
}

/// List sessions
///
/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionListResponse>, ApiError> {
    authorize(&state, &headers)?;
    let sessions = state.list_handler.handle().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(e.to_string())),
        )
    })?;
    Ok(Json(SessionListResponse {
        active_sessions: sessions.len(),
        sessions,
    }))
}

/// Get one session's detail
///
/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SessionDetailResponse>, ApiError> {
    authorize(&state, &headers)?;
    let session_id = parse_session_id(&id)?;

    match state.get_handler.handle(&session_id).await {
        Ok(session) => Ok(Json(SessionDetailResponse::from(&session))),
        Err(GetSessionError::NotFound(id)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(format!("Session {} not found", id))),
        )),
        Err(GetSessionError::Store(msg)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        )),
    }
}

/// Manually end a session and send its final report
///
/// POST /api/sessions/{id}/end
pub async fn end_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<HoneypotResponse>, ApiError> {
    authorize(&state, &headers)?;
    let session_id = parse_session_id(&id)?;

    match state.end_handler.handle(&session_id).await {
        Ok(reason) => Ok(Json(HoneypotResponse::terminal(
            format!("Session {} ended", session_id),
            Some(reason.to_string()),
        ))),
        Err(EndSessionError::NotFound(id)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(format!("Session {} not found", id))),
        )),
        Err(EndSessionError::AlreadyClosed(id)) => Err((
            StatusCode::GONE,
            Json(ErrorResponse::session_closed(format!(
                "Session {} is already closed",
                id
            ))),
        )),
        Err(EndSessionError::Store(msg)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        )),
    }
}

/// Drive one scripted conversation through the engagement loop
///
/// POST /api/simulate
pub async fn simulate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    authorize(&state, &headers)?;

    let scam_type = match request.scam_type.as_deref() {
        None => None,
        Some(raw) => Some(raw.parse::<ScamType>().map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e)),
            )
        })?),
    };

    let outcome = state.drive_handler.handle(scam_type).await.map_err(|e| {
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::internal(e.to_string())),
        )
    })?;

    Ok(Json(SimulateResponse {
        session_id: outcome.session_id.to_string(),
        exchanges: outcome.exchanges,
        status: outcome.status.to_string(),
        ended_reason: outcome.ended_reason.map(|r| r.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        HeuristicPhoneValidator, InMemorySessionStore, RecordingReporter, SimulatedScammerChannel,
    };
    use crate::domain::detection::ScamDetector;
    use crate::domain::engagement::TerminationPolicy;
    use crate::domain::intel::{EnabledExtractors, IntelligenceExtractor};
    use crate::domain::persona::PersonaSelector;
    use super::super::dto::InboundMessage;

    fn state(api_key: Option<&str>) -> AppState {
        let turn_handler = Arc::new(ProcessTurnHandler::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(RecordingReporter::new()),
            ScamDetector::default(),
            IntelligenceExtractor::new(
                EnabledExtractors::all(),
                Arc::new(HeuristicPhoneValidator::new()),
            ),
            PersonaSelector::new(true),
            TerminationPolicy::default(),
            None,
        ));
        let drive_handler = Arc::new(DriveConversationHandler::new(
            Arc::new(SimulatedScammerChannel::new()),
            Arc::clone(&turn_handler),
        ));
        AppState::new(
            turn_handler,
            drive_handler,
            api_key.map(|k| SecretString::new(k.to_string())),
        )
    }

    fn turn_request(session: &str, text: &str) -> HoneypotRequest {
        HoneypotRequest {
            session_id: session.to_string(),
            message: InboundMessage {
                sender: Some("scammer".to_string()),
                text: text.to_string(),
                timestamp: Some(1_770_005_528_731),
            },
            conversation_history: Vec::new(),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn honeypot_turn_replies_success() {
        let state = state(None);
        let response = honeypot_turn(
            State(state),
            HeaderMap::new(),
            Json(turn_request(
                "s1",
                "URGENT: your bank account is blocked, verify your KYC with the OTP now",
            )),
        )
        .await
        .unwrap();

        assert_eq!(response.0.status, "success");
        assert!(!response.0.reply.is_empty());
        assert!(response.0.session_status.is_none());
    }

    #[tokio::test]
    async fn terminated_session_returns_gone() {
        let state = state(None);
        // Benign first message terminates the session immediately.
        honeypot_turn(
            State(state.clone()),
            HeaderMap::new(),
            Json(turn_request("s1", "reminder about your meeting tomorrow")),
        )
        .await
        .unwrap();

        let error = honeypot_turn(
            State(state),
            HeaderMap::new(),
            Json(turn_request("s1", "hello again")),
        )
        .await
        .unwrap_err();
        assert_eq!(error.0, StatusCode::GONE);
        assert_eq!(error.1 .0.code, "SESSION_CLOSED");
    }

    #[tokio::test]
    async fn missing_api_key_is_unauthorized() {
        let state = state(Some("secret-key"));
        let error = honeypot_turn(
            State(state),
            HeaderMap::new(),
            Json(turn_request("s1", "anything")),
        )
        .await
        .unwrap_err();
        assert_eq!(error.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn correct_api_key_is_accepted() {
        let state = state(Some("secret-key"));
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "secret-key".parse().unwrap());

        let response = honeypot_turn(
            State(state),
            headers,
            Json(turn_request("s1", "reminder about your meeting")),
        )
        .await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn unknown_session_detail_is_not_found() {
        let state = state(None);
        let error = get_session(
            State(state),
            HeaderMap::new(),
            Path("missing".to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(error.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn simulate_rejects_unknown_scenarios() {
        let state = state(None);
        let error = simulate(
            State(state),
            HeaderMap::new(),
            Json(SimulateRequest {
                scam_type: Some("pig_butchering".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(error.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn simulate_drives_a_conversation() {
        let state = state(None);
        let response = simulate(
            State(state),
            HeaderMap::new(),
            Json(SimulateRequest {
                scam_type: Some("banking_fraud".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.status, "TERMINATED");
    }

    #[tokio::test]
    async fn health_reports_session_count() {
        let state = state(None);
        let response = health(State(state)).await;
        assert_eq!(response.0.status, "healthy");
        assert_eq!(response.0.active_sessions, 0);
    }
}
