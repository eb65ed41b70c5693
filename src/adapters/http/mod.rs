//! HTTP adapter - the REST surface consumed by the external API layer.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, HealthResponse, HoneypotRequest, HoneypotResponse, InboundMessage,
    SessionDetailResponse, SimulateRequest, SimulateResponse, TurnMetadata,
};
pub use handlers::AppState;
pub use routes::router;
