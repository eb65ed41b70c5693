//! Shared foundation types for the domain layer.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{PersonaId, SessionId};
pub use timestamp::Timestamp;
