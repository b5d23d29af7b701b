use thiserror::Error;

use super::domain::Role;

/// Reasons a caller is turned away before reaching a handler.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("role {0} is not allowed on this route")]
    Forbidden(Role),
    #[error("token error: {0}")]
    TokenError(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::MissingCredential => 1001,
            AuthError::InvalidCredential(_) => 1002,
            AuthError::UnknownRole(_) => 1003,
            AuthError::Forbidden(_) => 1004,
            AuthError::TokenError(_) => 1102,
        }
    }

    /// Whether the caller proved who they are but lacks the role.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::Forbidden(_) | AuthError::UnknownRole(_))
    }
}
