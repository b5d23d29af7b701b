//! Caller identity and bearer tokens.
//!
//! Issuing credentials belongs to the auth feature; this module only knows how
//! to read a token into an [`domain::AuthUser`] and, for tooling, how to mint one.

pub mod domain;
pub mod errors;
pub mod token;

pub use domain::{AuthUser, Role};
pub use token::TokenVerifier;
