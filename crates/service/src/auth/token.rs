use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{AuthUser, Role};
use super::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
}

/// HS256 verifier shared by every guarded route.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    /// Decode and validate `token`, then resolve its role.
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))?;
        let claims = data.claims;
        let role: Role = claims.role.parse()?;
        debug!(sub = %claims.sub, %role, "token verified");
        Ok(AuthUser { id: claims.sub, email: claims.email, role })
    }
}

/// Mint a token for `user` valid for `ttl`. Used by tooling and tests.
pub fn issue_token(secret: &str, user: &AuthUser, ttl: chrono::Duration) -> Result<String, AuthError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        exp: (now + ttl).timestamp().max(0) as usize,
        iat: Some(now.timestamp().max(0) as usize),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}
