//! Per-route authorization.
//!
//! Every guarded route carries an [`Access`] value. [`enforce`] runs before the
//! handler: it reads the bearer token, resolves the caller, checks the role
//! against the route's allow-list and only then lets the request through, with
//! the [`AuthUser`] stored in request extensions.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use service::auth::errors::AuthError;
use service::auth::{AuthUser, Role, TokenVerifier};
use tracing::{debug, warn};

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credential required.
    Public,
    /// A valid credential whose role is in the list.
    Roles(&'static [Role]),
}

impl Access {
    pub fn requires_credential(&self) -> bool {
        !matches!(self, Access::Public)
    }

    pub fn allows(&self, role: Role) -> bool {
        match self {
            Access::Public => true,
            Access::Roles(allowed) => allowed.contains(&role),
        }
    }

    pub fn check(&self, role: Role) -> Result<(), AuthError> {
        if self.allows(role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(role))
        }
    }
}

/// State handed to [`enforce`] for one route.
#[derive(Clone)]
pub struct RouteGuard {
    pub verifier: TokenVerifier,
    pub access: Access,
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::InvalidCredential("authorization header is not ascii".into()))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidCredential("expected Bearer scheme".into()))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidCredential("expected Bearer scheme".into()));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidCredential("empty bearer token".into()));
    }
    Ok(token)
}

/// Resolve and authorize the caller for `guard`.
pub fn authorize(guard: &RouteGuard, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
    let token = bearer_token(headers)?;
    let user = guard.verifier.verify(token)?;
    guard.access.check(user.role)?;
    Ok(user)
}

pub async fn enforce(
    State(guard): State<RouteGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authorize(&guard, req.headers()) {
        Ok(user) => {
            debug!(path = %req.uri().path(), user = %user.id, role = %user.role, "caller authorized");
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %req.uri().path(), code = e.code(), err = %e, "request rejected by guard");
            Err(ApiError::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use service::auth::token::issue_token;

    const STATS: Access = Access::Roles(&[Role::LasdriAdmin, Role::DvisAdmin, Role::MvaaAdmin]);

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn access_checks_allow_list() {
        assert!(STATS.check(Role::MvaaAdmin).is_ok());
        assert!(matches!(STATS.check(Role::Admin), Err(AuthError::Forbidden(Role::Admin))));
        assert!(Access::Public.allows(Role::Admin));
        assert!(!Access::Public.requires_credential());
    }

    #[test]
    fn bearer_token_parsing() {
        assert!(matches!(bearer_token(&HeaderMap::new()), Err(AuthError::MissingCredential)));
        assert!(matches!(bearer_token(&headers("Basic abc")), Err(AuthError::InvalidCredential(_))));
        assert!(matches!(bearer_token(&headers("Bearer ")), Err(AuthError::InvalidCredential(_))));
        assert_eq!(bearer_token(&headers("bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn authorize_resolves_caller_then_checks_role() {
        let guard = RouteGuard { verifier: TokenVerifier::new("k"), access: STATS };
        let dvis = AuthUser { id: "5".into(), email: None, role: Role::DvisAdmin };
        let token = issue_token("k", &dvis, chrono::Duration::minutes(1)).unwrap();
        assert_eq!(authorize(&guard, &headers(&format!("Bearer {token}"))).unwrap(), dvis);

        let admin = AuthUser { role: Role::Admin, ..dvis };
        let token = issue_token("k", &admin, chrono::Duration::minutes(1)).unwrap();
        let err = authorize(&guard, &headers(&format!("Bearer {token}"))).unwrap_err();
        assert!(err.is_forbidden());
    }
}
