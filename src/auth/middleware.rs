//! Authentication Middleware
//!
//! Axum middleware for JWT token validation. Valid claims are injected into
//! the request extensions for downstream handlers.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::jwt::JwtService;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extract a token from the Authorization header (Bearer) or the access_token cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|auth_header| auth_header.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|cookie_header| cookie_header.to_str().ok())
                .and_then(|cookie_str| {
                    cookie_str.split(';').find_map(|cookie| {
                        cookie
                            .trim()
                            .strip_prefix(ACCESS_TOKEN_COOKIE)
                            .and_then(|rest| rest.strip_prefix('='))
                            .map(str::to_string)
                    })
                })
        })
}

/// Authentication middleware that validates JWT tokens and injects the claims
pub struct AuthMiddleware;

impl AuthMiddleware {
    pub async fn validate_token(
        State(jwt_service): State<Arc<JwtService>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, StatusCode> {
        tracing::debug!("[AuthMiddleware] Incoming request: {} {}", req.method(), req.uri());

        let Some(token) = extract_token(req.headers()) else {
            tracing::debug!("[AuthMiddleware] Missing Authorization header and access_token cookie");
            return Err(StatusCode::UNAUTHORIZED);
        };

        let claims = match jwt_service.validate_token(&token) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!("[AuthMiddleware] JWT validation failed: {:#}", e);
                return Err(StatusCode::UNAUTHORIZED);
            }
        };
        tracing::debug!("[AuthMiddleware] Authenticated sub={}", claims.sub);

        req.extensions_mut().insert(claims);
        Ok(next.run(req).await)
    }
}
