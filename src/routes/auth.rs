//! Auth routes for registration, login, logout, and the current session

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};

use crate::auth::jwt::Claims;
use crate::auth::middleware::{ACCESS_TOKEN_COOKIE, extract_token};
use crate::auth::models::{Credentials, Registration, SessionInfo, TokenResponse, User};
use crate::auth::password;
use crate::database::{RepositoryError, UserRecord};
use crate::error::ValidationError;
use crate::routes::error::ApiError;
use crate::server::AppState;

fn access_cookie(token: String, expires_at: DateTime<Utc>) -> Cookie<'static> {
    let mut cookie = Cookie::new(ACCESS_TOKEN_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::None);
    cookie.set_path("/");
    // Set expiry to match JWT expiry
    let max_age = (expires_at - Utc::now()).num_seconds();
    if max_age > 0 {
        cookie.set_max_age(time::Duration::seconds(max_age));
    }
    cookie
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(ACCESS_TOKEN_COOKIE);
    cookie.set_path("/");
    cookie
}

/// Issue a token for `user` and attach it both to the body and as a cookie
fn issue(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let (token, expires_at) = state
        .jwt_service
        .create_token(&user)
        .map_err(|e| ApiError::internal("Failed to create token", e))?;

    let jar = jar.add(access_cookie(token.clone(), expires_at));
    Ok((
        jar,
        Json(TokenResponse {
            user,
            token,
            expires_at,
        }),
    ))
}

fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection);
        ApiError::BadRequest("Malformed request body".to_string())
    })
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Registration>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let registration = payload(body)?;
    registration.validate().map_err(|e| match e {
        ValidationError::WeakPassword { .. } => ApiError::Unprocessable(e.to_string()),
        other => ApiError::BadRequest(other.to_string()),
    })?;

    let secret = registration.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&secret))
        .await
        .map_err(|e| ApiError::internal("Password hashing task failed", e))?
        .map_err(|e| ApiError::internal("Failed to hash password", e))?;

    let record = UserRecord::new(&registration.name, &registration.email, password_hash);
    match state.users.insert(&record).await {
        Ok(()) => {}
        Err(RepositoryError::EmailTaken) => {
            tracing::info!("Registration rejected, email already in use");
            return Err(ApiError::Conflict);
        }
        Err(e) => return Err(ApiError::internal("Failed to store user", e)),
    }

    tracing::info!("Registered user {}", record.id);
    issue(&state, jar, record.user())
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let credentials = payload(body)?;
    credentials
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let record = state
        .users
        .find_by_email(&credentials.email)
        .await
        .map_err(|e| ApiError::internal("Failed to query user", e))?;

    // Unknown email and wrong password are indistinguishable to the caller
    let Some(record) = record else {
        return Err(ApiError::InvalidCredentials);
    };

    let stored_hash = record.password_hash.clone();
    let secret = credentials.password;
    let verified =
        tokio::task::spawn_blocking(move || password::verify_password(&secret, &stored_hash))
            .await
            .map_err(|e| ApiError::internal("Password verification task failed", e))?;
    if !verified {
        return Err(ApiError::InvalidCredentials);
    }

    tracing::info!("User {} logged in", record.id);
    issue(&state, jar, record.user())
}

/// Always 204. A presented token that is still valid is revoked.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(token) = extract_token(&headers) {
        match state.jwt_service.decode_claims(&token) {
            Ok(claims) => state.jwt_service.revoke(&claims),
            Err(e) => tracing::debug!("Logout with unusable token: {:#}", e),
        }
    }

    (jar.remove(removal_cookie()), StatusCode::NO_CONTENT)
}

pub async fn me(Extension(claims): Extension<Claims>) -> Json<SessionInfo> {
    Json(SessionInfo {
        user: claims.user(),
        expires_at: claims.expires_at(),
    })
}

/// Routes that need no token. `/api/auth/me` is registered with the protected set.
pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

pub fn create_session_routes() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(me))
}
