use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::server::{AppError, AppState};
use crate::types::UserId;

const MAX_CACHED_TOKENS: u64 = 10_000;

/// Resolves a bearer token to the user it belongs to.
pub trait TokenVerifier: Send + Sync + 'static {
    fn verify(&self, token: &str) -> Option<UserId>;
}

/// Token table loaded from configuration.
pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserId>
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, UserId>) -> Self {
        Self { tokens }
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).copied()
    }
}

/// Verifier fronted by a time-bounded cache of tokens that already verified.
pub struct Authenticator {
    verifier: Arc<dyn TokenVerifier>,
    cache: Cache<String, UserId>
}

impl Authenticator {
    pub fn new(verifier: Arc<dyn TokenVerifier>, ttl: Duration) -> Self {
        Self {
            verifier,
            cache: Cache::builder()
                .max_capacity(MAX_CACHED_TOKENS)
                .time_to_live(ttl)
                .build()
        }
    }

    pub async fn authenticate(&self, token: &str) -> Option<UserId> {
        if let Some(user_id) = self.cache.get(token).await {
            return Some(user_id);
        }

        let user_id = self.verifier.verify(token)?;
        self.cache.insert(token.to_string(), user_id).await;

        debug!("Verified bearer token for user {user_id}");

        Some(user_id)
    }
}

/// The user a request was authenticated as, placed in request extensions by `require_user`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

pub async fn require_user(State(state): State<Arc<AppState>>, mut request: Request, next: Next) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::MissingAuthorization)?;

    let user_id = state.authenticator.authenticate(token).await
        .ok_or(AppError::InvalidAuthentication)?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));

    Ok(next.run(request).await)
}

pub async fn require_admin(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::MissingAuthorization)?;

    let authorized = state.config.admin_token.as_deref()
        .is_some_and(|admin_token| admin_token == token);

    if !authorized {
        return Err(AppError::InvalidAuthentication);
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
