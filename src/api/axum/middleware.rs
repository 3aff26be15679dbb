//! Session verification and role gating as axum middleware.
//!
//! [`authenticate`] resolves the `token` cookie into a [`RequestContext`] and
//! stores it in the request extensions. [`require_roles`] must run after it.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::error::AppError;
use super::routes::AppState;
use crate::session::CookieConfig;
use crate::{AuthError, RequestContext, RoleGate, TimelineRepository, User, UserRepository};

/// Reads the session token from every `Cookie` header on the request.
pub fn session_token(headers: &HeaderMap, cookie: &CookieConfig) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| cookie.extract_token(header))
}

pub async fn authenticate<U, T>(
    State(state): State<AppState<U, T>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let token = session_token(request.headers(), &state.config.cookie);
    let ctx = state.verifier.authenticate(token.as_deref()).await?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

pub async fn require_roles(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = request
        .extensions_mut()
        .get_mut::<RequestContext>()
        .ok_or(AppError(AuthError::Unauthenticated))?;
    gate.authorize(ctx)?;

    Ok(next.run(request).await)
}

/// The principal resolved by [`authenticate`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(RequestContext::principal)
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError(AuthError::Unauthenticated))
    }
}
