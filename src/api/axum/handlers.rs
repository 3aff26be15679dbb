//! HTTP handlers for the portfolio API.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use uuid::Uuid;

use super::error::{ApiJson, AppError};
use super::middleware::CurrentUser;
use super::routes::AppState;
use crate::actions::{
    AddTimelineEntryAction, ChangePasswordAction, DeleteTimelineEntryAction, ForgotPasswordAction,
    ForgotPasswordConfig, GetPortfolioOwnerAction, ListUsersAction, LoginAction, RegisterAction,
    ResetPasswordAction, UpdateProfileAction,
};
use crate::api::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, ForgotPasswordResponse,
    LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest, TimelineResponse,
    TimelinesResponse, UpdateProfileRequest, UserResponse, UsersResponse,
};
use crate::events::{AuthEvent, dispatch};
use crate::session::CookieConfig;
use crate::{
    AuthError, NewTimelineEntry, SessionToken, TimelineRepository, User, UserRepository,
};

/// JSON body plus the `Set-Cookie` header carrying the session token.
fn session_response(
    cookie: &CookieConfig,
    status: StatusCode,
    message: &str,
    user: User,
    session: SessionToken,
) -> Response {
    let cookie = cookie.session_cookie(session.token.expose_secret(), session.expires_at);
    let body = AuthResponse {
        success: true,
        message: message.to_owned(),
        user,
        token: session.token,
        expires_at: session.expires_at,
    };

    (status, [(SET_COOKIE, cookie.to_string())], Json(body)).into_response()
}

/// POST /user/register
pub async fn register<U, T>(
    State(state): State<AppState<U, T>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Response, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let action = RegisterAction::new(
        state.user_repo.clone(),
        state.email_verifier.clone(),
        state.mailer.clone(),
    );
    let user = action.execute(body.into()).await?;
    let session = state.codec.issue(user.id)?;

    Ok(session_response(
        &state.config.cookie,
        StatusCode::CREATED,
        "User registered",
        user,
        session,
    ))
}

/// POST /user/login
pub async fn login<U, T>(
    State(state): State<AppState<U, T>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let action = LoginAction::new(state.user_repo.clone(), state.codec.clone());
    let (user, session) = action.execute(&body.email, &body.password).await?;

    Ok(session_response(
        &state.config.cookie,
        StatusCode::OK,
        "Logged in",
        user,
        session,
    ))
}

/// GET /user/logout
///
/// Clears the cookie only. The token itself stays valid until it expires.
pub async fn logout<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
) -> Response
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    log::info!(target: "portfolio_auth", "msg=\"logout\" user_id={}", user.id);
    dispatch(AuthEvent::LogoutSuccess {
        user_id: user.id,
        at: Utc::now(),
    })
    .await;

    let cookie = state.config.cookie.clearing_cookie();
    (
        [(SET_COOKIE, cookie.to_string())],
        Json(MessageResponse::new("Logged out")),
    )
        .into_response()
}

/// POST /user/password/forgot
pub async fn forgot_password<U, T>(
    State(state): State<AppState<U, T>>,
    ApiJson(body): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let action = ForgotPasswordAction::with_config(
        state.user_repo.clone(),
        state.mailer.clone(),
        ForgotPasswordConfig::from_config(&state.config),
    );
    let requested = action.execute(&body.email).await?;

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: format!("Email sent to {} successfully", requested.email),
        expires_at: requested.expires_at,
    }))
}

/// PUT /user/password/reset/{token}
pub async fn reset_password<U, T>(
    State(state): State<AppState<U, T>>,
    Path(token): Path<String>,
    ApiJson(body): ApiJson<ResetPasswordRequest>,
) -> Result<Response, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let action = ResetPasswordAction::new(state.user_repo.clone(), state.codec.clone());
    let (user, session) = action
        .execute(&token, &body.password, &body.confirm_password)
        .await?;

    Ok(session_response(
        &state.config.cookie,
        StatusCode::OK,
        "Password reset successfully",
        user,
        session,
    ))
}

/// GET /user/portfolio
pub async fn get_portfolio_owner<U, T>(
    State(state): State<AppState<U, T>>,
) -> Result<Json<UserResponse>, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let action = GetPortfolioOwnerAction::new(state.user_repo.clone(), state.config.portfolio_owner);
    let user = action.execute().await?;

    Ok(Json(UserResponse {
        success: true,
        message: None,
        user,
    }))
}

/// GET /user/me
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        message: None,
        user,
    })
}

/// PUT /user/me/profile
pub async fn update_profile<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let action = UpdateProfileAction::new(state.user_repo.clone());
    let user = action.execute(user.id, body.into()).await?;

    Ok(Json(UserResponse {
        success: true,
        message: Some("Profile updated".to_owned()),
        user,
    }))
}

/// PUT /user/password/update
pub async fn change_password<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let action = ChangePasswordAction::new(state.user_repo.clone());
    action
        .execute(
            user.id,
            &body.current_password,
            &body.new_password,
            &body.confirm_new_password,
        )
        .await?;

    Ok(Json(MessageResponse::new("Password updated")))
}

/// GET /user/all
pub async fn list_users<U, T>(
    State(state): State<AppState<U, T>>,
) -> Result<Json<UsersResponse>, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let users = ListUsersAction::new(state.user_repo.clone()).execute().await?;

    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}

/// GET /timeline/getall
pub async fn list_timelines<U, T>(
    State(state): State<AppState<U, T>>,
) -> Result<Json<TimelinesResponse>, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let timelines = state.timeline_repo.list().await?;

    Ok(Json(TimelinesResponse {
        success: true,
        timelines,
    }))
}

/// POST /timeline/add
pub async fn create_timeline<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<NewTimelineEntry>,
) -> Result<(StatusCode, Json<TimelineResponse>), AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let action = AddTimelineEntryAction::new(state.timeline_repo.clone());
    let timeline = action.execute(user.id, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(TimelineResponse {
            success: true,
            message: "Timeline added".to_owned(),
            timeline,
        }),
    ))
}

/// DELETE /timeline/delete/{id}
pub async fn delete_timeline<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    // an id that cannot exist is reported like a missing entry
    let id = Uuid::parse_str(&id).map_err(|_| AuthError::NotFound)?;

    let action = DeleteTimelineEntryAction::new(state.timeline_repo.clone());
    action.execute(user.id, id).await?;

    Ok(Json(MessageResponse::new("Timeline deleted")))
}
