use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::AuthError;
use crate::api::ErrorResponse;
use crate::validators::ValidationError;

/// converts `AuthError` into a JSON error response
#[derive(Debug)]
pub struct AppError(pub AuthError);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AuthError::Validation(_)
            | AuthError::UserAlreadyExists
            | AuthError::UndeliverableEmail
            | AuthError::PasswordMismatch
            | AuthError::IncorrectPassword
            | AuthError::ResetTokenInvalid
            | AuthError::MalformedToken => StatusCode::BAD_REQUEST,
            AuthError::Unauthenticated
            | AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::UserNotFound | AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError
            | AuthError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!(target: "portfolio_auth", "msg=\"request failed\" status={} error=\"{}\"", status.as_u16(), self.0);
        }

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

/// `Json` extractor whose rejection is a JSON `AppError` instead of plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                log::debug!(target: "portfolio_auth", "msg=\"request body rejected\" reason=\"{}\"", rejection.body_text());
                Err(AppError(AuthError::Validation(ValidationError::MalformedBody)))
            }
        }
    }
}
