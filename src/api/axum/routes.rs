use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};

use super::handlers;
use super::middleware::{authenticate, require_roles};
use crate::deliverability::EmailVerifier;
use crate::mail::MailSender;
use crate::{
    AuthError, PortfolioConfig, Role, RoleGate, SessionVerifier, TimelineRepository, TokenCodec,
    UserRepository,
};

#[derive(Clone)]
pub struct AppState<U: UserRepository, T: TimelineRepository> {
    pub config: Arc<PortfolioConfig>,
    pub user_repo: U,
    pub timeline_repo: T,
    pub codec: TokenCodec,
    pub verifier: SessionVerifier<U>,
    pub mailer: Arc<dyn MailSender>,
    pub email_verifier: Arc<dyn EmailVerifier>,
}

impl<U, T> AppState<U, T>
where
    U: UserRepository + Clone,
    T: TimelineRepository,
{
    /// Builds the codec and verifier from `config`. Fails without a usable signing secret.
    pub fn new(
        config: PortfolioConfig,
        user_repo: U,
        timeline_repo: T,
        mailer: Arc<dyn MailSender>,
        email_verifier: Arc<dyn EmailVerifier>,
    ) -> Result<Self, AuthError> {
        let verifier = config.session_verifier(Arc::new(user_repo.clone()))?;

        Ok(Self {
            codec: verifier.codec().clone(),
            config: Arc::new(config),
            user_repo,
            timeline_repo,
            verifier,
            mailer,
            email_verifier,
        })
    }
}

/// The full API: `/user/*` and `/timeline/*`.
pub fn router<U, T>(state: AppState<U, T>) -> Router
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    Router::new()
        .nest("/user", user_routes(&state))
        .nest("/timeline", timeline_routes(&state))
        .with_state(state)
}

pub fn user_routes<U, T>(state: &AppState<U, T>) -> Router<AppState<U, T>>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let public = Router::new()
        .route("/register", post(handlers::register::<U, T>))
        .route("/login", post(handlers::login::<U, T>))
        .route("/password/forgot", post(handlers::forgot_password::<U, T>))
        .route(
            "/password/reset/{token}",
            put(handlers::reset_password::<U, T>),
        )
        .route("/portfolio", get(handlers::get_portfolio_owner::<U, T>));

    let session = Router::new()
        .route("/logout", get(handlers::logout::<U, T>))
        .route("/me", get(handlers::get_current_user))
        .route("/me/profile", put(handlers::update_profile::<U, T>))
        .route("/password/update", put(handlers::change_password::<U, T>))
        .route_layer(from_fn_with_state(state.clone(), authenticate::<U, T>));

    // the layer added last runs first
    let admin = Router::new()
        .route("/all", get(handlers::list_users::<U, T>))
        .route_layer(from_fn_with_state(RoleGate::new([Role::Admin]), require_roles))
        .route_layer(from_fn_with_state(state.clone(), authenticate::<U, T>));

    public.merge(session).merge(admin)
}

pub fn timeline_routes<U, T>(state: &AppState<U, T>) -> Router<AppState<U, T>>
where
    U: UserRepository + Clone + 'static,
    T: TimelineRepository + Clone + 'static,
{
    let public = Router::new().route("/getall", get(handlers::list_timelines::<U, T>));

    let editors = Router::new()
        .route("/add", post(handlers::create_timeline::<U, T>))
        .route("/delete/{id}", delete(handlers::delete_timeline::<U, T>))
        .route_layer(from_fn_with_state(
            RoleGate::new([Role::Admin, Role::Editor]),
            require_roles,
        ))
        .route_layer(from_fn_with_state(state.clone(), authenticate::<U, T>));

    public.merge(editors)
}
