#![allow(
    clippy::print_stdout,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown
)]

//! Portfolio API server with in-memory storage.
//!
//! Reset and welcome mails are written to the log instead of being sent.
//! A seeded admin account owns the public portfolio page.
//!
//! Run with: `cargo run --example portfolio_server`
//!
//! Test endpoints:
//!   curl -i -X POST http://localhost:4000/user/login \
//!     -H "Content-Type: application/json" \
//!     -d '{"email": "admin@example.com", "password": "change-me-please"}'
//!
//!   curl http://localhost:4000/user/me --cookie "token=<token>"
//!
//!   curl http://localhost:4000/user/portfolio

use std::sync::Arc;

use portfolio_auth::api::axum::{AppState, router};
use portfolio_auth::crypto::{Argon2Hasher, PasswordHasher};
use portfolio_auth::events::listeners::LoggingListener;
use portfolio_auth::mail::LogMailSender;
use portfolio_auth::{
    MockTimelineRepository, MockUserRepository, NewUser, PortfolioConfig, Role, UserRepository,
    register_event_listeners,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    register_event_listeners(|registry| {
        registry.listen(LoggingListener::new());
    });

    // JWT_SECRET_KEY and friends from the environment, else a development secret
    let mut config = PortfolioConfig::from_env().unwrap_or_else(|e| {
        println!("Using development config: {e}");
        PortfolioConfig::development()
    });

    let users = MockUserRepository::new();
    let admin = users
        .create_user(NewUser {
            full_name: "Portfolio Owner".to_owned(),
            email: "admin@example.com".to_owned(),
            hashed_password: Argon2Hasher::default().hash("change-me-please").unwrap(),
            role: Role::Admin,
            ..Default::default()
        })
        .await
        .unwrap();
    config.portfolio_owner.get_or_insert(admin.id);

    let email_verifier = config.email_verifier();
    let state = AppState::new(
        config,
        users,
        MockTimelineRepository::new(),
        Arc::new(LogMailSender),
        email_verifier,
    )
    .expect("signing secret must be at least 32 bytes");

    println!("Starting portfolio server on http://localhost:4000");
    println!("Endpoints:");
    println!("  POST   /user/register             - Create account");
    println!("  POST   /user/login                - Login (sets token cookie)");
    println!("  GET    /user/logout               - Clear the cookie");
    println!("  GET    /user/me                   - Current user");
    println!("  POST   /user/password/forgot      - Mail a reset link");
    println!("  PUT    /user/password/reset/:tok  - Reset with the mailed token");
    println!("  GET    /user/all                  - All users (admin)");
    println!("  GET    /timeline/getall           - Public timeline");
    println!("  POST   /timeline/add              - Add entry (admin, editor)");

    let listener = TcpListener::bind("127.0.0.1:4000").await.unwrap();
    axum::serve(listener, router(state)).await.unwrap();
}
