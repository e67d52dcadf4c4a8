//! Test utilities for integration testing.

use crate::{
    api::models::users::{CurrentUser, Role, UserResponse},
    auth::{
        password::{Argon2Params, hash_password_with_params},
        session::{JwtSessions, SessionTokens},
    },
    config::{Config, SeedConfig},
    db::{
        handlers::{Repository, Users},
        models::users::UserCreateDBRequest,
    },
};
use axum_test::TestServer;
use sqlx::PgPool;
use uuid::Uuid;

/// Password given to every user from [`create_test_user`].
pub const TEST_PASSWORD: &str = "test-password";

pub async fn create_test_app(pool: PgPool) -> TestServer {
    create_test_app_with_config(pool, create_test_config()).await
}

pub async fn create_test_app_with_config(pool: PgPool, config: Config) -> TestServer {
    crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application")
        .into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        admin_password: None,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        seed: SeedConfig { on_empty_startup: false },
        enable_metrics: false,
        ..Default::default()
    }
}

/// Insert a user with a random username and [`TEST_PASSWORD`], hashed with cheap parameters.
pub async fn create_test_user(pool: &PgPool, role: Role) -> UserResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let username = format!("testuser_{}", Uuid::new_v4().simple());
    let password_hash = hash_password_with_params(
        TEST_PASSWORD,
        Some(Argon2Params {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }),
    )
    .expect("Failed to hash test password");

    let user = Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            username,
            password_hash,
            role,
        })
        .await
        .expect("Failed to create test user");
    UserResponse::from(user)
}

/// `Authorization` header carrying a session token for `user`, signed with the test config key.
pub fn auth_header(user: &UserResponse) -> (String, String) {
    let config = create_test_config();
    let sessions = JwtSessions::from_config(&config).expect("Failed to build test sessions");
    let token = sessions
        .issue(&CurrentUser::from(user.clone()))
        .expect("Failed to issue test token");

    ("authorization".to_string(), format!("Bearer {token}"))
}
