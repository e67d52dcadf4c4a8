//! Registration, login, logout and the current-user lookup.

use axum::{extract::State, http::StatusCode, response::Json};

use crate::{
    AppState,
    api::models::{
        auth::{LoginBody, LoginRequest, LoginResponse, LogoutResponse, MessageResponse, RegisterRequest},
        users::{CurrentUser, Role, UserResponse},
    },
    auth::password,
    config::SessionConfig,
    db::{
        handlers::{Repository, Users},
        models::users::UserCreateDBRequest,
    },
    errors::{Error, Result},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn invalid_credentials() -> Error {
    Error::BadRequest {
        message: INVALID_CREDENTIALS.to_string(),
    }
}

/// `Set-Cookie` value carrying a fresh session token.
fn session_cookie(token: &str, session: &SessionConfig, max_age_secs: u64) -> String {
    let secure = if session.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly{}; SameSite={}; Max-Age={}",
        session.cookie_name,
        token,
        secure,
        same_site_attribute(&session.cookie_same_site),
        max_age_secs
    )
}

fn same_site_attribute(value: &str) -> &'static str {
    match value.to_ascii_lowercase().as_str() {
        "lax" => "Lax",
        "none" => "None",
        _ => "Strict",
    }
}

/// Register a new read-only account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input, registration disabled, or user already exists"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<(StatusCode, Json<UserResponse>)> {
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "User registration is disabled".to_string(),
        });
    }

    let username = request.username.trim();
    if username.is_empty() {
        return Err(Error::BadRequest {
            message: "Username is required".to_string(),
        });
    }
    password::check_length(&request.password, &state.config.auth.password)?;

    if request.role == Some(Role::Manager) {
        return Err(Error::BadRequest {
            message: "Manager accounts cannot be self-registered".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut users = Users::new(&mut conn);
    if users.get_user_by_username(username).await?.is_some() {
        return Err(Error::BadRequest {
            message: "User already exists".to_string(),
        });
    }

    let password_hash = password::hash_password_blocking(request.password).await?;
    let created = users
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash,
            role: Role::User,
        })
        .await?;

    tracing::info!(user_id = %created.id, "Registered new user");
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful; also sets the session cookie", body = LoginBody),
        (status = 400, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut conn)
        .get_user_by_username(request.username.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !password::verify_password_blocking(request.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(invalid_credentials());
    }

    let user = UserResponse::from(user);
    let current_user = CurrentUser::from(user.clone());
    let token = state.sessions.issue(&current_user)?;
    let cookie = session_cookie(&token, &state.config.auth.session, state.sessions.expiry().as_secs());

    Ok(LoginResponse {
        body: LoginBody { token, user },
        cookie,
    })
}

/// Logout (clear the session cookie)
#[utoipa::path(
    post,
    path = "/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<LogoutResponse> {
    let cookie = format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0",
        state.config.auth.session.cookie_name
    );

    Ok(LogoutResponse {
        body: MessageResponse::new("Logout successful"),
        cookie,
    })
}

/// The authenticated user
#[utoipa::path(
    get,
    path = "/me",
    tag = "authentication",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User no longer exists"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn me(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<UserResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut conn).get_by_id(current_user.id).await?.ok_or_else(|| Error::NotFound {
        resource: "User".to_string(),
        id: current_user.id.to_string(),
    })?;

    Ok(Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{auth_header, create_test_app, create_test_config, create_test_user};
    use axum::http::header;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_then_login(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server
            .post("/api/register")
            .json(&json!({"username": "dispatcher", "password": "correct-horse"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let user: UserResponse = response.json();
        assert_eq!(user.username, "dispatcher");
        assert_eq!(user.role, Role::User);
        assert!(response.json::<serde_json::Value>().get("passwordHash").is_none());

        let response = server
            .post("/api/login")
            .json(&json!({"username": "dispatcher", "password": "correct-horse"}))
            .await;
        response.assert_status_ok();
        let body: LoginBody = response.json();
        assert_eq!(body.user.id, user.id);

        let cookie = response.header(header::SET_COOKIE);
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with(&format!("fleetctl_session={}", body.token)));
        assert!(cookie.contains("HttpOnly"));

        let response = server
            .get("/api/me")
            .add_header("authorization", &format!("Bearer {}", body.token))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<UserResponse>().username, "dispatcher");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_rejections(pool: PgPool) {
        let server = create_test_app(pool).await;

        let payload = json!({"username": "dupe", "password": "long-enough"});
        server.post("/api/register").json(&payload).await.assert_status(StatusCode::CREATED);

        let response = server.post("/api/register").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<serde_json::Value>()["message"], "User already exists");

        let response = server
            .post("/api/register")
            .json(&json!({"username": "shorty", "password": "short"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>()["message"],
            "Password must be at least 8 characters"
        );

        let response = server
            .post("/api/register")
            .json(&json!({"username": "boss", "password": "long-enough", "role": "Manager"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_registration_can_be_disabled(pool: PgPool) {
        let mut config = create_test_config();
        config.auth.allow_registration = false;
        let server = crate::test_utils::create_test_app_with_config(pool, config).await;

        let response = server
            .post("/api/register")
            .json(&json!({"username": "nobody", "password": "long-enough"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<serde_json::Value>()["message"], "User registration is disabled");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_with_bad_credentials(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, Role::User).await;

        for payload in [
            json!({"username": user.username, "password": "wrong-password"}),
            json!({"username": "ghost", "password": "whatever-it-is"}),
        ] {
            let response = server.post("/api/login").json(&payload).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<serde_json::Value>()["message"], INVALID_CREDENTIALS);
        }

        let response = server
            .post("/api/login")
            .json(&json!({"username": user.username, "password": crate::test_utils::TEST_PASSWORD}))
            .await;
        response.assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_logout_clears_cookie(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.post("/api/logout").await;
        response.assert_status_ok();
        let cookie = response.header(header::SET_COOKIE);
        assert!(cookie.to_str().unwrap().starts_with("fleetctl_session=;"));
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_me_accepts_session_cookie(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, Role::Manager).await;
        let (_, bearer) = auth_header(&user);
        let token = bearer.trim_start_matches("Bearer ");

        let response = server
            .get("/api/me")
            .add_header("cookie", &format!("fleetctl_session={token}"))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<UserResponse>().role, Role::Manager);

        server.get("/api/me").await.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let session = SessionConfig {
            cookie_name: "sid".to_string(),
            cookie_secure: false,
            cookie_same_site: "lax".to_string(),
        };
        assert_eq!(session_cookie("abc", &session, 60), "sid=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=60");

        let session = SessionConfig::default();
        assert_eq!(
            session_cookie("abc", &session, 60),
            "fleetctl_session=abc; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=60"
        );
    }
}
