//! Request extractor for the authenticated user.

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session::SessionTokens,
    errors::{Error, Result},
};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::{debug, instrument, trace};

pub const NO_TOKEN: &str = "No token provided";

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Token from the session cookie, if the request carries one.
fn cookie_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value)
}

/// Resolve the caller from the bearer header first, then the session cookie.
///
/// A valid credential in either place wins, so a stale cookie does not shadow a fresh
/// bearer token or the other way round.
pub fn authenticate(headers: &HeaderMap, cookie_name: &str, sessions: &dyn SessionTokens) -> Result<CurrentUser> {
    let candidates = [("bearer", bearer_token(headers)), ("cookie", cookie_token(headers, cookie_name))];

    let mut last_error = None;
    for (source, token) in candidates {
        let Some(token) = token else {
            continue;
        };
        match sessions.verify(token) {
            Ok(user) => {
                debug!(user = %user.username, source, "Authenticated request");
                return Ok(user);
            }
            Err(e) => {
                trace!(source, "Session token rejected: {e:?}");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| Error::Unauthenticated {
        message: Some(NO_TOKEN.to_string()),
    }))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        authenticate(&parts.headers, &state.config.auth.session.cookie_name, state.sessions.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::auth::session::{INVALID_TOKEN, JwtSessions};
    use axum::http::HeaderValue;
    use std::time::Duration;
    use uuid::Uuid;

    const COOKIE: &str = "fleetctl_session";

    fn sessions() -> JwtSessions {
        JwtSessions::new("extractor-secret", Duration::from_secs(600))
    }

    fn user() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "dispatcher".to_string(),
            role: Role::User,
        }
    }

    fn headers(pairs: &[(header::HeaderName, String)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    fn message(result: Result<CurrentUser>) -> Option<String> {
        match result {
            Err(Error::Unauthenticated { message }) => message,
            other => panic!("expected unauthenticated, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_credentials() {
        let result = authenticate(&HeaderMap::new(), COOKIE, &sessions());
        assert_eq!(message(result).as_deref(), Some(NO_TOKEN));
    }

    #[test]
    fn test_bearer_token() {
        let sessions = sessions();
        let token = sessions.issue(&user()).unwrap();
        let headers = headers(&[(header::AUTHORIZATION, format!("Bearer {token}"))]);

        let found = authenticate(&headers, COOKIE, &sessions).unwrap();
        assert_eq!(found.username, "dispatcher");
    }

    #[test]
    fn test_cookie_token_among_other_cookies() {
        let sessions = sessions();
        let token = sessions.issue(&user()).unwrap();
        let headers = headers(&[(header::COOKIE, format!("theme=dark; {COOKIE}={token}; other=1"))]);

        assert!(authenticate(&headers, COOKIE, &sessions).is_ok());
    }

    #[test]
    fn test_invalid_bearer_falls_back_to_cookie() {
        let sessions = sessions();
        let token = sessions.issue(&user()).unwrap();
        let headers = headers(&[
            (header::AUTHORIZATION, "Bearer garbage".to_string()),
            (header::COOKIE, format!("{COOKIE}={token}")),
        ]);

        assert!(authenticate(&headers, COOKIE, &sessions).is_ok());
    }

    #[test]
    fn test_invalid_token_message() {
        let headers = headers(&[(header::AUTHORIZATION, "Bearer garbage".to_string())]);
        let result = authenticate(&headers, COOKIE, &sessions());
        assert_eq!(message(result).as_deref(), Some(INVALID_TOKEN));
    }

    #[test]
    fn test_non_bearer_scheme_is_ignored() {
        let headers = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".to_string())]);
        let result = authenticate(&headers, COOKIE, &sessions());
        assert_eq!(message(result).as_deref(), Some(NO_TOKEN));
    }
}
