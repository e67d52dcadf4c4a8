//! JWT session token creation and verification.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{
    api::models::users::{CurrentUser, Role},
    config::Config,
    errors::Error,
    types::UserId,
};

pub const INVALID_TOKEN: &str = "Invalid token";

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user: &CurrentUser, expiry: Duration) -> Self {
        let now = Utc::now();
        let exp = now + expiry;

        Self {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

impl From<SessionClaims> for CurrentUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// Issues and verifies the bearer tokens that identify a session.
///
/// Request extractors only see this trait, so tests can swap in a fixed verifier.
pub trait SessionTokens: Send + Sync {
    fn issue(&self, user: &CurrentUser) -> Result<String, Error>;

    /// Resolve a token to its user. Client-side problems (bad signature, expiry, garbage)
    /// are `Unauthenticated`; key or library failures are `Internal`.
    fn verify(&self, token: &str) -> Result<CurrentUser, Error>;

    /// Lifetime of issued tokens, also used as the cookie `Max-Age`.
    fn expiry(&self) -> Duration;
}

/// HS256 tokens signed with the configured `secret_key`.
pub struct JwtSessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl std::fmt::Debug for JwtSessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessions").field("expiry", &self.expiry).finish_non_exhaustive()
    }
}

impl JwtSessions {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let secret_key = config.secret_key.as_deref().ok_or_else(|| Error::Internal {
            operation: "JWT sessions: secret_key is required".to_string(),
        })?;

        Ok(Self::new(secret_key, config.auth.security.jwt_expiry))
    }
}

impl SessionTokens for JwtSessions {
    fn issue(&self, user: &CurrentUser) -> Result<String, Error> {
        let claims = SessionClaims::new(user, self.expiry);
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| Error::Internal {
            operation: format!("create JWT: {e}"),
        })
    }

    fn verify(&self, token: &str) -> Result<CurrentUser, Error> {
        let token_data = decode::<SessionClaims>(token, &self.decoding, &Validation::default()).map_err(|e| match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::ExpiredSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::InvalidAlgorithm => Error::Unauthenticated {
                message: Some(INVALID_TOKEN.to_string()),
            },
            _ => Error::Internal {
                operation: format!("verify JWT: {e}"),
            },
        })?;

        Ok(CurrentUser::from(token_data.claims))
    }

    fn expiry(&self) -> Duration {
        self.expiry
    }
}
