//! Password hashing and verification.
//!
//! Hashes are PHC strings produced by Argon2id. Hashing is CPU-bound, so request handlers go
//! through the async wrappers, which run the work on tokio's blocking pool.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::PasswordConfig;
use crate::errors::Error;

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MiB
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Hash a password with the given parameters, or the defaults if None.
pub fn hash_password_with_params(password: &str, params: Option<Argon2Params>) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.unwrap_or_default().to_argon2()?;

    let hash = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash password: {e}"),
    })?;

    Ok(hash.to_string())
}

pub fn hash_password(password: &str) -> Result<String, Error> {
    hash_password_with_params(password, None)
}

/// Check a password against a stored hash. Parameters come from the hash itself.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Internal {
        operation: format!("parse password hash: {e}"),
    })?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })?
}

/// Reject passwords outside the configured length bounds (counted in characters).
pub fn check_length(password: &str, bounds: &PasswordConfig) -> Result<(), Error> {
    let len = password.chars().count();
    if len < bounds.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", bounds.min_length),
        });
    }
    if len > bounds.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at most {} characters", bounds.max_length),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Option<Argon2Params> {
        Some(Argon2Params {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hash1 = hash_password_with_params("same_password", cheap()).unwrap();
        let hash2 = hash_password_with_params("same_password", cheap()).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same_password", &hash1).unwrap());
        assert!(verify_password("same_password", &hash2).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("password", "not-a-phc-string"),
            Err(Error::Internal { .. })
        ));
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let hash = hash_password_blocking("fleet-manager".to_string()).await.unwrap();
        assert!(verify_password_blocking("fleet-manager".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password_blocking("someone-else".to_string(), hash).await.unwrap());
    }

    #[test]
    fn test_length_bounds() {
        let bounds = PasswordConfig {
            min_length: 8,
            max_length: 12,
        };

        assert!(check_length("12345678", &bounds).is_ok());
        assert!(matches!(check_length("1234567", &bounds), Err(Error::BadRequest { .. })));
        assert!(matches!(check_length("1234567890123", &bounds), Err(Error::BadRequest { .. })));
        // multi-byte characters count once
        assert!(check_length("ééééééé€", &bounds).is_ok());
    }
}
