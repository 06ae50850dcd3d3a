//! Credential check and session lifecycle.
//!
//! Sessions are an explicit store passed through request handling rather
//! than ambient process state: created on login, removed on logout, never
//! persisted.

pub mod session;

pub use session::{Session, SessionStore};

use sha2::{Digest, Sha256};
use std::env;

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Operator credentials from the environment.
///
/// `APP_PASSWORD` (plaintext) takes precedence when non-empty; `APP_PWHASH`
/// (SHA-256 hex) is the alternative. With neither set, no login succeeds.
#[derive(Debug, Clone)]
pub struct Credentials {
    user: String,
    password: Option<String>,
    password_hash: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        // An unset APP_PASSWORD keeps the stock default; explicitly setting
        // it empty disables the plaintext check in favor of APP_PWHASH.
        let password = match env::var("APP_PASSWORD") {
            Ok(value) => non_empty(value),
            Err(_) => Some("123".to_string()),
        };
        Self {
            user: env::var("APP_USER").unwrap_or_else(|_| "master".to_string()),
            password,
            password_hash: env::var("APP_PWHASH").ok().and_then(non_empty),
        }
    }

    pub fn plaintext(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: Some(password.into()),
            password_hash: None,
        }
    }

    pub fn hashed(user: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: None,
            password_hash: Some(password_hash.into()),
        }
    }

    pub fn verify(&self, user: &str, password: &str) -> bool {
        if let Some(expected) = &self.password {
            return user == self.user && password == expected;
        }
        if let Some(expected_hash) = &self.password_hash {
            return user == self.user && sha256_hex(password) == *expected_hash;
        }
        false
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}
