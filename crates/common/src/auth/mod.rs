//! Authentication and authorization utilities
//!
//! Provides:
//! - Argon2 password hashing
//! - Signed session tokens carried in a cookie
//! - The `CurrentUser` extractor for session-protected handlers
//! - The article ownership guard

mod guard;

pub use guard::{ensure_owner, require_owned_article, OwnedArticle};

use crate::config::{AuthConfig, MAX_SESSION_TTL_SECS};
use crate::db::{models::User, DbPool, Repository};
use crate::errors::{AppError, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The authenticated user behind the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Username at login time
    pub username: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Issues and validates session tokens and the cookies carrying them
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
    cookie_name: String,
    secure_cookie: bool,
}

impl SessionManager {
    /// Create a new session manager with the given secret
    pub fn new(secret: &str, ttl_secs: u64, cookie_name: &str, secure_cookie: bool) -> Result<Self> {
        let ttl_secs = i64::try_from(ttl_secs)
            .ok()
            .filter(|ttl| (1..=MAX_SESSION_TTL_SECS as i64).contains(ttl))
            .ok_or_else(|| AppError::Configuration {
                message: format!(
                    "Session TTL must be between 1 and {} seconds, got {}",
                    MAX_SESSION_TTL_SECS, ttl_secs
                ),
            })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
            cookie_name: cookie_name.to_string(),
            secure_cookie,
        })
    }

    /// Build from configuration, generating a per-process secret when none is set
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let secret = match config.session_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret.to_string(),
            _ => {
                tracing::warn!(
                    "No session secret configured; sessions will not survive a restart"
                );
                rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(64)
                    .map(char::from)
                    .collect()
            }
        };

        Self::new(
            &secret,
            config.session_ttl_secs,
            &config.cookie_name,
            config.secure_cookie,
        )
    }

    /// Name of the session cookie
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Generate a session token for the user
    pub fn issue_token(&self, user: &CurrentUser) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.ttl_secs);

        let claims = SessionClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            message: format!("Failed to generate session token: {}", e),
        })
    }

    /// Validate a session token and return the user it identifies
    pub fn validate_token(&self, token: &str) -> Result<CurrentUser> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredSession,
                _ => AppError::Unauthorized {
                    message: "Invalid session".to_string(),
                },
            })?;

        let id = claims.sub.parse().map_err(|_| AppError::Unauthorized {
            message: "Invalid session".to_string(),
        })?;

        Ok(CurrentUser {
            id,
            username: claims.username,
        })
    }

    /// `Set-Cookie` value establishing a session
    pub fn session_cookie(&self, token: &str) -> String {
        Cookie::build((self.cookie_name.clone(), token.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .max_age(cookie::time::Duration::seconds(self.ttl_secs))
            .build()
            .to_string()
    }

    /// `Set-Cookie` value removing the session
    pub fn clear_cookie(&self) -> String {
        Cookie::build((self.cookie_name.clone(), String::new()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::ZERO)
            .build()
            .to_string()
    }
}

/// Read the named cookie from the request headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|c| c.ok())
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AppError::Internal {
        message: format!("Failed to encode salt: {}", e),
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AppError::Internal {
        message: format!("Corrupt password hash: {}", e),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Axum extractor for CurrentUser
///
/// A validly signed token is only accepted while its user still exists.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<SessionManager>: FromRef<S>,
    DbPool: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let sessions = Arc::<SessionManager>::from_ref(state);

        let token = cookie_value(&parts.headers, sessions.cookie_name()).ok_or_else(|| {
            AppError::Unauthorized {
                message: "Login required".to_string(),
            }
        })?;

        let claimed = sessions.validate_token(&token)?;

        let repo = Repository::new(DbPool::from_ref(state));
        match repo.find_user_by_id(claimed.id).await? {
            Some(user) => Ok(CurrentUser::from(&user)),
            None => {
                tracing::warn!(user_id = claimed.id, "Session for unknown user");
                Err(AppError::Unauthorized {
                    message: "Session no longer valid".to_string(),
                })
            }
        }
    }
}
