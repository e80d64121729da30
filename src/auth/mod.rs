pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use chrono::Duration;

use crate::config::Config;
use crate::db::Store;
use crate::error::AppError;
use crate::models::{AuthToken, User};

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Header carrying the session token, both in responses and on later requests.
pub const AUTH_HEADER: &str = "x-auth";

/// Signing and hashing parameters shared by every request.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn new(secret: impl Into<String>, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            secret: secret.into(),
            token_ttl,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            Duration::hours(config.token_ttl_hours),
            config.bcrypt_cost,
        )
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

/// Looks a user up by email and checks the password against the stored hash.
///
/// An unknown email and a wrong password fail the same way.
pub async fn find_by_credentials(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let bad_credentials = || AppError::BadRequest("Invalid credentials".into());

    let user = store
        .find_user_by_email(email)
        .await?
        .ok_or_else(bad_credentials)?;

    if verify_password(password, &user.password_hash) {
        Ok(user)
    } else {
        Err(bad_credentials())
    }
}

/// Issues a new token for an existing user and records it on the user.
pub async fn issue_token(
    store: &dyn Store,
    user: &User,
    settings: &AuthSettings,
) -> Result<String, AppError> {
    let token = generate_token(user.id, settings)?;
    store.push_token(user.id, &AuthToken::auth(&token)).await?;
    Ok(token)
}
