use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthSettings;
use crate::error::AppError;
use crate::models::AUTH_ACCESS;

/// Represents the claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user the token was issued to.
    pub sub: Uuid,
    /// Access scope; session tokens always carry `"auth"`.
    pub access: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Random per-issue id, so logging in twice within a second still yields distinct tokens.
    pub jti: String,
}

/// Signs a new session token for `user_id`, valid for the configured lifetime.
pub fn generate_token(user_id: Uuid, settings: &AuthSettings) -> Result<String, AppError> {
    generate_token_at(user_id, settings, Utc::now().timestamp())
}

/// Signs a token as if issued at `issued_at` (seconds since epoch).
pub fn generate_token_at(
    user_id: Uuid,
    settings: &AuthSettings,
    issued_at: i64,
) -> Result<String, AppError> {
    let expiration = issued_at
        .checked_add(settings.token_ttl().num_seconds())
        .ok_or_else(|| AppError::BadRequest("Token lifetime out of range".into()))?;

    let claims = Claims {
        sub: user_id,
        access: AUTH_ACCESS.to_string(),
        iat: issued_at.max(0) as usize,
        exp: expiration.max(0) as usize,
        jti: Uuid::new_v4().simple().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret().as_bytes()),
    )
    .map_err(|e| AppError::BadRequest(format!("Failed to generate token: {}", e)))
}

/// Verifies signature and expiry, and that the token carries the auth scope.
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret().as_bytes()),
        &Validation::default(),
    )?
    .claims;

    if claims.access != AUTH_ACCESS {
        return Err(AppError::Unauthorized);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn settings(secret: &str) -> AuthSettings {
        AuthSettings::new(secret, Duration::hours(1), 4)
    }

    #[test]
    fn test_token_generation_and_verification() {
        let settings = settings("test_secret_for_gen_verify");
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, &settings).unwrap();
        let claims = verify_token(&token, &settings).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.access, AUTH_ACCESS);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tokens_are_unique_per_issue() {
        let settings = settings("test_secret_for_uniqueness");
        let user_id = Uuid::new_v4();
        let now = Utc::now().timestamp();

        let first = generate_token_at(user_id, &settings, now).unwrap();
        let second = generate_token_at(user_id, &settings, now).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_token_expiration() {
        let settings = settings("test_secret_for_expiration");
        let issued = (Utc::now() - Duration::hours(48)).timestamp();
        let expired = generate_token_at(Uuid::new_v4(), &settings, issued).unwrap();

        assert!(matches!(
            verify_token(&expired, &settings),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = generate_token(Uuid::new_v4(), &settings("one_secret")).unwrap();
        assert!(matches!(
            verify_token(&token, &settings("a_completely_different_secret")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            verify_token("not-a-jwt", &settings("one_secret")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_scope_is_rejected() {
        let settings = settings("test_secret_for_scope");
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4(),
            access: "reset".to_string(),
            iat: now,
            exp: now + 3600,
            jti: "nonce".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret_for_scope"),
        )
        .unwrap();

        assert!(matches!(
            verify_token(&token, &settings),
            Err(AppError::Unauthorized)
        ));
    }
}
