use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::ApiError;

pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";
pub const INVALID_AUTH_HEADER_MESSAGE: &str = "Missing or invalid Authorization header";

/// JWT token service for issuing and validating session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expires_in: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("token_expires_in", &self.token_expires_in)
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expires_in: Duration::hours(24),
        }
    }

    /// Issue a session token for a user
    pub fn issue_token(&self, user_id: Uuid, email: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + self.token_expires_in;

        let claims = Claims {
            id: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(ApiError::Token)
    }

    /// Validate and decode a token. Bad signatures, malformed tokens and
    /// expired tokens all collapse into the same unauthorized error.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is exact, no grace period
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|err| {
                tracing::debug!(reason = ?err.kind(), "Token rejected");
                ApiError::unauthorized(INVALID_TOKEN_MESSAGE)
            })
    }

}

/// Extract bearer token from authorization header
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, ApiError> {
    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(ApiError::unauthorized(INVALID_AUTH_HEADER_MESSAGE)),
    }
}
