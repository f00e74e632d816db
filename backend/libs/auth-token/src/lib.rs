/// Shared JWT helpers for the hoot backend
///
/// Tokens are signed with HS256 using a single shared secret. The secret is
/// installed once at startup and immutable thereafter; services must call
/// [`initialize_secret`] before any token operation.
///
/// Verification failures are deliberately coarse: callers translate every
/// [`TokenError`] into the same unauthenticated response so that a client
/// cannot distinguish a missing token from an expired or forged one.
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default lifetime of an access token.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 1;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by every hoot-backend token.
///
/// `sub` holds the user id as a UUID string; `username` is a denormalized
/// profile field so services can attach an author display name without a
/// lookup against the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as UUID string)
    pub sub: String,
    /// Display username
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type, currently always "access"
    pub token_type: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret has not been initialized")]
    NotInitialized,

    #[error("JWT secret is already initialized")]
    AlreadyInitialized,

    #[error("token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Keys are derived from the secret once at startup and never modified.
/// Both keys live in one cell so no caller can observe a partial install.
static JWT_KEYS: OnceCell<JwtKeys> = OnceCell::new();

/// Install the shared signing secret.
///
/// Must be called during application startup before any token operation.
/// Can only be called once; subsequent calls fail.
pub fn initialize_secret(secret: &str) -> Result<(), TokenError> {
    JWT_KEYS
        .set(JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
        .map_err(|_| TokenError::AlreadyInitialized)
}

fn keys() -> Result<&'static JwtKeys, TokenError> {
    JWT_KEYS.get().ok_or(TokenError::NotInitialized)
}

/// Generate an access token with the default lifetime.
pub fn generate_token(user_id: Uuid, username: &str) -> Result<String, TokenError> {
    generate_token_with_expiry(user_id, username, Duration::hours(ACCESS_TOKEN_TTL_HOURS))
}

/// Generate an access token expiring `ttl` from now.
pub fn generate_token_with_expiry(
    user_id: Uuid,
    username: &str,
    ttl: Duration,
) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        token_type: "access".to_string(),
    };

    let token = encode(&Header::new(JWT_ALGORITHM), &claims, &keys()?.encoding)?;
    Ok(token)
}

/// Validate a token's signature and expiry and return its claims.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>, TokenError> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    // Expiry is exact: no clock leeway.
    validation.leeway = 0;

    let data = decode::<Claims>(token, &keys()?.decoding, &validation)?;
    Ok(data)
}
