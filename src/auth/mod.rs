use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub mod policy;

pub use policy::{AuthorizationChecker, CityClaimPolicy, Principal};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub given_name: String,
    pub family_name: String,
    pub city: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
}

impl Claims {
    pub fn new(user: &CityInfoUser, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(security.jwt_expiry_hours as i64)).timestamp();

        Self {
            sub: user.user_id.to_string(),
            given_name: user.first_name.clone(),
            family_name: user.last_name.clone(),
            city: user.city.clone(),
            iss: security.jwt_issuer.clone(),
            aud: security.jwt_audience.clone(),
            exp,
            iat: now.timestamp(),
            nbf: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    InvalidHeader,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// The user a token is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityInfoUser {
    pub user_id: i64,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}

impl CityInfoUser {
    pub fn new(user_id: i64, user_name: &str, first_name: &str, last_name: &str, city: &str) -> Self {
        Self {
            user_id,
            user_name: user_name.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            city: city.to_string(),
        }
    }
}

/// Demo credential check: any non-blank user name and password is accepted
/// and mapped to a fixed user living in `city`.
pub fn validate_user_credentials(
    user_name: Option<&str>,
    password: Option<&str>,
    city: &str,
) -> Result<CityInfoUser, AuthError> {
    let user_name = user_name.map(str::trim).filter(|s| !s.is_empty());
    let password = password.filter(|s| !s.trim().is_empty());

    match (user_name, password) {
        (Some(user_name), Some(_)) => Ok(CityInfoUser::new(1, user_name, "Kevin", "Dockx", city)),
        _ => Err(AuthError::InvalidCredentials),
    }
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    let header = Header::new(Algorithm::HS256);

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify signature, expiry, issuer and audience.
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[security.jwt_issuer.as_str()]);
    validation.set_audience(&[security.jwt_audience.as_str()]);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}
