use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// The only role the site knows about
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin email
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(email: &str, ttl_secs: i64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_secs)).timestamp();

        Self {
            sub: email.to_string(),
            role: ADMIN_ROLE.to_string(),
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Verified session, placed in request extensions by the session guard
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub email: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for AdminSession {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            role: claims.role,
            expires_at: Utc.timestamp_opt(claims.exp, 0).single().unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

/// Mint a signed session token for the admin
pub fn generate_jwt(security: &SecurityConfig, email: &str) -> Result<String, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let claims = Claims::new(email, security.session_ttl_secs);
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the claims
pub fn validate_jwt(security: &SecurityConfig, token: &str) -> Result<Claims, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    if token_data.claims.role != ADMIN_ROLE {
        return Err(JwtError::InvalidToken(format!("unexpected role '{}'", token_data.claims.role)));
    }

    Ok(token_data.claims)
}

/// Compare submitted credentials with the configured admin pair
pub fn credentials_match(security: &SecurityConfig, email: &str, password: &str) -> bool {
    match (&security.admin_email, &security.admin_password) {
        (Some(admin_email), Some(admin_password)) => {
            admin_email.as_bytes() == email.as_bytes() && admin_password.as_bytes() == password.as_bytes()
        }
        _ => false,
    }
}

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(security: &SecurityConfig, token: &str) -> String {
    build_cookie(security, token, security.session_ttl_secs)
}

/// `Set-Cookie` value that makes the browser drop the session
pub fn clear_session_cookie(security: &SecurityConfig) -> String {
    build_cookie(security, "", -1)
}

fn build_cookie(security: &SecurityConfig, value: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        security.session_cookie, value, max_age
    );
    if security.require_https {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Read a cookie value from the request's `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
