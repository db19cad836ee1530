//! Token issuance and verification.
//!
//! Tokens are HS256-signed bearer credentials carrying a point-in-time
//! snapshot of the user. Verification is a pure function of token and
//! secret; it never consults the credential store. Stale claims (a role
//! or email changed after issuance) ride the token until expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::error::Result;
use crate::models::{Role, User};

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims embedded in an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role snapshot at issuance time
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issue a signed identity token for a user.
pub fn issue(user: &User, settings: &JwtSettings) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(settings.expiry_hours)).timestamp(),
    };

    let token = encode(
        &Header::new(JWT_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify a token's signature and expiry and return its claims.
pub fn verify(token: &str, settings: &JwtSettings) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::new(JWT_ALGORITHM),
    )?;

    Ok(data.claims)
}
