//! Authorization gate: request authentication and access guards.
//!
//! `Identity` is the verified, claims-derived representation of the
//! caller for the duration of one request. Extraction verifies the
//! bearer token and then re-resolves the user id against the credential
//! store, so a token for a deleted user stops working immediately even
//! though it remains cryptographically valid until expiry.

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Role;
use crate::security::jwt;
use crate::AppState;

/// Authenticated caller extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl Identity {
    /// Require the caller to hold the given role.
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    /// Require the caller to be the owner of a resource.
    pub fn require_owner(&self, owner_id: Uuid) -> Result<(), ApiError> {
        if self.id == owner_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::MissingCredential)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::MissingCredential)?;

        let claims = jwt::verify(token, &state.settings.jwt)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::InvalidToken)?;

        // Claims are a snapshot; existence is re-checked per request.
        let user = state.users.get(user_id).ok_or(ApiError::UnknownIdentity)?;

        Ok(Identity {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        })
    }
}
