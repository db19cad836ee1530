//! User signup, login, and profile composition.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{ApiError, Result};
use crate::models::{Event, LoginRequest, PublicUser, RegisterRequest, Role, User};
use crate::security::{jwt, password};
use crate::services::notify::EmailMessage;
use crate::AppState;

/// Register a new user and fire off a welcome email.
///
/// The email-uniqueness check and the insert are atomic within the
/// credential store; the welcome email is dispatched only after the
/// insert committed and never affects the result.
pub fn register_user(state: &AppState, payload: RegisterRequest) -> Result<PublicUser> {
    if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "name, email and password are required".to_string(),
        ));
    }

    let user = User {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        password_hash: password::hash_password(&payload.password)?,
        role: Role::from_request(payload.role.as_deref()),
        created_at: Utc::now(),
    };
    let public = user.public();

    state.users.insert(user.clone())?;
    info!(user_id = %user.id, role = user.role.as_str(), "user registered");

    state.notifier.dispatch(EmailMessage::welcome(&user));

    Ok(public)
}

/// Verify credentials and issue an identity token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub fn login(state: &AppState, payload: LoginRequest) -> Result<String> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "email and password required".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_email(&payload.email)
        .ok_or(ApiError::InvalidCredentials)?;

    password::verify_password(&payload.password, &user.password_hash)?;

    let token = jwt::issue(&user, &state.settings.jwt)?;
    info!(user_id = %user.id, "user logged in");

    Ok(token)
}

/// The caller's own record plus derived event views.
pub struct Profile {
    pub user: PublicUser,
    pub registered: Vec<Event>,
    pub organized: Vec<Event>,
}

/// Compose the caller's profile: own record (hash stripped), events they
/// participate in, and events they organize.
pub fn profile(state: &AppState, identity: &Identity) -> Result<Profile> {
    let user = state
        .users
        .get(identity.id)
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Profile {
        user: user.public(),
        registered: state.events.registered_for(identity.id),
        organized: state.events.organized_by(identity.id),
    })
}
