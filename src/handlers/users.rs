/// User endpoint handlers
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::auth::Identity;
use crate::error::ApiError;
use crate::models::{Event, LoginRequest, PublicUser, RegisterRequest};
use crate::services;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
    pub registered: Vec<Event>,
    pub organized: Vec<Event>,
}

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = services::users::register_user(&state, payload)?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user })))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = services::users::login(&state, payload)?;
    Ok(Json(LoginResponse { token }))
}

/// GET /users/me
pub async fn me(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = services::users::profile(&state, &identity)?;
    Ok(Json(ProfileResponse {
        user: profile.user,
        registered: profile.registered,
        organized: profile.organized,
    }))
}
