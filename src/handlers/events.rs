/// Event endpoint handlers
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::ApiError;
use crate::models::{CreateEventRequest, Event, Participant, Role, UpdateEventRequest};
use crate::services;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub event: Event,
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub participant: Participant,
}

/// POST /events (organizer only)
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    identity.require_role(Role::Organizer)?;
    let event = services::events::create(&state, &identity, payload)?;
    Ok((StatusCode::CREATED, Json(EventResponse { event })))
}

/// GET /events (public)
pub async fn list(State(state): State<AppState>) -> Json<EventListResponse> {
    Json(EventListResponse {
        events: state.events.list_all(),
    })
}

/// GET /events/:id (public)
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state.events.get(id)?;
    Ok(Json(EventResponse { event }))
}

/// PUT /events/:id (organizer and owner)
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    identity.require_role(Role::Organizer)?;
    let event = services::events::update(&state, &identity, id, payload)?;
    Ok(Json(EventResponse { event }))
}

/// DELETE /events/:id (organizer and owner)
pub async fn remove(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    identity.require_role(Role::Organizer)?;
    services::events::remove(&state, &identity, id)?;
    Ok(Json(MessageResponse {
        message: "Event deleted".to_string(),
    }))
}

/// POST /events/:id/register (any authenticated user)
pub async fn register(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let participant = services::events::register(&state, &identity, id)?;
    Ok(Json(RegistrationResponse {
        message: "Registered".to_string(),
        participant,
    }))
}
