//! Event CRUD and the registration workflow.

use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{ApiError, Result};
use crate::models::{CreateEventRequest, Event, Participant, UpdateEventRequest};
use crate::services::notify::EmailMessage;
use crate::AppState;

/// Create an event owned by the calling organizer.
pub fn create(state: &AppState, identity: &Identity, payload: CreateEventRequest) -> Result<Event> {
    if payload.title.is_empty() || payload.date.is_empty() || payload.time.is_empty() {
        return Err(ApiError::Validation(
            "title, date and time are required".to_string(),
        ));
    }

    let event = Event {
        id: Uuid::new_v4(),
        title: payload.title,
        description: payload.description,
        date: payload.date,
        time: payload.time,
        organizer_id: identity.id,
        participants: Vec::new(),
    };
    state.events.insert(event.clone());
    info!(event_id = %event.id, organizer_id = %identity.id, "event created");

    Ok(event)
}

pub fn update(
    state: &AppState,
    identity: &Identity,
    event_id: Uuid,
    fields: UpdateEventRequest,
) -> Result<Event> {
    state.events.update(event_id, identity, fields)
}

pub fn remove(state: &AppState, identity: &Identity, event_id: Uuid) -> Result<()> {
    state.events.remove(event_id, identity)?;
    info!(event_id = %event_id, organizer_id = %identity.id, "event deleted");
    Ok(())
}

/// Registration workflow: resolve event, enforce at-most-once
/// participation, record the participant, then hand the confirmation off
/// to the notifier.
///
/// The caller's success depends only on the registry mutation; the
/// notification is dispatched after the critical section and never
/// awaited.
pub fn register(state: &AppState, identity: &Identity, event_id: Uuid) -> Result<Participant> {
    // Snapshot for the confirmation message; also the NotFound check.
    let event = state.events.get(event_id)?;

    // Defensive: the gate resolved this identity already, but the user
    // could vanish between authentication and this step.
    let user = state
        .users
        .get(identity.id)
        .ok_or(ApiError::UnknownIdentity)?;

    let participant = state.events.register(event_id, &user)?;
    info!(event_id = %event_id, user_id = %user.id, "participant registered");

    state
        .notifier
        .dispatch(EmailMessage::registration_confirmed(&user, &event));

    Ok(participant)
}
