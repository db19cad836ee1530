use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{ApiError, Result};
use crate::models::{Event, Participant, UpdateEventRequest, User};

/// Event registry: exclusive owner of event records and their
/// participant lists.
///
/// Ownership checks and the participant-uniqueness check both run under
/// the guard for the affected event key, never across keys.
#[derive(Debug, Default)]
pub struct EventStore {
    events: DashMap<Uuid, Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, event: Event) {
        self.events.insert(event.id, event);
    }

    pub fn get(&self, id: Uuid) -> Result<Event> {
        self.events
            .get(&id)
            .map(|e| e.clone())
            .ok_or(ApiError::NotFound("Event"))
    }

    /// Full live collection; no filtering or pagination in scope.
    pub fn list_all(&self) -> Vec<Event> {
        self.events.iter().map(|e| e.clone()).collect()
    }

    /// Apply a partial update on behalf of `identity`.
    ///
    /// Absent fields and empty strings are ignored rather than clearing
    /// the field. Ownership is checked under the same entry guard as the
    /// mutation.
    pub fn update(
        &self,
        id: Uuid,
        identity: &Identity,
        fields: UpdateEventRequest,
    ) -> Result<Event> {
        match self.events.entry(id) {
            Entry::Vacant(_) => Err(ApiError::NotFound("Event")),
            Entry::Occupied(mut slot) => {
                let event = slot.get_mut();
                identity.require_owner(event.organizer_id)?;

                apply_if_present(&mut event.title, fields.title);
                apply_if_present(&mut event.description, fields.description);
                apply_if_present(&mut event.date, fields.date);
                apply_if_present(&mut event.time, fields.time);

                Ok(event.clone())
            }
        }
    }

    /// Remove an event (and its participant list) on behalf of
    /// `identity`. Ownership is checked under the entry guard.
    pub fn remove(&self, id: Uuid, identity: &Identity) -> Result<()> {
        match self.events.entry(id) {
            Entry::Vacant(_) => Err(ApiError::NotFound("Event")),
            Entry::Occupied(slot) => {
                identity.require_owner(slot.get().organizer_id)?;
                slot.remove();
                Ok(())
            }
        }
    }

    /// Record a participant, enforcing at-most-once registration per
    /// (event, user) pair. The duplicate scan and the append run under
    /// one shard guard.
    pub fn register(&self, id: Uuid, user: &User) -> Result<Participant> {
        let mut event = self
            .events
            .get_mut(&id)
            .ok_or(ApiError::NotFound("Event"))?;

        if event.has_participant(user.id) {
            return Err(ApiError::AlreadyRegistered);
        }

        let participant = Participant {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            registered_at: Utc::now(),
        };
        event.participants.push(participant.clone());

        Ok(participant)
    }

    /// Events in which the user appears as a participant.
    pub fn registered_for(&self, user_id: Uuid) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.has_participant(user_id))
            .map(|e| e.clone())
            .collect()
    }

    /// Events the user organizes.
    pub fn organized_by(&self, user_id: Uuid) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.organizer_id == user_id)
            .map(|e| e.clone())
            .collect()
    }
}

fn apply_if_present(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            *target = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::sync::Arc;

    fn user(name: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Attendee,
            created_at: Utc::now(),
        }
    }

    fn identity_for(id: Uuid) -> Identity {
        Identity {
            id,
            email: "org@x.com".to_string(),
            name: "Org".to_string(),
            role: Role::Organizer,
        }
    }

    fn event(organizer_id: Uuid) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Launch".to_string(),
            description: String::new(),
            date: "2025-01-01".to_string(),
            time: "10:00".to_string(),
            organizer_id,
            participants: Vec::new(),
        }
    }

    #[test]
    fn test_get_missing_event() {
        let store = EventStore::new();
        assert!(matches!(
            store.get(Uuid::new_v4()),
            Err(ApiError::NotFound("Event"))
        ));
    }

    #[test]
    fn test_double_registration_conflicts() {
        let store = EventStore::new();
        let ev = event(Uuid::new_v4());
        let id = ev.id;
        store.insert(ev);

        let bob = user("Bob", "b@x.com");
        store.register(id, &bob).unwrap();
        assert!(matches!(
            store.register(id, &bob),
            Err(ApiError::AlreadyRegistered)
        ));
        assert_eq!(store.get(id).unwrap().participants.len(), 1);
    }

    #[test]
    fn test_concurrent_registration_admits_exactly_one() {
        let store = Arc::new(EventStore::new());
        let ev = event(Uuid::new_v4());
        let id = ev.id;
        store.insert(ev);

        let bob = Arc::new(user("Bob", "b@x.com"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let bob = Arc::clone(&bob);
                std::thread::spawn(move || store.register(id, &bob).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.get(id).unwrap().participants.len(), 1);
    }

    #[test]
    fn test_update_requires_ownership() {
        let store = EventStore::new();
        let owner = Uuid::new_v4();
        let ev = event(owner);
        let id = ev.id;
        store.insert(ev);

        let intruder = identity_for(Uuid::new_v4());
        let fields = UpdateEventRequest {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(id, &intruder, fields),
            Err(ApiError::Forbidden)
        ));

        let fields = UpdateEventRequest {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = store.update(id, &identity_for(owner), fields).unwrap();
        assert_eq!(updated.title, "Renamed");
    }

    #[test]
    fn test_update_ignores_empty_strings() {
        let store = EventStore::new();
        let owner = Uuid::new_v4();
        let ev = event(owner);
        let id = ev.id;
        store.insert(ev);

        let fields = UpdateEventRequest {
            title: Some(String::new()),
            date: Some("2025-06-01".to_string()),
            ..Default::default()
        };
        let updated = store.update(id, &identity_for(owner), fields).unwrap();

        // Empty title left alone, supplied date applied
        assert_eq!(updated.title, "Launch");
        assert_eq!(updated.date, "2025-06-01");
    }

    #[test]
    fn test_remove_enforces_ownership_and_presence() {
        let store = EventStore::new();
        let owner = Uuid::new_v4();
        let ev = event(owner);
        let id = ev.id;
        store.insert(ev);

        assert!(matches!(
            store.remove(Uuid::new_v4(), &identity_for(owner)),
            Err(ApiError::NotFound("Event"))
        ));
        assert!(matches!(
            store.remove(id, &identity_for(Uuid::new_v4())),
            Err(ApiError::Forbidden)
        ));

        store.remove(id, &identity_for(owner)).unwrap();
        assert!(store.get(id).is_err());
    }
}
