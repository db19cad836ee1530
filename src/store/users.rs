use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::User;

/// Credential store: exclusive owner of user records.
///
/// Email uniqueness is enforced through the email index: claiming the
/// index entry is the critical section, so two concurrent registrations
/// with the same email admit exactly one.
#[derive(Debug, Default)]
pub struct UserStore {
    by_id: DashMap<Uuid, User>,
    by_email: DashMap<String, Uuid>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user, failing with `AlreadyExists` if the email is
    /// taken. Atomic per email key.
    pub fn insert(&self, user: User) -> Result<()> {
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(ApiError::AlreadyExists),
            Entry::Vacant(slot) => {
                let id = user.id;
                self.by_id.insert(id, user);
                slot.insert(id);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.by_id.get(&id).map(|u| u.clone())
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.by_email.get(email)?;
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;
    use std::sync::Arc;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Attendee,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = UserStore::new();
        store.insert(user("a@x.com")).unwrap();
        assert!(matches!(
            store.insert(user("a@x.com")),
            Err(ApiError::AlreadyExists)
        ));
    }

    #[test]
    fn test_lookup_by_id_and_email() {
        let store = UserStore::new();
        let alice = user("a@x.com");
        let id = alice.id;
        store.insert(alice).unwrap();

        assert_eq!(store.get(id).unwrap().email, "a@x.com");
        assert_eq!(store.find_by_email("a@x.com").unwrap().id, id);
        assert!(store.find_by_email("b@x.com").is_none());
    }

    #[test]
    fn test_concurrent_same_email_admits_exactly_one() {
        let store = Arc::new(UserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.insert(user("race@x.com")).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert!(store.find_by_email("race@x.com").is_some());
    }
}
