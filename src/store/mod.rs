//! In-memory stores.
//!
//! Both stores are keyed dashmaps; every check-then-mutate sequence runs
//! under a single shard/entry guard for the affected key, so requests
//! touching different keys never block each other and uniqueness
//! invariants hold under concurrent access.

pub mod events;
pub mod users;

pub use events::EventStore;
pub use users::UserStore;
