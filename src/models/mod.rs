pub mod event;
pub mod user;

pub use event::{CreateEventRequest, Event, Participant, UpdateEventRequest};
pub use user::{LoginRequest, PublicUser, RegisterRequest, Role, User};
