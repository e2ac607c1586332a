//! # Identity Store
//!
//! Persists the visitor identity (session id, user id, last-active stamp)
//! across widget loads. The session id rotates after 30 minutes of
//! inactivity; the user id is created once and never rotates.

pub mod error;
pub mod storage;
pub mod store;

pub use error::IdentityError;
pub use storage::{FileIdentityStorage, IdentityStorage, MemoryIdentityStorage};
pub use store::{Identity, IdentityStore, IDLE_GAP_MS};
