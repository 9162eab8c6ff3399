//! Shared tournament state: remote store abstraction and the session that
//! keeps one document consistent between an organizer and spectators.

mod session;
mod store;

pub use session::{content_hash, TournamentSession, DEBOUNCE};
pub use store::{MemoryStore, RemoteStore, StoreEvent};
