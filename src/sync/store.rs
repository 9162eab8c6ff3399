//! Remote document store abstraction: save, load, and a change stream.
//!
//! The engine never talks to a concrete backend; callers supply anything
//! implementing [`RemoteStore`]. The in-memory implementation backs the
//! bundled web binary and the tests.

use crate::models::{TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;

/// A change notification: some session wrote this document.
#[derive(Clone, Debug)]
pub struct StoreEvent {
    pub id: TournamentId,
    pub payload: String,
}

/// The remote document store, as seen by a session: last-write-wins saves
/// at document granularity plus a notification stream of writes.
pub trait RemoteStore: Send + Sync {
    fn save(&self, id: TournamentId, payload: &str) -> Result<(), TournamentError>;
    fn load(&self, id: TournamentId) -> Result<String, TournamentError>;
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// In-memory store: a map of serialized documents plus a broadcast channel
/// notifying every subscriber of each write (including the writer's own).
pub struct MemoryStore {
    documents: RwLock<HashMap<TournamentId, String>>,
    events: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            documents: RwLock::new(HashMap::new()),
            events,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MemoryStore {
    fn save(&self, id: TournamentId, payload: &str) -> Result<(), TournamentError> {
        {
            let mut documents = self
                .documents
                .write()
                .map_err(|_| TournamentError::Persistence("store lock poisoned".into()))?;
            documents.insert(id, payload.to_string());
        }
        // No receivers is fine; spectators may not have subscribed yet.
        let _ = self.events.send(StoreEvent {
            id,
            payload: payload.to_string(),
        });
        Ok(())
    }

    fn load(&self, id: TournamentId) -> Result<String, TournamentError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| TournamentError::Persistence("store lock poisoned".into()))?;
        documents
            .get(&id)
            .cloned()
            .ok_or(TournamentError::NotFound(id))
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
