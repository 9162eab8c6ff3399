//! Tournament session: optimistic local edits, debounced persistence, and
//! echo-suppressed remote updates.
//!
//! One session holds the authoritative in-memory document. Mutations apply
//! immediately; persistence happens on a debounce window so rapid edits
//! coalesce into one write. Inbound store notifications are compared by
//! content hash against the last known state, so a session's own writes
//! echoing back do not trigger a redundant replacement.

use crate::logic::standings::{standings_from_rounds, Standing};
use crate::models::{TournamentDocument, TournamentError, TournamentId};
use crate::sync::store::RemoteStore;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Default write-back debounce window.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Hash of a serialized document, used for echo suppression.
pub fn content_hash(payload: &str) -> u64 {
    let mut hasher = FxHasher::default();
    payload.hash(&mut hasher);
    hasher.finish()
}

struct SessionState {
    document: TournamentDocument,
    /// Hash of the last state written to or received from the store.
    last_seen_hash: u64,
    pending_save: Option<JoinHandle<()>>,
}

/// A handle on one shared tournament document. Writers call [`mutate`];
/// spectators watch [`revision`] and read [`snapshot`].
///
/// [`mutate`]: TournamentSession::mutate
/// [`revision`]: TournamentSession::revision
/// [`snapshot`]: TournamentSession::snapshot
pub struct TournamentSession {
    id: TournamentId,
    store: Arc<dyn RemoteStore>,
    state: Arc<Mutex<SessionState>>,
    revision: watch::Sender<u64>,
    debounce: Duration,
}

impl TournamentSession {
    /// Wrap a document in a session with the default debounce window.
    /// The document is persisted immediately so spectators can open it.
    pub fn create(
        store: Arc<dyn RemoteStore>,
        document: TournamentDocument,
    ) -> Result<Self, TournamentError> {
        Self::with_debounce(store, document, DEBOUNCE)
    }

    /// [`create`](TournamentSession::create) with an explicit debounce.
    pub fn with_debounce(
        store: Arc<dyn RemoteStore>,
        document: TournamentDocument,
        debounce: Duration,
    ) -> Result<Self, TournamentError> {
        let id = document.id;
        let payload = serde_json::to_string(&document)
            .map_err(|e| TournamentError::Persistence(e.to_string()))?;
        let hash = content_hash(&payload);
        store.save(id, &payload)?;
        let (revision, _) = watch::channel(0);
        Ok(Self {
            id,
            store,
            state: Arc::new(Mutex::new(SessionState {
                document,
                last_seen_hash: hash,
                pending_save: None,
            })),
            revision,
            debounce,
        })
    }

    /// Open an existing document from the store (spectator or returning
    /// organizer). The payload goes through collection normalization.
    pub fn open(store: Arc<dyn RemoteStore>, id: TournamentId) -> Result<Self, TournamentError> {
        let payload = store.load(id)?;
        let document: TournamentDocument = serde_json::from_str(&payload)
            .map_err(|e| TournamentError::Persistence(e.to_string()))?;
        let hash = content_hash(&payload);
        let (revision, _) = watch::channel(0);
        Ok(Self {
            id,
            store,
            state: Arc::new(Mutex::new(SessionState {
                document,
                last_seen_hash: hash,
                pending_save: None,
            })),
            revision,
            debounce: DEBOUNCE,
        })
    }

    pub fn id(&self) -> TournamentId {
        self.id
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>, TournamentError> {
        self.state
            .lock()
            .map_err(|_| TournamentError::Persistence("session lock poisoned".into()))
    }

    /// Apply a mutation to the local document immediately (optimistic) and
    /// schedule a debounced write-back. The mutation's error leaves the
    /// schedule untouched; its success replaces any pending write.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut TournamentDocument) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let mut state = self.lock()?;
        let out = f(&mut state.document)?;
        state.document.touch();
        self.schedule_save(&mut state);
        drop(state);
        self.revision.send_modify(|r| *r += 1);
        Ok(out)
    }

    /// A clone of the current document.
    pub fn snapshot(&self) -> Result<TournamentDocument, TournamentError> {
        Ok(self.lock()?.document.clone())
    }

    /// Standings derived from the current document, recomputed on every
    /// call so they can never drift from the recorded scores.
    pub fn standings(&self) -> Result<Vec<Standing>, TournamentError> {
        let state = self.lock()?;
        let doc = &state.document;
        Ok(standings_from_rounds(
            doc.meta.config.format,
            &doc.entrants,
            &doc.rounds,
        ))
    }

    /// Watch channel bumped on every state change (local or remote).
    pub fn revision(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Handle one change notification from the store. Returns `Ok(false)`
    /// when the payload hashes to the last known state and was skipped;
    /// `Ok(true)` when the local document was replaced wholesale.
    pub fn apply_remote(&self, payload: &str) -> Result<bool, TournamentError> {
        let hash = content_hash(payload);
        let mut state = self.lock()?;
        if hash == state.last_seen_hash {
            return Ok(false);
        }
        let document: TournamentDocument = serde_json::from_str(payload)
            .map_err(|e| TournamentError::Persistence(e.to_string()))?;
        if let Err(e) = document.check_integrity() {
            log::warn!("remote update for {} fails integrity check: {}", self.id, e);
        }
        state.document = document;
        state.last_seen_hash = hash;
        drop(state);
        self.revision.send_modify(|r| *r += 1);
        Ok(true)
    }

    /// Persist the current state immediately, bypassing the debounce.
    pub fn persist_now(&self) -> Result<(), TournamentError> {
        let mut state = self.lock()?;
        if let Some(handle) = state.pending_save.take() {
            handle.abort();
        }
        let payload = serde_json::to_string(&state.document)
            .map_err(|e| TournamentError::Persistence(e.to_string()))?;
        state.last_seen_hash = content_hash(&payload);
        self.store.save(self.id, &payload)
    }

    /// Abort any pending write and spawn a fresh one after the debounce
    /// window. A later mutation within the window replaces this write.
    fn schedule_save(&self, state: &mut MutexGuard<'_, SessionState>) {
        let payload = match serde_json::to_string(&state.document) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("failed to serialize tournament {}: {}", self.id, e);
                return;
            }
        };
        state.last_seen_hash = content_hash(&payload);
        if let Some(handle) = state.pending_save.take() {
            handle.abort();
        }
        let store = Arc::clone(&self.store);
        let id = self.id;
        let delay = self.debounce;
        state.pending_save = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Fire-and-forget: a failed write keeps the optimistic local
            // state; the next debounce cycle retries implicitly.
            if let Err(e) = store.save(id, &payload) {
                log::warn!("failed to persist tournament {}: {}", id, e);
            }
        }));
    }

    /// Spawn a task feeding the store's change stream into this session.
    pub fn spawn_change_listener(self: Arc<Self>) -> JoinHandle<()> {
        let mut events = self.store.subscribe();
        let session = self;
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.id == session.id => {
                        if let Err(e) = session.apply_remote(&event.payload) {
                            log::warn!("bad remote update for {}: {}", session.id, e);
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("change stream lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
