//! Shared live collection of notes.
//!
//! One pump task per [`LiveNotes`] drives [`NoteRepository::all_notes`] and
//! stores each emission as the current snapshot in a `watch` channel. The
//! pump starts with the first observer and is cancelled when the last
//! observer is dropped; the next observer starts a fresh one.

use futures::stream::{Stream, StreamExt};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;

use crate::model::Note;
use crate::repository::NoteRepository;

/// A continuously updated, shared snapshot of every note (newest first).
///
/// Cloning is cheap and clones share the same snapshot and pump.
#[derive(Clone)]
pub struct LiveNotes {
    shared: Arc<Shared>,
}

struct Shared {
    repo: NoteRepository,
    snapshot: watch::Sender<Vec<Note>>,
    /// Latest pump generation whose first query has settled.
    loaded: watch::Sender<u64>,
    state: Mutex<PumpState>,
}

#[derive(Default)]
struct PumpState {
    observers: usize,
    /// Incremented on every pump start; a pump only publishes while its
    /// generation is current.
    generation: u64,
    pump: Option<CancellationToken>,
}

impl LiveNotes {
    /// Create an idle feed over `repo`. The initial snapshot is empty.
    pub fn new(repo: NoteRepository) -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        let (loaded, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                repo,
                snapshot,
                loaded,
                state: Mutex::new(PumpState::default()),
            }),
        }
    }

    /// Register an observer, starting the pump if it is the first one.
    ///
    /// Must be called within a Tokio runtime.
    pub fn subscribe(&self) -> NotesObserver {
        let rx = self.shared.snapshot.subscribe();

        let mut state = self.shared.state.lock().unwrap();
        state.observers += 1;
        if state.pump.is_none() {
            state.generation += 1;
            state.pump = Some(start_pump(&self.shared, state.generation));
            tracing::debug!(generation = state.generation, "Live notes pump started");
        }
        let generation = state.generation;
        drop(state);

        NotesObserver {
            rx,
            generation,
            shared: Arc::clone(&self.shared),
        }
    }

    /// The last published snapshot.
    pub fn current(&self) -> Vec<Note> {
        self.shared.snapshot.borrow().clone()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.shared.state.lock().unwrap().observers
    }

    /// Whether a pump is currently attached.
    pub fn is_running(&self) -> bool {
        self.shared.state.lock().unwrap().pump.is_some()
    }
}

impl Shared {
    /// Replace the snapshot if `generation` is still current and the notes
    /// differ. Returns whether observers were notified.
    fn publish(&self, generation: u64, fresh: Vec<Note>) -> bool {
        let state = self.state.lock().unwrap();
        if state.generation != generation || state.pump.is_none() {
            return false;
        }
        let modified = self.snapshot.send_if_modified(|current| {
            if *current == fresh {
                false
            } else {
                *current = fresh;
                true
            }
        });
        self.mark_loaded(generation);
        modified
    }

    /// Record that `generation` finished its first query, successful or not.
    fn mark_loaded(&self, generation: u64) {
        self.loaded.send_if_modified(|latest| {
            if *latest < generation {
                *latest = generation;
                true
            } else {
                false
            }
        });
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.observers = state.observers.saturating_sub(1);
        if state.observers == 0 {
            if let Some(token) = state.pump.take() {
                token.cancel();
                tracing::debug!(generation = state.generation, "Live notes pump stopped");
            }
        }
    }
}

fn start_pump(shared: &Arc<Shared>, generation: u64) -> CancellationToken {
    let token = CancellationToken::new();
    let cancelled = token.clone();
    let shared = Arc::clone(shared);

    tokio::spawn(async move {
        let mut notes = shared.repo.all_notes();
        loop {
            let next = tokio::select! {
                biased;
                () = cancelled.cancelled() => break,
                next = notes.next() => next,
            };

            match next {
                Some(Ok(fresh)) => {
                    let count = fresh.len();
                    if shared.publish(generation, fresh) {
                        tracing::trace!(generation, count, "Published note snapshot");
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, generation, "Failed to re-read notes");
                    shared.mark_loaded(generation);
                }
                None => {
                    tracing::debug!(generation, "Note stream ended");
                    shared.mark_loaded(generation);
                    break;
                }
            }
        }
    });

    token
}

/// An observer of a [`LiveNotes`] feed.
///
/// Holding one keeps the pump alive; dropping the last one stops it.
pub struct NotesObserver {
    rx: watch::Receiver<Vec<Note>>,
    generation: u64,
    shared: Arc<Shared>,
}

impl NotesObserver {
    /// The current snapshot.
    pub fn current(&self) -> Vec<Note> {
        self.rx.borrow().clone()
    }

    /// Wait until the pump serving this observer has read the table once,
    /// then return the snapshot and mark it as seen.
    ///
    /// If that first read failed, the previous snapshot is returned.
    pub async fn loaded(&mut self) -> Vec<Note> {
        let generation = self.generation;
        let mut loaded = self.shared.loaded.subscribe();
        // The sender lives in `shared`, which this observer keeps alive.
        let _ = loaded.wait_for(|latest| *latest >= generation).await;
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next snapshot that differs from the last one seen.
    pub async fn changed(&mut self) -> Vec<Note> {
        // The sender lives in `shared`, which this observer keeps alive.
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }

    /// Wait until the snapshot satisfies `predicate` and return it.
    ///
    /// Checks the current snapshot first.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Vec<Note>
    where
        F: FnMut(&[Note]) -> bool,
    {
        let result = self
            .rx
            .wait_for(|notes| predicate(notes))
            .await
            .map(|notes| (*notes).clone());
        result.unwrap_or_else(|_| self.current())
    }

    /// Turn this observer into a stream yielding the current snapshot and
    /// then every change. The pump stays alive until the stream is dropped.
    pub fn into_stream(self) -> impl Stream<Item = Vec<Note>> + Send + 'static {
        let snapshots = WatchStream::new(self.rx.clone());
        snapshots.map(move |notes| {
            let _keep_alive = &self;
            notes
        })
    }
}

impl Drop for NotesObserver {
    fn drop(&mut self) {
        self.shared.release();
    }
}
