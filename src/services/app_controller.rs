use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::domain::{FavouritesStore, Joke, ScenePhase};
use crate::errors::{JokeError, JokeResult};
use crate::sources::JokeSource;
use crate::storage::traits::FavouritesRepository;

/// Everything that can happen to a session, in the order the host reports it.
#[derive(Debug)]
pub enum AppEvent {
    /// User asked for another joke
    Refresh,
    /// User marked the current joke as a favourite
    Favourite,
    Lifecycle(ScenePhase),
    /// A fetch spawned by `Refresh` finished
    JokeFetched(JokeResult<Joke>),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Displaying,
    Fetching,
}

/// State handed to observers after every change.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub current_joke: Option<Joke>,
    pub favourites: FavouritesStore,
    pub is_current_favourited: bool,
    /// Fetches started but not yet reported back
    pub in_flight: usize,
}

impl AppState {
    pub fn phase(&self) -> ControllerPhase {
        if self.in_flight > 0 {
            ControllerPhase::Fetching
        } else {
            ControllerPhase::Displaying
        }
    }
}

/// Rendering side of a session.
pub trait StateObserver: Send + Sync {
    fn on_state_changed(&self, state: &AppState);
}

/// A write started by `persist`.
struct PendingWrite {
    /// Finishes only once the repository call has returned, even after a timeout
    done: JoinHandle<()>,
    /// Result reported to the caller, bounded by the persist timeout
    outcome: oneshot::Receiver<JokeResult<()>>,
}

/// Drives a session: fetching, favouriting and saving on background.
///
/// All state lives here and is only touched from [`AppController::handle`].
/// Fetches run as spawned tasks that report back through the event channel,
/// so overlapping refreshes are allowed and the last result handled wins.
pub struct AppController<S, R>
where
    S: JokeSource + 'static,
    R: FavouritesRepository + 'static,
{
    source: Arc<S>,
    repository: Arc<R>,
    events: UnboundedSender<AppEvent>,
    state: AppState,
    observers: Vec<Box<dyn StateObserver>>,
    persist_timeout: Duration,
    pending_write: Option<PendingWrite>,
    /// Set when unreadable favourites could not be moved aside; saving would destroy them
    persist_blocked: bool,
}

impl<S, R> AppController<S, R>
where
    S: JokeSource + 'static,
    R: FavouritesRepository + 'static,
{
    pub fn new(
        source: S,
        repository: R,
        events: UnboundedSender<AppEvent>,
        persist_timeout: Duration,
    ) -> Self {
        Self {
            source: Arc::new(source),
            repository: Arc::new(repository),
            events,
            state: AppState::default(),
            observers: Vec::new(),
            persist_timeout,
            pending_write: None,
            persist_blocked: false,
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        observer.on_state_changed(&self.state);
        self.observers.push(observer);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Load saved favourites and request the first joke.
    ///
    /// A missing or unreadable favourites file starts the session empty. An
    /// unreadable file is moved aside first; if that fails, nothing is saved
    /// for the rest of the session.
    pub fn start(&mut self) {
        match self.repository.load() {
            Ok(jokes) => {
                self.state.favourites = FavouritesStore::from_jokes(jokes);
                tracing::info!(count = self.state.favourites.len(), "favourites loaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load favourites, starting with none");
                match self.repository.set_aside() {
                    Ok(Some(backup)) => {
                        tracing::warn!(backup = %backup.display(), "unreadable favourites moved aside");
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "could not move unreadable favourites aside, saving disabled");
                        self.persist_blocked = true;
                    }
                }
            }
        }

        self.refresh();
    }

    /// Process events until `Quit` arrives.
    pub async fn run(mut self, mut events: UnboundedReceiver<AppEvent>) -> Self {
        while let Some(event) = events.recv().await {
            if self.handle(event).is_break() {
                break;
            }
        }
        self
    }

    pub fn handle(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::Refresh => self.refresh(),
            AppEvent::JokeFetched(result) => self.on_joke_fetched(result),
            AppEvent::Favourite => {
                self.favourite();
            }
            AppEvent::Lifecycle(phase) => {
                tracing::info!(%phase, "scene phase changed");
                if phase == ScenePhase::Background {
                    self.persist();
                }
            }
            AppEvent::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Start a fetch. Earlier fetches still in flight are not cancelled.
    pub fn refresh(&mut self) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();

        self.state.in_flight += 1;
        tracing::debug!(in_flight = self.state.in_flight, "fetching joke");

        tokio::spawn(async move {
            let result = source.fetch_random_joke().await;
            // A closed channel means the session is over
            events.send(AppEvent::JokeFetched(result)).ok();
        });

        self.notify();
    }

    /// Add the current joke to favourites. Returns whether anything was added.
    pub fn favourite(&mut self) -> bool {
        if self.state.is_current_favourited {
            return false;
        }
        let Some(joke) = self.state.current_joke.clone() else {
            tracing::debug!("no joke to favourite yet");
            return false;
        };

        let added = self.state.favourites.add(joke);
        self.state.is_current_favourited = true;
        if added {
            tracing::info!(count = self.state.favourites.len(), "joke added to favourites");
        }

        self.notify();
        added
    }

    /// Write favourites in the background; returns without waiting.
    ///
    /// Each write starts only after the previous one has returned from the
    /// repository, timed out or not, so the file ends up holding the latest snapshot.
    pub fn persist(&mut self) {
        if self.persist_blocked {
            tracing::warn!("not saving favourites over a file that could not be read");
            return;
        }

        let jokes = self.state.favourites.snapshot();
        let repository = Arc::clone(&self.repository);
        let timeout = self.persist_timeout;
        let previous = self.pending_write.take().map(|pending| pending.done);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let done = tokio::spawn(async move {
            if let Some(previous) = previous {
                previous.await.ok();
            }

            let count = jokes.len();
            let mut write = tokio::task::spawn_blocking(move || repository.save(&jokes));
            let result = match tokio::time::timeout(timeout, &mut write).await {
                Ok(joined) => joined.unwrap_or_else(|e| {
                    Err(JokeError::Persistence(format!("write task failed: {}", e)))
                }),
                Err(_) => {
                    let e = JokeError::Persistence(format!(
                        "write did not finish within {:?}",
                        timeout
                    ));
                    tracing::warn!(error = %e, "unable to save favourites");
                    outcome_tx.send(Err(e)).ok();
                    // The caller stops waiting; the next write still waits for this one
                    write.await.ok();
                    return;
                }
            };

            match &result {
                Ok(()) => tracing::info!(count, "favourites saved"),
                Err(e) => tracing::warn!(error = %e, "unable to save favourites"),
            }
            outcome_tx.send(result).ok();
        });

        self.pending_write = Some(PendingWrite {
            done,
            outcome: outcome_rx,
        });
    }

    /// Wait for the outcome of the most recent write started by [`AppController::persist`].
    pub async fn flush(&mut self) -> JokeResult<()> {
        match self.pending_write.take() {
            Some(pending) => pending.outcome.await.map_err(|_| {
                JokeError::Persistence("write task ended without a result".to_string())
            })?,
            None => Ok(()),
        }
    }

    fn on_joke_fetched(&mut self, result: JokeResult<Joke>) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);

        match result {
            Ok(joke) => {
                tracing::debug!(id = %joke.id, "joke received");
                self.state.is_current_favourited = self.state.favourites.contains(&joke);
                self.state.current_joke = Some(joke);
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not retrieve joke");
            }
        }

        self.notify();
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.on_state_changed(&self.state);
        }
    }
}
