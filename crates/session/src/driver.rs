//! Async driver - runs the session against a live content source.
//!
//! The driver is the single writer of its [`Session`]. Each fetch runs in
//! its own tokio task and reports back over an mpsc channel; completions are
//! applied in arrival order by [`SessionDriver::next_completion`]. A source
//! that panics is reported as [`FetchError::Crashed`]. Identity and
//! navigation calls never wait on a fetch.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use uuid::Uuid;
use waypoint_core::{
    ContentItem, ContentRequest, ContentSource, FetchError, SessionError, SessionEvent,
};

use crate::session::{Effect, FetchOutcome, FetchTicket, Session};

struct FetchResult {
    ticket: FetchTicket,
    result: Result<Vec<ContentItem>, FetchError>,
}

/// A response that was handed to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub ticket: FetchTicket,
    pub outcome: FetchOutcome,
}

pub struct SessionDriver {
    session: Session,
    source: Arc<dyn ContentSource>,
    tx: mpsc::UnboundedSender<FetchResult>,
    rx: mpsc::UnboundedReceiver<FetchResult>,
    in_flight: Option<(Uuid, AbortHandle)>,
    outstanding: HashSet<Uuid>,
    abort_superseded: bool,
    request_timeout: Option<Duration>,
}

impl SessionDriver {
    pub fn new(session: Session, source: Arc<dyn ContentSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session,
            source,
            tx,
            rx,
            in_flight: None,
            outstanding: HashSet::new(),
            abort_superseded: true,
            request_timeout: None,
        }
    }

    /// Whether a new fetch aborts the task of the one it supersedes.
    ///
    /// Stale responses are discarded either way; disabling this lets late
    /// responses reach the session.
    pub fn with_abort_superseded(mut self, abort: bool) -> Self {
        self.abort_superseded = abort;
        self
    }

    /// Fail requests that take longer than `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn source(&self) -> &Arc<dyn ContentSource> {
        &self.source
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SessionEvent>> {
        self.session.events().subscribe()
    }

    /// Number of spawned requests whose response has not been applied yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    // --- Session operations ---

    pub async fn sign_in(&mut self, id: &str) -> Result<(), SessionError> {
        let effects = self.session.sign_in(id)?;
        self.run(effects).await;
        Ok(())
    }

    pub async fn sign_out(&mut self) -> Result<(), SessionError> {
        let effects = self.session.sign_out()?;
        self.abort_in_flight();
        self.run(effects).await;
        Ok(())
    }

    pub async fn navigate(&mut self, view: &str) -> Result<(), SessionError> {
        let effects = self.session.navigate(view)?;
        self.run(effects).await;
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let effects = self.session.refresh()?;
        self.run(effects).await;
        Ok(())
    }

    pub fn close_popup(&mut self) -> Result<(), SessionError> {
        self.session.close_popup()
    }

    pub fn open_button_overlay(&mut self) -> Result<(), SessionError> {
        self.session.open_button_overlay()
    }

    pub fn close_button_overlay(&mut self) -> Result<(), SessionError> {
        self.session.close_button_overlay()
    }

    pub fn hide_inline(&mut self) -> Result<(), SessionError> {
        self.session.hide_inline()
    }

    // --- Completions ---

    /// Wait for the next response and apply it.
    ///
    /// Returns `None` once no spawned request is left to report.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let fetched = match self.rx.try_recv() {
            Ok(fetched) => fetched,
            Err(_) if self.outstanding.is_empty() => return None,
            Err(_) => self.rx.recv().await?,
        };
        Some(self.apply(fetched))
    }

    /// Apply a response if one has already arrived, without waiting.
    pub fn try_next_completion(&mut self) -> Option<Completion> {
        let fetched = self.rx.try_recv().ok()?;
        Some(self.apply(fetched))
    }

    /// Apply responses until no request is outstanding.
    pub async fn settle(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Some(completion) = self.next_completion().await {
            completions.push(completion);
        }
        completions
    }

    // --- Internals ---

    fn apply(&mut self, fetched: FetchResult) -> Completion {
        let request_id = fetched.ticket.request_id;
        self.outstanding.remove(&request_id);
        if self.in_flight.as_ref().is_some_and(|(id, _)| *id == request_id) {
            self.in_flight = None;
        }
        let outcome = self.session.apply(&fetched.ticket, fetched.result);
        Completion {
            ticket: fetched.ticket,
            outcome,
        }
    }

    async fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Identify(user) => self.source.identify(user.as_ref()).await,
                Effect::SetContext(trigger_point) => {
                    self.source.set_context(trigger_point.as_ref()).await
                }
                Effect::Fetch { ticket, request } => self.spawn_fetch(ticket, request),
            }
        }
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket, request: ContentRequest) {
        if self.abort_superseded {
            self.abort_in_flight();
        }

        let request_id = ticket.request_id;
        let source = self.source.clone();
        let tx = self.tx.clone();
        let timeout = self.request_timeout;

        let request_task = tokio::spawn(async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, source.request_content(&request))
                    .await
                    .unwrap_or_else(|_| {
                        Err(FetchError::Timeout(format!(
                            "no response within {}ms",
                            limit.as_millis()
                        )))
                    }),
                None => source.request_content(&request).await,
            }
        });
        let abort = request_task.abort_handle();

        // Every request reports exactly once unless it was aborted.
        tokio::spawn(async move {
            let result = match request_task.await {
                Ok(result) => result,
                Err(e) if e.is_panic() => {
                    warn!(%request_id, "Content source panicked");
                    Err(FetchError::Crashed(
                        "content source panicked while handling the request".into(),
                    ))
                }
                Err(_) => return,
            };
            if tx.send(FetchResult { ticket, result }).is_err() {
                warn!(%request_id, "Driver dropped before response arrived");
            }
        });

        self.outstanding.insert(request_id);
        self.in_flight = Some((request_id, abort));
    }

    fn abort_in_flight(&mut self) {
        if let Some((request_id, handle)) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!(%request_id, "Aborting superseded request");
                handle.abort();
            }
            // A response that already made it into the channel is still
            // drained by try_recv and discarded as stale.
            self.outstanding.remove(&request_id);
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }
}
