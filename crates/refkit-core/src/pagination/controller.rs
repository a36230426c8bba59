//! Button-driven pagination sessions.
//!
//! A session renders on every previous/next press, deletes the view on stop,
//! and freezes the current page with disabled controls once the deadline
//! passes. The deadline is fixed at start; activity does not extend it.
//! Events are consumed one at a time from the session's own queue, so renders
//! happen in transition order.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::{Config, DEFAULT_PAGINATION_TIMEOUT},
    domain::Snowflake,
    errors::Error,
    pagination::{
        collector::EventFilter,
        cursor::{SessionState, Teardown, Transition},
        port::PageView,
        types::{ButtonEvent, CloseReason, Controls, PagePosition, SessionOutcome},
    },
    Result,
};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `now + timeout`, saturating at roughly thirty years out.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// Builder for one pagination session.
pub struct Paginator<P, V> {
    pages: Vec<P>,
    controls: Controls,
    view: V,
    timeout: Duration,
    start_page: usize,
    guild_id: Option<Snowflake>,
    cancel: CancellationToken,
}

impl<P, V> Paginator<P, V>
where
    P: Send + Sync + 'static,
    V: PageView<P> + 'static,
{
    pub fn new(pages: Vec<P>, controls: Controls, view: V) -> Self {
        Self {
            pages,
            controls,
            view,
            timeout: DEFAULT_PAGINATION_TIMEOUT,
            start_page: 1,
            guild_id: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Take timeout and control IDs from config.
    pub fn with_config(self, cfg: &Config) -> Self {
        Self {
            controls: cfg.controls.clone(),
            timeout: cfg.pagination_timeout,
            ..self
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 1-based page shown when the session starts.
    pub fn start_page(mut self, page: usize) -> Self {
        self.start_page = page;
        self
    }

    /// Guild the originating interaction came from; presses from elsewhere
    /// are ignored. A session without a guild accepts no presses.
    pub fn guild(mut self, guild_id: Option<Snowflake>) -> Self {
        self.guild_id = guild_id;
        self
    }

    /// Token that signals the view was deleted outside the session.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn into_session(self) -> Result<Session<P, V>> {
        self.controls.validate()?;
        let state = SessionState::new(self.pages.len(), self.start_page)?;

        Ok(Session {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            filter: EventFilter::new(self.controls, self.guild_id),
            pages: self.pages,
            view: self.view,
            state,
            deadline: deadline_after(self.timeout),
            cancel: self.cancel,
        })
    }

    /// Run the session on the current task until it closes.
    ///
    /// Only construction preconditions produce an error; everything after
    /// that ends in a [`SessionOutcome`].
    pub async fn run(self, events: UnboundedReceiver<ButtonEvent>) -> Result<SessionOutcome> {
        let session = self.into_session()?;
        Ok(session.run(events).await)
    }

    /// Spawn the session and hand back its event queue.
    pub fn start(self) -> Result<SessionHandle> {
        let session = self.into_session()?;
        let cancel = session.cancel.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(session.run(rx));

        Ok(SessionHandle {
            events: tx,
            cancel,
            task,
        })
    }
}

/// Host-side handle to a spawned session.
pub struct SessionHandle {
    events: UnboundedSender<ButtonEvent>,
    cancel: CancellationToken,
    task: JoinHandle<SessionOutcome>,
}

impl SessionHandle {
    /// Queue a press. Returns `false` once the session has closed.
    pub fn press(&self, event: ButtonEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn sender(&self) -> UnboundedSender<ButtonEvent> {
        self.events.clone()
    }

    /// Signal that the view was deleted elsewhere.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to end on its own (stop, deadline, cancel).
    pub async fn join(self) -> Result<SessionOutcome> {
        let Self { events, task, .. } = self;
        let outcome = task.await;
        drop(events);
        outcome.map_err(|e| Error::External(format!("pagination task failed: {e}")))
    }

    /// Drop this handle's sender, then wait. Once every other sender is
    /// gone the session closes as [`CloseReason::SourceClosed`].
    pub async fn close(self) -> Result<SessionOutcome> {
        let Self { events, task, .. } = self;
        drop(events);
        task.await
            .map_err(|e| Error::External(format!("pagination task failed: {e}")))
    }
}

struct Session<P, V> {
    id: u64,
    filter: EventFilter,
    pages: Vec<P>,
    view: V,
    state: SessionState,
    deadline: Instant,
    cancel: CancellationToken,
}

impl<P, V> Session<P, V>
where
    P: Send + Sync + 'static,
    V: PageView<P> + 'static,
{
    async fn run(mut self, mut events: UnboundedReceiver<ButtonEvent>) -> SessionOutcome {
        tracing::debug!(
            session = self.id,
            pages = self.pages.len(),
            page = self.state.position().page,
            "pagination session started"
        );

        let deadline = sleep_until(self.deadline);
        tokio::pin!(deadline);

        let reason = loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break CloseReason::Cancelled,
                _ = &mut deadline => break CloseReason::Timeout,
                maybe = events.recv() => {
                    let Some(event) = maybe else {
                        break CloseReason::SourceClosed;
                    };
                    if let Some(reason) = self.handle(event).await {
                        break reason;
                    }
                }
            }
        };

        // Late presses are refused from here on.
        events.close();
        self.teardown(reason).await
    }

    /// Apply one event. Returns the close reason when it ended the session.
    async fn handle(&mut self, event: ButtonEvent) -> Option<CloseReason> {
        let Some(control) = self.filter.accepts(&event) else {
            tracing::trace!(session = self.id, event = ?event, "ignored event");
            return None;
        };

        match self.state.apply(control) {
            Transition::Render(position) => {
                event.acknowledge().await;
                self.render(position, true).await;
                None
            }
            Transition::Delete => {
                event.acknowledge().await;
                if let Err(e) = self.view.delete().await {
                    tracing::debug!(session = self.id, error = %e, "delete failed");
                }
                self.state.close_reason()
            }
            Transition::Ignored => None,
        }
    }

    async fn render(&self, position: PagePosition, controls_enabled: bool) {
        let page = &self.pages[position.page - 1];
        if let Err(e) = self.view.render(page, position, controls_enabled).await {
            // The view may have been deleted from outside.
            tracing::debug!(
                session = self.id,
                page = position.page,
                error = %e,
                "render failed"
            );
        }
    }

    async fn teardown(mut self, reason: CloseReason) -> SessionOutcome {
        if let Some(Teardown::FinalRender(position)) = self.state.close(reason) {
            self.render(position, false).await;
        }

        let last = self.state.position();
        tracing::debug!(
            session = self.id,
            reason = %reason,
            page = last.page,
            "pagination session closed"
        );

        SessionOutcome { reason, last }
    }
}
