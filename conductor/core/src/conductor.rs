//! Conductor - The View-State Core
//!
//! The Conductor is the single source of truth for what a surface shows:
//! - The current poem, its analysis and its illustration
//! - A single-valued [`AppState`]
//! - The error detail of a failed poem load
//!
//! # Design Philosophy
//!
//! At most one operation is in flight. That is enforced by checking
//! [`AppState`] before starting anything, not by a lock: surfaces are the only
//! callers and they drive the Conductor from one task. Provider calls run as
//! spawned tokio tasks so the surface keeps rendering; the surface calls
//! [`Conductor::poll_pending`] each frame to pick up the result.
//!
//! Failures are deliberately asymmetric:
//! - A failed poem load moves to [`AppState::Error`] with a generic message
//!   and keeps whatever poem was already displayed.
//! - A failed analysis or illustration is logged, reported as a non-blocking
//!   warning, and the Conductor returns to [`AppState::Idle`].

use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::backend::{AnalysisProvider, GeminiBackend, ImageProvider, PoemSource, PoetryDbSource};
use crate::config::ConductorConfig;
use crate::error::ProviderError;
use crate::messages::{
    AppState, ConductorMessage, NotifyLevel, ViewSnapshot, POEM_LOAD_FAILED_MESSAGE,
};
use crate::poem::{Analysis, GeneratedImage, Poem};
use crate::events::SurfaceEvent;

/// The three operations a surface can trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Fetch a new poem
    LoadPoem,
    /// Analyze the current poem
    Analyze,
    /// Illustrate the current poem
    Visualize,
}

impl Operation {
    /// State held while this operation is in flight
    #[must_use]
    pub fn busy_state(self) -> AppState {
        match self {
            Self::LoadPoem => AppState::LoadingPoem,
            Self::Analyze => AppState::Analyzing,
            Self::Visualize => AppState::GeneratingImage,
        }
    }
}

/// Result of a finished provider call
enum Outcome {
    Poem(Result<Poem, ProviderError>),
    Analysis(Result<Analysis, ProviderError>),
    Image(Result<GeneratedImage, ProviderError>),
}

impl Outcome {
    /// Outcome for a provider task that died before returning
    fn aborted(operation: Operation, error: &JoinError) -> Self {
        let reason = format!("provider task failed: {error}");
        match operation {
            Operation::LoadPoem => Self::Poem(Err(ProviderError::Fetch(reason))),
            Operation::Analyze => Self::Analysis(Err(ProviderError::Provider(reason))),
            Operation::Visualize => Self::Image(Err(ProviderError::Provider(reason))),
        }
    }
}

/// The in-flight provider call
struct PendingOperation {
    operation: Operation,
    handle: JoinHandle<Outcome>,
    started: Instant,
}

/// Conductor wired to the real HTTP backends
pub type DefaultConductor = Conductor<PoetryDbSource, GeminiBackend, GeminiBackend>;

/// The Conductor - headless view-state controller
pub struct Conductor<S, A, I> {
    /// Poem lookup
    source: Arc<S>,
    /// Analysis provider
    analyzer: Arc<A>,
    /// Image provider
    illustrator: Arc<I>,
    /// Current operational state
    state: AppState,
    /// Current poem
    poem: Option<Poem>,
    /// Analysis of the current poem
    analysis: Option<Analysis>,
    /// Illustration of the current poem
    image: Option<GeneratedImage>,
    /// Error detail, only while state is Error
    error: Option<String>,
    /// The single in-flight operation
    pending: Option<PendingOperation>,
    /// Whether the startup load has been issued
    started: bool,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<ConductorMessage>,
}

impl DefaultConductor {
    /// Create a Conductor talking to PoetryDB and Gemini
    #[must_use]
    pub fn from_config(config: &ConductorConfig, tx: mpsc::Sender<ConductorMessage>) -> Self {
        let gemini = GeminiBackend::from_config(config);
        Self::new(
            PoetryDbSource::from_config(config),
            gemini.clone(),
            gemini,
            tx,
        )
    }
}

impl<S, A, I> Conductor<S, A, I>
where
    S: PoemSource + 'static,
    A: AnalysisProvider + 'static,
    I: ImageProvider + 'static,
{
    /// Create a new Conductor with the given providers
    pub fn new(source: S, analyzer: A, illustrator: I, tx: mpsc::Sender<ConductorMessage>) -> Self {
        Self {
            source: Arc::new(source),
            analyzer: Arc::new(analyzer),
            illustrator: Arc::new(illustrator),
            state: AppState::Idle,
            poem: None,
            analysis: None,
            image: None,
            error: None,
            pending: None,
            started: false,
            tx,
        }
    }

    /// Get current state
    pub fn state(&self) -> AppState {
        self.state
    }

    /// True while an operation is in flight
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Current poem
    pub fn poem(&self) -> Option<&Poem> {
        self.poem.as_ref()
    }

    /// Analysis of the current poem
    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// Illustration of the current poem
    pub fn image(&self) -> Option<&GeneratedImage> {
        self.image.as_ref()
    }

    /// Error detail (only while in [`AppState::Error`])
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The operation currently in flight
    pub fn pending_operation(&self) -> Option<Operation> {
        self.pending.as_ref().map(|p| p.operation)
    }

    /// Capture everything a surface renders
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            state: self.state,
            poem: self.poem.clone(),
            analysis: self.analysis.clone(),
            image: self.image.clone(),
            error: self.error.clone(),
            busy: self.is_busy(),
        }
    }

    /// Start the Conductor: issue the initial poem load
    ///
    /// Runs once. Later calls are ignored.
    pub async fn start(&mut self) {
        if self.started {
            tracing::debug!("Conductor already started");
            return;
        }
        self.started = true;

        if self.pending.is_some() {
            tracing::debug!("Load already in flight at startup");
            return;
        }
        self.begin_load().await;
    }

    /// Handle an event from the UI surface
    ///
    /// Returns whether an operation was started.
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> bool {
        tracing::debug!(event = event.label(), state = ?self.state, "Surface event");
        match event {
            SurfaceEvent::ReloadRequested => self.load_random_poem().await,
            SurfaceEvent::AnalyzeRequested => self.analyze().await,
            SurfaceEvent::VisualizeRequested => self.visualize().await,
            SurfaceEvent::QuitRequested => {
                self.shutdown().await;
                false
            }
        }
    }

    /// Fetch a new poem, replacing the current one on success
    ///
    /// No-op (returns `false`) while another operation is in flight.
    pub async fn load_random_poem(&mut self) -> bool {
        if self.is_busy() {
            tracing::debug!(state = ?self.state, "Reload ignored while busy");
            return false;
        }
        self.begin_load().await;
        true
    }

    /// Request an analysis of the current poem
    ///
    /// No-op (returns `false`) unless Idle with a poem and no analysis yet.
    pub async fn analyze(&mut self) -> bool {
        if self.state != AppState::Idle || self.analysis.is_some() {
            tracing::debug!(state = ?self.state, "Analyze ignored");
            return false;
        }
        let Some(poem) = self.poem.clone() else {
            tracing::debug!("Analyze ignored without a poem");
            return false;
        };

        self.set_state(AppState::Analyzing).await;
        let analyzer = Arc::clone(&self.analyzer);
        self.spawn(Operation::Analyze, async move {
            Outcome::Analysis(analyzer.analyze(&poem).await)
        });
        true
    }

    /// Request an illustration of the current poem
    ///
    /// No-op (returns `false`) unless Idle with a poem and no image yet.
    pub async fn visualize(&mut self) -> bool {
        if self.state != AppState::Idle || self.image.is_some() {
            tracing::debug!(state = ?self.state, "Visualize ignored");
            return false;
        }
        let Some(poem) = self.poem.clone() else {
            tracing::debug!("Visualize ignored without a poem");
            return false;
        };

        self.set_state(AppState::GeneratingImage).await;
        let illustrator = Arc::clone(&self.illustrator);
        self.spawn(Operation::Visualize, async move {
            Outcome::Image(illustrator.generate_image(&poem).await)
        });
        true
    }

    /// Finish the pending operation if it has resolved
    ///
    /// Call this regularly. Returns true if an operation completed.
    pub async fn poll_pending(&mut self) -> bool {
        let joined = match self.pending.as_mut() {
            Some(pending) => match (&mut pending.handle).now_or_never() {
                Some(joined) => joined,
                None => return false,
            },
            None => return false,
        };

        if let Some(pending) = self.pending.take() {
            self.finish(pending.operation, pending.started, joined).await;
        }
        true
    }

    /// Wait for the pending operation to finish
    ///
    /// Returns false if nothing was in flight.
    pub async fn wait_pending(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let joined = pending.handle.await;
        self.finish(pending.operation, pending.started, joined).await;
        true
    }

    /// Tell the surface to quit
    ///
    /// An in-flight request is left to finish on its own.
    pub async fn shutdown(&mut self) {
        if let Some(pending) = &self.pending {
            tracing::debug!(operation = ?pending.operation, "Shutting down with request in flight");
        }
        self.send(ConductorMessage::Quit).await;
    }

    /// Clear enrichments and start fetching a poem
    async fn begin_load(&mut self) {
        self.analysis = None;
        self.image = None;
        self.error = None;
        self.send(ConductorMessage::EnrichmentsCleared).await;
        self.set_state(AppState::LoadingPoem).await;

        let source = Arc::clone(&self.source);
        tracing::debug!(source = source.name(), "Loading random poem");
        self.spawn(Operation::LoadPoem, async move {
            Outcome::Poem(source.fetch_random_poem().await)
        });
    }

    fn spawn<F>(&mut self, operation: Operation, fut: F)
    where
        F: std::future::Future<Output = Outcome> + Send + 'static,
    {
        debug_assert!(self.pending.is_none(), "one operation at a time");
        self.pending = Some(PendingOperation {
            operation,
            handle: tokio::spawn(fut),
            started: Instant::now(),
        });
    }

    /// Apply the result of a finished provider call
    async fn finish(
        &mut self,
        operation: Operation,
        started: Instant,
        joined: Result<Outcome, JoinError>,
    ) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let outcome = joined.unwrap_or_else(|e| {
            tracing::error!(operation = ?operation, error = %e, "Provider task failed");
            Outcome::aborted(operation, &e)
        });

        match outcome {
            Outcome::Poem(Ok(poem)) => {
                tracing::info!(title = %poem.title, author = %poem.author, elapsed_ms, "Poem loaded");
                self.poem = Some(poem.clone());
                self.send(ConductorMessage::PoemLoaded { poem }).await;
                self.set_state(AppState::Idle).await;
            }
            Outcome::Poem(Err(e)) => {
                // The previously displayed poem stays
                tracing::warn!(kind = %e.kind(), error = %e, elapsed_ms, "Poem load failed");
                self.error = Some(POEM_LOAD_FAILED_MESSAGE.to_string());
                self.send(ConductorMessage::Error {
                    message: POEM_LOAD_FAILED_MESSAGE.to_string(),
                })
                .await;
                self.set_state(AppState::Error).await;
            }
            Outcome::Analysis(Ok(analysis)) => {
                tracing::info!(mood = %analysis.mood, elapsed_ms, "Analysis ready");
                self.analysis = Some(analysis.clone());
                self.send(ConductorMessage::AnalysisReady { analysis }).await;
                self.set_state(AppState::Idle).await;
            }
            Outcome::Analysis(Err(e)) => {
                tracing::warn!(kind = %e.kind(), error = %e, elapsed_ms, "Analysis failed");
                self.notify(NotifyLevel::Warning, &format!("Analysis unavailable: {e}"))
                    .await;
                self.set_state(AppState::Idle).await;
            }
            Outcome::Image(Ok(image)) => {
                tracing::info!(bytes = image.byte_len(), elapsed_ms, "Illustration ready");
                self.image = Some(image.clone());
                self.send(ConductorMessage::ImageReady { image }).await;
                self.set_state(AppState::Idle).await;
            }
            Outcome::Image(Err(e)) => {
                tracing::warn!(kind = %e.kind(), error = %e, elapsed_ms, "Image generation failed");
                self.notify(NotifyLevel::Warning, &format!("Illustration unavailable: {e}"))
                    .await;
                self.set_state(AppState::Idle).await;
            }
        }
    }

    /// Set state and notify surface
    async fn set_state(&mut self, state: AppState) {
        tracing::debug!(from = ?self.state, to = ?state, "State transition");
        self.state = state;
        self.send(ConductorMessage::State { state }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ConductorMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ConductorMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}
