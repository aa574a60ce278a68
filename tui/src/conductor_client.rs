//! Conductor Client
//!
//! Thin wrapper around the Conductor for TUI integration.
//! This client embeds the Conductor directly (no network) and provides
//! a convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any business logic.
//! All orchestration happens in the Conductor. The TUI's job is:
//! 1. Convert key presses to SurfaceEvents
//! 2. Send SurfaceEvents to Conductor
//! 3. Receive ConductorMessages
//! 4. Render display state based on messages

use anyhow::Context;
use tokio::sync::mpsc;

use poetry_conductor::{
    AnalysisProvider, AppState, Conductor, ConductorConfig, ConductorMessage, DefaultConductor,
    GeminiBackend, ImageProvider, PoemSource, PoetryDbSource, SurfaceEvent, ViewSnapshot,
};

/// Channel depth between the Conductor and the surface
const CHANNEL_CAPACITY: usize = 100;

/// Client for communicating with the embedded Conductor
pub struct ConductorClient<S = PoetryDbSource, A = GeminiBackend, I = GeminiBackend> {
    /// The embedded Conductor instance
    conductor: Conductor<S, A, I>,
    /// Receiver for messages from Conductor
    rx: mpsc::Receiver<ConductorMessage>,
    /// Whether AI features can work at all
    has_credential: bool,
}

impl ConductorClient {
    /// Create a client from the environment
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(&ConductorConfig::from_env())
    }

    /// Create a client talking to PoetryDB and Gemini
    pub fn with_config(config: &ConductorConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid conductor configuration")?;
        if !config.has_credential() {
            tracing::info!("API_KEY not set; analysis and illustration are disabled");
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let conductor = DefaultConductor::from_config(config, tx);
        Ok(Self {
            conductor,
            rx,
            has_credential: config.has_credential(),
        })
    }
}

impl<S, A, I> ConductorClient<S, A, I>
where
    S: PoemSource + 'static,
    A: AnalysisProvider + 'static,
    I: ImageProvider + 'static,
{
    /// Embed an already built Conductor
    pub fn from_parts(
        conductor: Conductor<S, A, I>,
        rx: mpsc::Receiver<ConductorMessage>,
        has_credential: bool,
    ) -> Self {
        Self {
            conductor,
            rx,
            has_credential,
        }
    }

    /// Start the Conductor (initial poem load)
    pub async fn start(&mut self) {
        self.conductor.start().await;
    }

    /// Ask for a different poem
    pub async fn reload(&mut self) -> bool {
        self.send_event(SurfaceEvent::ReloadRequested).await
    }

    /// Ask for an analysis of the current poem
    pub async fn analyze(&mut self) -> bool {
        self.send_event(SurfaceEvent::AnalyzeRequested).await
    }

    /// Ask for an illustration of the current poem
    pub async fn visualize(&mut self) -> bool {
        self.send_event(SurfaceEvent::VisualizeRequested).await
    }

    /// Notify Conductor that user wants to quit
    pub async fn request_quit(&mut self) {
        self.send_event(SurfaceEvent::QuitRequested).await;
    }

    /// Send raw surface event to Conductor
    pub async fn send_event(&mut self, event: SurfaceEvent) -> bool {
        self.conductor.handle_event(event).await
    }

    /// Finish the in-flight request if it resolved (call once per frame)
    pub async fn poll_pending(&mut self) -> bool {
        self.conductor.poll_pending().await
    }

    /// Receive all pending messages from the Conductor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConductorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current Conductor state
    pub fn state(&self) -> AppState {
        self.conductor.state()
    }

    /// Everything the Conductor holds right now
    pub fn snapshot(&self) -> ViewSnapshot {
        self.conductor.snapshot()
    }

    /// Whether an API key is configured
    pub fn has_credential(&self) -> bool {
        self.has_credential
    }
}
