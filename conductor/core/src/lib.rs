//! Poetry Conductor - Headless View State for Poetry For You
//!
//! This crate holds everything behind the Poetry For You screen, completely
//! independent of any UI framework: it fetches a random poem, optionally asks
//! a generative AI service for an analysis and an illustration, and tells a
//! surface what to render.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       UI Surface                          │
//! │               (ratatui TUI, tests, headless)              │
//! │                            │                              │
//! │            SurfaceEvent (up) / ConductorMessage (down)    │
//! └────────────────────────────┼──────────────────────────────┘
//!                              │
//! ┌────────────────────────────┼──────────────────────────────┐
//! │                       Conductor                           │
//! │   AppState · Poem · Analysis · GeneratedImage · error     │
//! │        ┌──────────────┬────┴─────────┬──────────────┐     │
//! │        │  PoemSource  │ AnalysisProv │ ImageProvider│     │
//! │        │  (PoetryDB)  │   (Gemini)   │   (Gemini)   │     │
//! │        └──────────────┴──────────────┴──────────────┘     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: the view-state controller
//! - [`AppState`]: the single-valued state it is in
//! - [`ConductorMessage`]: pushed to the surface after every mutation
//! - [`SurfaceEvent`]: user actions coming from the surface
//! - [`PoemSource`], [`AnalysisProvider`], [`ImageProvider`]: the leaf seams
//!
//! # Quick Start
//!
//! ```ignore
//! use poetry_conductor::{ConductorConfig, DefaultConductor, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let config = ConductorConfig::from_env();
//!     let mut conductor = DefaultConductor::from_config(&config, tx);
//!
//!     // Initial poem load
//!     conductor.start().await;
//!
//!     loop {
//!         // Pick up finished requests
//!         conductor.poll_pending().await;
//!
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render message to UI
//!         }
//!
//!         // Forward user input as SurfaceEvent
//!         conductor.handle_event(SurfaceEvent::AnalyzeRequested).await;
//!     }
//! }
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod conductor;
pub mod config;
pub mod error;
pub mod events;
pub mod messages;
pub mod poem;

// Re-exports for convenience
pub use backend::{
    AnalysisProvider, GeminiBackend, ImageProvider, PoemSource, PoetryDbSource,
};
pub use conductor::{Conductor, DefaultConductor, Operation};
pub use config::{ConductorConfig, API_KEY_ENV};
pub use error::{ConfigError, ProviderError, ProviderErrorKind};
pub use events::SurfaceEvent;
pub use messages::{
    AppState, ConductorMessage, NotifyLevel, ViewSnapshot, POEM_LOAD_FAILED_MESSAGE,
};
pub use poem::{Analysis, GeneratedImage, Poem, PNG_MEDIA_TYPE};
