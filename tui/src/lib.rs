//! Poetry For You TUI - Terminal interface for the poetry conductor
//!
//! A full-screen terminal UI that shows a random poem and, on request, an AI
//! insight and an illustration of it.
//!
//! # Architecture
//!
//! - **Compositor**: Layered rendering of header, poem, sidebar and status
//! - **Widgets**: Scrollable text blocks and half-block illustrations
//! - **Display**: State mirrored from ConductorMessages
//! - **ConductorClient**: The embedded, headless Conductor

pub mod app;
pub mod compositor;
pub mod conductor_client;
pub mod display;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use conductor_client::ConductorClient;
pub use display::DisplayState;
