//! Surface Events
//!
//! Events sent from UI surfaces to the Conductor. Surfaces report what the
//! user asked for; the Conductor decides whether it can happen right now.

use serde::{Deserialize, Serialize};

/// Events from UI Surface to Conductor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// User asked for a different poem
    ReloadRequested,
    /// User asked for an analysis of the current poem
    AnalyzeRequested,
    /// User asked for an illustration of the current poem
    VisualizeRequested,
    /// User wants to quit
    QuitRequested,
}

impl SurfaceEvent {
    /// Short label for logs
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ReloadRequested => "reload",
            Self::AnalyzeRequested => "analyze",
            Self::VisualizeRequested => "visualize",
            Self::QuitRequested => "quit",
        }
    }
}
