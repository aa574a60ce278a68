//! Conductor Messages
//!
//! Messages sent from the Conductor to UI surfaces, plus the single-valued
//! [`AppState`] they describe.
//!
//! # Design Philosophy
//!
//! The Conductor owns every piece of view state. Surfaces are renderers that
//! mirror what they are told: one message is pushed after every mutation, so a
//! surface that applies messages in order never sees an analysis or image
//! from a poem that has already been replaced.

use serde::{Deserialize, Serialize};

use crate::poem::{Analysis, GeneratedImage, Poem};

/// User-visible message for any failed poem load
pub const POEM_LOAD_FAILED_MESSAGE: &str = "Failed to fetch a new poem. Please try again.";

/// Messages from Conductor to UI Surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConductorMessage {
    // ============================================
    // State
    // ============================================
    /// Conductor state change
    State {
        /// The new state
        state: AppState,
    },

    // ============================================
    // Content
    // ============================================
    /// A new poem replaced the current one
    PoemLoaded {
        /// The poem to display
        poem: Poem,
    },

    /// Analysis, illustration and error detail were reset for a new load
    EnrichmentsCleared,

    /// Analysis for the current poem is available
    AnalysisReady {
        /// The analysis to display
        analysis: Analysis,
    },

    /// Illustration for the current poem is available
    ImageReady {
        /// The image to display
        image: GeneratedImage,
    },

    // ============================================
    // System Messages
    // ============================================
    /// Blocking error detail; present while the state is [`AppState::Error`]
    Error {
        /// Human-readable message
        message: String,
    },

    /// Non-blocking notification
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Request surface to quit
    Quit,
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
}

/// What the Conductor is doing; exactly one value at any time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Fetching a poem
    LoadingPoem,
    /// Waiting for an analysis
    Analyzing,
    /// Waiting for an illustration
    GeneratingImage,
    /// The last poem load failed
    Error,
}

impl AppState {
    /// True while an operation is in flight
    #[must_use]
    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle | Self::Error)
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::LoadingPoem => "Fetching a poem...",
            Self::Analyzing => "Thinking...",
            Self::GeneratingImage => "Painting...",
            Self::Error => "Error",
        }
    }
}

/// Everything a surface needs to render, captured at one instant
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    /// Current state
    pub state: AppState,
    /// Current poem, if any
    pub poem: Option<Poem>,
    /// Analysis of the current poem, if any
    pub analysis: Option<Analysis>,
    /// Illustration of the current poem, if any
    pub image: Option<GeneratedImage>,
    /// Error detail while in [`AppState::Error`]
    pub error: Option<String>,
    /// Derived busy flag
    pub busy: bool,
}

impl ViewSnapshot {
    /// Whether analyze would start right now
    #[must_use]
    pub fn can_analyze(&self) -> bool {
        self.state == AppState::Idle && self.poem.is_some() && self.analysis.is_none()
    }

    /// Whether visualize would start right now
    #[must_use]
    pub fn can_visualize(&self) -> bool {
        self.state == AppState::Idle && self.poem.is_some() && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_is_derived_from_state() {
        assert!(!AppState::Idle.is_busy());
        assert!(!AppState::Error.is_busy());
        assert!(AppState::LoadingPoem.is_busy());
        assert!(AppState::Analyzing.is_busy());
        assert!(AppState::GeneratingImage.is_busy());
    }

    #[test]
    fn test_state_description() {
        assert_eq!(AppState::Idle.description(), "Ready");
        assert_eq!(AppState::Analyzing.description(), "Thinking...");
        assert_eq!(AppState::GeneratingImage.description(), "Painting...");
    }

    #[test]
    fn test_snapshot_gates() {
        let mut snapshot = ViewSnapshot::default();
        assert!(!snapshot.can_analyze());

        snapshot.poem = Some(Poem::new("T", "A", vec!["x".into()]));
        assert!(snapshot.can_analyze());
        assert!(snapshot.can_visualize());

        snapshot.state = AppState::Error;
        assert!(!snapshot.can_analyze());
        assert!(!snapshot.can_visualize());
    }

    #[test]
    fn test_message_serde() {
        let msg = ConductorMessage::State {
            state: AppState::LoadingPoem,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ConductorMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
