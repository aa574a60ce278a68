//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ConductorMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Conductor tells it to.
//! Display state is the bridge between ConductorMessages and rendering. The
//! only thing it adds on its own is presentation: the decoded illustration
//! and a transient notice with a countdown.

use std::time::Duration;

use poetry_conductor::{
    Analysis, AppState, ConductorMessage, GeneratedImage, NotifyLevel, Poem,
};

use crate::widgets::Illustration;

/// How long a notice stays in the status bar
pub const NOTICE_DURATION: Duration = Duration::from_secs(6);

/// A notice shown in the status bar until it expires
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayNotice {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

/// Everything the TUI renders
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Conductor state
    pub state: AppState,
    /// Current poem
    pub poem: Option<Poem>,
    /// Analysis of the current poem
    pub analysis: Option<Analysis>,
    /// Illustration payload of the current poem
    pub image: Option<GeneratedImage>,
    /// Decoded illustration, ready to draw
    pub illustration: Option<Illustration>,
    /// Blocking error detail
    pub error: Option<String>,
    /// Transient notice
    pub notice: Option<DisplayNotice>,
    /// Set once the Conductor asked the surface to quit
    pub quit_requested: bool,
    /// Bumped whenever a new poem arrives
    pub poem_generation: u64,
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a ConductorMessage to update display state
    pub fn apply_message(&mut self, msg: ConductorMessage) {
        match msg {
            ConductorMessage::State { state } => {
                self.state = state;
            }
            ConductorMessage::PoemLoaded { poem } => {
                self.poem = Some(poem);
                self.poem_generation += 1;
            }
            ConductorMessage::EnrichmentsCleared => {
                self.analysis = None;
                self.image = None;
                self.illustration = None;
                self.error = None;
            }
            ConductorMessage::AnalysisReady { analysis } => {
                self.analysis = Some(analysis);
            }
            ConductorMessage::ImageReady { image } => {
                match Illustration::from_generated(&image) {
                    Ok(illustration) => self.illustration = Some(illustration),
                    Err(e) => {
                        tracing::warn!(error = %e, "Cannot display illustration");
                        self.illustration = None;
                        self.show_notice(
                            NotifyLevel::Warning,
                            "Illustration arrived but cannot be displayed".to_string(),
                        );
                    }
                }
                self.image = Some(image);
            }
            ConductorMessage::Error { message } => {
                self.error = Some(message);
            }
            ConductorMessage::Notify { level, message } => {
                self.show_notice(level, message);
            }
            ConductorMessage::Quit => {
                self.quit_requested = true;
            }
        }
    }

    /// Count down the notice
    pub fn update(&mut self, delta: Duration) {
        if let Some(notice) = &mut self.notice {
            notice.remaining = notice.remaining.saturating_sub(delta);
            if notice.remaining.is_zero() {
                self.notice = None;
            }
        }
    }

    fn show_notice(&mut self, level: NotifyLevel, message: String) {
        self.notice = Some(DisplayNotice {
            level,
            message,
            remaining: NOTICE_DURATION,
        });
    }

    /// Clear the notice
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// True while the Conductor has an operation in flight
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Whether the reload trigger is enabled
    pub fn can_reload(&self) -> bool {
        !self.is_busy()
    }

    /// Whether the analyze trigger is enabled
    pub fn can_analyze(&self) -> bool {
        self.state == AppState::Idle && self.poem.is_some() && self.analysis.is_none()
    }

    /// Whether the visualize trigger is enabled
    pub fn can_visualize(&self) -> bool {
        self.state == AppState::Idle && self.poem.is_some() && self.image.is_none()
    }

    /// Neither enrichment is present nor on its way
    pub fn sidebar_is_empty(&self) -> bool {
        self.analysis.is_none()
            && self.image.is_none()
            && !matches!(self.state, AppState::Analyzing | AppState::GeneratingImage)
    }
}
