//! Integration Tests for TUI + Conductor
//!
//! These tests verify the full flow between the TUI's display state and the
//! embedded Conductor, using scripted providers instead of PoetryDB and
//! Gemini.
//!
//! # Test Coverage
//!
//! 1. **Startup Flow**: Conductor starts, the first poem reaches the display
//! 2. **Enrichments**: analysis and illustration arrive in the sidebar state
//! 3. **Failures**: poem errors block, AI errors only raise a notice

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use poetry_conductor::{
    Analysis, AnalysisProvider, AppState, Conductor, GeneratedImage, ImageProvider, NotifyLevel,
    Poem, PoemSource, ProviderError, POEM_LOAD_FAILED_MESSAGE,
};
use poetry_tui::{ConductorClient, DisplayState};

/// A 1x1 PNG
const PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

// ============================================================================
// Scripted providers
// ============================================================================

struct Source {
    calls: Arc<AtomicUsize>,
    fail_after: usize,
}

#[async_trait]
impl PoemSource for Source {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn fetch_random_poem(&self) -> Result<Poem, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n >= self.fail_after {
            return Err(ProviderError::Fetch("connection reset".into()));
        }
        Ok(Poem::new(
            format!("Poem {}", n + 1),
            "Anonymous",
            vec!["first line".into(), String::new(), "second stanza".into()],
        ))
    }
}

struct Ai {
    working: bool,
}

#[async_trait]
impl AnalysisProvider for Ai {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn analyze(&self, poem: &Poem) -> Result<Analysis, ProviderError> {
        if !self.working {
            return Err(ProviderError::Credential);
        }
        Ok(Analysis {
            mood: "wistful".into(),
            summary: format!("A short piece called {}.", poem.title),
            themes: vec!["memory".into(), "time".into()],
        })
    }
}

#[async_trait]
impl ImageProvider for Ai {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn generate_image(&self, _poem: &Poem) -> Result<GeneratedImage, ProviderError> {
        if !self.working {
            return Err(ProviderError::Credential);
        }
        Ok(GeneratedImage::png(PIXEL_PNG))
    }
}

type Client = ConductorClient<Source, Ai, Ai>;

fn client(fail_after: usize, ai_working: bool) -> (Client, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel(100);
    let conductor = Conductor::new(
        Source {
            calls: Arc::clone(&calls),
            fail_after,
        },
        Ai {
            working: ai_working,
        },
        Ai {
            working: ai_working,
        },
        tx,
    );
    (ConductorClient::from_parts(conductor, rx, ai_working), calls)
}

/// Run frames until the in-flight request lands, then apply messages
async fn settle(client: &mut Client, display: &mut DisplayState) {
    for _ in 0..1_000 {
        if client.poll_pending().await {
            break;
        }
        tokio::task::yield_now().await;
    }
    for msg in client.recv_all() {
        display.apply_message(msg);
    }
}

// ============================================================================
// Startup Flow
// ============================================================================

#[tokio::test]
async fn test_startup_shows_loader_then_poem() {
    let (mut client, _) = client(usize::MAX, true);
    let mut display = DisplayState::new();

    client.start().await;
    for msg in client.recv_all() {
        display.apply_message(msg);
    }
    assert_eq!(display.state, AppState::LoadingPoem);
    assert!(!display.can_reload());

    settle(&mut client, &mut display).await;
    assert_eq!(display.state, AppState::Idle);
    assert_eq!(display.poem.as_ref().unwrap().title, "Poem 1");
    assert_eq!(display.poem_generation, 1);
    assert!(display.sidebar_is_empty());
    assert_eq!(client.snapshot().poem, display.poem);
}

// ============================================================================
// Enrichments
// ============================================================================

#[tokio::test]
async fn test_analysis_and_illustration_reach_display() {
    let (mut client, _) = client(usize::MAX, true);
    let mut display = DisplayState::new();
    client.start().await;
    settle(&mut client, &mut display).await;

    assert!(client.analyze().await);
    settle(&mut client, &mut display).await;
    let analysis = display.analysis.as_ref().unwrap();
    assert_eq!(analysis.mood, "wistful");
    assert_eq!(analysis.summary, "A short piece called Poem 1.");
    assert!(!display.can_analyze());

    assert!(client.visualize().await);
    settle(&mut client, &mut display).await;
    assert!(display.image.is_some());
    let illustration = display.illustration.as_ref().expect("decoded illustration");
    assert_eq!(illustration.dimensions(), (1, 1));
    assert!(!display.can_visualize());
    assert!(display.notice.is_none());
}

#[tokio::test]
async fn test_reload_resets_sidebar() {
    let (mut client, calls) = client(usize::MAX, true);
    let mut display = DisplayState::new();
    client.start().await;
    settle(&mut client, &mut display).await;
    client.analyze().await;
    settle(&mut client, &mut display).await;
    assert!(!display.sidebar_is_empty());

    assert!(client.reload().await);
    settle(&mut client, &mut display).await;

    assert_eq!(display.poem.as_ref().unwrap().title, "Poem 2");
    assert!(display.analysis.is_none());
    assert!(display.sidebar_is_empty());
    assert_eq!(display.poem_generation, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_failed_reload_keeps_poem_on_screen() {
    let (mut client, _) = client(1, true);
    let mut display = DisplayState::new();
    client.start().await;
    settle(&mut client, &mut display).await;

    client.reload().await;
    settle(&mut client, &mut display).await;

    assert_eq!(display.state, AppState::Error);
    assert_eq!(display.error.as_deref(), Some(POEM_LOAD_FAILED_MESSAGE));
    assert_eq!(display.poem.as_ref().unwrap().title, "Poem 1");
    assert!(display.can_reload());
    assert!(!display.can_analyze());
}

#[tokio::test]
async fn test_ai_failure_is_a_notice_not_an_error() {
    let (mut client, _) = client(usize::MAX, false);
    let mut display = DisplayState::new();
    client.start().await;
    settle(&mut client, &mut display).await;
    assert!(!client.has_credential());

    client.analyze().await;
    settle(&mut client, &mut display).await;

    assert_eq!(display.state, AppState::Idle);
    assert!(display.error.is_none());
    assert!(display.analysis.is_none());
    let notice = display.notice.as_ref().expect("warning notice");
    assert_eq!(notice.level, NotifyLevel::Warning);
    assert!(notice.message.contains("API key missing"));

    // Still allowed to try again
    assert!(display.can_analyze());
}

#[tokio::test]
async fn test_quit_reaches_display() {
    let (mut client, _) = client(usize::MAX, true);
    let mut display = DisplayState::new();

    client.request_quit().await;
    for msg in client.recv_all() {
        display.apply_message(msg);
    }
    assert!(display.quit_requested);
}
