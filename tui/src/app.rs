//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - ConductorClient for orchestration
//! - DisplayState for rendering
//!
//! # Screen
//!
//! ```text
//! ┌ header ─────────────────────────────────────────────┐
//! │ poem pane                      │ AI Insight         │
//! │   title / author / stanzas     │ Visualization      │
//! ├ status: state · triggers · notice ──────────────────┤
//! ```
//!
//! The sidebar is hidden on narrow terminals.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::StatefulWidget;
use ratatui::Terminal;

use poetry_conductor::{Analysis, AppState, ConductorMessage, NotifyLevel};

use crate::compositor::{Compositor, LayerId};
use crate::conductor_client::ConductorClient;
use crate::display::DisplayState;
use crate::theme::{
    self, AUTHOR_GRAY, DIM_GRAY, ERROR_RED, INFO_BLUE, INK, MOOD_ROSE, THEME_TEAL, TITLE_GOLD,
    WARNING_AMBER,
};
use crate::widgets::{TextBlock, TextBlockState, TextLine};

/// Terminals narrower than this get no sidebar
const MIN_WIDTH_FOR_SIDEBAR: u16 = 60;

/// Braille spinner frames
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Screen regions for a terminal size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Regions {
    pub header: Rect,
    pub poem: Rect,
    pub sidebar: Option<Rect>,
    pub status: Rect,
}

impl Regions {
    pub(crate) fn for_area(area: Rect) -> Self {
        let body_height = area.height.saturating_sub(2);
        let header = Rect::new(0, 0, area.width, area.height.min(1));
        let status = Rect::new(0, area.height.saturating_sub(1), area.width, area.height.min(1));

        if area.width < MIN_WIDTH_FOR_SIDEBAR {
            return Self {
                header,
                poem: Rect::new(0, 1, area.width, body_height),
                sidebar: None,
                status,
            };
        }

        let sidebar_width = (area.width * 2 / 5).clamp(28, 60);
        let poem_width = area.width - sidebar_width;
        Self {
            header,
            poem: Rect::new(0, 1, poem_width, body_height),
            sidebar: Some(Rect::new(poem_width, 1, sidebar_width, body_height)),
            status,
        }
    }
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Conductor Integration ===
    /// Client for communicating with the embedded Conductor
    conductor: ConductorClient,
    /// Display state derived from ConductorMessages
    display: DisplayState,

    // === UI Components ===
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,

    // === View State ===
    /// Poem pane scroll
    poem_scroll: TextBlockState,
    /// Poem generation the scroll position belongs to
    scrolled_generation: u64,
    /// Spinner frame
    spinner_frame: usize,

    /// Last frame time
    last_frame: Instant,
}

/// Layer IDs for UI regions
struct AppLayers {
    header: LayerId,
    poem: LayerId,
    sidebar: LayerId,
    status: LayerId,
}

impl App {
    /// Create a new App instance
    pub fn new() -> anyhow::Result<Self> {
        let size = crossterm::terminal::size()?;
        let area = Rect::new(0, 0, size.0, size.1);
        let regions = Regions::for_area(area);

        let mut compositor = Compositor::new(area);
        let layers = AppLayers {
            header: compositor.create_layer(regions.header, 10),
            poem: compositor.create_layer(regions.poem, 0),
            sidebar: compositor.create_layer(regions.sidebar.unwrap_or_default(), 5),
            status: compositor.create_layer(regions.status, 10),
        };
        compositor.set_visible(layers.sidebar, regions.sidebar.is_some());

        let conductor = ConductorClient::new()?;

        Ok(Self {
            running: true,
            conductor,
            display: DisplayState::new(),
            compositor,
            layers,
            poem_scroll: TextBlockState::default(),
            scrolled_generation: 0,
            spinner_frame: 0,
            last_frame: Instant::now(),
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ~10 FPS is plenty for a spinner
        let frame_duration = Duration::from_millis(100);

        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        // Initial poem load; returns as soon as the request is spawned
        self.conductor.start().await;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Terminal events first
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            // Only handle Press events (not Release or Repeat)
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key).await;
                            }
                            Event::Resize(w, h) => self.handle_resize(w, h),
                            _ => {}
                        }
                    }
                }

                // Frame tick
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            // Pick up a finished request
            self.conductor.poll_pending().await;

            self.process_conductor_messages();
            self.update();
            self.render(terminal)?;

            if self.display.quit_requested {
                self.running = false;
            }

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Process all pending messages from the Conductor
    fn process_conductor_messages(&mut self) {
        for msg in self.conductor.recv_all() {
            if let ConductorMessage::Notify { level, message } = &msg {
                tracing::debug!(?level, %message, "Surface notice");
            }
            self.display.apply_message(msg);
        }

        // New poem starts at the top
        if self.display.poem_generation != self.scrolled_generation {
            self.scrolled_generation = self.display.poem_generation;
            self.poem_scroll.scroll_to_top();
        }
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, key: event::KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit().await;
            }
            KeyCode::Esc | KeyCode::Char('q') => self.quit().await,

            // Triggers; disabled ones are dropped here
            KeyCode::Char('r') => {
                if self.display.can_reload() {
                    self.conductor.reload().await;
                }
            }
            KeyCode::Char('a') => {
                if self.display.can_analyze() {
                    self.conductor.analyze().await;
                }
            }
            KeyCode::Char('v') => {
                if self.display.can_visualize() {
                    self.conductor.visualize().await;
                }
            }

            // Poem scrolling
            KeyCode::Up | KeyCode::Char('k') => self.poem_scroll.scroll(-1),
            KeyCode::Down | KeyCode::Char('j') => self.poem_scroll.scroll(1),
            KeyCode::PageUp => self.poem_scroll.page(false),
            KeyCode::PageDown | KeyCode::Char(' ') => self.poem_scroll.page(true),
            KeyCode::Home => self.poem_scroll.scroll_to_top(),
            KeyCode::End => self.poem_scroll.scroll_to_bottom(),

            _ => {}
        }
    }

    async fn quit(&mut self) {
        self.conductor.request_quit().await;
        self.running = false;
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);
        let regions = Regions::for_area(area);

        self.compositor.resize(area);
        self.compositor.set_bounds(self.layers.header, regions.header);
        self.compositor.set_bounds(self.layers.poem, regions.poem);
        self.compositor.set_bounds(self.layers.status, regions.status);
        self.compositor
            .set_bounds(self.layers.sidebar, regions.sidebar.unwrap_or_default());
        self.compositor
            .set_visible(self.layers.sidebar, regions.sidebar.is_some());
    }

    /// Advance timers
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.display.update(delta);

        if self.display.is_busy() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        self.render_header();
        self.render_poem();
        self.render_sidebar();
        self.render_status();

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    let idx = output.index_of(x, y);
                    if idx < output.content.len() {
                        buf[(x, y)] = output.content[idx].clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Render header layer
    fn render_header(&mut self) {
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.header) {
            buf.reset();
            let area = buf.area;

            buf.set_string(
                area.x + 1,
                area.y,
                "Poetry For You",
                Style::default().fg(TITLE_GOLD).add_modifier(Modifier::BOLD),
            );

            let hints = "r new  a analyze  v visualize  ↑↓ PgUp PgDn scroll  q quit ";
            let width = hints.chars().count() as u16;
            if area.width > width + 18 {
                buf.set_string(
                    area.x + area.width - width,
                    area.y,
                    hints,
                    Style::default().fg(DIM_GRAY),
                );
            }
        }
    }

    /// Render poem layer
    fn render_poem(&mut self) {
        let lines = poem_lines(&self.display, spinner(self.spinner_frame));

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.poem) {
            buf.reset();
            let area = buf.area;
            if area.width < 8 || area.height < 3 {
                return;
            }

            let text_area = Rect::new(
                area.x + 2,
                area.y + 1,
                area.width - 4,
                area.height - 2,
            );
            TextBlock::new(&lines).render(text_area, buf, &mut self.poem_scroll);

            let below = self.poem_scroll.remaining_below();
            if below > 0 {
                let more = format!("↓ {below} more");
                buf.set_string(
                    area.x + area.width.saturating_sub(more.chars().count() as u16 + 2),
                    area.y + area.height - 1,
                    &more,
                    Style::default().fg(DIM_GRAY),
                );
            }
        }
    }

    /// Render sidebar layer
    fn render_sidebar(&mut self) {
        let spin = spinner(self.spinner_frame);
        let has_credential = self.conductor.has_credential();
        let display = &mut self.display;

        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.sidebar) else {
            return;
        };
        buf.reset();
        let area = buf.area;
        if area.width < 10 || area.height < 3 {
            return;
        }

        for y in area.y..area.y + area.height {
            buf.set_string(area.x, y, "│", Style::default().fg(DIM_GRAY));
        }
        let inner = Rect::new(area.x + 2, area.y + 1, area.width - 3, area.height - 1);

        if display.sidebar_is_empty() {
            draw_lines(buf, inner, &empty_sidebar_lines(has_credential));
            return;
        }

        let mut y = inner.y;
        let insight = insight_lines(display.analysis.as_ref(), display.state, spin);
        if !insight.is_empty() {
            let used = draw_lines(buf, inner, &insight);
            y += used + 1;
        }

        let showing_image = display.image.is_some() || display.state == AppState::GeneratingImage;
        if showing_image && y + 2 < inner.y + inner.height {
            buf.set_string(inner.x, y, "Visualization", theme::heading());
            y += 2;
            let rest = Rect::new(inner.x, y, inner.width, inner.y + inner.height - y);

            match (&mut display.illustration, display.state) {
                (Some(illustration), _) => illustration.render(rest, buf),
                (None, AppState::GeneratingImage) => {
                    draw_lines(
                        buf,
                        rest,
                        &[TextLine::new(
                            format!("{spin} Painting..."),
                            Style::default().fg(DIM_GRAY),
                        )],
                    );
                }
                (None, _) => {
                    draw_lines(
                        buf,
                        rest,
                        &[TextLine::new(
                            "(illustration could not be shown)",
                            Style::default().fg(DIM_GRAY),
                        )],
                    );
                }
            }
        }
    }

    /// Render status bar
    fn render_status(&mut self) {
        let segments = status_segments(&self.display, spinner(self.spinner_frame));

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) {
            buf.reset();
            let area = buf.area;

            let mut x = area.x;
            let right = area.x + area.width;
            for (text, style) in &segments {
                if x >= right {
                    break;
                }
                let (next_x, _) =
                    buf.set_stringn(x, area.y, text, (right - x) as usize, *style);
                x = next_x;
            }
        }
    }
}

fn spinner(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

/// Draw wrapped lines from the top of `area`; returns rows used
fn draw_lines(buf: &mut Buffer, area: Rect, lines: &[TextLine]) -> u16 {
    let mut rows = 0;
    for (text, style) in TextBlock::new(lines).wrapped(area.width as usize) {
        if rows >= area.height {
            break;
        }
        buf.set_stringn(area.x, area.y + rows, &text, area.width as usize, style);
        rows += 1;
    }
    rows
}

/// Poem pane content for the current display state
pub(crate) fn poem_lines(display: &DisplayState, spin: &str) -> Vec<TextLine> {
    let mut lines = Vec::new();

    if display.state == AppState::LoadingPoem {
        lines.push(TextLine::new(
            format!("{spin} {}", AppState::LoadingPoem.description()),
            Style::default().fg(DIM_GRAY),
        ));
        return lines;
    }

    if let Some(error) = &display.error {
        lines.push(TextLine::new(
            error.clone(),
            Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
        ));
        lines.push(TextLine::new(
            "Press r to try again.",
            Style::default().fg(DIM_GRAY),
        ));
        lines.push(TextLine::blank());
    }

    match &display.poem {
        Some(poem) => {
            lines.push(TextLine::new(
                poem.title.clone(),
                Style::default().fg(TITLE_GOLD).add_modifier(Modifier::BOLD),
            ));
            lines.push(TextLine::new(
                format!("— {}", poem.author),
                Style::default()
                    .fg(AUTHOR_GRAY)
                    .add_modifier(Modifier::ITALIC),
            ));
            lines.push(TextLine::blank());
            let body = Style::default().fg(INK);
            lines.extend(poem.lines.iter().map(|l| TextLine::new(l.trim_end(), body)));
        }
        None if display.error.is_none() => {
            lines.push(TextLine::new("No poem yet.", Style::default().fg(DIM_GRAY)));
        }
        None => {}
    }

    lines
}

/// "AI Insight" panel content; empty when there is nothing to show
pub(crate) fn insight_lines(
    analysis: Option<&Analysis>,
    state: AppState,
    spin: &str,
) -> Vec<TextLine> {
    let heading = TextLine::new("AI Insight", theme::heading());

    match analysis {
        Some(analysis) => {
            let mut lines = vec![
                heading,
                TextLine::blank(),
                TextLine::new(
                    format!("Mood: {}", analysis.mood),
                    Style::default().fg(MOOD_ROSE),
                ),
            ];
            if !analysis.themes.is_empty() {
                lines.push(TextLine::new(
                    format!("Themes: {}", analysis.themes.join(" · ")),
                    Style::default().fg(THEME_TEAL),
                ));
            }
            lines.push(TextLine::blank());
            lines.push(TextLine::new(analysis.summary.clone(), Style::default().fg(INK)));
            lines
        }
        None if state == AppState::Analyzing => vec![
            heading,
            TextLine::blank(),
            TextLine::new(
                format!("{spin} Reading between the lines..."),
                Style::default().fg(DIM_GRAY),
            ),
        ],
        None => Vec::new(),
    }
}

fn empty_sidebar_lines(has_credential: bool) -> Vec<TextLine> {
    let dim = Style::default().fg(DIM_GRAY);
    let mut lines = vec![
        TextLine::new("Press a for an AI insight into this poem,", dim),
        TextLine::new("or v to see it illustrated.", dim),
    ];
    if !has_credential {
        lines.push(TextLine::blank());
        lines.push(TextLine::new(
            "Set API_KEY to enable AI features.",
            Style::default().fg(WARNING_AMBER),
        ));
    }
    lines
}

/// Status bar segments, left to right
pub(crate) fn status_segments(display: &DisplayState, spin: &str) -> Vec<(String, Style)> {
    let state_style = match display.state {
        AppState::Error => Style::default().fg(ERROR_RED),
        AppState::Idle => Style::default().fg(DIM_GRAY),
        _ => Style::default().fg(theme::ACCENT_INDIGO),
    };
    let indicator = if display.is_busy() { spin } else { "●" };

    let mut segments = vec![
        (
            format!(" {indicator} {} ", display.state.description()),
            state_style,
        ),
        ("│ ".to_string(), Style::default().fg(DIM_GRAY)),
        ("[r] New poem  ".to_string(), theme::trigger(display.can_reload())),
        ("[a] Analyze  ".to_string(), theme::trigger(display.can_analyze())),
        ("[v] Visualize  ".to_string(), theme::trigger(display.can_visualize())),
        ("[q] Quit ".to_string(), theme::trigger(true)),
    ];

    if let Some(notice) = &display.notice {
        let (icon, color) = match notice.level {
            NotifyLevel::Warning => ("⚠", WARNING_AMBER),
            NotifyLevel::Info => ("ℹ", INFO_BLUE),
        };
        segments.push(("│ ".to_string(), Style::default().fg(DIM_GRAY)));
        segments.push((
            format!("{icon} {}", notice.message),
            Style::default().fg(color),
        ));
    }

    segments
}
