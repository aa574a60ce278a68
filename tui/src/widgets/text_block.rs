//! TextBlock Widget
//!
//! A borderless, scrollable region of styled lines. Long lines wrap to the
//! area width; empty lines are kept so stanza breaks survive.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// One logical line with its style
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub style: Style,
}

impl TextLine {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn blank() -> Self {
        Self::new(String::new(), Style::default())
    }
}

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total wrapped lines at the last render
    pub total_lines: usize,
    /// Visible height at the last render
    pub viewport: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down); clamped on the next render
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }

    /// Scroll by a page
    pub fn page(&mut self, down: bool) {
        let page = self.viewport.saturating_sub(1).max(1) as isize;
        self.scroll(if down { page } else { -page });
    }

    /// Back to the first line
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scroll to bottom
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.total_lines.saturating_sub(self.viewport);
    }

    /// Lines hidden below the viewport
    pub fn remaining_below(&self) -> usize {
        self.total_lines
            .saturating_sub(self.scroll_offset + self.viewport)
    }
}

/// A borderless, scrollable block of styled lines
pub struct TextBlock<'a> {
    lines: &'a [TextLine],
}

impl<'a> TextBlock<'a> {
    pub fn new(lines: &'a [TextLine]) -> Self {
        Self { lines }
    }

    /// Wrap every line to `width` columns
    pub fn wrapped(&self, width: usize) -> Vec<(String, Style)> {
        self.lines
            .iter()
            .flat_map(|line| {
                if line.text.is_empty() || width == 0 {
                    vec![(line.text.clone(), line.style)]
                } else {
                    wrap(&line.text, width)
                        .into_iter()
                        .map(|cow| (cow.into_owned(), line.style))
                        .collect()
                }
            })
            .collect()
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let wrapped = self.wrapped(area.width as usize);

        state.total_lines = wrapped.len();
        state.viewport = area.height as usize;

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(state.viewport);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        for (i, (line, style)) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(state.viewport)
            .enumerate()
        {
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, line, area.width as usize, *style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_wraps_and_keeps_blank_lines() {
        let lines = vec![
            TextLine::new("the fog comes on little cat feet", Style::default()),
            TextLine::blank(),
            TextLine::new("it sits", Style::default()),
        ];
        let wrapped = TextBlock::new(&lines).wrapped(12);
        let texts: Vec<&str> = wrapped.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(
            texts,
            vec!["the fog", "comes on", "little cat", "feet", "", "it sits"]
        );
    }

    #[test]
    fn test_scroll_is_clamped() {
        let lines: Vec<TextLine> = (0..10)
            .map(|i| TextLine::new(format!("line {i}"), Style::default()))
            .collect();
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState {
            scroll_offset: 50,
            ..Default::default()
        };

        TextBlock::new(&lines).render(area, &mut buf, &mut state);

        assert_eq!(state.scroll_offset, 6);
        assert_eq!(state.remaining_below(), 0);
        assert_eq!(row(&buf, 0), "line 6");
        assert_eq!(row(&buf, 3), "line 9");
    }

    #[test]
    fn test_page_uses_last_viewport() {
        let mut state = TextBlockState {
            viewport: 5,
            total_lines: 20,
            ..Default::default()
        };
        state.page(true);
        assert_eq!(state.scroll_offset, 4);
        state.page(false);
        state.page(false);
        assert_eq!(state.scroll_offset, 0);
        state.scroll_to_bottom();
        assert_eq!(state.scroll_offset, 15);
    }
}
