//! Illustration Widget
//!
//! Draws a PNG in the terminal using upper half blocks: each cell shows two
//! vertically stacked pixels, the top one as foreground and the bottom one
//! as background.

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use thiserror::Error;

use poetry_conductor::{GeneratedImage, ProviderError};

const HALF_BLOCK: &str = "\u{2580}";

/// Why an illustration could not be prepared for display
#[derive(Debug, Error)]
pub enum IllustrationError {
    #[error("illustration payload is not valid base64: {0}")]
    Payload(#[from] ProviderError),

    #[error("illustration is not a readable PNG: {0}")]
    Decode(#[from] image::ImageError),

    #[error("illustration has no pixels")]
    Empty,
}

/// A decoded illustration plus the last scaled copy
pub struct Illustration {
    pixels: RgbImage,
    fitted: Option<(u32, u32, RgbImage)>,
}

impl std::fmt::Debug for Illustration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Illustration")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish_non_exhaustive()
    }
}

impl Illustration {
    /// Decode a generated image
    pub fn from_generated(image: &GeneratedImage) -> Result<Self, IllustrationError> {
        let bytes = image.decode()?;
        Self::from_png_bytes(&bytes)
    }

    /// Decode raw PNG bytes
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, IllustrationError> {
        let pixels = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgb8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(IllustrationError::Empty);
        }
        Ok(Self {
            pixels,
            fitted: None,
        })
    }

    /// Source size in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Largest cell size that fits `width` x `height` cells and keeps the
    /// aspect ratio (one cell is one pixel wide, two pixels tall)
    pub fn fit(&self, width: u16, height: u16) -> (u16, u16) {
        let (pw, ph) = self.dimensions();
        let max_w = u32::from(width);
        let max_h = u32::from(height) * 2;
        if max_w == 0 || max_h == 0 {
            return (0, 0);
        }

        let (w, h) = if pw * max_h > ph * max_w {
            (max_w, (ph * max_w / pw).max(1))
        } else {
            ((pw * max_h / ph).max(1), max_h)
        };
        (w as u16, h.div_ceil(2) as u16)
    }

    /// Scaled pixels for the given cell budget, reused while the size holds
    fn scaled(&mut self, width: u16, height: u16) -> Option<&RgbImage> {
        let (cols, rows) = self.fit(width, height);
        if cols == 0 || rows == 0 {
            return None;
        }
        let target = (u32::from(cols), u32::from(rows) * 2);

        let stale = self
            .fitted
            .as_ref()
            .map_or(true, |(w, h, _)| (*w, *h) != target);
        if stale {
            let resized = imageops::resize(&self.pixels, target.0, target.1, FilterType::Triangle);
            self.fitted = Some((target.0, target.1, resized));
        }
        self.fitted.as_ref().map(|(_, _, img)| img)
    }

    /// Render centred inside `area`
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let Some(img) = self.scaled(area.width, area.height) else {
            return;
        };
        let cols = img.width() as u16;
        let rows = img.height().div_ceil(2) as u16;
        let x0 = area.x + area.width.saturating_sub(cols) / 2;

        for cy in 0..rows.min(area.height) {
            for cx in 0..cols.min(area.width) {
                let top = rgb(img, u32::from(cx), u32::from(cy) * 2).unwrap_or(Color::Reset);
                let bottom = rgb(img, u32::from(cx), u32::from(cy) * 2 + 1).unwrap_or(Color::Reset);
                buf[(x0 + cx, area.y + cy)]
                    .set_symbol(HALF_BLOCK)
                    .set_fg(top)
                    .set_bg(bottom);
            }
        }
    }
}

fn rgb(img: &RgbImage, x: u32, y: u32) -> Option<Color> {
    (y < img.height()).then(|| {
        let [r, g, b] = img.get_pixel(x, y).0;
        Color::Rgb(r, g, b)
    })
}
