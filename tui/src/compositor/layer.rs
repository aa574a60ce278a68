//! Layer - A single compositable layer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// A single layer in the compositor
pub struct Layer {
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Position and size on screen
    pub bounds: Rect,
    /// Whether the layer is visible
    pub visible: bool,
    /// The layer's render buffer (origin coordinates)
    pub buffer: Buffer,
}

impl Layer {
    /// Create a new layer
    pub fn new(bounds: Rect, z_index: i32) -> Self {
        Self {
            z_index,
            bounds,
            visible: true,
            buffer: Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height)),
        }
    }

    /// Move and resize, discarding the buffer if the size changed
    pub fn set_bounds(&mut self, bounds: Rect) {
        if bounds.width != self.bounds.width || bounds.height != self.bounds.height {
            self.buffer = Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height));
        }
        self.bounds = bounds;
    }
}
