//! Widgets

pub mod illustration;
pub mod text_block;

pub use illustration::{Illustration, IllustrationError};
pub use text_block::{TextBlock, TextBlockState, TextLine};
