//! Content Backends
//!
//! The three leaf components the Conductor sequences, each behind a trait so
//! the Conductor can be driven by real HTTP clients or by test doubles.
//!
//! # Available Backends
//!
//! - **PoetryDB**: random poem lookup ([`PoetryDbSource`])
//! - **Gemini**: structured analysis and image generation ([`GeminiBackend`])
//!
//! # Usage
//!
//! ```ignore
//! use poetry_conductor::backend::{PoetryDbSource, PoemSource};
//!
//! let source = PoetryDbSource::default();
//! let poem = source.fetch_random_poem().await?;
//! ```

mod gemini;
mod poetrydb;
pub mod prompts;
mod traits;

pub use gemini::GeminiBackend;
pub use poetrydb::PoetryDbSource;
pub use traits::{AnalysisProvider, ImageProvider, PoemSource};
