//! Backend Traits
//!
//! One trait per leaf component. Implementations make a single best-effort
//! attempt per call: no retry, no caching, no timeout.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::poem::{Analysis, GeneratedImage, Poem};

/// Fetches one random poem
#[async_trait]
pub trait PoemSource: Send + Sync {
    /// Backend name for logs (e.g., "PoetryDB")
    fn name(&self) -> &str;

    /// Fetch a random poem
    ///
    /// Fails with [`ProviderError::Fetch`] on transport errors or non-success
    /// status, and [`ProviderError::Format`] when the payload is not a poem.
    async fn fetch_random_poem(&self) -> Result<Poem, ProviderError>;
}

/// Produces a structured analysis of a poem
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Analyze the poem into mood, summary and themes
    ///
    /// Fails with [`ProviderError::Credential`], [`ProviderError::Provider`]
    /// or [`ProviderError::Format`].
    async fn analyze(&self, poem: &Poem) -> Result<Analysis, ProviderError>;
}

/// Produces an illustration for a poem
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Generate an illustration
    ///
    /// Same failures as [`AnalysisProvider::analyze`], plus
    /// [`ProviderError::NoImage`] when the response carries no image data.
    async fn generate_image(&self, poem: &Poem) -> Result<GeneratedImage, ProviderError>;
}
