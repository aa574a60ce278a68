//! Poem Data Model
//!
//! The three pieces of content the Conductor holds for a surface:
//!
//! - [`Poem`]: the record fetched from the poem-lookup service
//! - [`Analysis`]: the AI-derived mood/summary/themes for the current poem
//! - [`GeneratedImage`]: the AI-derived illustration for the current poem
//!
//! All three are immutable once produced. The Conductor replaces them
//! wholesale and never edits them in place.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Media type declared for every generated illustration
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// A single poem as returned by the poem-lookup service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    /// Poem title
    pub title: String,
    /// Poet's name
    pub author: String,
    /// Lines in order; empty strings mark stanza breaks
    pub lines: Vec<String>,
    /// Line count as reported by the service (string-encoded integer)
    pub linecount: String,
}

impl Poem {
    /// Create a poem, deriving the line count from `lines`
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        lines: Vec<String>,
    ) -> Self {
        let linecount = lines.len().to_string();
        Self {
            title: title.into(),
            author: author.into(),
            lines,
            linecount,
        }
    }

    /// Parsed line count, `None` if the service sent something non-numeric
    #[must_use]
    pub fn line_count(&self) -> Option<usize> {
        self.linecount.trim().parse().ok()
    }

    /// Full text with lines joined by newlines
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// The first `n` lines (fewer if the poem is shorter)
    #[must_use]
    pub fn opening_lines(&self, n: usize) -> &[String] {
        &self.lines[..n.min(self.lines.len())]
    }

    /// Split into stanzas on empty lines, dropping empty stanzas
    #[must_use]
    pub fn stanzas(&self) -> Vec<&[String]> {
        self.lines
            .split(|line| line.trim().is_empty())
            .filter(|stanza| !stanza.is_empty())
            .collect()
    }
}

/// AI-derived thematic analysis of a poem
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// A few words describing the mood
    pub mood: String,
    /// Short summary of the poem
    pub summary: String,
    /// Key themes (3-4 by convention, not enforced)
    pub themes: Vec<String>,
}

/// AI-generated illustration, kept as base64 text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Declared media type
    pub media_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl GeneratedImage {
    /// Wrap base64 PNG data
    pub fn png(data: impl Into<String>) -> Self {
        Self {
            media_type: PNG_MEDIA_TYPE.to_string(),
            data: data.into(),
        }
    }

    /// Embeddable `data:` URI
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    /// Parse a `data:<type>;base64,<payload>` URI
    pub fn from_data_uri(uri: &str) -> Result<Self, ProviderError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| ProviderError::Format("not a data URI".to_string()))?;
        let (media_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| ProviderError::Format("data URI is not base64".to_string()))?;

        if media_type.is_empty() {
            return Err(ProviderError::Format(
                "data URI has no media type".to_string(),
            ));
        }

        Ok(Self {
            media_type: media_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Decode the payload into raw image bytes
    pub fn decode(&self) -> Result<Vec<u8>, ProviderError> {
        BASE64
            .decode(self.data.trim())
            .map_err(|e| ProviderError::Format(format!("invalid image payload: {e}")))
    }

    /// Approximate decoded size in bytes
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.data.trim_end_matches('=').len() * 3 / 4
    }
}
