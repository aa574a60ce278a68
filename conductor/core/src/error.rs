//! Error Types
//!
//! Failure taxonomy for the three leaf components. The Conductor decides how
//! each failure is surfaced; the providers only classify.

use thiserror::Error;

/// Errors returned by poem sources and AI providers
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Network call failed or returned a non-success status
    #[error("Failed to fetch poem: {0}")]
    Fetch(String),

    /// Response could not be parsed into the expected shape
    #[error("Invalid response format: {0}")]
    Format(String),

    /// No access credential configured for the AI service
    #[error("API key missing")]
    Credential,

    /// The AI service call failed
    #[error("AI provider request failed: {0}")]
    Provider(String),

    /// The AI service answered but included no image
    #[error("No image generated")]
    NoImage,
}

/// Discriminant of [`ProviderError`], handy for logging and matching
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// See [`ProviderError::Fetch`]
    Fetch,
    /// See [`ProviderError::Format`]
    Format,
    /// See [`ProviderError::Credential`]
    Credential,
    /// See [`ProviderError::Provider`]
    Provider,
    /// See [`ProviderError::NoImage`]
    NoImage,
}

impl ProviderError {
    /// The kind of this error
    #[must_use]
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Fetch(_) => ProviderErrorKind::Fetch,
            Self::Format(_) => ProviderErrorKind::Format,
            Self::Credential => ProviderErrorKind::Credential,
            Self::Provider(_) => ProviderErrorKind::Provider,
            Self::NoImage => ProviderErrorKind::NoImage,
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Format => write!(f, "format"),
            Self::Credential => write!(f, "credential"),
            Self::Provider => write!(f, "provider"),
            Self::NoImage => write!(f, "no-image"),
        }
    }
}

/// Errors from invalid configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A URL setting did not parse
    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl {
        /// Which setting
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            ProviderError::Fetch("boom".into()).kind(),
            ProviderErrorKind::Fetch
        );
        assert_eq!(ProviderError::Credential.kind(), ProviderErrorKind::Credential);
        assert_eq!(ProviderError::NoImage.kind(), ProviderErrorKind::NoImage);
    }

    #[test]
    fn test_display() {
        assert_eq!(ProviderError::Credential.to_string(), "API key missing");
        assert_eq!(ProviderErrorKind::NoImage.to_string(), "no-image");
    }
}
