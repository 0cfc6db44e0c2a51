use thiserror::Error;

/// Troubleshooting block appended to every extraction failure.
pub(crate) const EXTRACTION_TROUBLESHOOTING: &str = "\
Possible reasons:
- The prompt may have been filtered by the model's safety system
- The input image format may not be supported
- The response format of the model may have changed
- The model may be temporarily unavailable

Suggestions:
- Rephrase the prompt with a more explicit editing instruction
- Try a different input image (PNG or JPEG work best)
- Wait a moment and try again, or pick another image-capable model";

/// Error types for nanobrush.
///
/// Every failure surfaces to the caller as one of these variants, each carrying a
/// human-readable message. Nothing is retried internally.
///
/// # Examples
///
/// ```
/// use nanobrush::{NanobrushError, Result};
///
/// fn require_prompt(prompt: &str) -> Result<()> {
///     if prompt.trim().is_empty() {
///         return Err(NanobrushError::Configuration("prompt cannot be empty".into()));
///     }
///     Ok(())
/// }
///
/// match require_prompt("  ") {
///     Err(NanobrushError::Configuration(msg)) => println!("bad input: {}", msg),
///     other => println!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NanobrushError {
    /// Client could not be configured (missing credential, invalid settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Upstream answered with a non-success HTTP status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No image could be located in an otherwise successful response
    #[error("{}", extraction_failure_message(.text))]
    ExtractionFailed {
        /// Text the model returned instead of an image, if any
        text: Option<String>,
    },

    /// The request never reached the upstream service
    #[error(
        "Network error: unable to reach the image service. Check your internet connection and try again."
    )]
    Network,

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// The backend does not offer the requested capability
    #[error("Unsupported capability: {0}")]
    Unsupported(String),

    /// Any failure that does not fit the categories above
    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

impl NanobrushError {
    /// Text the model returned when an extraction failed.
    pub fn recovered_text(&self) -> Option<&str> {
        match self {
            Self::ExtractionFailed { text } => text.as_deref(),
            _ => None,
        }
    }
}

fn extraction_failure_message(text: &Option<String>) -> String {
    match text.as_deref() {
        Some(text) if !text.trim().is_empty() => format!(
            "The model did not return an image.\n\nModel response: {}\n\n{}",
            text, EXTRACTION_TROUBLESHOOTING
        ),
        _ => format!(
            "The model did not return an image.\n\n{}",
            EXTRACTION_TROUBLESHOOTING
        ),
    }
}

/// A specialized Result type for nanobrush operations.
pub type Result<T> = std::result::Result<T, NanobrushError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_failure_embeds_text() {
        let err = NanobrushError::ExtractionFailed {
            text: Some("Sorry, I can't do that".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Model response: Sorry, I can't do that"));
        assert!(msg.contains("Possible reasons:"));
        assert!(msg.contains("Suggestions:"));
        assert_eq!(err.recovered_text(), Some("Sorry, I can't do that"));
    }

    #[test]
    fn test_extraction_failure_without_text() {
        let err = NanobrushError::ExtractionFailed { text: None };
        let msg = err.to_string();
        assert!(!msg.contains("Model response:"));
        assert!(msg.starts_with("The model did not return an image."));
    }

    #[test]
    fn test_api_error_display() {
        let err = NanobrushError::Api {
            status: 429,
            message: "Rate limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (429): Rate limit exceeded");
    }
}
