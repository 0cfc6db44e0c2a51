//! nanobrush: mask-aware image editing through OpenRouter
//!
//! # Overview
//!
//! nanobrush sends an image, an optional mask, an optional reference image and
//! an instruction to an image-capable model behind OpenRouter's chat
//! completions endpoint, then digs the edited image out of the reply.
//!
//! Key features:
//! - Multimodal request building with masked-edit prompt rewriting
//! - Image extraction that copes with the different reply shapes models use
//! - Pluggable observers for watching which extraction strategy matched
//! - Typed errors that keep the model's text reply when no image came back
//!
//! # Quick Start
//!
//! ```no_run
//! use nanobrush::{EditRequest, ImageEditor, ImageInput, OpenRouterClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenRouterClient::from_env()?;
//!
//!     let photo = std::fs::read("cat.jpg")?;
//!     let request = EditRequest::new(
//!         ImageInput::from_bytes(&photo, "image/jpeg"),
//!         "give the cat a tiny wizard hat",
//!     );
//!
//!     let result = client.edit_image(&request).await?;
//!     if let Some(image) = result.as_image_input() {
//!         std::fs::write("cat-wizard.png", image.decode()?)?;
//!     }
//!     Ok(())
//! }
//! ```

mod backend;
mod error;
#[cfg(feature = "logging")]
pub mod logging;

// Re-exports for convenience
pub use error::{NanobrushError, Result};

pub use backend::{
    EditRequest, ExtractionEvent, ExtractionObserver, ExtractionOutcome, GeneratedContent,
    IMAGE_OUTPUT_SUFFIX, ImageEditor, ImageInput, PNG_MIME, ResponseShape, Strategy,
    TracingObserver, extract_generated_content, extract_image,
};

pub mod response {
    //! Typed view of chat-completion replies, for callers that parse bodies themselves.
    pub use crate::backend::response::{
        Attachment, ChatCompletionResponse, Choice, Loose, LooseList, MessageContent,
        ResponseMessage, TaggedPart, UrlField,
    };
}

#[cfg(feature = "openrouter")]
pub use backend::{OpenRouterClient, OpenRouterConfig, OpenRouterModel, api_error_from_body};
