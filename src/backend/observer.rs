use std::fmt;

use tracing::{debug, warn};

/// Extraction strategies, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `data:image/...;base64,...` embedded anywhere in the text content
    EmbeddedDataUri,
    /// Text content that is nothing but a long base64 payload
    RawBase64,
    /// `message.images[]` entries tagged `image_url`
    MessageImages,
    /// `message.attachments[]` entries typed as images
    Attachments,
    /// `message.image_url` directly on the message
    DirectImageUrl,
    /// `message.content[]` parts tagged `image_url`
    ContentParts,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::EmbeddedDataUri => "embedded_data_uri",
            Strategy::RawBase64 => "raw_base64",
            Strategy::MessageImages => "message_images",
            Strategy::Attachments => "attachments",
            Strategy::DirectImageUrl => "direct_image_url",
            Strategy::ContentParts => "content_parts",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened while searching a response for an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionEvent {
    /// The body did not match the chat-completion shape at all
    UnrecognizedShape,
    /// The first choice carried no usable message content
    NoContent,
    Attempted(Strategy),
    Matched(Strategy),
    Missed(Strategy),
    /// Text content retained for the failure message
    TextCaptured { len: usize },
    /// A raw base64 payload was labelled PNG without carrying a PNG signature
    UnverifiedPng,
    /// Every strategy missed
    Exhausted,
}

/// Receives extraction events. Events never influence the extraction result.
pub trait ExtractionObserver {
    fn observe(&self, event: &ExtractionEvent);
}

/// Default observer: forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn observe(&self, event: &ExtractionEvent) {
        match event {
            ExtractionEvent::UnrecognizedShape => {
                warn!("Response body does not look like a chat completion")
            }
            ExtractionEvent::NoContent => debug!("No message content in first choice"),
            ExtractionEvent::Attempted(strategy) => {
                debug!(strategy = %strategy, "Trying image extraction strategy")
            }
            ExtractionEvent::Matched(strategy) => {
                debug!(strategy = %strategy, "Image found")
            }
            ExtractionEvent::Missed(strategy) => {
                debug!(strategy = %strategy, "No image from strategy")
            }
            ExtractionEvent::TextCaptured { len } => {
                debug!(text_len = len, "Captured text content from response")
            }
            ExtractionEvent::UnverifiedPng => warn!(
                "Raw base64 response labelled as PNG but the payload has no PNG signature"
            ),
            ExtractionEvent::Exhausted => warn!("No image found by any extraction strategy"),
        }
    }
}

impl<T: ExtractionObserver + ?Sized> ExtractionObserver for &T {
    fn observe(&self, event: &ExtractionEvent) {
        (**self).observe(event)
    }
}
