use serde::Serialize;
use tracing::{debug, trace};

use crate::backend::media::{ImageInput, MessagePart};

/// Appended to every outgoing prompt so the model answers with an image.
pub const IMAGE_OUTPUT_SUFFIX: &str = " Please generate and return an image as output.";

/// One image edit: the image to change, the instruction, and optional helpers.
///
/// ```
/// use nanobrush::{EditRequest, ImageInput};
///
/// let request = EditRequest::new(ImageInput::from_bytes(b"...", "image/jpeg"), "make the sky purple")
///     .with_mask(ImageInput::mask_png(b"..."))
///     .with_secondary(ImageInput::from_bytes(b"...", "image/png"));
/// assert!(request.effective_prompt().contains("\"make the sky purple\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub image: ImageInput,
    pub prompt: String,
    /// Region the edit is confined to
    pub mask: Option<ImageInput>,
    /// Reference image, e.g. an object to insert
    pub secondary: Option<ImageInput>,
}

impl EditRequest {
    pub fn new(image: ImageInput, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            mask: None,
            secondary: None,
        }
    }

    pub fn with_mask(mut self, mask: ImageInput) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_secondary(mut self, secondary: ImageInput) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// The prompt as sent upstream, before the output suffix.
    ///
    /// With a mask the caller's prompt is quoted inside the masked-edit template.
    pub fn effective_prompt(&self) -> String {
        match self.mask {
            Some(_) => masked_edit_prompt(&self.prompt),
            None => self.prompt.clone(),
        }
    }

    /// Ordered message parts: primary image, mask, secondary image, then the text.
    pub(crate) fn message_parts(&self) -> Vec<MessagePart> {
        let mut parts = vec![MessagePart::image(&self.image)];
        if let Some(mask) = &self.mask {
            parts.push(MessagePart::image(mask));
        }
        if let Some(secondary) = &self.secondary {
            parts.push(MessagePart::image(secondary));
        }

        let text = format!("{}{}", self.effective_prompt(), IMAGE_OUTPUT_SUFFIX);
        trace!(text_len = text.len(), "Built edit instruction");
        parts.push(MessagePart::Text { text });

        debug!(
            parts = parts.len(),
            has_mask = self.mask.is_some(),
            has_secondary = self.secondary.is_some(),
            "Built edit message parts"
        );
        parts
    }
}

fn masked_edit_prompt(prompt: &str) -> String {
    format!(
        "Apply the following edit to the first image: \"{}\". \
The second image is a mask: apply the edit ONLY inside the white masked region. \
Keep everything outside the masked region exactly as it appears in the original image.",
        prompt
    )
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: Vec<MessagePart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatCompletionRequest {
    pub(crate) fn for_edit(
        request: &EditRequest,
        model: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.message_parts(),
            }],
            max_tokens,
            temperature,
        }
    }
}
