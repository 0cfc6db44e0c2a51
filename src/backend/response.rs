//! Locating the generated image inside a chat-completion response.
//!
//! Image-capable models behind OpenRouter do not agree on where the image goes:
//! inline in the text as a data URI, as bare base64 text, in `message.images`,
//! in `message.attachments`, directly on `message.image_url`, or as an
//! `image_url` part of an array `content`. The body is parsed into a closed set
//! of known shapes (anything else lands in an `Unrecognized` variant) and an
//! ordered list of strategies is tried until one yields an image.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::backend::media::{ImageInput, PNG_MIME, has_png_signature};
use crate::backend::observer::{ExtractionEvent, ExtractionObserver, Strategy, TracingObserver};
use crate::error::{NanobrushError, Result};

static EMBEDDED_DATA_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"data:image/[\w.+-]+;base64,[A-Za-z0-9+/=]+").expect("EMBEDDED_DATA_URI regex")
});
static RAW_BASE64: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]{100,}={0,2}$").expect("RAW_BASE64 regex"));

/// Result of an image edit.
///
/// On success `image_url` holds a data URI (or a remote URL for models that
/// host their output) and `text` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedContent {
    pub image_url: Option<String>,
    pub text: Option<String>,
}

impl GeneratedContent {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            text: None,
        }
    }

    /// The returned image as an [`ImageInput`], ready to feed into a follow-up edit.
    ///
    /// `None` when no image was returned or the image is a remote URL.
    pub fn as_image_input(&self) -> Option<ImageInput> {
        self.image_url
            .as_deref()
            .and_then(|url| ImageInput::from_data_uri(url).ok())
    }
}

/// A successful extraction together with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub content: GeneratedContent,
    pub strategy: Strategy,
}

/// A field that either matched its expected structure or did not.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Loose<T> {
    Known(T),
    Unrecognized(Value),
}

impl<T> Loose<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Loose::Known(value) => Some(value),
            Loose::Unrecognized(_) => None,
        }
    }
}

/// A list field whose entries are individually validated.
pub type LooseList<T> = Loose<Vec<Loose<T>>>;

fn known_items<T>(list: Option<&LooseList<T>>) -> impl Iterator<Item = &T> {
    list.and_then(Loose::known)
        .into_iter()
        .flatten()
        .filter_map(Loose::known)
}

/// The top-level body, either a chat completion or something else entirely.
#[derive(Debug, Clone)]
pub enum ResponseShape {
    Completion(ChatCompletionResponse),
    Unrecognized(Value),
}

impl ResponseShape {
    pub fn from_value(value: Value) -> Self {
        match ChatCompletionResponse::deserialize(&value) {
            Ok(completion) => ResponseShape::Completion(completion),
            Err(e) => {
                debug!(error = %e, "Response did not match chat completion shape");
                ResponseShape::Unrecognized(value)
            }
        }
    }

    /// Message of the first choice, if there is one.
    pub fn first_message(&self) -> Option<&ResponseMessage> {
        match self {
            ResponseShape::Completion(completion) => completion
                .first_choice()
                .and_then(|choice| choice.message.as_ref()),
            ResponseShape::Unrecognized(_) => None,
        }
    }
}

/// Only `choices` is required; a malformed choice or metadata field never
/// hides the first choice's message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Loose<Choice>>,
    #[serde(default)]
    pub model: Option<Value>,
}

impl ChatCompletionResponse {
    /// The first choice, when it has a recognizable structure.
    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first().and_then(Loose::known)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,
    #[serde(default)]
    pub images: Option<LooseList<TaggedPart>>,
    #[serde(default)]
    pub attachments: Option<LooseList<Attachment>>,
    #[serde(default)]
    pub image_url: Option<UrlField>,
}

impl ResponseMessage {
    /// Content when it is a plain string.
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            Some(MessageContent::Text(text)) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<Loose<TaggedPart>>),
    Unrecognized(Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaggedPart {
    ImageUrl {
        #[serde(default)]
        image_url: Option<UrlField>,
    },
    Text {
        #[serde(default)]
        text: Option<String>,
    },
}

impl TaggedPart {
    fn nested_url(&self) -> Option<&str> {
        match self {
            TaggedPart::ImageUrl {
                image_url: Some(field),
            } => field.nested(),
            _ => None,
        }
    }
}

/// An `image_url` value: `{ "url": ... }`, a bare string, or neither.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UrlField {
    Bare(String),
    Nested {
        #[serde(default)]
        url: Option<String>,
    },
    Unrecognized(Value),
}

impl UrlField {
    fn nested(&self) -> Option<&str> {
        match self {
            UrlField::Nested { url: Some(url) } => non_empty(url),
            _ => None,
        }
    }

    fn any(&self) -> Option<&str> {
        match self {
            UrlField::Bare(url) => non_empty(url),
            other => other.nested(),
        }
    }
}

/// An `attachments[]` entry. Each field is checked on its own so a bad `url`
/// does not disqualify an entry that is otherwise tagged as an image.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    #[serde(default, rename = "type")]
    pub kind: Option<Loose<String>>,
    #[serde(default)]
    pub content_type: Option<Loose<String>>,
    #[serde(default)]
    pub url: Option<Loose<String>>,
}

impl Attachment {
    fn is_image(&self) -> bool {
        string_field(&self.kind) == Some("image")
            || string_field(&self.content_type).is_some_and(|ct| ct.starts_with("image/"))
    }

    fn url(&self) -> Option<&str> {
        string_field(&self.url).and_then(non_empty)
    }
}

fn string_field(field: &Option<Loose<String>>) -> Option<&str> {
    field.as_ref().and_then(Loose::known).map(String::as_str)
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

type StrategyFn = fn(&ResponseMessage) -> Option<String>;

/// Strategies in priority order; the first to return an image wins.
const STRATEGIES: [(Strategy, StrategyFn); 6] = [
    (Strategy::EmbeddedDataUri, embedded_data_uri),
    (Strategy::RawBase64, raw_base64),
    (Strategy::MessageImages, message_images),
    (Strategy::Attachments, attachments),
    (Strategy::DirectImageUrl, direct_image_url),
    (Strategy::ContentParts, content_parts),
];

fn embedded_data_uri(message: &ResponseMessage) -> Option<String> {
    let content = message.text_content()?;
    EMBEDDED_DATA_URI
        .find(content)
        .map(|found| found.as_str().to_string())
}

// Headerless payloads are labelled PNG without inspecting them
fn raw_base64(message: &ResponseMessage) -> Option<String> {
    let trimmed = message.text_content()?.trim();
    RAW_BASE64
        .is_match(trimmed)
        .then(|| format!("data:{};base64,{}", PNG_MIME, trimmed))
}

fn message_images(message: &ResponseMessage) -> Option<String> {
    known_items(message.images.as_ref())
        .find_map(TaggedPart::nested_url)
        .map(str::to_string)
}

fn attachments(message: &ResponseMessage) -> Option<String> {
    let attachment = known_items(message.attachments.as_ref()).find(|a| a.is_image())?;
    attachment.url().map(str::to_string)
}

fn direct_image_url(message: &ResponseMessage) -> Option<String> {
    message.image_url.as_ref()?.any().map(str::to_string)
}

fn content_parts(message: &ResponseMessage) -> Option<String> {
    match &message.content {
        Some(MessageContent::Parts(parts)) => parts
            .iter()
            .filter_map(Loose::known)
            .find_map(TaggedPart::nested_url)
            .map(str::to_string),
        _ => None,
    }
}

/// Find the image in a parsed response, reporting each step to `observer`.
///
/// Fails with [`NanobrushError::ExtractionFailed`] carrying the model's text
/// reply (when it sent one) if no strategy finds an image.
pub fn extract_image(
    shape: &ResponseShape,
    observer: &dyn ExtractionObserver,
) -> Result<ExtractionOutcome> {
    if let ResponseShape::Unrecognized(_) = shape {
        observer.observe(&ExtractionEvent::UnrecognizedShape);
    }

    let Some(message) = shape.first_message() else {
        observer.observe(&ExtractionEvent::NoContent);
        observer.observe(&ExtractionEvent::Exhausted);
        return Err(NanobrushError::ExtractionFailed { text: None });
    };
    if message.content.is_none() {
        observer.observe(&ExtractionEvent::NoContent);
    }

    for (strategy, find) in STRATEGIES {
        observer.observe(&ExtractionEvent::Attempted(strategy));
        let Some(image_url) = find(message) else {
            observer.observe(&ExtractionEvent::Missed(strategy));
            continue;
        };

        observer.observe(&ExtractionEvent::Matched(strategy));
        if strategy == Strategy::RawBase64 {
            let payload = image_url.trim_start_matches("data:image/png;base64,");
            if !has_png_signature(payload) {
                observer.observe(&ExtractionEvent::UnverifiedPng);
            }
        }
        info!(strategy = %strategy, url_len = image_url.len(), "Extracted image from response");
        return Ok(ExtractionOutcome {
            content: GeneratedContent::image(image_url),
            strategy,
        });
    }

    let text = message.text_content().map(str::to_string);
    if let Some(text) = &text {
        observer.observe(&ExtractionEvent::TextCaptured { len: text.len() });
    }
    observer.observe(&ExtractionEvent::Exhausted);
    Err(NanobrushError::ExtractionFailed { text })
}

/// Extract the generated image from a decoded response body, tracing each step.
///
/// ```
/// use nanobrush::extract_generated_content;
/// use serde_json::json;
///
/// let body = json!({
///     "choices": [{ "message": { "content": "Done: data:image/png;base64,iVBORw0KGgo=" } }]
/// });
/// let content = extract_generated_content(body).unwrap();
/// assert_eq!(content.image_url.as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));
/// assert_eq!(content.text, None);
/// ```
pub fn extract_generated_content(body: Value) -> Result<GeneratedContent> {
    let shape = ResponseShape::from_value(body);
    extract_image(&shape, &TracingObserver).map(|outcome| outcome.content)
}
