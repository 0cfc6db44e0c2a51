pub mod client;
pub mod media;
pub mod observer;
#[cfg(feature = "openrouter")]
pub mod openrouter;
pub mod request;
pub mod response;
#[cfg(feature = "openrouter")]
pub mod utils;

pub use client::ImageEditor;
pub use media::{ImageInput, PNG_MIME};
pub use observer::{ExtractionEvent, ExtractionObserver, Strategy, TracingObserver};
#[cfg(feature = "openrouter")]
pub use openrouter::{Model as OpenRouterModel, OpenRouterClient, OpenRouterConfig};
pub use request::{EditRequest, IMAGE_OUTPUT_SUFFIX};
pub use response::{
    ExtractionOutcome, GeneratedContent, ResponseShape, extract_generated_content, extract_image,
};
#[cfg(feature = "openrouter")]
pub use utils::{api_error_from_body, check_response_status, handle_http_error, read_json_body};
