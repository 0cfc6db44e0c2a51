use async_trait::async_trait;

use crate::backend::media::ImageInput;
use crate::backend::request::EditRequest;
use crate::backend::response::GeneratedContent;
use crate::error::Result;

/// ImageEditor defines the operations offered by an image-editing backend.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use nanobrush::{EditRequest, ImageEditor, ImageInput, OpenRouterClient};
///
/// let client = OpenRouterClient::from_env()?.temperature(0.4);
///
/// let photo = std::fs::read("street.jpg")?;
/// let mask = std::fs::read("street-mask.png")?;
/// let request = EditRequest::new(ImageInput::from_bytes(&photo, "image/jpeg"), "remove the parked car")
///     .with_mask(ImageInput::mask_png(&mask));
///
/// let result = client.edit_image(&request).await?;
/// println!("edited image: {} chars", result.image_url.unwrap_or_default().len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ImageEditor {
    /// Send one edit to the model and return the image it produced.
    ///
    /// Fails when the request cannot be delivered, when the upstream answers with
    /// an error status, or when no image can be found in the reply. In the last
    /// case the error carries whatever text the model sent back.
    async fn edit_image(&self, request: &EditRequest) -> Result<GeneratedContent>;

    /// Generate a video from a prompt and optional starting frame.
    ///
    /// `on_progress` receives human-readable status updates. Returns the video URL.
    async fn generate_video(
        &self,
        prompt: &str,
        image: Option<&ImageInput>,
        on_progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<String>;
}
