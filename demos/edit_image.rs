//! Edit a local image through OpenRouter.
//!
//! ```bash
//! OPENROUTER_API_KEY=sk-or-... cargo run --example edit_image -- photo.jpg "add a rainbow" [mask.png] [reference.png]
//! ```

use nanobrush::{
    EditRequest, ImageEditor, ImageInput, NanobrushError, OpenRouterClient,
    logging::{LogLevel, init_logging},
};
use std::path::Path;

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

fn load(path: &str) -> Result<ImageInput, Box<dyn std::error::Error>> {
    let path = Path::new(path);
    Ok(ImageInput::from_bytes(&std::fs::read(path)?, mime_for(path)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogLevel::Info);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(image_path), Some(prompt)) = (args.first(), args.get(1)) else {
        eprintln!("usage: edit_image <image> <prompt> [mask.png] [reference]");
        std::process::exit(2);
    };

    let mut request = EditRequest::new(load(image_path)?, prompt.as_str());
    if let Some(mask_path) = args.get(2) {
        request = request.with_mask(ImageInput::mask_png(&std::fs::read(mask_path)?));
    }
    if let Some(reference_path) = args.get(3) {
        request = request.with_secondary(load(reference_path)?);
    }

    let client = OpenRouterClient::from_env()?;
    match client.edit_image(&request).await {
        Ok(content) => match content.as_image_input() {
            Some(image) => {
                std::fs::write("edited.png", image.decode()?)?;
                println!("Saved edited image to edited.png ({})", image.mime_type);
            }
            None => println!("Image hosted at {}", content.image_url.unwrap_or_default()),
        },
        Err(NanobrushError::ExtractionFailed { text }) => {
            println!("The model answered without an image: {}", text.unwrap_or_default());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
