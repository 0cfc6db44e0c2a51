//! Show which extraction strategy handles a few typical reply bodies.

use nanobrush::{ExtractionEvent, ExtractionObserver, ResponseShape, extract_image};
use serde_json::json;

struct PrintObserver;

impl ExtractionObserver for PrintObserver {
    fn observe(&self, event: &ExtractionEvent) {
        println!("  {:?}", event);
    }
}

fn main() {
    let replies = [
        json!({ "choices": [{ "message": { "content": "Here you go: data:image/png;base64,iVBORw0KGgo=" } }] }),
        json!({ "choices": [{ "message": {
            "content": "",
            "images": [{ "type": "image_url", "image_url": { "url": "https://example.com/out.png" } }]
        } }] }),
        json!({ "choices": [{ "message": { "content": "I can't edit images of real people." } }] }),
    ];

    for reply in replies {
        println!("reply: {}", reply);
        match extract_image(&ResponseShape::from_value(reply), &PrintObserver) {
            Ok(outcome) => println!(
                "=> {} via {}\n",
                outcome.content.image_url.unwrap_or_default(),
                outcome.strategy
            ),
            Err(e) => println!("=> error: {}\n", e),
        }
    }
}
