//! Extraction behaviour against reply shapes seen from image-capable models.

#[path = "common/mod.rs"]
mod common;

#[cfg(test)]
mod extraction_tests {
    use nanobrush::{
        EditRequest, ExtractionEvent, ExtractionObserver, ImageInput, NanobrushError,
        ResponseShape, Strategy, extract_generated_content, extract_image,
    };
    use serde_json::json;
    use std::sync::Mutex;

    use crate::common::{ONE_PIXEL_PNG, completion};

    #[derive(Default)]
    struct StrategyLog {
        events: Mutex<Vec<ExtractionEvent>>,
    }

    impl ExtractionObserver for StrategyLog {
        fn observe(&self, event: &ExtractionEvent) {
            self.events.lock().expect("lock").push(event.clone());
        }
    }

    impl StrategyLog {
        fn matched(&self) -> Vec<Strategy> {
            self.events
                .lock()
                .expect("lock")
                .iter()
                .filter_map(|event| match event {
                    ExtractionEvent::Matched(strategy) => Some(*strategy),
                    _ => None,
                })
                .collect()
        }
    }

    #[test]
    fn test_data_uri_inside_prose() {
        let body = completion(json!({
            "role": "assistant",
            "content": "here: data:image/png;base64,QUJDREVGR0g= text"
        }));
        let content = extract_generated_content(body).expect("image should be found");
        assert_eq!(
            content.image_url.as_deref(),
            Some("data:image/png;base64,QUJDREVGR0g=")
        );
        assert_eq!(content.text, None);
    }

    #[test]
    fn test_headerless_base64_reply() {
        let payload: String = "iVBORw0KGgoAAAANSUhEUgAA".repeat(7).chars().take(150).collect();
        assert_eq!(payload.len(), 150);

        let log = StrategyLog::default();
        let shape = ResponseShape::from_value(completion(json!({ "content": payload.clone() })));
        let outcome = extract_image(&shape, &log).expect("image should be found");

        assert_eq!(
            outcome.content.image_url,
            Some(format!("data:image/png;base64,{}", payload))
        );
        assert_eq!(log.matched(), vec![Strategy::RawBase64]);
    }

    #[test]
    fn test_refusal_text_is_surfaced() {
        let body = completion(json!({ "content": "Sorry, I can't do that" }));
        let err = extract_generated_content(body).unwrap_err();

        assert!(matches!(err, NanobrushError::ExtractionFailed { .. }));
        assert!(err.to_string().contains("Sorry, I can't do that"));
        assert_eq!(err.recovered_text(), Some("Sorry, I can't do that"));
    }

    #[test]
    fn test_gemini_style_images_array() {
        let body = completion(json!({
            "content": "",
            "images": [{ "type": "image_url", "image_url": { "url": "https://x/y.png" } }]
        }));
        let content = extract_generated_content(body).expect("image should be found");
        assert_eq!(content.image_url.as_deref(), Some("https://x/y.png"));
    }

    #[test]
    fn test_null_content_with_attachment() {
        let log = StrategyLog::default();
        let shape = ResponseShape::from_value(completion(json!({
            "content": null,
            "attachments": [{ "content_type": "image/png", "url": "https://cdn/out.png" }]
        })));
        let outcome = extract_image(&shape, &log).expect("image should be found");
        assert_eq!(outcome.strategy, Strategy::Attachments);
        assert!(
            log.events
                .lock()
                .expect("lock")
                .contains(&ExtractionEvent::NoContent)
        );
    }

    #[test]
    fn test_non_json_object_body() {
        let err = extract_generated_content(json!("just a string")).unwrap_err();
        assert_eq!(err, NanobrushError::ExtractionFailed { text: None });
    }

    #[test]
    fn test_edited_image_feeds_next_edit() {
        let first = ImageInput::from_bytes(ONE_PIXEL_PNG, "image/png");
        let body = completion(json!({ "content": format!("Done! {}", first.to_data_uri()) }));
        let content = extract_generated_content(body).expect("image should be found");

        let next = content.as_image_input().expect("data uri result");
        assert_eq!(next, first);
        assert_eq!(next.decode().expect("valid base64"), ONE_PIXEL_PNG);

        let follow_up = EditRequest::new(next, "now make it blue");
        assert_eq!(follow_up.effective_prompt(), "now make it blue");
    }

    #[test]
    fn test_each_strategy_is_reachable() {
        let cases = [
            (json!({ "content": "data:image/gif;base64,R0lGOD==" }), Strategy::EmbeddedDataUri),
            (json!({ "content": "A".repeat(100) }), Strategy::RawBase64),
            (
                json!({ "images": [{ "type": "image_url", "image_url": { "url": "u1" } }] }),
                Strategy::MessageImages,
            ),
            (json!({ "attachments": [{ "type": "image", "url": "u2" }] }), Strategy::Attachments),
            (json!({ "image_url": "u3" }), Strategy::DirectImageUrl),
            (
                json!({ "content": [{ "type": "image_url", "image_url": { "url": "u4" } }] }),
                Strategy::ContentParts,
            ),
        ];

        for (message, expected) in cases {
            let shape = ResponseShape::from_value(completion(message.clone()));
            let outcome = extract_image(&shape, &nanobrush::TracingObserver)
                .unwrap_or_else(|e| panic!("no image for {}: {}", message, e));
            assert_eq!(outcome.strategy, expected, "message: {}", message);
        }
    }
}
