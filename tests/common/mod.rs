use serde_json::{Value, json};

/// Smallest valid PNG: a 1x1 transparent pixel.
#[allow(dead_code)]
pub const ONE_PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

/// Wrap a message object in a single-choice chat completion body.
#[allow(dead_code)]
pub fn completion(message: Value) -> Value {
    json!({
        "id": "gen-test",
        "model": "google/gemini-2.5-flash-image-preview",
        "choices": [{ "index": 0, "finish_reason": "stop", "message": message }]
    })
}
