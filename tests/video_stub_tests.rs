//! The OpenRouter backend has no video model; the entry point must say so.

#[cfg(all(test, feature = "openrouter"))]
mod video_stub_tests {
    use nanobrush::{ImageEditor, ImageInput, NanobrushError, OpenRouterClient};
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_video_generation_always_fails_after_one_progress_update() {
        let client = OpenRouterClient::new("sk-or-test").expect("client should build");
        let updates = Mutex::new(Vec::new());
        let on_progress = |message: &str| updates.lock().expect("lock").push(message.to_string());

        let result = client
            .generate_video("a cat surfing", None, &on_progress)
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, NanobrushError::Unsupported(_)));
        assert!(err.to_string().contains("image editing"));
        assert_eq!(updates.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn test_video_generation_with_image_still_fails() {
        let client = OpenRouterClient::new("sk-or-test").expect("client should build");
        let image = ImageInput::from_bytes(b"frame", "image/png");
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let on_progress = |_: &str| {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        };

        for _ in 0..3 {
            let result = client
                .generate_video("zoom out slowly", Some(&image), &on_progress)
                .await;
            assert!(result.is_err());
        }
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }
}
