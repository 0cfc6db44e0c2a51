#[cfg(test)]
mod error_tests {
    use nanobrush::{NanobrushError, Result};

    #[test]
    fn test_configuration_error() {
        let err = NanobrushError::Configuration("OpenRouter API key is missing".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: OpenRouter API key is missing"
        );
    }

    #[test]
    fn test_network_error_is_generic() {
        let msg = NanobrushError::Network.to_string();
        assert!(msg.starts_with("Network error:"));
        assert!(msg.contains("internet connection"));
    }

    #[test]
    fn test_unknown_error_wraps_message() {
        let err = NanobrushError::Unknown("stream closed".to_string());
        assert_eq!(err.to_string(), "An unknown error occurred: stream closed");
    }

    #[test]
    fn test_unsupported_error() {
        let err = NanobrushError::Unsupported("no video".to_string());
        assert_eq!(err.to_string(), "Unsupported capability: no video");
    }

    #[cfg(feature = "openrouter")]
    #[test]
    fn test_api_error_prefers_body_message() {
        use serde_json::json;

        let err = nanobrush::api_error_from_body(
            400,
            &json!({ "error": { "message": "Image too large", "code": 400 } }).to_string(),
        );
        assert_eq!(err.to_string(), "API error (400): Image too large");

        let fallback = nanobrush::api_error_from_body(503, "Service Unavailable");
        assert_eq!(
            fallback.to_string(),
            "API error (503): Request failed with status 503"
        );
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result, Ok(42));

        let err_result: Result<i32> = Err(NanobrushError::Timeout);
        assert!(err_result.is_err());
    }
}
