use async_trait::async_trait;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};

use crate::backend::media::ImageInput;
use crate::backend::observer::TracingObserver;
use crate::backend::request::{ChatCompletionRequest, EditRequest};
use crate::backend::response::{GeneratedContent, ResponseShape, extract_image};
use crate::backend::{ImageEditor, check_response_status, handle_http_error, read_json_body};
use crate::error::{NanobrushError, Result};

const PROVIDER: &str = "OpenRouter";
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_REFERER: &str = "https://github.com/nanobrush/nanobrush";
const DEFAULT_TITLE: &str = "nanobrush";

/// Image-capable models reachable through OpenRouter.
///
/// Any other model id can be used through `Custom` or `FromStr`:
///
/// ```rust
/// use nanobrush::OpenRouterModel;
/// use std::str::FromStr;
///
/// let model = OpenRouterModel::from_str("vendor/some-image-model").unwrap();
/// assert_eq!(model.as_str(), "vendor/some-image-model");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Model {
    /// Gemini 2.5 Flash Image preview ("nano banana")
    Gemini25FlashImagePreview,
    /// Gemini 2.5 Flash Image
    Gemini25FlashImage,
    /// GPT-5 Image
    Gpt5Image,
    /// GPT-5 Image Mini
    Gpt5ImageMini,
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25FlashImagePreview => "google/gemini-2.5-flash-image-preview",
            Model::Gemini25FlashImage => "google/gemini-2.5-flash-image",
            Model::Gpt5Image => "openai/gpt-5-image",
            Model::Gpt5ImageMini => "openai/gpt-5-image-mini",
            Model::Custom(name) => name,
        }
    }

    /// Create a model from a string. Unknown ids become `Custom`.
    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "google/gemini-2.5-flash-image-preview" => Model::Gemini25FlashImagePreview,
            "google/gemini-2.5-flash-image" => Model::Gemini25FlashImage,
            "openai/gpt-5-image" => Model::Gpt5Image,
            "openai/gpt-5-image-mini" => Model::Gpt5ImageMini,
            _ => Model::Custom(name),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_string(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from_string(s)
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        Model::from_string(s)
    }
}

/// Configuration for the OpenRouter client
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub model: Model,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Option<Duration>,
    /// Defaults to "https://openrouter.ai/api/v1"
    pub base_url: Option<String>,
    /// Sent as `HTTP-Referer` for app attribution
    pub referer: String,
    /// Sent as `X-Title` for app attribution
    pub title: String,
}

impl OpenRouterConfig {
    fn with_key(api_key: String) -> Self {
        Self {
            api_key,
            model: Model::Gemini25FlashImagePreview,
            temperature: 0.7,
            max_tokens: 4096,
            timeout: None, // Default: no timeout (uses reqwest's default)
            base_url: None,
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Image-editing client backed by OpenRouter's chat completions endpoint.
pub struct OpenRouterClient {
    config: OpenRouterConfig,
    client: reqwest::Client,
}

impl OpenRouterClient {
    /// Create a new client with the provided API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is empty.
    ///
    /// ```no_run
    /// # use nanobrush::OpenRouterClient;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = OpenRouterClient::new("sk-or-...")?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "openrouter_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NanobrushError::Configuration(
                "OpenRouter API key is missing".to_string(),
            ));
        }

        info!("Creating new OpenRouter client");
        trace!("API key length: {}", api_key.len());

        Ok(Self {
            config: OpenRouterConfig::with_key(api_key),
            client: reqwest::Client::new(),
        })
    }

    /// Create a client from the environment.
    ///
    /// Reads `OPENROUTER_API_KEY` (required) and, when present,
    /// `OPENROUTER_MODEL`, `OPENROUTER_BASE_URL`, `OPENROUTER_HTTP_REFERER` and
    /// `OPENROUTER_X_TITLE`.
    #[instrument(name = "openrouter_client_from_env")]
    pub fn from_env() -> Result<Self> {
        Self::from_vars(non_empty_env)
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = var("OPENROUTER_API_KEY").ok_or_else(|| {
            NanobrushError::Configuration(
                "OPENROUTER_API_KEY environment variable is not set".to_string(),
            )
        })?;

        info!("Creating new OpenRouter client from environment variable");
        let mut client = Self::new(api_key)?;
        if let Some(model) = var("OPENROUTER_MODEL") {
            client.config.model = Model::from_string(model);
        }
        if let Some(base_url) = var("OPENROUTER_BASE_URL") {
            client = client.base_url(base_url);
        }
        if let Some(referer) = var("OPENROUTER_HTTP_REFERER") {
            client.config.referer = referer;
        }
        if let Some(title) = var("OPENROUTER_X_TITLE") {
            client.config.title = title;
        }

        debug!(model = %client.config.model.as_str(), "OpenRouter client configured from environment");
        Ok(client)
    }

    /// Set the model to use
    #[instrument(skip(self))]
    pub fn model(mut self, model: impl Into<Model> + std::fmt::Debug) -> Self {
        let model = model.into();
        debug!(
            previous_model = %self.config.model.as_str(),
            new_model = %model.as_str(),
            "Setting OpenRouter model"
        );
        self.config.model = model;
        self
    }

    /// Set the sampling temperature
    #[instrument(skip(self))]
    pub fn temperature(mut self, temp: f32) -> Self {
        debug!(previous_temp = self.config.temperature, new_temp = temp, "Setting temperature");
        self.config.temperature = temp;
        self
    }

    /// Set the maximum tokens to generate. Zero is raised to one.
    #[instrument(skip(self))]
    pub fn max_tokens(mut self, max: u32) -> Self {
        debug!(previous_max = self.config.max_tokens, new_max = max, "Setting max_tokens");
        self.config.max_tokens = max.max(1);
        self
    }

    /// Set the per-request timeout, connection included.
    ///
    /// A request that exceeds it fails with [`NanobrushError::Timeout`].
    #[instrument(skip(self))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        debug!(previous_timeout = ?self.config.timeout, new_timeout = ?timeout, "Setting timeout");
        self.config.timeout = Some(timeout);
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build reqwest client with timeout, using default");
                reqwest::Client::new()
            });
        self
    }

    /// Point the client at an OpenRouter-compatible proxy.
    #[instrument(skip(self))]
    pub fn base_url(mut self, base_url: impl Into<String> + std::fmt::Debug) -> Self {
        let base_url = base_url.into();
        debug!(base_url = %base_url, "Setting base URL");
        self.config.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    /// Set the `HTTP-Referer` attribution header.
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.config.referer = referer.into();
        self
    }

    /// Set the `X-Title` attribution header.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{}/chat/completions", base_url)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl ImageEditor for OpenRouterClient {
    #[instrument(
        name = "openrouter_edit_image",
        skip(self, request),
        fields(
            model = %self.config.model.as_str(),
            prompt_len = request.prompt.len(),
            has_mask = request.mask.is_some(),
            has_secondary = request.secondary.is_some()
        )
    )]
    async fn edit_image(&self, request: &EditRequest) -> Result<GeneratedContent> {
        info!("Sending image edit to OpenRouter");

        let body = ChatCompletionRequest::for_edit(
            request,
            self.config.model.as_str(),
            self.config.max_tokens,
            self.config.temperature,
        );

        let url = self.completions_url();
        debug!(url = %url, "Sending request to OpenRouter API");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| handle_http_error(e, PROVIDER))?;

        let response = check_response_status(response, PROVIDER).await?;
        debug!("Successfully received response from OpenRouter API");

        let body = read_json_body(response, PROVIDER).await?;
        let shape = ResponseShape::from_value(body);
        if let ResponseShape::Completion(completion) = &shape {
            trace!(
                choices = completion.choices.len(),
                model = ?completion.model,
                finish_reason = ?completion.first_choice().and_then(|c| c.finish_reason.as_ref()),
                "Parsed chat completion"
            );
        }

        let outcome = extract_image(&shape, &TracingObserver)?;
        info!(strategy = %outcome.strategy, "Image edit complete");
        Ok(outcome.content)
    }

    #[instrument(name = "openrouter_generate_video", skip(self, prompt, image, on_progress))]
    async fn generate_video(
        &self,
        prompt: &str,
        image: Option<&ImageInput>,
        on_progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<String> {
        on_progress("Preparing video generation...");
        warn!(
            model = %self.config.model.as_str(),
            prompt_len = prompt.len(),
            has_image = image.is_some(),
            "Video generation requested on a backend without video support"
        );
        Err(NanobrushError::Unsupported(format!(
            "video generation is not available for {} through {}. Use image editing instead.",
            self.config.model.as_str(),
            PROVIDER
        )))
    }
}
