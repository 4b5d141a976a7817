use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::gemini::GeminiClient;
use super::interface::{GenerativeModel, LlmError};
use crate::config::ModelConfig;

/// Returned when the model answers without any usable text.
pub const FALLBACK_REPLY: &str = "I couldn't generate a response. Please try again.";

/// Builds the model client on first use.
pub type ModelFactory =
    Box<dyn Fn() -> Result<Arc<dyn GenerativeModel>, LlmError> + Send + Sync>;

/// Create a Gemini client from the model configuration.
///
/// Fails with [`LlmError::MissingApiKey`] when no key is configured.
pub fn create_gemini(config: &ModelConfig) -> Result<Arc<dyn GenerativeModel>, LlmError> {
    let api_key = config.api_key().ok_or(LlmError::MissingApiKey)?;
    let client = GeminiClient::new(
        api_key.to_string(),
        config.base_url.clone(),
        config.model.clone(),
        config.generation_config(),
    )?;
    Ok(Arc::new(client))
}

/// Mediates every call to the generative model.
///
/// The client is created lazily by the factory and then shared for the
/// rest of the process. Concurrent first callers wait on the same
/// initialization; a failed initialization is retried by the next call.
pub struct ModelGateway {
    client: OnceCell<Arc<dyn GenerativeModel>>,
    factory: ModelFactory,
}

impl ModelGateway {
    pub fn new(factory: ModelFactory) -> Self {
        Self {
            client: OnceCell::new(),
            factory,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        let config = config.clone();
        Self::new(Box::new(move || create_gemini(&config)))
    }

    /// A gateway whose client already exists.
    pub fn with_model(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            client: OnceCell::new_with(Some(model)),
            factory: Box::new(already_initialized),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.client.initialized()
    }

    /// Return the shared client, building it on the first call.
    pub async fn ensure_client(&self) -> Result<Arc<dyn GenerativeModel>, LlmError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let client = (self.factory)()?;
                info!("Model client ready: {}", client.model_name());
                Ok::<_, LlmError>(client)
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Send `prompt` to the model and return its trimmed text, or
    /// [`FALLBACK_REPLY`] when the model produced nothing.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let client = self.ensure_client().await?;
        debug!("Generating with {}: prompt_len={}", client.model_name(), prompt.len());

        let text = client
            .generate_content(prompt)
            .await?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(text.unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}

fn already_initialized() -> Result<Arc<dyn GenerativeModel>, LlmError> {
    Err(LlmError::Client("client already initialized".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedModel {
        reply: Option<String>,
    }

    #[async_trait]
    impl GenerativeModel for CannedModel {
        async fn generate_content(&self, _prompt: &str) -> Result<Option<String>, LlmError> {
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    struct FailingModel;

    #[async_trait]
    impl GenerativeModel for FailingModel {
        async fn generate_content(&self, _prompt: &str) -> Result<Option<String>, LlmError> {
            Err(LlmError::Api { status: 429, message: "quota exceeded".into() })
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    fn canned(reply: Option<&str>) -> Arc<dyn GenerativeModel> {
        Arc::new(CannedModel { reply: reply.map(str::to_string) })
    }

    #[tokio::test]
    async fn client_is_built_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let gateway = ModelGateway::new(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(canned(Some("ok")))
        }));

        assert!(!gateway.is_ready());
        gateway.ensure_client().await.unwrap();
        gateway.ensure_client().await.unwrap();
        gateway.generate("soil ph").await.unwrap();
        assert!(gateway.is_ready());
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_first_calls_share_one_client() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let gateway = Arc::new(ModelGateway::new(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(canned(Some("ok")))
        })));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let gateway = gateway.clone();
                tokio::spawn(async move { gateway.generate("rice").await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), "ok");
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_api_key_fails_and_is_retried() {
        let gateway = ModelGateway::from_config(&ModelConfig::default());

        let err = gateway.ensure_client().await.err().unwrap();
        assert!(matches!(err, LlmError::MissingApiKey));
        assert_eq!(
            err.to_string(),
            "GEMINI_API_KEY is not set. Please configure your .env file."
        );
        assert!(!gateway.is_ready());
        assert!(gateway.generate("wheat").await.is_err());
    }

    #[tokio::test]
    async fn configured_key_builds_gemini_client() {
        let config = ModelConfig {
            api_key: Some("test-key".into()),
            ..ModelConfig::default()
        };
        let gateway = ModelGateway::from_config(&config);
        let client = gateway.ensure_client().await.unwrap();
        assert_eq!(client.model_name(), "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let gateway = ModelGateway::with_model(canned(Some("\n  Sow after the first rains.  \n")));
        assert_eq!(gateway.generate("when to sow").await.unwrap(), "Sow after the first rains.");
    }

    #[tokio::test]
    async fn empty_reply_falls_back() {
        let gateway = ModelGateway::with_model(canned(None));
        assert_eq!(gateway.generate("x").await.unwrap(), FALLBACK_REPLY);

        let gateway = ModelGateway::with_model(canned(Some("   ")));
        assert_eq!(gateway.generate("x").await.unwrap(), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn upstream_errors_propagate() {
        let gateway = ModelGateway::with_model(Arc::new(FailingModel));
        let err = gateway.generate("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Model API returned 429: quota exceeded");
    }
}
