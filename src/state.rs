use std::sync::Arc;

use crate::config::Config;
use crate::llm::ModelGateway;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<ModelGateway>,
}

impl AppState {
    /// State backed by the Gemini client described in `config.model_config`.
    /// The client itself is only built when the first question needs it.
    pub fn new(config: Config) -> Self {
        let gateway = Arc::new(ModelGateway::from_config(&config.model_config));
        Self::with_gateway(config, gateway)
    }

    pub fn with_gateway(config: Config, gateway: Arc<ModelGateway>) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
        }
    }
}
