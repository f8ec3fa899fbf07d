//! Application state wiring the collaborators together.
//!
//! AppState holds the configuration and credentials loaded at startup.
//! The turn controller is generic over collaborator traits, but AppState
//! pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use tracing::{debug, warn};

use glimora_core::session::ChatSessionStore;
use glimora_core::turn::TurnController;
use glimora_infra::config::{data_dir, load_config};
use glimora_infra::credentials::{api_key_from_env, MODEL_KEY_VAR, SEARCH_KEY_VAR};
use glimora_infra::extract::PdfTextExtractor;
use glimora_infra::llm::OpenRouterClient;
use glimora_infra::persistence::JsonSessionPersistence;
use glimora_infra::search::TavilySearchClient;
use glimora_types::config::GlimoraConfig;

/// Concrete controller type pinned to the infra implementations.
pub type ConcreteController = TurnController<OpenRouterClient, TavilySearchClient, PdfTextExtractor>;

/// Shared application state for all CLI commands.
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: GlimoraConfig,
    model_key: Option<SecretString>,
    search_key: Option<SecretString>,
}

impl AppState {
    /// Initialize the application state: resolve the data directory, load
    /// config, and read API keys from the environment.
    ///
    /// Missing keys are not fatal here. A missing model key fails the
    /// first turn with a clear transcript message, and a missing search
    /// key makes web-search turns fall back to plain chat.
    pub async fn init() -> Self {
        let data_dir = data_dir();
        let config = load_config(&data_dir).await;

        let model_key = api_key_from_env(MODEL_KEY_VAR);
        let search_key = api_key_from_env(SEARCH_KEY_VAR);

        if model_key.is_none() {
            warn!("{MODEL_KEY_VAR} is not set; chat turns will fail until it is");
        }
        if search_key.is_none() {
            debug!("{SEARCH_KEY_VAR} is not set; web search will fall back to plain chat");
        }

        Self {
            data_dir,
            config,
            model_key,
            search_key,
        }
    }

    /// Build a turn controller over the concrete collaborators.
    pub fn controller(&self) -> ConcreteController {
        let model = OpenRouterClient::new(
            self.model_key.clone(),
            self.config.model.clone(),
            self.config.referer.clone(),
        );
        let search = TavilySearchClient::new(self.search_key.clone());
        let extractor = PdfTextExtractor::new();

        TurnController::new(model, search, extractor)
            .with_replay_delay(Duration::from_millis(self.config.replay_delay_ms))
    }

    /// Load the session store backed by the JSON file in the data dir.
    pub async fn open_store(&self) -> ChatSessionStore<JsonSessionPersistence> {
        ChatSessionStore::load(JsonSessionPersistence::new(&self.data_dir)).await
    }
}
