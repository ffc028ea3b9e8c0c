pub mod config;
pub mod gateway;
pub mod history;
pub mod project;
pub mod rest;
pub mod storage;
pub mod support;

use std::sync::Arc;

use anyhow::Result;
use config::ServerConfig;
use gateway::GeminiClient;
use history::HistoryStore;
use project::store::ProjectStore;
use storage::Storage;
use support::MailRelay;

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub storage: Arc<Storage>,
    /// Per-user project/chat store. Sole writer of the project tables.
    pub projects: Arc<ProjectStore>,
    /// Recently analyzed snippets (global, capped).
    pub history: Arc<HistoryStore>,
    /// Gemini passthrough client.
    pub gateway: Arc<GeminiClient>,
    /// Support mail relay client.
    pub mailer: Arc<MailRelay>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Open storage under the configured data directory and wire up the
    /// stores and external clients.
    pub async fn init(config: ServerConfig) -> Result<Self> {
        let storage = Arc::new(
            Storage::new_with_slow_query(
                &config.data_dir,
                config.observability.slow_query_threshold_ms,
            )
            .await?,
        );
        let projects = Arc::new(ProjectStore::new(storage.pool()));
        let history = Arc::new(HistoryStore::new(storage.pool()));
        let gateway = Arc::new(GeminiClient::new(&config.gemini)?);
        let mailer = Arc::new(MailRelay::new(&config.support)?);

        Ok(Self {
            config: Arc::new(config),
            storage,
            projects,
            history,
            gateway,
            mailer,
            started_at: std::time::Instant::now(),
        })
    }
}
