use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 4400;
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── GeminiConfig ─────────────────────────────────────────────────────────────

/// Gemini API configuration (`[gemini]` in config.toml).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key. The `GEMINI_API_KEY` env var takes priority over TOML.
    /// None = every gateway call degrades to its canned fallback string.
    pub api_key: Option<String>,
    /// Model ID sent to the generateContent endpoint. Default: gemini-2.0-flash.
    pub model: String,
    /// Override the Gemini API base URL (local test servers).
    pub api_base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: DEFAULT_GEMINI_TIMEOUT_SECS,
        }
    }
}

// ─── SupportConfig ────────────────────────────────────────────────────────────

/// Support mail relay configuration (`[support]` in config.toml).
///
/// The relay is an external HTTP service that does the actual delivery.
/// All fields unset = the support endpoint reports "not configured".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    /// Mail relay endpoint (`FIXSTER_MAIL_RELAY_URL` env var takes priority).
    pub relay_url: Option<String>,
    /// Bearer token for the relay (`FIXSTER_MAIL_RELAY_TOKEN`).
    pub relay_token: Option<String>,
    /// Mailbox support requests are delivered to (`SUPPORT_EMAIL`).
    pub support_email: Option<String>,
}

// ─── ObservabilityConfig ──────────────────────────────────────────────────────

/// Observability configuration (`[observability]` in config.toml).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log SQLite queries that exceed this threshold (milliseconds). Default: 100.
    /// Set to 0 to disable slow query logging.
    pub slow_query_threshold_ms: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            slow_query_threshold_ms: 100,
        }
    }
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 4400).
    port: Option<u16>,
    /// Log level filter string, e.g. "debug", "info,fixsterd=trace" (default: "info").
    log: Option<String>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Log output format: "pretty" (default) | "json" (structured for log aggregators).
    log_format: Option<String>,
    /// Gemini API configuration (`[gemini]`).
    gemini: Option<GeminiConfig>,
    /// Support mail relay configuration (`[support]`).
    support: Option<SupportConfig>,
    /// Observability configuration (`[observability]`).
    observability: Option<ObservabilityConfig>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── ServerConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log: String,
    /// Bind address for the HTTP server (FIXSTER_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Gemini passthrough settings.
    pub gemini: GeminiConfig,
    /// Support mail relay settings.
    pub support: SupportConfig,
    /// Slow query threshold, future metrics settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(std::env::var("FIXSTER_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = std::env::var("FIXSTER_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let mut gemini = toml.gemini.unwrap_or_default();
        if let Some(key) = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()) {
            gemini.api_key = Some(key);
        }

        let mut support = toml.support.unwrap_or_default();
        if let Some(url) = std::env::var("FIXSTER_MAIL_RELAY_URL")
            .ok()
            .filter(|s| !s.is_empty())
        {
            support.relay_url = Some(url);
        }
        if let Some(token) = std::env::var("FIXSTER_MAIL_RELAY_TOKEN")
            .ok()
            .filter(|s| !s.is_empty())
        {
            support.relay_token = Some(token);
        }
        if let Some(addr) = std::env::var("SUPPORT_EMAIL").ok().filter(|s| !s.is_empty()) {
            support.support_email = Some(addr);
        }

        let observability = toml.observability.unwrap_or_default();

        Self {
            port,
            data_dir,
            log,
            bind_address,
            log_format,
            gemini,
            support,
            observability,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/fixster
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("fixster");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/fixster or ~/.local/share/fixster
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("fixster");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("fixster");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\fixster
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("fixster");
        }
    }
    // Fallback
    PathBuf::from(".fixster")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_defaults() {
        let g = GeminiConfig::default();
        assert_eq!(g.model, "gemini-2.0-flash");
        assert_eq!(g.timeout_secs, 30);
        assert!(g.api_key.is_none());
    }

    #[test]
    fn test_toml_sections_parse() {
        let toml = r#"
            port = 9900
            log_format = "json"

            [gemini]
            model = "gemini-2.5-pro"
            timeout_secs = 5

            [support]
            relay_url = "https://relay.example.com/send"
            support_email = "help@fixster.app"

            [observability]
            slow_query_threshold_ms = 250
        "#;
        let cfg: TomlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.port, Some(9900));
        assert_eq!(cfg.log_format.as_deref(), Some("json"));
        let gemini = cfg.gemini.unwrap();
        assert_eq!(gemini.model, "gemini-2.5-pro");
        assert_eq!(gemini.timeout_secs, 5);
        // Unset fields fall back to defaults within the section.
        assert_eq!(gemini.api_base_url, DEFAULT_GEMINI_BASE_URL);
        let support = cfg.support.unwrap();
        assert_eq!(support.support_email.as_deref(), Some("help@fixster.app"));
        assert!(support.relay_token.is_none());
        assert_eq!(cfg.observability.unwrap().slow_query_threshold_ms, 250);
    }

    #[test]
    fn test_malformed_toml_is_ignored() {
        let dir = std::env::temp_dir().join("fixster-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "port = \"not a number").unwrap();
        assert!(load_toml(&dir).is_none());
        std::fs::remove_dir_all(&dir).ok();
    }
}
