//! Layered widget configuration.
//!
//! Priority, lowest first: built-in defaults, the optional config file,
//! `CHAT_WIDGET__*` environment variables, then command-line flags.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::widget::ElementIds;

/// Default system prompt sent with every message.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Default text for errors that carry no message of their own.
pub const DEFAULT_FALLBACK_ERROR: &str = "Failed to get response. Please try again.";

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Backend origin, e.g. http://127.0.0.1:8000
    #[arg(long)]
    pub base_url: Option<String>,

    /// System prompt sent with each message
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Print the host page HTML and exit
    #[arg(long)]
    pub print_page: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub health_path: String,
    pub chat_path: String,
    pub system_prompt: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub fallback_error: String,
    pub element_ids: ElementIds,
}

impl WidgetConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let ids = ElementIds::default();
        let mut builder = Config::builder()
            .set_default("api.base_url", "http://127.0.0.1:8000")?
            .set_default("api.health_path", "/api/health")?
            .set_default("api.chat_path", "/api/chat")?
            .set_default("api.system_prompt", DEFAULT_SYSTEM_PROMPT)?
            .set_default("ui.fallback_error", DEFAULT_FALLBACK_ERROR)?
            .set_default("ui.element_ids.messages", ids.messages)?
            .set_default("ui.element_ids.form", ids.form)?
            .set_default("ui.element_ids.input", ids.input)?
            .set_default("ui.element_ids.send_button", ids.send_button)?
            .set_default("ui.element_ids.status", ids.status)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // CHAT_WIDGET__API__BASE_URL=http://... -> api.base_url
        builder = builder.add_source(
            Environment::with_prefix("CHAT_WIDGET")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(base_url) = &cli.base_url {
            builder = builder.set_override("api.base_url", base_url.as_str())?;
        }
        if let Some(prompt) = &cli.system_prompt {
            builder = builder.set_override("api.system_prompt", prompt.as_str())?;
        }

        builder.build()?.try_deserialize()
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8000".to_string(),
                health_path: "/api/health".to_string(),
                chat_path: "/api/chat".to_string(),
                system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            },
            ui: UiConfig {
                fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
                element_ids: ElementIds::default(),
            },
        }
    }
}
