use std::env;

use config::builder::ConfigBuilder as SourceBuilder;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_ping_attempts")]
    pub ping_attempts: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    /// Only `config/development.toml` ships one; elsewhere set `JWT__SECRET`
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

/// Administrator created at startup unless its email or username is taken.
#[derive(Deserialize, Clone)]
pub struct BootstrapAdminConfig {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl std::fmt::Debug for BootstrapAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdminConfig")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_ping_attempts() -> u32 {
    3
}

fn default_expiration_hours() -> i64 {
    24
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        // Layer on environment variables (with __ as separator)
        // Example: DATABASE__URL=postgres://... overrides database.url
        let sources = Self::file_sources(&run_mode).add_source(
            Environment::default()
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins")
                .try_parsing(true),
        );

        Self::from_sources(sources)
    }

    fn file_sources(run_mode: &str) -> SourceBuilder<DefaultState> {
        ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
    }

    fn from_sources(sources: SourceBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = sources.build()?.try_deserialize()?;

        if config.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret is not set; provide JWT__SECRET".to_string(),
            ));
        }

        Ok(config)
    }
}
