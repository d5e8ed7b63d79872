use ::config::ConfigBuilder;
use ::config::builder::DefaultState;
use place_canvas::StoreKind;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub api_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allow_local_origins: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backing_store: StoreKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Defaults, then the YAML file at `path` if it exists, then `PLACE__*`
    /// variables, then a bare `PORT`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ::config::ConfigError> {
        let port = std::env::var("PORT").ok();
        Self::builder()?
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix("PLACE")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port)?
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ::config::ConfigError> {
        ::config::Config::builder()
            .set_default("server.bind_address", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.api_prefix", "/api")?
            .set_default("cors.allow_local_origins", true)?
            .set_default("storage.backing_store", "scan")
    }

    /// The built-in defaults alone, without file or environment sources.
    pub fn defaults() -> Result<Self, ::config::ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}
