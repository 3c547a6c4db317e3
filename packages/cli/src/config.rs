use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::StorageConfig;
pub use media::ChunkingConfig;

/// CLI application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CliAppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

impl CliAppConfig {
    /// Load from `path` (default "config/config"), then environment overrides
    /// such as `GYM_MEDIA__CHUNKING__OVERFLOW=reject`.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config_path = path.unwrap_or("config/config");

        let s = Config::builder()
            .set_default("storage.root", "./data")?
            .set_default("storage.max_record_size", 1_000_000_i64)?
            .set_default("chunking.fragment_size", 900_000_i64)?
            .set_default("chunking.max_fragments", 50_i64)?
            .set_default("chunking.inline_threshold", 500_000_i64)?
            .set_default("chunking.overflow", "truncate")?
            .set_default("chunking.integrity", "warn")?
            .set_default("chunking.collection", "videos")?
            .set_default("chunking.fragment_collection", "chunks")?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("GYM_MEDIA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
