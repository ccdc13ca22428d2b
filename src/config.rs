use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use serde::{Deserialize, Serialize};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../default-config.toml");

/// How a parallel call turns one element into one concurrent task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spawner {
    /// One scoped OS thread per element
    #[default]
    Threads,
    /// One rayon task per element, run on the rayon worker pool
    Pool,
}

/// Configuration for fan-out calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutConfig {
    /// Unit of concurrency for each element
    pub spawner: Spawner,
    /// Thread name prefix; the task index is appended (`Threads` only)
    pub thread_name: String,
    /// Stack size in bytes for spawned threads (`Threads` only, None = runtime default)
    #[serde(default)]
    pub stack_size: Option<usize>,
    /// Minimum element count for `ExecutionStrategy::auto` to go parallel
    pub min_items_for_parallel: usize,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            spawner: Spawner::Threads,
            thread_name: "fanout".to_string(),
            stack_size: None,
            min_items_for_parallel: 2,
        }
    }
}

impl FanOutConfig {
    /// Load embedded defaults, then `fanout.{toml,json,yaml,yml}` in the
    /// working directory, then `FANOUT_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    /// Same as [`FanOutConfig::load`], but a custom file replaces the
    /// working-directory lookup. A missing custom file is not an error.
    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        if let Some(custom_path) = custom_config {
            figment = match custom_path.rsplit_once('.').map(|(_, ext)| ext) {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            figment = figment
                .merge(Toml::file("fanout.toml"))
                .merge(Json::file("fanout.json"))
                .merge(Yaml::file("fanout.yaml"))
                .merge(Yaml::file("fanout.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("FANOUT_"));

        let config: FanOutConfig = figment.extract()?;
        tracing::trace!("CONFIG LOAD: Final config = {:?}", config);
        Ok(config)
    }
}
