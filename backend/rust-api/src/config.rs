use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Some(StoreBackend::Mongo),
            "memory" | "in-memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Connection and sampling settings for the Ollama-compatible generation service.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub health_check_timeout_secs: u64,
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_secs(self.health_check_timeout_secs)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "phi3mini".to_string(),
            timeout_secs: 120,
            health_check_timeout_secs: 5,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub store_backend: StoreBackend,
    pub bind_addr: String,
    pub default_question_count: u32,
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_database: "dbquiz".to_string(),
            store_backend: StoreBackend::Mongo,
            bind_addr: "0.0.0.0:8081".to_string(),
            default_question_count: 40,
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first, then the crate-local one
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/{env}.toml + APP__ overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let defaults = Config::default();

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or(defaults.mongo_uri);

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or(defaults.mongo_database);

        let store_backend = match settings
            .get_string("database.backend")
            .or_else(|_| env::var("QUESTION_STORE"))
        {
            Ok(raw) => StoreBackend::parse(&raw).ok_or_else(|| {
                config::ConfigError::Message(format!("Unknown question store backend: {}", raw))
            })?,
            Err(_) => defaults.store_backend,
        };

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or(defaults.bind_addr);

        let default_question_count = settings
            .get_int("quiz.default_count")
            .ok()
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.default_question_count);

        let generation_defaults = defaults.generation;
        let generation = GenerationConfig {
            base_url: settings
                .get_string("generation.base_url")
                .or_else(|_| env::var("OLLAMA_BASE_URL"))
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(generation_defaults.base_url),
            model: settings
                .get_string("generation.model")
                .or_else(|_| env::var("OLLAMA_MODEL"))
                .unwrap_or(generation_defaults.model),
            timeout_secs: settings
                .get_int("generation.timeout_secs")
                .ok()
                .and_then(|value| u64::try_from(value).ok())
                .unwrap_or(generation_defaults.timeout_secs),
            health_check_timeout_secs: settings
                .get_int("generation.health_check_timeout_secs")
                .ok()
                .and_then(|value| u64::try_from(value).ok())
                .unwrap_or(generation_defaults.health_check_timeout_secs),
            temperature: settings
                .get_float("generation.temperature")
                .map(|value| value as f32)
                .unwrap_or(generation_defaults.temperature),
            top_p: settings
                .get_float("generation.top_p")
                .map(|value| value as f32)
                .unwrap_or(generation_defaults.top_p),
        };

        Ok(Config {
            mongo_uri,
            mongo_database,
            store_backend,
            bind_addr,
            default_question_count,
            generation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "MONGO_URI",
            "MONGO_DATABASE",
            "QUESTION_STORE",
            "BIND_ADDR",
            "OLLAMA_BASE_URL",
            "OLLAMA_MODEL",
            "APP__GENERATION__TIMEOUT_SECS",
        ] {
            env::remove_var(key);
        }
        env::set_var("SKIP_ROOT_ENV", "1");
    }

    #[test]
    #[serial]
    fn load_uses_defaults_without_env() {
        clear_env();
        let config = Config::load().expect("config should load");
        assert_eq!(config.mongo_database, "dbquiz");
        assert_eq!(config.store_backend, StoreBackend::Mongo);
        assert_eq!(config.generation.model, "phi3mini");
        assert_eq!(config.default_question_count, 40);
    }

    #[test]
    #[serial]
    fn load_reads_legacy_variables() {
        clear_env();
        env::set_var("OLLAMA_BASE_URL", "http://ollama:11434/");
        env::set_var("OLLAMA_MODEL", "llama3");
        env::set_var("QUESTION_STORE", "memory");

        let config = Config::load().expect("config should load");
        assert_eq!(config.generation.base_url, "http://ollama:11434");
        assert_eq!(config.generation.model, "llama3");
        assert_eq!(config.store_backend, StoreBackend::Memory);

        clear_env();
    }

    #[test]
    #[serial]
    fn load_rejects_unknown_backend() {
        clear_env();
        env::set_var("QUESTION_STORE", "firestore");
        assert!(Config::load().is_err());
        clear_env();
    }
}
