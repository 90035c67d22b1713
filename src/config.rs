use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "pokedex.json";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where the dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexConfig {
    pub data_source: DataSource,
    /// The only credential: needed for the AI features, not for browsing.
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub log_filter: String,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::File(PathBuf::from(DEFAULT_DATA_PATH)),
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl DexConfig {
    /// Defaults overridden by `POKEDEX_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(data) = get("POKEDEX_DATA") {
            config.data_source = DataSource::parse(&data);
        }

        if let Some(key) = get("POKEDEX_API_KEY") {
            config.api_key = Some(key);
        } else if let Some(key) = get("API_KEY") {
            config.api_key = Some(key);
        }

        if let Some(url) = get("POKEDEX_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Some(model) = get("POKEDEX_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Some(model) = get("POKEDEX_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(filter) = get("POKEDEX_LOG") {
            config.log_filter = filter;
        }

        config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
