use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-001";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    #[serde(deserialize_with = "openai_backend")]
    pub openai: BackendConfig,
    #[serde(deserialize_with = "gemini_backend")]
    pub gemini: BackendConfig,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            openai: BackendConfig::openai(),
            gemini: BackendConfig::gemini(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub model: String,
}

impl BackendConfig {
    pub fn openai() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.into(),
            model: DEFAULT_OPENAI_MODEL.into(),
        }
    }

    pub fn gemini() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.into(),
            model: DEFAULT_GEMINI_MODEL.into(),
        }
    }
}

/// A backend section as written in the file; absent keys keep the provider default.
#[derive(Deserialize)]
struct BackendSection {
    base_url: Option<String>,
    model: Option<String>,
}

impl BackendSection {
    fn over(self, defaults: BackendConfig) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            model: self.model.unwrap_or(defaults.model),
        }
    }
}

fn openai_backend<'de, D: Deserializer<'de>>(d: D) -> Result<BackendConfig, D::Error> {
    Ok(BackendSection::deserialize(d)?.over(BackendConfig::openai()))
}

fn gemini_backend<'de, D: Deserializer<'de>>(d: D) -> Result<BackendConfig, D::Error> {
    Ok(BackendSection::deserialize(d)?.over(BackendConfig::gemini()))
}

/// Provider credentials. Supplied out-of-band and never written to the config file.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Credentials {
    /// Blank keys count as missing.
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            openai_api_key: keep(self.openai_api_key),
            gemini_api_key: keep(self.gemini_api_key),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Credentials")
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("gemini_api_key", &mask(&self.gemini_api_key))
            .finish()
    }
}
