use anyhow::{anyhow, Result};
use std::time::Duration;

use crate::adapters::gemini::client::GeminiSettings;

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_ADDR: &str = "0.0.0.0:8090";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_DETECT_TIMEOUT_SECS: u64 = 45;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiSettings,
    pub addr: String,
    pub static_dir: String,
    /// Límite que impone el servicio alrededor de cada detección. `None` = sin límite.
    pub detect_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Separado de `from_env` para poder probarlo sin tocar el entorno del proceso.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("API_KEY").or_else(|| get("GEMINI_API_KEY")).unwrap_or_default();

        let timeout_secs = match get("SHOPVISION_DETECT_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| anyhow!("SHOPVISION_DETECT_TIMEOUT_SECS inválido ({raw}): {e}"))?,
            None => DEFAULT_DETECT_TIMEOUT_SECS,
        };

        Ok(Self {
            gemini: GeminiSettings {
                base_url: get("SHOPVISION_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
                model: get("SHOPVISION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
                api_key,
            },
            addr: get("SHOPVISION_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into()),
            static_dir: get("SHOPVISION_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.into()),
            detect_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }
}
