use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.0-flash".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 45,
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
        let dir = exe.parent().unwrap_or(Path::new("."));
        dir.join("config.json")
    }

    /// Reads `path`; a missing or unparsable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str::<Config>(&s).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "invalid config, using defaults: {e}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let s = serde_json::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }

    /// Loads config.json next to the executable, writing a template if absent,
    /// then applies environment overrides.
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            match Self::default().save_to(&path) {
                Ok(()) => tracing::info!(path = %path.display(), "wrote config template"),
                Err(e) => tracing::warn!("could not write config template: {e}"),
            }
        }
        let mut cfg = Self::load_from(&path);
        cfg.apply_overrides(|k| std::env::var(k).ok());
        cfg
    }

    /// Non-empty `GEMINI_*` values win over the file.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |k: &str| lookup(k).filter(|v| !v.is_empty());
        if let Some(v) = get("GEMINI_API_KEY") { self.gemini_api_key = v; }
        if let Some(v) = get("GEMINI_MODEL") { self.gemini_model = v; }
        if let Some(v) = get("GEMINI_BASE_URL") { self.base_url = v; }
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini_api_key.trim().is_empty()
    }
}
