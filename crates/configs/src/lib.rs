use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8081, worker_threads: Some(4) }
    }
}

/// Policy knobs for the blessing document.
/// `max_records = 0` disables the retention cap, which means unbounded
/// growth of the stored document.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default = "default_max_name_chars")]
    pub max_name_chars: usize,
    #[serde(default = "default_max_blessing_chars")]
    pub max_blessing_chars: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_records: default_max_records(),
            max_name_chars: default_max_name_chars(),
            max_blessing_chars: default_max_blessing_chars(),
        }
    }
}

fn default_data_dir() -> String { "data".to_string() }
fn default_max_records() -> usize { 100 }
fn default_max_name_chars() -> usize { 50 }
fn default_max_blessing_chars() -> usize { 500 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize_and_validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_and_validate(&mut self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.max_name_chars == 0 {
            return Err(anyhow!("storage.max_name_chars must be >= 1"));
        }
        if self.max_blessing_chars == 0 {
            return Err(anyhow!("storage.max_blessing_chars must be >= 1"));
        }
        Ok(())
    }

    /// Path of the persisted blessing document inside the data dir.
    pub fn blessings_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join("blessings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().expect("defaults validate");
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.storage.max_records, 100);
        assert_eq!(cfg.storage.max_name_chars, 50);
        assert_eq!(cfg.storage.max_blessing_chars, 500);
        assert!(cfg.storage.blessings_path().ends_with("blessings.json"));
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = ""
            port = 9090

            [storage]
            max_records = 5
            "#,
        )
        .expect("parse");
        let mut cfg = cfg;
        cfg.normalize_and_validate().expect("validate");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.storage.max_records, 5);
        assert_eq!(cfg.storage.max_name_chars, 50);
    }

    #[test]
    fn zero_char_limit_rejected() {
        let mut cfg = AppConfig::default();
        cfg.storage.max_name_chars = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }
}
