use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::text::DEFAULT_TEXTS_PER_ROUND;

pub const SCHEMA_VERSION: u32 = 1;

/// Strict configuration schema for the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub schema_version: u32,
    pub practice: PracticeConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PracticeConfig {
    /// 実際に使っているキーボードの配列ID
    pub physical_layout: String,
    /// 練習したい配列ID
    pub target_layout: String,
    /// 練習文カテゴリID
    pub category: String,
    pub texts_per_round: usize,
    /// 1文を打ち終えてから次の文へ進むまでの待ち時間
    pub advance_delay_ms: u64,
}

impl PracticeConfig {
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsLevel {
    Error,
    Warn,
    Info,
    Debug,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    pub level: DiagnosticsLevel,
    pub file_logging_enabled: bool,
    pub max_file_bytes: u64,
    pub max_files: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            practice: PracticeConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            physical_layout: "qwerty".into(),
            target_layout: "ohnishi".into(),
            category: "daily".into(),
            texts_per_round: DEFAULT_TEXTS_PER_ROUND,
            advance_delay_ms: 300,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: DiagnosticsLevel::Info,
            file_logging_enabled: false,
            max_file_bytes: 1024 * 1024,
            max_files: 3,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::ValidationError(format!(
                "schema_version must be {}",
                SCHEMA_VERSION
            )));
        }

        if self.practice.physical_layout.trim().is_empty()
            || self.practice.target_layout.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "practice.physical_layout/target_layout must not be empty".into(),
            ));
        }
        if self.practice.category.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "practice.category must not be empty".into(),
            ));
        }
        if self.practice.texts_per_round == 0 {
            return Err(ConfigError::ValidationError(
                "practice.texts_per_round must be > 0".into(),
            ));
        }

        if self.diagnostics.max_file_bytes < 1024 {
            return Err(ConfigError::ValidationError(
                "diagnostics.max_file_bytes must be >= 1024".into(),
            ));
        }
        if self.diagnostics.max_files == 0 {
            return Err(ConfigError::ValidationError(
                "diagnostics.max_files must be > 0".into(),
            ));
        }

        Ok(())
    }

    pub fn load_strict(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn create_default(config_path: &Path) -> Result<Self, ConfigError> {
        let config = Self::default();
        config.save_atomic(config_path)?;
        Ok(config)
    }

    /// ファイルがあれば読み込み、なければ既定値で作成する
    pub fn load_or_create(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            Self::load_strict(config_path)
        } else {
            log::info!("creating default config at {}", config_path.display());
            Self::create_default(config_path)
        }
    }

    pub fn save_atomic(&self, config_path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp_path = temp_path_for(config_path);
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }

        if let Err(err) = std::fs::rename(&tmp_path, config_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(ConfigError::IoError(err));
        }

        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("config.json");
    path.with_file_name(format!("{}.{}.tmp", file_name, stamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("romatype-{}-{}.json", name, stamp))
    }

    #[test]
    fn strict_rejects_unknown_keys() {
        let mut value = serde_json::to_value(AppConfig::default()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.insert("unknown".to_string(), serde_json::json!(123));

        let parsed = serde_json::from_value::<AppConfig>(value);
        assert!(parsed.is_err());
    }

    #[test]
    fn strict_rejects_missing_required_keys() {
        let mut value = serde_json::to_value(AppConfig::default()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("practice");

        let parsed = serde_json::from_value::<AppConfig>(value);
        assert!(parsed.is_err());
    }

    #[test]
    fn validate_rejects_zero_texts_per_round() {
        let mut cfg = AppConfig::default();
        cfg.practice.texts_per_round = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn save_atomic_and_load_strict_roundtrip() {
        let path = temp_config_path("roundtrip");
        let mut cfg = AppConfig::default();
        cfg.practice.target_layout = "eucalyn".into();
        cfg.practice.advance_delay_ms = 500;
        cfg.save_atomic(&path).unwrap();

        let loaded = AppConfig::load_strict(&path).unwrap();
        assert_eq!(loaded.practice.target_layout, "eucalyn");
        assert_eq!(loaded.practice.advance_delay(), Duration::from_millis(500));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_or_create_writes_defaults() {
        let path = temp_config_path("fresh");
        let cfg = AppConfig::load_or_create(&path).unwrap();
        assert_eq!(cfg.practice.physical_layout, "qwerty");
        assert!(path.exists());

        let _ = std::fs::remove_file(path);
    }
}
