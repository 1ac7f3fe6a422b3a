//! # Store 模块
//!
//! YAML 配置文件的读写。
//!
//! ## 加载规则
//!
//! 1. 文件不存在：写出默认配置并使用默认值
//! 2. 读取或解析失败：打印警告，使用默认值（不覆盖原文件）
//! 3. 缺少某个分节（或 `quotes.quote_categories`）：用默认值补全并写回

use std::fs;
use std::path::{Path, PathBuf};

use dialogue_core::ConverterConfig;
use dialogue_core::config::SECTIONS;
use serde_yaml_ng::Value;
use thiserror::Error;
use tracing::{info, warn};

/// 默认配置文件名
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// 配置存储错误
#[derive(Error, Debug)]
pub enum StoreError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialize(#[from] serde_yaml_ng::Error),

    /// IO 错误
    #[error("配置文件写入失败 {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 文件支撑的配置
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: ConverterConfig,
}

impl ConfigStore {
    /// 加载配置文件，任何失败都退回默认配置
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!(path = ?path, "配置文件不存在，写出默认配置");
            let store = Self {
                path,
                config: ConverterConfig::default(),
            };
            if let Err(e) = store.save() {
                warn!(error = %e, "默认配置写出失败");
            }
            return store;
        }

        let config = match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&path, &content),
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件读取失败，使用默认配置");
                None
            }
        };

        match config {
            Some((config, healed)) => {
                let store = Self { path, config };
                if healed {
                    info!(path = ?store.path, "配置文件缺少部分分节，已用默认值补全");
                    if let Err(e) = store.save() {
                        warn!(error = %e, "补全后的配置写回失败");
                    }
                }
                store
            }
            None => Self {
                path,
                config: ConverterConfig::default(),
            },
        }
    }

    /// 解析配置文本，返回配置以及是否补全过缺失分节
    fn parse(path: &Path, content: &str) -> Option<(ConverterConfig, bool)> {
        let value: Value = match serde_yaml_ng::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件解析失败，使用默认配置");
                return None;
            }
        };

        // 空文档视为默认配置
        if value.is_null() {
            return Some((ConverterConfig::default(), false));
        }

        let healed = !missing_sections(&value).is_empty();
        match serde_yaml_ng::from_value(value) {
            Ok(config) => Some((config, healed)),
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件内容无效，使用默认配置");
                None
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self) -> Result<(), StoreError> {
        let yaml = serde_yaml_ng::to_string(&self.config)?;
        fs::write(&self.path, yaml).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConverterConfig {
        &mut self.config
    }
}

/// 列出缺失的分节名
pub fn missing_sections(value: &Value) -> Vec<&'static str> {
    let mut missing: Vec<&'static str> = SECTIONS
        .iter()
        .copied()
        .filter(|section| value.get(*section).is_none())
        .collect();

    let has_categories = value
        .get("quotes")
        .and_then(|quotes| quotes.get("quote_categories"))
        .is_some();
    if value.get("quotes").is_some() && !has_categories {
        missing.push("quotes.quote_categories");
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let store = ConfigStore::load(&path);
        assert_eq!(store.config(), &ConverterConfig::default());
        assert!(path.exists());

        let reloaded = ConfigStore::load(&path);
        assert_eq!(reloaded.config(), &ConverterConfig::default());
    }

    #[test]
    fn test_saved_yaml_keeps_unicode_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        ConfigStore::load(&path);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("户山香澄"));
        assert!(text.contains("speaker_pattern"));
    }

    #[test]
    fn test_invalid_yaml_falls_back_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "parsing: [unclosed").unwrap();

        let store = ConfigStore::load(&path);
        assert_eq!(store.config(), &ConverterConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "parsing: [unclosed");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "").unwrap();

        let store = ConfigStore::load(&path);
        assert_eq!(store.config(), &ConverterConfig::default());
    }

    #[test]
    fn test_missing_quote_categories_healed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let yaml = "\
character_mapping:
  路人甲: [99]
parsing:
  max_speaker_name_length: 10
  default_narrator_name: 旁白
patterns:
  speaker_pattern: '^(\\w+)：(.*)$'
quotes:
  quote_pairs:
    「: 」
";
        fs::write(&path, yaml).unwrap();

        let store = ConfigStore::load(&path);
        let config = store.config();
        assert_eq!(config.character_mapping.resolve("路人甲"), &[99]);
        assert_eq!(config.parsing.max_speaker_name_length, 10);
        assert_eq!(config.parsing.default_narrator_name, "旁白");
        assert_eq!(config.patterns.speaker_pattern, "^(\\w+)：(.*)$");
        assert_eq!(config.quotes.quote_pairs.len(), 1);
        assert_eq!(config.quotes.quote_categories.all().len(), 6);

        // 写回后不再缺少分节
        let value: Value = serde_yaml_ng::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(missing_sections(&value).is_empty());
    }

    #[test]
    fn test_bad_quote_entry_keeps_user_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let yaml = "\
character_mapping:
  路人甲: [99]
parsing:
  default_narrator_name: 旁白
patterns: {}
quotes:
  quote_pairs:
    「: 」
    《《: 》》
  quote_categories:
    日文引号: ['「', '」']
    书名号: ['《《', '》》']
";
        fs::write(&path, yaml).unwrap();

        let config = ConfigStore::load(&path).config().clone();
        assert_eq!(config.character_mapping.len(), 1);
        assert_eq!(config.character_mapping.resolve("路人甲"), &[99]);
        assert_eq!(config.parsing.default_narrator_name, "旁白");
        assert_eq!(config.quotes.quote_pairs.len(), 1);
        assert_eq!(
            config.quotes.quote_categories.names().collect::<Vec<_>>(),
            vec!["日文引号"]
        );
    }

    #[test]
    fn test_missing_sections() {
        let value: Value = serde_yaml_ng::from_str("parsing: {}\nquotes: {}\n").unwrap();
        assert_eq!(
            missing_sections(&value),
            vec!["character_mapping", "patterns", "quotes.quote_categories"]
        );
    }

    #[test]
    fn test_save_after_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut store = ConfigStore::load(&path);
        store.config_mut().parsing.default_narrator_name = "叙述者".to_string();
        store.save().unwrap();

        let reloaded = ConfigStore::load(&path);
        assert_eq!(reloaded.config().parsing.default_narrator_name, "叙述者");
    }
}
