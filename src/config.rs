//! RocketChat 连接配置
//!
//! 读取优先级：
//! 1. `--config` 指定的 JSON 文件，否则 `~/.config/rocketchat-notify`
//! 2. 环境变量（非空时覆盖文件中的值）：`ROCKETCHAT_URL`、`ROCKETCHAT_TOKEN`、
//!    `ROCKETCHAT_USER_ID`、`ROCKETCHAT_CHANNEL`、`ROCKETCHAT_EMOJI`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认服务器地址
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

pub const ENV_URL: &str = "ROCKETCHAT_URL";
pub const ENV_TOKEN: &str = "ROCKETCHAT_TOKEN";
pub const ENV_USER_ID: &str = "ROCKETCHAT_USER_ID";
pub const ENV_CHANNEL: &str = "ROCKETCHAT_CHANNEL";
pub const ENV_EMOJI: &str = "ROCKETCHAT_EMOJI";

/// RocketChat 连接配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketChatConfig {
    /// 服务器地址（如 https://chat.example.com）
    pub base_url: String,
    /// X-Auth-Token
    pub token: String,
    /// X-User-Id
    pub user_id: String,
    /// 默认频道
    pub channel: String,
    /// 默认 emoji
    pub emoji: String,
}

impl Default for RocketChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: String::new(),
            user_id: String::new(),
            channel: String::new(),
            emoji: String::new(),
        }
    }
}

impl RocketChatConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/rocketchat-notify"))
    }

    /// 从配置文件和环境变量加载
    ///
    /// 显式指定的文件必须存在且可解析；默认文件缺失时使用默认值。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 读取 JSON 配置文件
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded RocketChat config");
        Ok(config)
    }

    /// 用环境变量覆盖（空值忽略）
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 5] = [
            (ENV_URL, &mut self.base_url),
            (ENV_TOKEN, &mut self.token),
            (ENV_USER_ID, &mut self.user_id),
            (ENV_CHANNEL, &mut self.channel),
            (ENV_EMOJI, &mut self.emoji),
        ];

        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                debug!(key, "Using value from environment");
                *field = value;
            }
        }
    }

    /// 用于展示的副本，token 被遮盖
    pub fn redacted(&self) -> Self {
        Self {
            token: mask(&self.token),
            ..self.clone()
        }
    }
}

/// 遮盖敏感值，只保留末尾 4 个字符
pub fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return String::new();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let config = RocketChatConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_empty());
        assert!(config.channel.is_empty());
    }

    #[test]
    fn test_from_file_partial_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"{{"token": "abc", "channel": "#general"}}"##).unwrap();

        let config = RocketChatConfig::from_file(file.path()).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.channel, "#general");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = RocketChatConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = RocketChatConfig::load(Some(&dir.path().join("missing.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides_non_empty_only() {
        let env: HashMap<&str, &str> = [
            (ENV_URL, "https://chat.example.com"),
            (ENV_TOKEN, ""),
            (ENV_USER_ID, "uid"),
        ]
        .into_iter()
        .collect();

        let mut config = RocketChatConfig {
            token: "from-file".to_string(),
            ..Default::default()
        };
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://chat.example.com");
        assert_eq!(config.token, "from-file");
        assert_eq!(config.user_id, "uid");
        assert!(config.channel.is_empty());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("secret-token"), "********oken");
    }

    #[test]
    fn test_redacted_keeps_other_fields() {
        let config = RocketChatConfig {
            token: "secret-token".to_string(),
            user_id: "uid".to_string(),
            ..Default::default()
        };
        let redacted = config.redacted();
        assert_eq!(redacted.token, "********oken");
        assert_eq!(redacted.user_id, "uid");
    }
}
