use serde::{Deserialize, Serialize};
use std::env;

use crate::constants::FALLBACK_MESSAGE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub gacha: GachaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 持久化文件路径；设为空字符串时使用内存存储（重启即丢失）
    #[serde(default = "default_storage_path")]
    pub path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GachaConfig {
    /// 会员分发链接的基础地址（例: https://fan.example.com/gacha）
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    /// 抽奖最短耗时（毫秒）
    #[serde(default = "default_min_draw_millis")]
    pub min_draw_millis: u64,
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            share_base_url: default_share_base_url(),
            min_draw_millis: default_min_draw_millis(),
            fallback_message: default_fallback_message(),
        }
    }
}

fn default_storage_path() -> Option<String> {
    Some("gacha_storage.json".to_string())
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    15
}

fn default_share_base_url() -> String {
    "http://localhost:8080/".to_string()
}

fn default_min_draw_millis() -> u64 {
    1000
}

fn default_fallback_message() -> String {
    FALLBACK_MESSAGE.to_string()
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Config file {config_path} not found, using defaults and environment");
                Config {
                    server: ServerConfig {
                        host: "0.0.0.0".to_string(),
                        port: 8080,
                    },
                    storage: StorageConfig::default(),
                    gemini: GeminiConfig::default(),
                    gacha: GachaConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    // 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("STORAGE_PATH") {
            self.storage.path = if v.is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var("GEMINI_API_KEY") {
            self.gemini.api_key = v;
        }
        if let Ok(v) = env::var("GEMINI_MODEL") {
            self.gemini.model = v;
        }
        if let Ok(v) = env::var("GEMINI_BASE_URL") {
            self.gemini.base_url = v;
        }
        if let Ok(v) = env::var("GEMINI_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.gemini.timeout_secs = n;
        }
        if let Ok(v) = env::var("GACHA_SHARE_BASE_URL") {
            self.gacha.share_base_url = v;
        }
        if let Ok(v) = env::var("GACHA_MIN_DRAW_MILLIS")
            && let Ok(n) = v.parse()
        {
            self.gacha.min_draw_millis = n;
        }
        if let Ok(v) = env::var("GACHA_FALLBACK_MESSAGE") {
            self.gacha.fallback_message = v;
        }
    }
}
