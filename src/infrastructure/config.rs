//! 配置加载
//!
//! 查找顺序：命令行给出的路径、`config.toml`、`./config/config.toml`，都没有时使用默认值。
//! 加载后再应用环境变量覆盖（`DATABASE_URL`、`STOREFRONT_BIND`）。

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx 连接串，例如 `sqlite://storefront.db` 或 `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    /// 获取连接超时（秒）
    pub acquire_timeout_seconds: u64,
    /// `serve` 启动前自动执行未应用的迁移
    pub auto_migrate: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 日志目录，设置后按天滚动写文件
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://storefront.db".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 8,
            auto_migrate: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "storefront".to_string(),
        }
    }
}

impl HttpConfig {
    /// IPv6 地址需要加方括号
    pub fn socket_addr(&self) -> String {
        if self.bind_address.contains(':') && !self.bind_address.starts_with('[') {
            format!("[{}]:{}", self.bind_address, self.port)
        } else {
            format!("{}:{}", self.bind_address, self.port)
        }
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 应用环境变量覆盖
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(
            std::env::var("DATABASE_URL").ok(),
            std::env::var("STOREFRONT_BIND").ok(),
        )
    }

    /// `bind` 接受 `host:port`（IPv6 写作 `[::1]:3000`）或不带端口的 IP 地址
    pub fn apply_overrides(
        mut self,
        database_url: Option<String>,
        bind: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = database_url {
            self.database.url = url;
        }
        if let Some(bind) = bind {
            let bind = bind.trim();
            if let Ok(addr) = bind.parse::<SocketAddr>() {
                self.http.bind_address = addr.ip().to_string();
                self.http.port = addr.port();
            } else if let Ok(ip) = bind.parse::<IpAddr>() {
                self.http.bind_address = ip.to_string();
            } else {
                return Err(ConfigError::Validation(format!(
                    "STOREFRONT_BIND must be host:port or an IP address, got '{}'",
                    bind
                )));
            }
        }
        Ok(self)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("bind_address must not be empty".to_string()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation("timeout_seconds must be > 0".to_string()));
        }

        if !self.database.url.starts_with("sqlite:") {
            return Err(ConfigError::Validation(format!(
                "unsupported database url: {}",
                self.database.url
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation("max_connections must be > 0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid log level: {}, expected one of {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Validation(String),
}

/// 从文件或默认值加载配置，并校验
///
/// 同时返回实际读取的文件路径，没有找到文件时为 `None`。
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists()),
    };

    let config = match &source {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let config = config.apply_env()?;
    config.validate()?;
    Ok((config, source))
}
