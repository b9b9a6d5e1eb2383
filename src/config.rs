//! 設定の読み込み
//!
//! 優先順位（後勝ち）：組み込みのデフォルト値 → `config/default` →
//! `config/{RUN_MODE}` → `LOAN_SERVICE__` 接頭辞の環境変数 → `DATABASE_URL`。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// 未設定の場合はインメモリのレコードストアで起動する
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    pub base_url: String,
    /// 通知メールの送信元アドレス
    pub sender: String,
    pub timeout_secs: u64,
}

impl NotificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `RUST_LOG`が未設定の場合に使うフィルタ
    pub filter: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub notification: NotificationConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// ファイルと環境変数から設定を読み込む
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // 例: LOAN_SERVICE__CATALOG__BASE_URL=http://catalog:8081
            .add_source(
                Environment::with_prefix("LOAN_SERVICE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }

    /// デフォルト値のみを設定したビルダー
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 5)?
            .set_default("catalog.base_url", "http://localhost:8081")?
            .set_default("catalog.timeout_secs", 5)?
            .set_default("notification.base_url", "http://localhost:8082")?
            .set_default("notification.sender", "biblioteca@example.com")?
            .set_default("notification.timeout_secs", 5)?
            .set_default(
                "logging.filter",
                "rusty_loan_service=debug,tower_http=debug,axum=trace",
            )
    }

    /// 待ち受けアドレス
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
