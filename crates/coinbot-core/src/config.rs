//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 파일(TOML) 로드 후 `COINBOT__` 접두사 환경 변수로 오버라이드합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::FiatCurrency;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 텔레그램 전송 설정
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// 관리자/접근 제어 설정
    #[serde(default)]
    pub access: AccessConfig,
    /// 시세 데이터 설정
    #[serde(default)]
    pub market: MarketConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 텔레그램 전송 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    #[serde(default)]
    pub bot_token: String,
    /// getUpdates 롱폴링 대기 시간 (초)
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

/// 접근 제어 설정.
///
/// 슈퍼관리자는 생성 시점에 고정되며 이후 제거되지 않습니다.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessConfig {
    /// 슈퍼관리자 식별자
    pub super_admin_id: String,
    /// 초기 관리자 식별자 목록
    #[serde(default)]
    pub admin_ids: Vec<String>,
}

/// 시세 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketConfig {
    /// 같은 통화에 대한 업스트림 재조회 최소 간격 (초)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// 업스트림 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// 기본 리포트 통화
    #[serde(default)]
    pub default_currency: FiatCurrency,
    /// 코인 표시 가격의 기준 코인
    #[serde(default = "default_coin")]
    pub default_coin: String,
    /// 업스트림 API 기본 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
            default_currency: FiatCurrency::default(),
            default_coin: default_coin(),
            base_url: default_base_url(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn default_poll_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    300
}
fn default_request_timeout() -> u64 {
    10
}
fn default_coin() -> String {
    "BTC".to_string()
}
fn default_base_url() -> String {
    "https://api.coinmarketcap.com".to_string()
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드 (예: COINBOT__TELEGRAM__BOT_TOKEN)
            .add_source(
                config::Environment::with_prefix("COINBOT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 필수 값이 채워져 있는지 검증합니다.
    pub fn validate(&self) -> Result<(), crate::error::BotError> {
        if self.telegram.bot_token.is_empty() {
            return Err(crate::error::BotError::Config(
                "telegram.bot_token이 설정되지 않았습니다".to_string(),
            ));
        }
        if self.access.super_admin_id.is_empty() {
            return Err(crate::error::BotError::Config(
                "access.super_admin_id가 설정되지 않았습니다".to_string(),
            ));
        }
        if self.market.refresh_interval_secs == 0 {
            return Err(crate::error::BotError::Config(
                "market.refresh_interval_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
