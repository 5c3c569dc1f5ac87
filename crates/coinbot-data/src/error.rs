//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 업스트림 요청 실패
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 업스트림 요청 타임아웃
    #[error("Upstream timeout: {0}")]
    Timeout(String),

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 사용 가능한 데이터 없음 (캐시도 비어 있음)
    #[error("No data available: {0}")]
    NoData(String),

    /// 클라이언트 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Timeout(err.to_string())
        } else if err.is_decode() {
            DataError::ParseError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
