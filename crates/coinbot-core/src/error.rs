//! 봇 시스템의 에러 타입.
//!
//! 이 모듈은 봇 시스템 전반에서 사용되는 에러 분류를 정의합니다.
//! 권한/상태 위반은 디스패처 계층에서 즉시 고정 응답으로 처리되고,
//! 업스트림 장애는 캐시 계층에서 스테일 데이터로 완충됩니다.

use thiserror::Error;

/// 핵심 봇 에러.
#[derive(Debug, Error)]
pub enum BotError {
    /// 권한 없음 (역할 검사 실패)
    #[error("권한 없음: {0}")]
    Unauthorized(String),

    /// 잘못된 인자 (지원하지 않는 통화, 빈 코인 목록 등)
    #[error("잘못된 인자: {0}")]
    InvalidArgument(String),

    /// 업스트림 장애 (요청 실패 또는 타임아웃)
    #[error("업스트림 장애: {0}")]
    UpstreamUnavailable(String),

    /// 찾을 수 없음 (코인 식별자 불일치)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 전송 계층 에러
    #[error("전송 에러: {0}")]
    Transport(String),
}

/// 봇 작업을 위한 Result 타입.
pub type BotResult<T> = Result<T, BotError>;

impl BotError {
    /// 사용자에게 보여줄 수 있는 에러인지 확인합니다.
    ///
    /// 권한/인자/조회 에러는 고정 응답 텍스트로 변환되고,
    /// 나머지는 로그로만 남습니다.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            BotError::Unauthorized(_)
                | BotError::InvalidArgument(_)
                | BotError::UpstreamUnavailable(_)
                | BotError::NotFound(_)
        )
    }

    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BotError::UpstreamUnavailable(_) | BotError::Transport(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_facing() {
        let unauthorized = BotError::Unauthorized("not an admin".to_string());
        assert!(unauthorized.is_user_facing());

        let config = BotError::Config("missing token".to_string());
        assert!(!config.is_user_facing());
    }

    #[test]
    fn test_error_retryable() {
        let upstream = BotError::UpstreamUnavailable("timeout".to_string());
        assert!(upstream.is_retryable());

        let invalid = BotError::InvalidArgument("empty coin list".to_string());
        assert!(!invalid.is_retryable());
    }
}
