//! 채팅 계층 타입 및 에러 정의.

use thiserror::Error;

/// 전송 계층이 전달하는 인바운드 명령어 이벤트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// 선행 `/`가 제거된 명령어 이름
    pub command: String,
    /// 공백으로 구분된 인자 목록
    pub args: Vec<String>,
    /// 발신자 식별자
    pub sender_id: String,
    /// 응답을 보낼 채팅 식별자
    pub chat_id: i64,
}

impl InboundEvent {
    /// 메시지 텍스트에서 명령어 이벤트를 파싱합니다.
    ///
    /// `/command arg1 arg2` 형식만 명령어로 취급하며, 그룹 채팅에서 쓰이는
    /// `/command@botname` 접미사는 제거합니다. 명령어가 아닌 메시지는
    /// `None`을 반환합니다.
    pub fn parse(text: &str, sender_id: impl Into<String>, chat_id: i64) -> Option<Self> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let mut parts = text[1..].split_whitespace();
        let first = parts.next()?;
        let command = first.split('@').next().unwrap_or(first);
        if command.is_empty() {
            return None;
        }

        Some(Self {
            command: command.to_string(),
            args: parts.map(|s| s.to_string()).collect(),
            sender_id: sender_id.into(),
            chat_id,
        })
    }
}

/// 채팅 작업용 Result 타입.
pub type ChatResult<T> = Result<T, ChatError>;

/// 채팅 전송 계층 에러.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("메시지 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("직렬화 에러: {0}")]
    SerializationError(#[from] serde_json::Error),
}
