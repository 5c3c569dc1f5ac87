//! 텔레그램 전송 계층.
//!
//! Bot API `getUpdates` 롱폴링으로 메시지를 수신하고, 파싱된 명령어
//! 이벤트를 서비스에 넘긴 뒤 생성된 응답을 `sendMessage`로 돌려보냅니다.
//! 명령어가 아닌 메시지는 무시합니다.

use std::sync::Arc;
use std::time::Duration;

use coinbot_core::TelegramConfig;
use coinbot_data::MarketDataSource;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::service::CoinBotService;
use crate::types::{ChatError, ChatResult, InboundEvent};

/// 텔레그램 봇 업데이트 응답.
#[derive(Debug, Deserialize)]
struct TelegramUpdates {
    ok: bool,
    result: Vec<TelegramUpdate>,
}

/// 개별 업데이트.
#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessage>,
}

/// 메시지 정보.
#[derive(Debug, Deserialize)]
struct TelegramMessage {
    from: Option<TelegramUser>,
    chat: TelegramChat,
    text: Option<String>,
}

/// 사용자 정보.
#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: i64,
}

/// 채팅 정보.
#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

/// 텔레그램 롱폴링 전송기.
pub struct TelegramTransport<S: MarketDataSource> {
    config: TelegramConfig,
    client: reqwest::Client,
    service: Arc<CoinBotService<S>>,
    last_update_id: RwLock<i64>,
}

impl<S: MarketDataSource> TelegramTransport<S> {
    /// 새 전송기를 생성합니다.
    pub fn new(config: TelegramConfig, service: Arc<CoinBotService<S>>) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            service,
            last_update_id: RwLock::new(0),
        }
    }

    /// 봇 폴링을 시작합니다.
    ///
    /// 무한 루프로 업데이트를 수신합니다. 폴링 실패는 로그로 남기고
    /// 잠시 대기 후 재시도합니다.
    pub async fn start_polling(&self) {
        info!("텔레그램 봇 폴링 시작");

        loop {
            match self.poll_updates().await {
                Ok(updates) => {
                    for update in updates {
                        if let Err(e) = self.process_update(update).await {
                            error!(error = %e, "업데이트 처리 실패");
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "업데이트 폴링 실패");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    /// 업데이트 폴링.
    async fn poll_updates(&self) -> ChatResult<Vec<TelegramUpdate>> {
        let last_id = *self.last_update_id.read().await;

        let url = format!(
            "https://api.telegram.org/bot{}/getUpdates",
            self.config.bot_token
        );

        let params = serde_json::json!({
            "offset": last_id + 1,
            "timeout": self.config.poll_timeout_secs,
            "allowed_updates": ["message"],
        });

        let response = self
            .client
            .post(&url)
            .json(&params)
            .timeout(Duration::from_secs(self.config.poll_timeout_secs + 5))
            .send()
            .await
            .map_err(ChatError::NetworkError)?;

        let updates: TelegramUpdates = response
            .json()
            .await
            .map_err(|e| ChatError::SendFailed(e.to_string()))?;

        if !updates.ok {
            return Err(ChatError::SendFailed(
                "텔레그램 API 응답 실패".to_string(),
            ));
        }

        // 마지막 업데이트 ID 갱신
        if let Some(last) = updates.result.last() {
            *self.last_update_id.write().await = last.update_id;
        }

        Ok(updates.result)
    }

    /// 개별 업데이트 처리.
    async fn process_update(&self, update: TelegramUpdate) -> ChatResult<()> {
        let Some(message) = update.message else {
            return Ok(());
        };

        let Some(text) = message.text else {
            return Ok(());
        };

        let Some(sender) = message.from else {
            warn!(chat_id = message.chat.id, "발신자 정보 없는 메시지 무시");
            return Ok(());
        };

        // 명령어가 아닌 메시지는 무시
        let Some(event) = InboundEvent::parse(&text, sender.id.to_string(), message.chat.id)
        else {
            return Ok(());
        };

        debug!(
            chat_id = event.chat_id,
            command = %event.command,
            "명령어 수신"
        );

        let replies = self.service.handle_event(&event).await;
        for reply in replies {
            self.send_message(event.chat_id, &reply).await?;
        }

        Ok(())
    }

    /// 응답 메시지 전송.
    async fn send_message(&self, chat_id: i64, text: &str) -> ChatResult<()> {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.config.bot_token
        );

        let params = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(ChatError::NetworkError)?;

        if response.status().is_success() {
            debug!(chat_id = chat_id, "응답 전송 완료");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "응답 전송 실패");
            Err(ChatError::SendFailed(format!("HTTP {}: {}", status, body)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_get_updates_response() {
        let body = r#"{
            "ok": true,
            "result": [
                {
                    "update_id": 10,
                    "message": {
                        "message_id": 1,
                        "from": {"id": 42, "username": "user"},
                        "chat": {"id": 7},
                        "text": "/price BTC",
                        "date": 1472762067
                    }
                },
                {"update_id": 11}
            ]
        }"#;

        let updates: TelegramUpdates = serde_json::from_str(body).unwrap();
        assert!(updates.ok);
        assert_eq!(updates.result.len(), 2);

        let message = updates.result[0].message.as_ref().unwrap();
        assert_eq!(message.from.as_ref().unwrap().id, 42);
        assert_eq!(message.chat.id, 7);
        assert_eq!(message.text.as_deref(), Some("/price BTC"));
        assert!(updates.result[1].message.is_none());
    }
}
