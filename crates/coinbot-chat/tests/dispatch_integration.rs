//! 디스패처/서비스 통합 테스트.
//!
//! 실제 디스패치 계층을 통과하는 명령어 흐름을 검증합니다:
//! 차단 거부 → 상태 전환 → 비활성 거부 → 일반 명령어 → 폴백.

use async_trait::async_trait;
use coinbot_chat::{CoinBotService, InboundEvent, RunState};
use coinbot_core::{AccessConfig, CoinRecord, FiatCurrency, GlobalStats, MarketConfig};
use coinbot_data::{DataError, MarketDataSource, SnapshotCache};

/// 통화별로 구분되는 고정 데이터를 반환하는 테스트용 소스.
///
/// 기본(USD) 스냅샷과 EUR 스냅샷의 `price_btc` 값을 다르게 두어
/// 어느 스냅샷이 조회됐는지 응답 텍스트로 확인할 수 있게 합니다.
struct FakeSource;

fn record(json: serde_json::Value) -> CoinRecord {
    serde_json::from_value(json).unwrap()
}

#[async_trait]
impl MarketDataSource for FakeSource {
    async fn fetch_tickers(
        &self,
        convert: Option<FiatCurrency>,
    ) -> Result<Vec<CoinRecord>, DataError> {
        let tickers = match convert {
            None => vec![
                record(serde_json::json!({
                    "id": "bitcoin",
                    "name": "Bitcoin",
                    "symbol": "BTC",
                    "rank": "1",
                    "price_usd": "573.137",
                    "price_btc": "1.0",
                    "24h_volume_usd": "72855700.0",
                    "market_cap_usd": "9080883500.0",
                    "percent_change_1h": "0.04",
                    "percent_change_24h": "-0.3",
                    "percent_change_7d": "-0.32"
                })),
                record(serde_json::json!({
                    "id": "ethereum",
                    "name": "Ethereum",
                    "symbol": "ETH",
                    "rank": "2",
                    "price_usd": "12.1844",
                    "price_btc": "0.021262"
                })),
            ],
            Some(FiatCurrency::Eur) => vec![record(serde_json::json!({
                "id": "bitcoin",
                "name": "Bitcoin",
                "symbol": "BTC",
                "rank": "1",
                "price_usd": "573.137",
                "price_eur": "512.70",
                "price_btc": "0.99887",
                "24h_volume_eur": "65126000.0",
                "market_cap_eur": "8118000000.0",
                "percent_change_1h": "0.04",
                "percent_change_24h": "-0.3",
                "percent_change_7d": "-0.32"
            }))],
            Some(_) => vec![record(serde_json::json!({
                "id": "bitcoin",
                "name": "Bitcoin",
                "symbol": "BTC",
                "rank": "1"
            }))],
        };
        Ok(tickers)
    }

    async fn fetch_global_stats(
        &self,
        _convert: Option<FiatCurrency>,
    ) -> Result<GlobalStats, DataError> {
        Ok(serde_json::from_value(serde_json::json!({
            "total_market_cap_usd": 201241796675.0,
            "active_currencies": 896
        }))
        .unwrap())
    }
}

fn make_service() -> CoinBotService<FakeSource> {
    let cache = SnapshotCache::new(FakeSource, FiatCurrency::Usd);
    let access = AccessConfig {
        super_admin_id: "boss".to_string(),
        admin_ids: vec!["admin".to_string(), "admin2".to_string()],
    };
    let market = MarketConfig::default();
    CoinBotService::new(cache, &access, &market)
}

fn event(command: &str, args: &[&str], sender: &str) -> InboundEvent {
    InboundEvent {
        command: command.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
        sender_id: sender.to_string(),
        chat_id: 1,
    }
}

async fn activate(service: &CoinBotService<FakeSource>) {
    let replies = service.handle_event(&event("startBot", &[], "admin")).await;
    assert_eq!(replies, vec!["Let's start working!".to_string()]);
}

#[tokio::test]
async fn test_non_admin_stop_bot_is_rejected() {
    let service = make_service();
    activate(&service).await;

    let replies = service.handle_event(&event("stopBot", &[], "user")).await;

    assert_eq!(replies, vec!["You are not my boss!".to_string()]);
    assert_eq!(service.current_state().await, RunState::Active);
}

#[tokio::test]
async fn test_start_bot_when_active_yields_single_reply() {
    let service = make_service();
    activate(&service).await;

    // 그룹 0에서 전파가 중단되므로 폴백 응답이 덧붙지 않음
    let replies = service.handle_event(&event("startBot", &[], "admin")).await;

    assert_eq!(replies, vec!["I'm already working!".to_string()]);
    assert_eq!(service.current_state().await, RunState::Active);
}

#[tokio::test]
async fn test_deactivated_vetoes_ordinary_commands() {
    let service = make_service();

    // 초기 상태는 Deactivated: 일반 명령어는 관리자라도 거부됨
    let replies = service
        .handle_event(&event("price", &["BTC"], "admin"))
        .await;
    assert_eq!(replies, vec!["I'm not working right now!".to_string()]);

    let replies = service.handle_event(&event("myUserId", &[], "user")).await;
    assert_eq!(replies, vec!["I'm not working right now!".to_string()]);

    // 상태 명령어는 같은 그룹에서 거부 규칙보다 먼저 시도됨
    let replies = service.handle_event(&event("botState", &[], "user")).await;
    assert_eq!(replies, vec!["I'm not working".to_string()]);

    activate(&service).await;

    let replies = service
        .handle_event(&event("price", &["BTC"], "admin"))
        .await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("Price in BTC"));
}

#[tokio::test]
async fn test_sleep_and_resume_cycle() {
    let service = make_service();
    activate(&service).await;

    let replies = service.handle_event(&event("sleepBot", &[], "admin")).await;
    assert_eq!(replies, vec!["Good bye!".to_string()]);
    assert_eq!(service.current_state().await, RunState::Sleeping);

    // 잠든 상태에서 sleep 재시도는 거부
    let replies = service.handle_event(&event("sleepBot", &[], "admin")).await;
    assert_eq!(replies, vec!["I'm not working right now!".to_string()]);

    let replies = service
        .handle_event(&event("resumeBot", &[], "admin"))
        .await;
    assert_eq!(replies, vec!["Let's start working again!".to_string()]);
    assert_eq!(service.current_state().await, RunState::Active);

    let replies = service
        .handle_event(&event("resumeBot", &[], "admin"))
        .await;
    assert_eq!(replies, vec!["I'm not sleeping!".to_string()]);
}

#[tokio::test]
async fn test_banned_sender_is_short_circuited() {
    let service = make_service();

    let replies = service
        .handle_event(&event("banUser", &["user1"], "admin"))
        .await;
    assert_eq!(replies, vec!["They won't bother me anymore!".to_string()]);

    // 차단 검사(그룹 -1)가 상태 명령어(그룹 0)보다 먼저 평가됨
    let replies = service.handle_event(&event("botState", &[], "user1")).await;
    assert_eq!(replies, vec!["I'm not talking to you!".to_string()]);

    let replies = service
        .handle_event(&event("unbanUser", &["user1"], "admin"))
        .await;
    assert_eq!(replies, vec!["They can talk to me again!".to_string()]);

    let replies = service.handle_event(&event("botState", &[], "user1")).await;
    assert_eq!(replies, vec!["I'm not working".to_string()]);
}

#[tokio::test]
async fn test_ban_admin_is_noop() {
    let service = make_service();
    activate(&service).await;

    let replies = service
        .handle_event(&event("banUser", &["admin2"], "admin"))
        .await;
    assert_eq!(replies, vec!["I can't ban any of those users!".to_string()]);

    // 관리자 집합과 차단 집합 모두 변화 없음
    let replies = service.handle_event(&event("listAdmins", &[], "admin")).await;
    assert!(replies[0].contains("admin2"));

    let replies = service.handle_event(&event("botState", &[], "admin2")).await;
    assert_eq!(replies, vec!["I'm working".to_string()]);
}

#[tokio::test]
async fn test_add_admin_requires_super_admin() {
    let service = make_service();

    let replies = service
        .handle_event(&event("addAdmin", &["user1"], "admin"))
        .await;
    assert_eq!(
        replies,
        vec!["Only the real boss can add new admins!".to_string()]
    );

    let replies = service
        .handle_event(&event("addAdmin", &["user1"], "boss"))
        .await;
    assert_eq!(replies, vec!["New admins added!".to_string()]);

    // 새 관리자는 관리자 명령어 사용 가능
    let replies = service.handle_event(&event("startBot", &[], "user1")).await;
    assert_eq!(replies, vec!["Let's start working!".to_string()]);
}

#[tokio::test]
async fn test_remove_admin_protects_super_admin() {
    let service = make_service();
    activate(&service).await;

    let replies = service
        .handle_event(&event("removeAdmin", &["boss", "admin2"], "boss"))
        .await;
    assert_eq!(replies, vec!["Admins removed!".to_string()]);

    let replies = service.handle_event(&event("listAdmins", &[], "boss")).await;
    assert!(replies[0].contains("boss"));
    assert!(!replies[0].contains("admin2"));
}

#[tokio::test]
async fn test_currency_preference_selects_snapshot() {
    let service = make_service();
    activate(&service).await;

    let replies = service
        .handle_event(&event("currency", &["EUR"], "user"))
        .await;
    assert_eq!(
        replies,
        vec!["Your currency now was set to EUR".to_string()]
    );

    // EUR 스냅샷에서 조회된 값 (USD 스냅샷의 price_btc는 "1.0")
    let replies = service.handle_event(&event("price", &["BTC"], "user")).await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("Price in BTC"));
    assert!(replies[0].contains("0.99887"));

    let replies = service
        .handle_event(&event("fiatPrice", &["BTC"], "user"))
        .await;
    assert!(replies[0].contains("Price in EUR: 512.70"));

    // 설정하지 않은 사용자는 기본(USD) 스냅샷 사용
    let replies = service
        .handle_event(&event("price", &["BTC"], "other"))
        .await;
    assert!(replies[0].contains("Price in BTC: 1.0"));
}

#[tokio::test]
async fn test_currency_applies_first_valid_token() {
    let service = make_service();
    activate(&service).await;

    let replies = service
        .handle_event(&event("currency", &["nope", "EUR", "KRW"], "user"))
        .await;
    assert_eq!(
        replies,
        vec!["Your currency now was set to EUR".to_string()]
    );

    let replies = service
        .handle_event(&event("currency", &["nope"], "user"))
        .await;
    assert_eq!(
        replies,
        vec!["I don't know any of those currencies!".to_string()]
    );

    let replies = service.handle_event(&event("currency", &[], "user")).await;
    assert_eq!(
        replies,
        vec!["You need to tell me which currency!".to_string()]
    );
}

#[tokio::test]
async fn test_unknown_command_falls_through_to_fallback() {
    let service = make_service();
    activate(&service).await;

    let replies = service
        .handle_event(&event("doesNotExist", &[], "user"))
        .await;
    assert_eq!(
        replies,
        vec!["Sorry, I don't understand your request".to_string()]
    );
}

#[tokio::test]
async fn test_unknown_coin_and_empty_list() {
    let service = make_service();
    activate(&service).await;

    let replies = service
        .handle_event(&event("price", &["DOGE"], "user"))
        .await;
    assert_eq!(
        replies,
        vec!["I couldn't find any of those coins!".to_string()]
    );

    let replies = service.handle_event(&event("price", &[], "user")).await;
    assert_eq!(
        replies,
        vec!["You need to tell me which coins!".to_string()]
    );

    // 여러 코인 중 일부만 찾은 경우 나머지는 생략되고 리포트는 계속됨
    let replies = service
        .handle_event(&event("rank", &["DOGE", "ETH"], "user"))
        .await;
    assert!(replies[0].contains("Ethereum"));
    assert!(!replies[0].contains("DOGE"));
}

#[tokio::test]
async fn test_list_commands_visibility() {
    let service = make_service();
    activate(&service).await;

    let replies = service
        .handle_event(&event("listCommands", &[], "user"))
        .await;
    assert!(replies[0].contains("/price"));
    assert!(replies[0].contains("/myUserId"));
    assert!(!replies[0].contains("/banUser"));
    assert!(!replies[0].contains("/addAdmin"));

    // 관리자는 관리자 전용 명령어도 봄
    let replies = service.handle_event(&event("help", &[], "admin")).await;
    assert!(replies[0].contains("/banUser"));
    assert!(replies[0].contains("/addAdmin"));
}

#[tokio::test]
async fn test_my_user_id_echoes_sender() {
    let service = make_service();
    activate(&service).await;

    let replies = service.handle_event(&event("myUserId", &[], "4242")).await;
    assert_eq!(replies, vec!["Your id is: 4242".to_string()]);
}

#[tokio::test]
async fn test_list_admins_requires_admin() {
    let service = make_service();
    activate(&service).await;

    let replies = service.handle_event(&event("listAdmins", &[], "user")).await;
    assert_eq!(replies, vec!["You are not my boss!".to_string()]);
}
