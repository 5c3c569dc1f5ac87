//! 봇 서비스.
//!
//! 프로세스 전체에서 단 하나의 서비스 인스턴스가 신원 레지스트리,
//! 실행 상태 머신, 통화 설정 저장소, 스냅샷 캐시를 소유합니다.
//! 인스턴스 간 암묵적 공유 상태는 없습니다.
//!
//! 이벤트 처리는 업데이트 단위로 순차적입니다. 상태는 `RwLock` 뒤에
//! 있어 동시 처리로 바뀌어도 키 단위 직렬화가 유지됩니다.

use coinbot_core::{AccessConfig, CoinField, MarketConfig};
use coinbot_data::{MarketDataSource, SnapshotCache};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::dispatch::Dispatcher;
use crate::identity::IdentityRegistry;
use crate::preference::PreferenceStore;
use crate::registry::{CommandAction, CommandSpec, Role, COMMANDS};
use crate::report;
use crate::run_state::{RunState, RunStateMachine};
use crate::types::InboundEvent;

/// 명령어 핸들러와 상태를 소유하는 봇 서비스.
pub struct CoinBotService<S: MarketDataSource> {
    identity: RwLock<IdentityRegistry>,
    run_state: RwLock<RunStateMachine>,
    preferences: RwLock<PreferenceStore>,
    cache: SnapshotCache<S>,
    dispatcher: Dispatcher,
    /// 코인 표시 가격의 기준 코인 (예: "BTC")
    default_coin: String,
}

impl<S: MarketDataSource> CoinBotService<S> {
    /// 새 봇 서비스를 생성합니다.
    pub fn new(cache: SnapshotCache<S>, access: &AccessConfig, market: &MarketConfig) -> Self {
        Self {
            identity: RwLock::new(IdentityRegistry::new(
                access.super_admin_id.clone(),
                &access.admin_ids,
            )),
            run_state: RwLock::new(RunStateMachine::new()),
            preferences: RwLock::new(PreferenceStore::new(market.default_currency)),
            cache,
            dispatcher: Dispatcher::new(),
            default_coin: market.default_coin.clone(),
        }
    }

    /// 인바운드 이벤트 하나를 처리하고 응답 목록을 반환합니다.
    pub async fn handle_event(&self, event: &InboundEvent) -> Vec<String> {
        debug!(
            command = %event.command,
            sender = %event.sender_id,
            args = event.args.len(),
            "명령어 수신"
        );
        self.dispatcher.dispatch(self, event).await
    }

    /// 현재 실행 상태를 반환합니다.
    pub async fn current_state(&self) -> RunState {
        self.run_state.read().await.current()
    }

    /// 스냅샷 캐시에 대한 참조.
    pub fn cache(&self) -> &SnapshotCache<S> {
        &self.cache
    }

    pub(crate) fn identity(&self) -> &RwLock<IdentityRegistry> {
        &self.identity
    }

    pub(crate) fn run_state(&self) -> &RwLock<RunStateMachine> {
        &self.run_state
    }

    /// 레지스트리 항목 하나를 실행합니다.
    ///
    /// 역할 검사를 통과하지 못하면 비즈니스 로직에 도달하지 않고
    /// 고정 거부 텍스트를 반환합니다.
    pub(crate) async fn execute(&self, spec: &CommandSpec, event: &InboundEvent) -> String {
        if !self.authorized(spec.role, &event.sender_id).await {
            debug!(
                command = %event.command,
                sender = %event.sender_id,
                "권한 없는 명령어 거부"
            );
            return rejection_reply(spec.action).to_string();
        }

        match spec.action {
            CommandAction::StartBot => self.start_bot().await,
            CommandAction::StopBot => self.stop_bot().await,
            CommandAction::SleepBot => self.sleep_bot().await,
            CommandAction::ResumeBot => self.resume_bot().await,
            CommandAction::BotState => self.run_state.read().await.label().to_string(),
            CommandAction::AddAdmin => self.add_admins(event).await,
            CommandAction::RemoveAdmin => self.remove_admins(event).await,
            CommandAction::BanUser => self.ban_users(event).await,
            CommandAction::UnbanUser => self.unban_users(event).await,
            CommandAction::ListAdmins => self.identity.read().await.admins().join("\n"),
            CommandAction::MyUserId => format!("Your id is: {}", event.sender_id),
            CommandAction::ListCommands => self.list_commands(event).await,
            CommandAction::SetCurrency => self.set_currency(event).await,
            CommandAction::CoinReport(field) => self.coin_report(event, field).await,
        }
    }

    async fn authorized(&self, role: Role, sender_id: &str) -> bool {
        match role {
            Role::Any => true,
            Role::Admin => self.identity.read().await.is_admin(sender_id),
            Role::SuperAdmin => self.identity.read().await.is_super_admin(sender_id),
        }
    }

    async fn start_bot(&self) -> String {
        match self.run_state.write().await.start() {
            Ok(()) => "Let's start working!".to_string(),
            Err(_) => "I'm already working!".to_string(),
        }
    }

    async fn stop_bot(&self) -> String {
        self.run_state.write().await.stop();
        "Good bye!".to_string()
    }

    async fn sleep_bot(&self) -> String {
        match self.run_state.write().await.sleep() {
            Ok(()) => "Good bye!".to_string(),
            Err(_) => "I'm not working right now!".to_string(),
        }
    }

    async fn resume_bot(&self) -> String {
        match self.run_state.write().await.resume() {
            Ok(()) => "Let's start working again!".to_string(),
            Err(_) => "I'm not sleeping!".to_string(),
        }
    }

    async fn add_admins(&self, event: &InboundEvent) -> String {
        if event.args.is_empty() {
            return "You need to tell me which users!".to_string();
        }
        self.identity.write().await.add_admins(&event.args);
        "New admins added!".to_string()
    }

    async fn remove_admins(&self, event: &InboundEvent) -> String {
        if event.args.is_empty() {
            return "You need to tell me which users!".to_string();
        }
        self.identity.write().await.remove_admins(&event.args);
        "Admins removed!".to_string()
    }

    async fn ban_users(&self, event: &InboundEvent) -> String {
        if event.args.is_empty() {
            return "You need to tell me which users!".to_string();
        }
        let banned = self.identity.write().await.ban(&event.args);
        if banned.is_empty() {
            "I can't ban any of those users!".to_string()
        } else {
            "They won't bother me anymore!".to_string()
        }
    }

    async fn unban_users(&self, event: &InboundEvent) -> String {
        if event.args.is_empty() {
            return "You need to tell me which users!".to_string();
        }
        self.identity.write().await.unban(&event.args);
        "They can talk to me again!".to_string()
    }

    async fn list_commands(&self, event: &InboundEvent) -> String {
        let is_admin = self.identity.read().await.is_admin(&event.sender_id);

        let mut out = String::from("Here is what I can do for you:\n");
        for spec in COMMANDS {
            // 관리자 전용 명령어는 관리자에게만 보여줌
            if spec.role == Role::Any || is_admin {
                out.push_str(&format!("/{}\n", spec.name));
            }
        }
        out
    }

    async fn set_currency(&self, event: &InboundEvent) -> String {
        if event.args.is_empty() {
            return "You need to tell me which currency!".to_string();
        }

        match self
            .preferences
            .write()
            .await
            .set_currency(&event.sender_id, &event.args)
        {
            Some(currency) => format!("Your currency now was set to {}", currency),
            None => "I don't know any of those currencies!".to_string(),
        }
    }

    async fn coin_report(&self, event: &InboundEvent, field: Option<CoinField>) -> String {
        if event.args.is_empty() {
            return "You need to tell me which coins!".to_string();
        }

        let currency = self
            .preferences
            .read()
            .await
            .currency_for(&event.sender_id);

        let tickers = match self.cache.get_tickers(currency).await {
            Ok(tickers) => tickers,
            Err(e) => {
                warn!(currency = %currency, error = %e, "티커 스냅샷 조회 실패");
                return "I couldn't reach the market data right now!".to_string();
            }
        };

        let report =
            report::build_report(&tickers, &event.args, currency, &self.default_coin, field);

        if report.is_empty() {
            "I couldn't find any of those coins!".to_string()
        } else {
            report
        }
    }
}

/// 역할 검사 실패 시의 고정 거부 텍스트.
fn rejection_reply(action: CommandAction) -> &'static str {
    match action {
        CommandAction::AddAdmin => "Only the real boss can add new admins!",
        CommandAction::RemoveAdmin => "Only the real boss can remove admins!",
        _ => "You are not my boss!",
    }
}
