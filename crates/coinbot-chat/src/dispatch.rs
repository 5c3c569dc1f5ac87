//! 우선순위 그룹 기반 명령어 디스패처.
//!
//! 라우트는 (그룹, 술어, 액션, 전파 중단 여부) 튜플의 정렬된 목록입니다.
//! 그룹은 오름차순으로 평가되고, 그룹 안에서는 등록 순서대로 첫 번째로
//! 매칭된 라우트 하나만 실행됩니다. 실행된 라우트가 전파 중단을
//! 표시하면 이후 그룹은 평가되지 않습니다.
//!
//! 고정 계층:
//! - 그룹 -1: 차단 사용자 거부 (무조건 전파 중단)
//! - 그룹 0: 실행 상태 전환/접근 제어 명령어 (모두 전파 중단),
//!   이어서 Deactivated 상태 거부 규칙. 거부 규칙은 현재 상태를 보는
//!   정적 라우트이므로 상태 전환 시 라우트 테이블을 바꿀 필요가 없습니다.
//! - 그룹 1: 일반 명령어, 마지막에 알 수 없는 명령어 폴백.

use coinbot_data::MarketDataSource;
use tracing::debug;

use crate::registry::{CommandSpec, COMMANDS};
use crate::run_state::RunState;
use crate::service::CoinBotService;
use crate::types::InboundEvent;

/// 차단된 사용자에게 보내는 고정 응답.
pub const BANNED_REPLY: &str = "I'm not talking to you!";
/// 비활성 상태에서 일반 명령어에 보내는 고정 응답.
pub const INACTIVE_REPLY: &str = "I'm not working right now!";
/// 알 수 없는 명령어에 보내는 고정 응답.
pub const UNKNOWN_REPLY: &str = "Sorry, I don't understand your request";

/// 라우트 매칭 술어.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePredicate {
    /// 발신자가 차단 집합에 포함됨
    SenderBanned,
    /// 실행 상태가 Deactivated이면 모든 명령어에 매칭
    WhileDeactivated,
    /// 명령어 이름 일치 (대소문자 무시)
    Command(&'static str),
    /// 모든 명령어에 매칭 (폴백)
    AnyCommand,
}

/// 라우트가 실행하는 액션.
#[derive(Debug, Clone, Copy)]
pub enum RouteAction {
    /// 고정 텍스트 응답
    Static(&'static str),
    /// 레지스트리에 등록된 명령어 핸들러 호출
    Invoke(&'static CommandSpec),
}

/// 디스패치 라우트 하나.
#[derive(Debug)]
pub struct Route {
    /// 평가 그룹 (낮은 번호 먼저)
    pub group: i32,
    /// 매칭 술어
    pub predicate: RoutePredicate,
    /// 실행 액션
    pub action: RouteAction,
    /// 매칭 시 이후 그룹 평가를 중단할지 여부
    pub stops_on_match: bool,
}

/// 명령어 디스패처.
///
/// 라우트 테이블은 시작 시 한 번 구성되고 이후 변경되지 않습니다.
pub struct Dispatcher {
    routes: Vec<Route>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// 고정 계층 라우트 테이블을 구성합니다.
    pub fn new() -> Self {
        let mut routes = Vec::new();

        // 그룹 -1: 차단 검사
        routes.push(Route {
            group: -1,
            predicate: RoutePredicate::SenderBanned,
            action: RouteAction::Static(BANNED_REPLY),
            stops_on_match: true,
        });

        // 그룹 0: 상태 전환/접근 제어 명령어 (테이블 등록 순서 유지)
        for spec in COMMANDS.iter().filter(|c| c.group <= 0) {
            routes.push(Route {
                group: spec.group,
                predicate: RoutePredicate::Command(spec.name),
                action: RouteAction::Invoke(spec),
                stops_on_match: true,
            });
        }

        // 그룹 0 마지막: Deactivated 거부. 상태 명령어들이 같은 그룹에서
        // 먼저 시도되므로 비활성 상태에서도 봇을 되살릴 수 있습니다.
        routes.push(Route {
            group: 0,
            predicate: RoutePredicate::WhileDeactivated,
            action: RouteAction::Static(INACTIVE_REPLY),
            stops_on_match: true,
        });

        // 그룹 1: 일반 명령어 (종단 그룹이므로 전파 중단 불필요)
        for spec in COMMANDS.iter().filter(|c| c.group > 0) {
            routes.push(Route {
                group: spec.group,
                predicate: RoutePredicate::Command(spec.name),
                action: RouteAction::Invoke(spec),
                stops_on_match: false,
            });
        }

        // 폴백: 반드시 마지막 등록. 같은 그룹에서 앞선 매칭이 있으면
        // 도달하지 않습니다.
        routes.push(Route {
            group: 1,
            predicate: RoutePredicate::AnyCommand,
            action: RouteAction::Static(UNKNOWN_REPLY),
            stops_on_match: false,
        });

        Self { routes }
    }

    /// 등록된 라우트 목록.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// 이벤트 하나를 디스패치하고 생성된 응답 목록을 반환합니다.
    ///
    /// 고정 계층에서는 이벤트당 정확히 하나의 응답이 생성됩니다.
    pub async fn dispatch<S: MarketDataSource>(
        &self,
        service: &CoinBotService<S>,
        event: &InboundEvent,
    ) -> Vec<String> {
        let mut groups: Vec<i32> = self.routes.iter().map(|r| r.group).collect();
        groups.sort_unstable();
        groups.dedup();

        let mut replies = Vec::new();

        'groups: for group in groups {
            for route in self.routes.iter().filter(|r| r.group == group) {
                if !self.matches(&route.predicate, service, event).await {
                    continue;
                }

                debug!(
                    command = %event.command,
                    sender = %event.sender_id,
                    group = group,
                    predicate = ?route.predicate,
                    "라우트 매칭"
                );

                let reply = match route.action {
                    RouteAction::Static(text) => text.to_string(),
                    RouteAction::Invoke(spec) => service.execute(spec, event).await,
                };
                replies.push(reply);

                if route.stops_on_match {
                    break 'groups;
                }
                // 그룹당 최대 하나의 핸들러만 실행
                continue 'groups;
            }
        }

        replies
    }

    async fn matches<S: MarketDataSource>(
        &self,
        predicate: &RoutePredicate,
        service: &CoinBotService<S>,
        event: &InboundEvent,
    ) -> bool {
        match predicate {
            RoutePredicate::SenderBanned => {
                service.identity().read().await.is_banned(&event.sender_id)
            }
            RoutePredicate::WhileDeactivated => {
                service.run_state().read().await.current() == RunState::Deactivated
            }
            RoutePredicate::Command(name) => event.command.eq_ignore_ascii_case(name),
            RoutePredicate::AnyCommand => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ban_check_is_first_route() {
        let dispatcher = Dispatcher::new();
        let first = &dispatcher.routes()[0];

        assert_eq!(first.group, -1);
        assert_eq!(first.predicate, RoutePredicate::SenderBanned);
        assert!(first.stops_on_match);
    }

    #[test]
    fn test_fallback_is_last_route() {
        let dispatcher = Dispatcher::new();
        let last = dispatcher.routes().last().unwrap();

        assert_eq!(last.group, 1);
        assert_eq!(last.predicate, RoutePredicate::AnyCommand);
        assert!(!last.stops_on_match);
    }

    #[test]
    fn test_deactivated_veto_follows_state_commands() {
        let dispatcher = Dispatcher::new();
        let veto_index = dispatcher
            .routes()
            .iter()
            .position(|r| r.predicate == RoutePredicate::WhileDeactivated)
            .unwrap();

        // 거부 규칙은 그룹 0이며 그룹 0 명령어 라우트 뒤에 등록됨
        assert_eq!(dispatcher.routes()[veto_index].group, 0);
        for route in &dispatcher.routes()[..veto_index] {
            assert!(route.group <= 0);
        }
    }

    #[test]
    fn test_group_zero_routes_all_stop() {
        let dispatcher = Dispatcher::new();
        for route in dispatcher.routes().iter().filter(|r| r.group <= 0) {
            assert!(route.stops_on_match, "group <=0 route must stop: {:?}", route);
        }
    }
}
