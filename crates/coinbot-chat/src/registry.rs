//! 명령어 레지스트리.
//!
//! 명령어 이름 → (액션, 디스패치 그룹, 요구 역할)의 정적 매핑입니다.
//! 디스패처의 라우트 구성과 `/listCommands` 목록 생성이 모두 이 테이블을
//! 사용합니다. 시작 후에는 변경되지 않습니다.

use coinbot_core::CoinField;

/// 명령어 실행에 요구되는 최소 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// 누구나
    Any,
    /// 관리자
    Admin,
    /// 슈퍼관리자
    SuperAdmin,
}

/// 명령어가 수행하는 액션.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Deactivated → Active 전환
    StartBot,
    /// 어느 상태에서든 Deactivated 전환
    StopBot,
    /// Active → Sleeping 전환
    SleepBot,
    /// Sleeping → Active 전환
    ResumeBot,
    /// 현재 실행 상태 보고
    BotState,
    /// 관리자 추가
    AddAdmin,
    /// 관리자 제거
    RemoveAdmin,
    /// 사용자 차단
    BanUser,
    /// 차단 해제
    UnbanUser,
    /// 관리자 목록
    ListAdmins,
    /// 발신자 id 회신
    MyUserId,
    /// 사용 가능한 명령어 목록
    ListCommands,
    /// 리포트 통화 설정
    SetCurrency,
    /// 코인 리포트 (None이면 전체 정보)
    CoinReport(Option<CoinField>),
}

/// 명령어 등록 정보.
#[derive(Debug)]
pub struct CommandSpec {
    /// 명령어 이름 (선행 `/` 제외)
    pub name: &'static str,
    /// 수행 액션
    pub action: CommandAction,
    /// 디스패치 그룹 (낮은 번호가 먼저 평가됨)
    pub group: i32,
    /// 실행에 요구되는 최소 역할. 목록 노출 범위도 이 값을 따릅니다
    /// (Any는 전체 공개, 그 외는 관리자에게만 노출).
    pub role: Role,
}

/// 전체 명령어 테이블.
///
/// 그룹 0: 실행 상태 전환과 접근 제어 명령어. Deactivated 거부 규칙보다
/// 먼저 등록되어 봇이 비활성 상태여도 동작합니다.
/// 그룹 1: 일반 명령어. 폴백 핸들러가 같은 그룹 마지막에 등록됩니다.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "startBot",
        action: CommandAction::StartBot,
        group: 0,
        role: Role::Admin,
    },
    CommandSpec {
        name: "stopBot",
        action: CommandAction::StopBot,
        group: 0,
        role: Role::Admin,
    },
    CommandSpec {
        name: "sleepBot",
        action: CommandAction::SleepBot,
        group: 0,
        role: Role::Admin,
    },
    CommandSpec {
        name: "resumeBot",
        action: CommandAction::ResumeBot,
        group: 0,
        role: Role::Admin,
    },
    CommandSpec {
        name: "botState",
        action: CommandAction::BotState,
        group: 0,
        role: Role::Any,
    },
    CommandSpec {
        name: "addAdmin",
        action: CommandAction::AddAdmin,
        group: 0,
        role: Role::SuperAdmin,
    },
    CommandSpec {
        name: "removeAdmin",
        action: CommandAction::RemoveAdmin,
        group: 0,
        role: Role::SuperAdmin,
    },
    CommandSpec {
        name: "banUser",
        action: CommandAction::BanUser,
        group: 0,
        role: Role::Admin,
    },
    CommandSpec {
        name: "unbanUser",
        action: CommandAction::UnbanUser,
        group: 0,
        role: Role::Admin,
    },
    CommandSpec {
        name: "currency",
        action: CommandAction::SetCurrency,
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "price",
        action: CommandAction::CoinReport(Some(CoinField::PriceCoin)),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "fiatPrice",
        action: CommandAction::CoinReport(Some(CoinField::PriceFiat)),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "rank",
        action: CommandAction::CoinReport(Some(CoinField::Rank)),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "marketcap",
        action: CommandAction::CoinReport(Some(CoinField::MarketCap)),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "volume",
        action: CommandAction::CoinReport(Some(CoinField::Volume)),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "change1h",
        action: CommandAction::CoinReport(Some(CoinField::Change1h)),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "change24h",
        action: CommandAction::CoinReport(Some(CoinField::Change24h)),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "change7d",
        action: CommandAction::CoinReport(Some(CoinField::Change7d)),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "coinInfo",
        action: CommandAction::CoinReport(None),
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "listAdmins",
        action: CommandAction::ListAdmins,
        group: 1,
        role: Role::Admin,
    },
    CommandSpec {
        name: "myUserId",
        action: CommandAction::MyUserId,
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "listCommands",
        action: CommandAction::ListCommands,
        group: 1,
        role: Role::Any,
    },
    CommandSpec {
        name: "help",
        action: CommandAction::ListCommands,
        group: 1,
        role: Role::Any,
    },
];

/// 이름으로 명령어 등록 정보를 찾습니다.
pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_case_insensitive() {
        assert!(find_command("startBot").is_some());
        assert!(find_command("STARTBOT").is_some());
        assert!(find_command("nope").is_none());
    }

    #[test]
    fn test_command_names_unique() {
        for (i, a) in COMMANDS.iter().enumerate() {
            for b in &COMMANDS[i + 1..] {
                assert_ne!(a.name, b.name, "duplicate command name: {}", a.name);
            }
        }
    }

    #[test]
    fn test_state_commands_are_group_zero() {
        for name in ["startBot", "stopBot", "sleepBot", "resumeBot", "botState"] {
            assert_eq!(find_command(name).unwrap().group, 0);
        }
    }

    #[test]
    fn test_admin_management_requires_super_admin() {
        assert_eq!(find_command("addAdmin").unwrap().role, Role::SuperAdmin);
        assert_eq!(find_command("removeAdmin").unwrap().role, Role::SuperAdmin);
        assert_eq!(find_command("banUser").unwrap().role, Role::Admin);
    }
}
