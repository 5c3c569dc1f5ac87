//! # Coinbot Chat
//!
//! 명령어 디스패치, 접근 제어, 텔레그램 전송 계층.
//!
//! 인바운드 명령어는 우선순위 그룹 순서로 평가되는 인터셉터 체인을
//! 통과합니다: 차단 사용자 거부(-1) → 실행 상태/관리 명령어(0) →
//! 일반 명령어와 폴백(1). 그룹 0 이하의 핸들러는 매칭 시 전파를
//! 중단합니다.
//!
//! # 지원 명령어
//!
//! - `/startBot` `/stopBot` `/sleepBot` `/resumeBot` - 실행 상태 전환 (관리자)
//! - `/botState` - 현재 상태 조회
//! - `/addAdmin` `/removeAdmin` - 관리자 관리 (슈퍼관리자)
//! - `/banUser` `/unbanUser` `/listAdmins` - 접근 제어 (관리자)
//! - `/currency` - 리포트 통화 설정
//! - `/price` `/fiatPrice` `/rank` `/marketcap` `/volume`
//!   `/change1h` `/change24h` `/change7d` `/coinInfo` - 코인 리포트
//! - `/myUserId` `/listCommands` `/help` - 정보 조회

pub mod dispatch;
pub mod identity;
pub mod preference;
pub mod registry;
pub mod report;
pub mod run_state;
pub mod service;
pub mod telegram;
pub mod types;

pub use dispatch::*;
pub use identity::*;
pub use preference::*;
pub use registry::*;
pub use run_state::*;
pub use service::*;
pub use telegram::*;
pub use types::*;
