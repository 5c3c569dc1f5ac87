//! 신원 레지스트리.
//!
//! 슈퍼관리자 / 관리자 / 차단 사용자의 3단계 신원 모델을 관리합니다.
//!
//! 불변식:
//! - 슈퍼관리자는 항상 관리자 집합에 포함되고 절대 제거되지 않습니다.
//! - 관리자와 차단 집합은 서로 배타적입니다. 관리자 차단 시도는
//!   조용히 강등시키는 대신 해당 id를 건너뜁니다.

use tracing::{debug, warn};

/// 슈퍼관리자, 관리자 집합, 차단 집합을 보관하는 신원 레지스트리.
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    super_admin: String,
    admins: Vec<String>,
    banned: Vec<String>,
}

impl IdentityRegistry {
    /// 새 레지스트리를 생성합니다.
    ///
    /// 슈퍼관리자는 생성 시점에 고정되며 관리자 집합에 항상 포함됩니다.
    pub fn new(super_admin: impl Into<String>, initial_admins: &[String]) -> Self {
        let super_admin = super_admin.into();
        let mut registry = Self {
            admins: vec![super_admin.clone()],
            banned: Vec::new(),
            super_admin,
        };
        registry.add_admins(initial_admins);
        registry
    }

    /// 관리자인지 확인합니다.
    pub fn is_admin(&self, id: &str) -> bool {
        self.admins.iter().any(|a| a == id)
    }

    /// 슈퍼관리자인지 확인합니다.
    pub fn is_super_admin(&self, id: &str) -> bool {
        self.super_admin == id
    }

    /// 차단된 사용자인지 확인합니다.
    pub fn is_banned(&self, id: &str) -> bool {
        self.banned.iter().any(|b| b == id)
    }

    /// 슈퍼관리자 식별자를 반환합니다.
    pub fn super_admin(&self) -> &str {
        &self.super_admin
    }

    /// 관리자 목록을 반환합니다.
    pub fn admins(&self) -> &[String] {
        &self.admins
    }

    /// 관리자를 추가합니다.
    ///
    /// 이미 관리자이거나 차단된 id는 건너뜁니다 (멱등).
    pub fn add_admins(&mut self, ids: &[String]) {
        for id in ids {
            if self.is_admin(id) {
                continue;
            }
            if self.is_banned(id) {
                warn!(user = %id, "차단된 사용자는 관리자로 추가할 수 없음");
                continue;
            }
            debug!(user = %id, "관리자 추가");
            self.admins.push(id.clone());
        }
    }

    /// 관리자를 제거합니다.
    ///
    /// 슈퍼관리자는 절대 제거되지 않습니다 (에러 없는 보호 no-op).
    pub fn remove_admins(&mut self, ids: &[String]) {
        for id in ids {
            if *id == self.super_admin {
                warn!(user = %id, "슈퍼관리자는 제거할 수 없음");
                continue;
            }
            self.admins.retain(|a| a != id);
        }
    }

    /// 사용자를 차단합니다.
    ///
    /// 관리자 차단은 거부됩니다 (해당 id만 no-op). 실제로 차단된 id
    /// 목록을 반환합니다.
    pub fn ban(&mut self, ids: &[String]) -> Vec<String> {
        let mut newly_banned = Vec::new();
        for id in ids {
            if self.is_admin(id) {
                warn!(user = %id, "관리자는 차단할 수 없음");
                continue;
            }
            if self.is_banned(id) {
                continue;
            }
            debug!(user = %id, "사용자 차단");
            self.banned.push(id.clone());
            newly_banned.push(id.clone());
        }
        newly_banned
    }

    /// 사용자 차단을 해제합니다.
    pub fn unban(&mut self, ids: &[String]) {
        for id in ids {
            self.banned.retain(|b| b != id);
        }
    }
}
