//! 사용자별 리포트 통화 설정 저장소.

use coinbot_core::FiatCurrency;
use std::collections::HashMap;
use tracing::debug;

/// 사용자별 리포트 통화 오버라이드.
///
/// 설정이 없는 사용자는 시스템 기본 통화를 사용합니다.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    default_currency: FiatCurrency,
    currencies: HashMap<String, FiatCurrency>,
}

impl PreferenceStore {
    /// 새 설정 저장소를 생성합니다.
    pub fn new(default_currency: FiatCurrency) -> Self {
        Self {
            default_currency,
            currencies: HashMap::new(),
        }
    }

    /// 사용자의 리포트 통화를 반환합니다 (미설정 시 기본 통화).
    pub fn currency_for(&self, id: &str) -> FiatCurrency {
        self.currencies
            .get(id)
            .copied()
            .unwrap_or(self.default_currency)
    }

    /// 주어진 토큰 목록에서 **첫 번째로 유효한** 통화를 적용합니다.
    ///
    /// 유효한 토큰이 하나도 없으면 설정을 바꾸지 않고 `None`을 반환합니다.
    pub fn set_currency(&mut self, id: &str, tokens: &[String]) -> Option<FiatCurrency> {
        let currency = tokens.iter().find_map(|t| t.parse::<FiatCurrency>().ok())?;

        debug!(user = %id, currency = %currency, "리포트 통화 설정");
        self.currencies.insert(id.to_string(), currency);
        Some(currency)
    }

    /// 시스템 기본 통화를 반환합니다.
    pub fn default_currency(&self) -> FiatCurrency {
        self.default_currency
    }
}
