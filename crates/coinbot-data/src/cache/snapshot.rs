//! 통화별 TTL 게이트 스냅샷 캐시.
//!
//! 요청 한도가 있는 업스트림 앞단에서 통화별 스냅샷(티커 목록 + 시장 통계)을
//! 보관하고, 같은 통화에 대한 업스트림 호출을 갱신 간격당 최대 한 번으로
//! 제한합니다.
//!
//! # 동작 흐름
//!
//! ```text
//! 요청 (currency)
//!         │
//!         ▼
//! ┌─────────────────────┐
//! │ 1. 통화별 Lock 획득  │ ← 같은 통화는 하나만 처리 (중복 fetch 방지)
//! └──────────┬──────────┘
//!            │
//!      ┌─────┴──────┐
//!      │ TTL 만료?   │ ← 갱신 시각 없음(최초)도 만료로 취급
//!      └─────┬──────┘
//!        NO  │  YES
//!            │   │
//!            │   ▼
//!            │ ┌──────────────────────┐
//!            │ │ 2. 업스트림 fetch     │ ← 성공 시에만 갱신 시각 기록
//!            │ │    실패 → 스테일 반환  │
//!            │ └──────────┬───────────┘
//!            ▼            ▼
//!      ┌─────────────────────┐
//!      │ 3. 스냅샷 반환        │
//!      └─────────────────────┘
//! ```
//!
//! 갱신 시각은 fetch가 성공했을 때에만 전진합니다. 실패한 fetch가 시각을
//! 전진시키면 다음 간격까지 재시도가 막히기 때문입니다. 중복 fetch는
//! 통화별 쓰기 잠금이 막습니다.

use chrono::{DateTime, Duration, Utc};
use coinbot_core::{CoinRecord, FiatCurrency, GlobalStats};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};
use crate::provider::MarketDataSource;

/// 통화별 스냅샷 슬롯.
///
/// 티커와 통계는 독립적으로 갱신됩니다. `None` 갱신 시각은
/// "한 번도 갱신되지 않음"을 뜻하는 센티널로, 최초 조회 시 반드시
/// 업스트림 fetch가 일어나도록 보장합니다.
#[derive(Default)]
struct CurrencySlot {
    tickers: Option<Arc<Vec<CoinRecord>>>,
    stats: Option<Arc<GlobalStats>>,
    tickers_refreshed_at: Option<DateTime<Utc>>,
    stats_refreshed_at: Option<DateTime<Utc>>,
}

/// 통화별 TTL 게이트 스냅샷 캐시.
///
/// 스냅샷은 부분 수정 없이 통째로 교체되며, 소비자는 `Arc`로 공유되는
/// 동일한 스냅샷 객체를 받습니다.
pub struct SnapshotCache<S: MarketDataSource> {
    source: S,
    /// 기본 리포트 통화 (변환 파라미터 없는 업스트림 요청 사용)
    default_currency: FiatCurrency,
    /// 같은 통화/아티팩트에 대한 업스트림 재조회 최소 간격
    refresh_interval: Duration,
    /// 통화별 슬롯 맵
    slots: RwLock<HashMap<FiatCurrency, Arc<RwLock<CurrencySlot>>>>,
}

impl<S: MarketDataSource> SnapshotCache<S> {
    /// 새 스냅샷 캐시를 생성합니다 (기본 갱신 간격 300초).
    pub fn new(source: S, default_currency: FiatCurrency) -> Self {
        Self {
            source,
            default_currency,
            refresh_interval: Duration::seconds(300),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// 갱신 간격을 설정합니다.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// 현재 갱신 간격을 반환합니다.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// 갱신 간격을 변경합니다.
    pub fn set_refresh_interval(&mut self, interval: Duration) {
        self.refresh_interval = interval;
    }

    /// 통화별 슬롯을 가져오거나 생성합니다.
    async fn slot(&self, currency: FiatCurrency) -> Arc<RwLock<CurrencySlot>> {
        let slots = self.slots.read().await;
        if let Some(slot) = slots.get(&currency) {
            return slot.clone();
        }
        drop(slots);

        let mut slots = self.slots.write().await;
        slots.entry(currency).or_default().clone()
    }

    /// 업스트림 요청에 쓸 변환 파라미터.
    ///
    /// 기본 통화는 변환 파라미터 없는 요청을 사용합니다.
    fn convert_param(&self, currency: FiatCurrency) -> Option<FiatCurrency> {
        if currency == self.default_currency {
            None
        } else {
            Some(currency)
        }
    }

    fn expired(&self, refreshed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match refreshed_at {
            Some(at) => now - at > self.refresh_interval,
            None => true,
        }
    }

    /// 통화별 티커 스냅샷 조회 (필요 시 갱신).
    pub async fn get_tickers(&self, currency: FiatCurrency) -> Result<Arc<Vec<CoinRecord>>> {
        let slot = self.slot(currency).await;
        let mut guard = slot.write().await;

        if self.expired(guard.tickers_refreshed_at, Utc::now()) {
            debug!(currency = %currency, "티커 스냅샷 갱신 시작");
            match self.source.fetch_tickers(self.convert_param(currency)).await {
                Ok(tickers) => {
                    guard.tickers = Some(Arc::new(tickers));
                    guard.tickers_refreshed_at = Some(Utc::now());
                }
                Err(e) => match &guard.tickers {
                    Some(stale) => {
                        warn!(currency = %currency, error = %e, "티커 갱신 실패, 캐시된 스냅샷 사용");
                        return Ok(stale.clone());
                    }
                    None => return Err(e),
                },
            }
        }

        guard
            .tickers
            .clone()
            .ok_or_else(|| DataError::NoData(format!("{} 티커 스냅샷 없음", currency)))
    }

    /// 통화별 시장 통계 스냅샷 조회 (필요 시 갱신).
    pub async fn get_stats(&self, currency: FiatCurrency) -> Result<Arc<GlobalStats>> {
        let slot = self.slot(currency).await;
        let mut guard = slot.write().await;

        if self.expired(guard.stats_refreshed_at, Utc::now()) {
            debug!(currency = %currency, "통계 스냅샷 갱신 시작");
            match self
                .source
                .fetch_global_stats(self.convert_param(currency))
                .await
            {
                Ok(stats) => {
                    guard.stats = Some(Arc::new(stats));
                    guard.stats_refreshed_at = Some(Utc::now());
                }
                Err(e) => match &guard.stats {
                    Some(stale) => {
                        warn!(currency = %currency, error = %e, "통계 갱신 실패, 캐시된 스냅샷 사용");
                        return Ok(stale.clone());
                    }
                    None => return Err(e),
                },
            }
        }

        guard
            .stats
            .clone()
            .ok_or_else(|| DataError::NoData(format!("{} 통계 스냅샷 없음", currency)))
    }

    /// 지원되는 모든 통화의 스냅샷을 미리 채웁니다.
    ///
    /// 시작 시 한 번 호출됩니다. 개별 통화의 실패는 경고로 남기고
    /// 계속 진행하며, 성공한 fetch 수를 반환합니다.
    pub async fn warmup(&self) -> usize {
        let mut fetched = 0;

        for currency in FiatCurrency::ALL {
            match self.get_stats(currency).await {
                Ok(_) => fetched += 1,
                Err(e) => warn!(currency = %currency, error = %e, "통계 Warmup 실패"),
            }
            match self.get_tickers(currency).await {
                Ok(tickers) => {
                    debug!(currency = %currency, count = tickers.len(), "티커 Warmup 완료");
                    fetched += 1;
                }
                Err(e) => warn!(currency = %currency, error = %e, "티커 Warmup 실패"),
            }
        }

        info!(fetched = fetched, "스냅샷 Warmup 완료");
        fetched
    }
}

/// 티커 목록에서 코인을 찾습니다.
///
/// 식별자는 심볼, 표시 이름, 내부 id 어느 것이든 될 수 있고 대소문자를
/// 구분하지 않습니다. 서로 다른 레코드가 같은 식별자와 충돌할 수 있으므로
/// **목록 순서상 첫 번째 일치**를 결정적으로 선택합니다.
pub fn find_coin<'a>(tickers: &'a [CoinRecord], identifier: &str) -> Option<&'a CoinRecord> {
    tickers.iter().find(|t| t.matches_identifier(identifier))
}
