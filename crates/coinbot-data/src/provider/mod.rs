//! 업스트림 시세 데이터 제공자.

pub mod coinmarketcap;

use async_trait::async_trait;
use coinbot_core::{CoinRecord, FiatCurrency, GlobalStats};

use crate::error::Result;

pub use coinmarketcap::CoinMarketCapClient;

/// 시세 데이터 소스 트레잇.
///
/// `convert`가 `None`이면 변환 파라미터 없는 기본 요청을 보냅니다
/// (기본 통화 USD 표시 필드만 포함됨).
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 코인 티커 목록 조회.
    async fn fetch_tickers(&self, convert: Option<FiatCurrency>) -> Result<Vec<CoinRecord>>;

    /// 시장 전체 통계 조회.
    async fn fetch_global_stats(&self, convert: Option<FiatCurrency>) -> Result<GlobalStats>;
}
