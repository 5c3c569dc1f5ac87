//! CoinMarketCap 공개 API 클라이언트.
//!
//! v1 공개 API를 통해 코인 티커와 시장 전체 통계를 조회합니다.
//!
//! # 지원 엔드포인트
//!
//! - `/v1/ticker/` - 코인 티커 목록 (`convert` 파라미터로 통화 변환)
//! - `/v1/global/` - 시장 전체 통계
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use coinbot_data::provider::CoinMarketCapClient;
//!
//! let client = CoinMarketCapClient::new(Duration::from_secs(10))?;
//! let tickers = client.fetch_tickers(Some(FiatCurrency::Eur)).await?;
//! ```

use async_trait::async_trait;
use coinbot_core::{CoinRecord, FiatCurrency, GlobalStats};
use std::time::Duration;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::provider::MarketDataSource;

/// 기본 업스트림 URL.
const DEFAULT_BASE_URL: &str = "https://api.coinmarketcap.com";

/// CoinMarketCap 공개 API 클라이언트.
#[derive(Clone)]
pub struct CoinMarketCapClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinMarketCapClient {
    /// 새로운 클라이언트를 생성합니다.
    ///
    /// 업스트림 요청은 반드시 타임아웃 하에서 실행됩니다.
    /// 타임아웃은 요청 실패로 처리되어 캐시의 갱신 시각을 건드리지 않습니다.
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// 업스트림 기본 URL을 변경합니다 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        convert: Option<FiatCurrency>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.get(&url);
        if let Some(currency) = convert {
            request = request.query(&[("convert", currency.as_str())]);
        }

        debug!(url = %url, convert = ?convert.map(|c| c.as_str()), "업스트림 요청");

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(DataError::FetchError(format!(
                "업스트림 응답 오류: HTTP {}",
                response.status()
            )));
        }

        let parsed = response.json::<T>().await?;
        Ok(parsed)
    }
}

#[async_trait]
impl MarketDataSource for CoinMarketCapClient {
    async fn fetch_tickers(&self, convert: Option<FiatCurrency>) -> Result<Vec<CoinRecord>> {
        let tickers: Vec<CoinRecord> = self.get_json("/v1/ticker/", convert).await?;

        debug!(
            count = tickers.len(),
            convert = ?convert.map(|c| c.as_str()),
            "티커 수신"
        );
        Ok(tickers)
    }

    async fn fetch_global_stats(&self, convert: Option<FiatCurrency>) -> Result<GlobalStats> {
        let stats: GlobalStats = self.get_json("/v1/global/", convert).await?;
        Ok(stats)
    }
}
