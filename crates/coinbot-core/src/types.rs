//! 암호화폐 시세 도메인 타입.
//!
//! 이 모듈은 봇이 다루는 시세 데이터 타입을 정의합니다:
//! - `FiatCurrency` - 지원되는 15개 법정통화
//! - `CoinField` - 코인 리포트 필드 구분
//! - `CoinRecord` - 업스트림 티커 레코드
//! - `GlobalStats` - 시장 전체 통계

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 리포트 통화로 지원되는 법정통화.
///
/// 업스트림 API의 `convert` 파라미터가 지원하는 통화 집합과 동일합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FiatCurrency {
    /// 미국 달러
    Usd,
    /// 호주 달러
    Aud,
    /// 브라질 헤알
    Brl,
    /// 캐나다 달러
    Cad,
    /// 스위스 프랑
    Chf,
    /// 중국 위안
    Cny,
    /// 유로
    Eur,
    /// 영국 파운드
    Gbp,
    /// 홍콩 달러
    Hkd,
    /// 인도네시아 루피아
    Idr,
    /// 인도 루피
    Inr,
    /// 일본 엔
    Jpy,
    /// 한국 원
    Krw,
    /// 멕시코 페소
    Mxn,
    /// 러시아 루블
    Rub,
}

impl FiatCurrency {
    /// 지원되는 전체 통화 목록.
    pub const ALL: [FiatCurrency; 15] = [
        FiatCurrency::Usd,
        FiatCurrency::Aud,
        FiatCurrency::Brl,
        FiatCurrency::Cad,
        FiatCurrency::Chf,
        FiatCurrency::Cny,
        FiatCurrency::Eur,
        FiatCurrency::Gbp,
        FiatCurrency::Hkd,
        FiatCurrency::Idr,
        FiatCurrency::Inr,
        FiatCurrency::Jpy,
        FiatCurrency::Krw,
        FiatCurrency::Mxn,
        FiatCurrency::Rub,
    ];

    /// 대문자 통화 코드를 반환합니다 (예: "USD").
    pub fn as_str(&self) -> &'static str {
        match self {
            FiatCurrency::Usd => "USD",
            FiatCurrency::Aud => "AUD",
            FiatCurrency::Brl => "BRL",
            FiatCurrency::Cad => "CAD",
            FiatCurrency::Chf => "CHF",
            FiatCurrency::Cny => "CNY",
            FiatCurrency::Eur => "EUR",
            FiatCurrency::Gbp => "GBP",
            FiatCurrency::Hkd => "HKD",
            FiatCurrency::Idr => "IDR",
            FiatCurrency::Inr => "INR",
            FiatCurrency::Jpy => "JPY",
            FiatCurrency::Krw => "KRW",
            FiatCurrency::Mxn => "MXN",
            FiatCurrency::Rub => "RUB",
        }
    }

    /// 업스트림 필드 키에 쓰이는 소문자 코드를 반환합니다 (예: "usd").
    pub fn key(&self) -> &'static str {
        match self {
            FiatCurrency::Usd => "usd",
            FiatCurrency::Aud => "aud",
            FiatCurrency::Brl => "brl",
            FiatCurrency::Cad => "cad",
            FiatCurrency::Chf => "chf",
            FiatCurrency::Cny => "cny",
            FiatCurrency::Eur => "eur",
            FiatCurrency::Gbp => "gbp",
            FiatCurrency::Hkd => "hkd",
            FiatCurrency::Idr => "idr",
            FiatCurrency::Inr => "inr",
            FiatCurrency::Jpy => "jpy",
            FiatCurrency::Krw => "krw",
            FiatCurrency::Mxn => "mxn",
            FiatCurrency::Rub => "rub",
        }
    }
}

impl Default for FiatCurrency {
    fn default() -> Self {
        Self::Usd
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FiatCurrency {
    type Err = String;

    /// 대소문자 구분 없이 통화 코드를 파싱합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unsupported currency: {}", s))
    }
}

/// 코인 리포트에서 요청된 필드 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinField {
    /// 코인 이름
    Name,
    /// 심볼
    Symbol,
    /// 시가총액 순위
    Rank,
    /// 기준 코인 표시 가격 (예: BTC)
    PriceCoin,
    /// 법정통화 표시 가격
    PriceFiat,
    /// 시가총액
    MarketCap,
    /// 24시간 거래량
    Volume,
    /// 1시간 변동률
    Change1h,
    /// 24시간 변동률
    Change24h,
    /// 7일 변동률
    Change7d,
}

/// 업스트림 티커 레코드 하나.
///
/// 업스트림 v1 API는 수치 필드를 문자열로 내려주며, 통화 변환 필드의 키가
/// 요청 통화에 따라 달라집니다 (`price_eur`, `market_cap_eur` 등).
/// 고정 필드 외의 값은 키-값 맵으로 보존하고 접근자를 통해 조회합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinRecord {
    /// 업스트림 내부 식별자 (예: "bitcoin")
    pub id: String,
    /// 표시 이름 (예: "Bitcoin")
    pub name: String,
    /// 심볼 (예: "BTC")
    pub symbol: String,
    /// 시가총액 순위 (문자열 그대로 전달됨)
    #[serde(default)]
    pub rank: Option<String>,
    /// 통화 접미사가 붙는 나머지 필드들
    #[serde(flatten)]
    pub fields: HashMap<String, Option<String>>,
}

impl CoinRecord {
    /// 임의의 업스트림 필드 값을 조회합니다.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    /// 법정통화 표시 가격 (`price_usd` 등).
    pub fn price_fiat(&self, currency: FiatCurrency) -> Option<&str> {
        self.fields
            .get(&format!("price_{}", currency.key()))
            .and_then(|v| v.as_deref())
    }

    /// 기준 코인 표시 가격 (`price_btc` 등).
    pub fn price_in_coin(&self, coin: &str) -> Option<&str> {
        self.fields
            .get(&format!("price_{}", coin.to_ascii_lowercase()))
            .and_then(|v| v.as_deref())
    }

    /// 시가총액 (`market_cap_usd` 등).
    pub fn market_cap(&self, currency: FiatCurrency) -> Option<&str> {
        self.fields
            .get(&format!("market_cap_{}", currency.key()))
            .and_then(|v| v.as_deref())
    }

    /// 24시간 거래량 (`24h_volume_usd` 등).
    pub fn volume_24h(&self, currency: FiatCurrency) -> Option<&str> {
        self.fields
            .get(&format!("24h_volume_{}", currency.key()))
            .and_then(|v| v.as_deref())
    }

    /// 1시간 변동률.
    pub fn change_1h(&self) -> Option<&str> {
        self.field("percent_change_1h")
    }

    /// 24시간 변동률.
    pub fn change_24h(&self) -> Option<&str> {
        self.field("percent_change_24h")
    }

    /// 7일 변동률.
    pub fn change_7d(&self) -> Option<&str> {
        self.field("percent_change_7d")
    }

    /// 식별자가 이 레코드를 가리키는지 확인합니다.
    ///
    /// 업스트림 데이터 특성상 심볼, 표시 이름, 내부 id 어느 것으로도
    /// 조회될 수 있으며 대소문자를 구분하지 않습니다.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(identifier)
            || self.name.eq_ignore_ascii_case(identifier)
            || self.id.eq_ignore_ascii_case(identifier)
    }
}

/// 시장 전체 통계.
///
/// 티커와 달리 업스트림 `/global/` 응답은 수치를 JSON 숫자로 내려줍니다.
/// 통화 접미사 필드는 맵으로 보존합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalStats {
    /// 비트코인 시장 점유율 (%)
    #[serde(default)]
    pub bitcoin_percentage_of_market_cap: Option<f64>,
    /// 활성 통화 수
    #[serde(default)]
    pub active_currencies: Option<u32>,
    /// 활성 자산 수
    #[serde(default)]
    pub active_assets: Option<u32>,
    /// 활성 마켓 수
    #[serde(default)]
    pub active_markets: Option<u32>,
    /// 통화 접미사가 붙는 나머지 필드들
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl GlobalStats {
    /// 전체 시가총액 (`total_market_cap_usd` 등).
    pub fn total_market_cap(&self, currency: FiatCurrency) -> Option<f64> {
        self.number(&format!("total_market_cap_{}", currency.key()))
    }

    /// 전체 24시간 거래량 (`total_24h_volume_usd` 등).
    pub fn total_volume_24h(&self, currency: FiatCurrency) -> Option<f64> {
        self.number(&format!("total_24h_volume_{}", currency.key()))
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(|v| v.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CoinRecord {
        serde_json::from_value(serde_json::json!({
            "id": "bitcoin",
            "name": "Bitcoin",
            "symbol": "BTC",
            "rank": "1",
            "price_usd": "573.137",
            "price_btc": "1.0",
            "price_eur": "512.70",
            "24h_volume_usd": "72855700.0",
            "market_cap_usd": "9080883500.0",
            "percent_change_1h": "0.04",
            "percent_change_24h": "-0.3",
            "percent_change_7d": "-0.32",
            "last_updated": "1472762067"
        }))
        .unwrap()
    }

    #[test]
    fn test_fiat_currency_from_str() {
        assert_eq!("usd".parse::<FiatCurrency>().unwrap(), FiatCurrency::Usd);
        assert_eq!("EUR".parse::<FiatCurrency>().unwrap(), FiatCurrency::Eur);
        assert_eq!(" krw ".parse::<FiatCurrency>().unwrap(), FiatCurrency::Krw);
        assert!("XYZ".parse::<FiatCurrency>().is_err());
    }

    #[test]
    fn test_fiat_currency_codes_consistent() {
        assert_eq!(FiatCurrency::ALL.len(), 15);
        for c in FiatCurrency::ALL {
            assert_eq!(c.as_str().to_lowercase(), c.key());
        }
    }

    #[test]
    fn test_coin_record_accessors() {
        let record = sample_record();
        assert_eq!(record.price_fiat(FiatCurrency::Usd), Some("573.137"));
        assert_eq!(record.price_fiat(FiatCurrency::Eur), Some("512.70"));
        assert_eq!(record.price_in_coin("BTC"), Some("1.0"));
        assert_eq!(record.volume_24h(FiatCurrency::Usd), Some("72855700.0"));
        assert_eq!(record.market_cap(FiatCurrency::Usd), Some("9080883500.0"));
        assert_eq!(record.change_24h(), Some("-0.3"));
        assert_eq!(record.price_fiat(FiatCurrency::Jpy), None);
    }

    #[test]
    fn test_coin_record_matches_identifier() {
        let record = sample_record();
        assert!(record.matches_identifier("btc"));
        assert!(record.matches_identifier("BITCOIN"));
        assert!(record.matches_identifier("Bitcoin"));
        assert!(!record.matches_identifier("ETH"));
    }

    #[test]
    fn test_global_stats_accessors() {
        let stats: GlobalStats = serde_json::from_value(serde_json::json!({
            "total_market_cap_usd": 201241796675.0,
            "total_24h_volume_usd": 4548680009.0,
            "bitcoin_percentage_of_market_cap": 62.54,
            "active_currencies": 896,
            "active_markets": 6439,
            "last_updated": 1472762058
        }))
        .unwrap();

        assert_eq!(
            stats.total_market_cap(FiatCurrency::Usd),
            Some(201241796675.0)
        );
        assert_eq!(stats.total_market_cap(FiatCurrency::Eur), None);
        assert_eq!(stats.bitcoin_percentage_of_market_cap, Some(62.54));
        assert_eq!(stats.active_markets, Some(6439));
    }
}
