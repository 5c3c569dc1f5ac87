//! 코인 리포트 텍스트 생성.
//!
//! 스냅샷에서 조회한 필드를 원본 그대로 이어 붙여 응답 텍스트를
//! 만듭니다. 여러 코인을 요청한 경우 찾지 못한 코인은 조용히 생략되어
//! 나머지 리포트를 막지 않습니다.

use coinbot_core::{CoinField, CoinRecord, FiatCurrency};
use coinbot_data::find_coin;
use tracing::debug;

/// 값이 없는 필드의 대체 표기.
const MISSING: &str = "-";

/// 요청된 코인들의 리포트 텍스트를 만듭니다.
///
/// `field`가 `None`이면 전체 정보를, 그 외에는 해당 필드만 출력합니다.
/// 어떤 코인도 찾지 못하면 빈 문자열을 반환합니다.
pub fn build_report(
    tickers: &[CoinRecord],
    coins: &[String],
    currency: FiatCurrency,
    default_coin: &str,
    field: Option<CoinField>,
) -> String {
    let mut out = String::new();

    for coin in coins {
        let Some(record) = find_coin(tickers, coin) else {
            debug!(coin = %coin, "코인을 찾지 못해 리포트에서 생략");
            continue;
        };

        out.push_str(&format!(
            "Name of coin: {} [{}]\n",
            record.name, record.symbol
        ));

        match field {
            None => {
                out.push_str(&format!("Rank: {}\n\n", record.rank.as_deref().unwrap_or(MISSING)));
                out.push_str(&format!(
                    "Price in {}: {}\n",
                    currency,
                    record.price_fiat(currency).unwrap_or(MISSING)
                ));
                out.push_str(&format!(
                    "Price in {}: {}\n\n",
                    default_coin,
                    record.price_in_coin(default_coin).unwrap_or(MISSING)
                ));
                out.push_str(&format!(
                    "Market Cap in {}: {}\n",
                    currency,
                    record.market_cap(currency).unwrap_or(MISSING)
                ));
                out.push_str(&format!(
                    "24h Volume in {}: {}\n\n",
                    currency,
                    record.volume_24h(currency).unwrap_or(MISSING)
                ));
                out.push_str(&format!(
                    "Change 1h: {}\n",
                    record.change_1h().unwrap_or(MISSING)
                ));
                out.push_str(&format!(
                    "Change 24h: {}\n",
                    record.change_24h().unwrap_or(MISSING)
                ));
                out.push_str(&format!(
                    "Change 7d: {}\n\n",
                    record.change_7d().unwrap_or(MISSING)
                ));
            }
            Some(CoinField::Rank) => {
                out.push_str(&format!(
                    "Rank: {}\n\n",
                    record.rank.as_deref().unwrap_or(MISSING)
                ));
            }
            Some(CoinField::PriceFiat) => {
                out.push_str(&format!(
                    "Price in {}: {}\n\n",
                    currency,
                    record.price_fiat(currency).unwrap_or(MISSING)
                ));
            }
            Some(CoinField::PriceCoin) => {
                out.push_str(&format!(
                    "Price in {}: {}\n\n",
                    default_coin,
                    record.price_in_coin(default_coin).unwrap_or(MISSING)
                ));
            }
            Some(CoinField::MarketCap) => {
                out.push_str(&format!(
                    "Market Cap in {}: {}\n\n",
                    currency,
                    record.market_cap(currency).unwrap_or(MISSING)
                ));
            }
            Some(CoinField::Volume) => {
                out.push_str(&format!(
                    "24h Volume in {}: {}\n\n",
                    currency,
                    record.volume_24h(currency).unwrap_or(MISSING)
                ));
            }
            Some(CoinField::Change1h) => {
                out.push_str(&format!(
                    "Change 1h: {}\n\n",
                    record.change_1h().unwrap_or(MISSING)
                ));
            }
            Some(CoinField::Change24h) => {
                out.push_str(&format!(
                    "Change 24h: {}\n\n",
                    record.change_24h().unwrap_or(MISSING)
                ));
            }
            Some(CoinField::Change7d) => {
                out.push_str(&format!(
                    "Change 7d: {}\n\n",
                    record.change_7d().unwrap_or(MISSING)
                ));
            }
            // 이름/심볼은 헤더에 항상 포함되므로 별도 줄이 없음
            Some(CoinField::Name) | Some(CoinField::Symbol) => {}
        }
    }

    out
}
