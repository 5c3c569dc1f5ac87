//! 암호화폐 챗봇 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 봇 시작 (토큰은 환경 변수로 전달 가능)
//! COINBOT__TELEGRAM__BOT_TOKEN=... coinbot start --config config/default.toml
//!
//! # 설정 검증 및 업스트림 연결 확인
//! coinbot check --config config/default.toml
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use coinbot_chat::{CoinBotService, TelegramTransport};
use coinbot_core::{init_logging, AppConfig, LogConfig, LogFormat};
use coinbot_data::{CoinMarketCapClient, MarketDataSource, SnapshotCache};

#[derive(Parser)]
#[command(name = "coinbot")]
#[command(about = "Crypto chat bot - 암호화폐 시세 텔레그램 봇", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 봇 시작 (스냅샷 Warmup 후 폴링 루프 실행)
    Start {
        /// 설정 파일
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,
    },

    /// 설정 검증 및 업스트림 연결 확인
    Check {
        /// 설정 파일
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { config } => start(&config).await,
        Commands::Check { config } => check(&config).await,
    }
}

/// 설정을 로드하고 봇을 구동합니다.
async fn start(path: &str) -> anyhow::Result<()> {
    let config = load_config(path)?;

    let log_config = LogConfig::new(&config.logging.level)
        .with_format(config.logging.format.parse::<LogFormat>().unwrap_or_default());
    init_logging(log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let client = CoinMarketCapClient::new(Duration::from_secs(config.market.request_timeout_secs))?
        .with_base_url(config.market.base_url.clone());

    let cache = SnapshotCache::new(client, config.market.default_currency)
        .with_refresh_interval(chrono::Duration::seconds(
            config.market.refresh_interval_secs as i64,
        ));

    let service = Arc::new(CoinBotService::new(cache, &config.access, &config.market));

    info!("스냅샷 Warmup 시작");
    service.cache().warmup().await;

    let transport = TelegramTransport::new(config.telegram.clone(), service);
    transport.start_polling().await;

    Ok(())
}

/// 설정과 업스트림 연결을 점검합니다.
async fn check(path: &str) -> anyhow::Result<()> {
    let config = load_config(path)?;
    println!("✅ 설정 검증 통과: {}", path);
    println!("  관리자 수: {}", config.access.admin_ids.len() + 1);
    println!("  갱신 간격: {}초", config.market.refresh_interval_secs);
    println!("  기본 통화: {}", config.market.default_currency);

    let client = CoinMarketCapClient::new(Duration::from_secs(config.market.request_timeout_secs))?
        .with_base_url(config.market.base_url.clone());

    match client.fetch_global_stats(None).await {
        Ok(stats) => {
            println!(
                "✅ 업스트림 연결 확인 (활성 마켓: {}개)",
                stats.active_markets.unwrap_or(0)
            );
        }
        Err(e) => {
            println!("❌ 업스트림 연결 실패: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

fn load_config(path: &str) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load(path).with_context(|| format!("설정 로드 실패: {}", path))?;
    config.validate()?;
    Ok(config)
}
