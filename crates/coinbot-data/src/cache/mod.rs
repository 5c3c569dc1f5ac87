//! 캐싱 레이어.
//!
//! - Snapshot 캐시: 통화별 티커/통계 TTL 게이트 캐싱

pub mod snapshot;

pub use snapshot::{find_coin, SnapshotCache};
