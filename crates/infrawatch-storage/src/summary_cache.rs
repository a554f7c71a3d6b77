//! 성능 요약 캐시.
//!
//! `summary-{environment}-{app}` 키에 `{ summary, timestamp }` JSON을 저장한다.
//! `now - timestamp < ttl`일 때만 적중. 저장된 값이 깨져 있으면 미스로 취급한다.

use infrawatch_core::error::CoreError;
use infrawatch_core::filter::Selection;
use infrawatch_core::ports::local_store::LocalStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// 기본 유효 기간 (5분)
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// 저장 형식
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSummary {
    pub summary: String,
    /// 저장 시각 (epoch ms)
    pub timestamp: i64,
}

/// 캐시 키
pub fn cache_key(selection: &Selection) -> String {
    format!("summary-{selection}")
}

/// 현재 시각 (epoch ms)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 요약 캐시
#[derive(Clone)]
pub struct SummaryCache {
    store: Arc<dyn LocalStore>,
    ttl_ms: i64,
}

impl SummaryCache {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self::with_ttl(store, DEFAULT_TTL)
    }

    pub fn with_ttl(store: Arc<dyn LocalStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// 유효한 캐시 요약 조회
    pub fn read(&self, selection: &Selection) -> Option<String> {
        self.read_at(selection, now_millis()).map(|hit| hit.summary)
    }

    /// 지정 시각 기준 조회
    pub fn read_at(&self, selection: &Selection, now_ms: i64) -> Option<CachedSummaryHit> {
        self.entry(selection)
            .filter(|entry| now_ms.saturating_sub(entry.timestamp) < self.ttl_ms)
            .map(|entry| CachedSummaryHit {
                summary: entry.summary,
                stored_at: entry.timestamp,
            })
    }

    /// 요약 저장 (현재 시각)
    pub fn write(&self, selection: &Selection, summary: &str) -> Result<(), CoreError> {
        self.write_at(selection, summary, now_millis())
    }

    /// 지정 시각으로 저장
    pub fn write_at(&self, selection: &Selection, summary: &str, now_ms: i64) -> Result<(), CoreError> {
        let entry = CachedSummary {
            summary: summary.to_string(),
            timestamp: now_ms,
        };
        let key = cache_key(selection);
        self.store.set(&key, &serde_json::to_string(&entry)?)?;
        debug!("요약 캐시 저장: {key}");
        Ok(())
    }

    /// 항목 삭제 (강제 새로고침)
    pub fn invalidate(&self, selection: &Selection) -> Result<(), CoreError> {
        self.store.remove(&cache_key(selection))
    }

    fn entry(&self, selection: &Selection) -> Option<CachedSummary> {
        let key = cache_key(selection);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("요약 캐시 조회 실패: {key}: {e}");
                return None;
            }
        };
        match serde_json::from_str::<CachedSummary>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("요약 캐시 항목 손상, 무시: {key}: {e}");
                None
            }
        }
    }
}

/// 캐시 적중 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSummaryHit {
    pub summary: String,
    /// 저장 시각 (epoch ms)
    pub stored_at: i64,
}
