//! 대시보드 통계 모델.

use serde::{Deserialize, Serialize};

/// `{ "_id": "ERROR", "count": 12 }` 형태의 집계 버킷
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBucket {
    #[serde(rename = "_id", alias = "id")]
    pub key: String,
    #[serde(default)]
    pub count: u64,
}

/// `/dashboard_stats` 응답
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub error_stats: Vec<StatBucket>,
    #[serde(default)]
    pub health_stats: Vec<StatBucket>,
}

impl DashboardStats {
    /// 전체 애플리케이션 에러 수
    pub fn total_errors(&self) -> u64 {
        self.error_stats.iter().map(|s| s.count).sum()
    }

    /// 특정 상태의 서버 수 (예: "Good")
    pub fn health_count(&self, key: &str) -> u64 {
        self.health_stats
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.count)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.error_stats.is_empty() && self.health_stats.is_empty()
    }
}

/// 앱 로그 목록 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStats {
    pub total_logs: u64,
    pub critical_count: u64,
    pub error_count: u64,
    pub warning_count: u64,
    pub info_count: u64,
}
