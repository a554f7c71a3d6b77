//! 서버 메트릭 모델.

use super::null_default;
use serde::{Deserialize, Serialize};

/// 서버 상태 등급
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerHealth {
    Good,
    Warning,
    Bad,
    Critical,
    /// 백엔드가 알 수 없는 값을 보낸 경우
    #[default]
    #[serde(other)]
    Unknown,
}

impl ServerHealth {
    /// Critical 또는 Bad
    pub fn is_critical(self) -> bool {
        matches!(self, ServerHealth::Critical | ServerHealth::Bad)
    }
}

/// 서버 1대의 메트릭 샘플
///
/// 고유 키: `(server, environment)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// 로컬 서버 ID (예: "server1")
    pub server: String,
    /// 환경 (화면 표기 또는 짧은 코드)
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub environment: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub app_name: String,
    /// CPU 사용률 (%)
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub cpu_usage: f64,
    /// 메모리 사용률 (%)
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub memory_usage: f64,
    /// 디스크 사용률 (%)
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub disk_utilization: f64,
    /// CPU 온도 (°C)
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub cpu_temp: f64,
    /// 전력 소비 (W)
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub power_consumption: f64,
    /// 클럭 속도 (GHz)
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub clock_speed: f64,
    #[serde(default)]
    pub cache_miss_rate: Option<f64>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub server_health: ServerHealth,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub ip_address: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub cpu_name: String,
}

impl MetricSample {
    /// 고유 키 `(server, environment)`
    pub fn key(&self) -> (&str, &str) {
        (&self.server, &self.environment)
    }
}
