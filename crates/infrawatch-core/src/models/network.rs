//! 네트워크 메트릭 모델.

use serde::{Deserialize, Serialize};

/// 네트워크 요청 로그 한 건
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkLog {
    #[serde(alias = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub source_ip: String,
    #[serde(default)]
    pub destination_ip: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub bytes_transferred: u64,
    /// "Success" 또는 실패 사유
    #[serde(default)]
    pub status: String,
    /// 응답 시간 (ms)
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub app_name: String,
}

impl NetworkLog {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// 네트워크 통계 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    #[serde(alias = "total_requests", default)]
    pub total_requests: u64,
    #[serde(alias = "successful_requests", default)]
    pub successful_requests: u64,
    #[serde(alias = "failed_requests", default)]
    pub failed_requests: u64,
    /// 평균 응답 시간 (ms, 반올림)
    #[serde(alias = "avg_response_time", default)]
    pub avg_response_time: f64,
    /// 총 전송량 (bytes)
    #[serde(alias = "total_bandwidth", default)]
    pub total_bandwidth: u64,
}

impl NetworkStats {
    /// 로그 목록에서 통계를 직접 계산 (백엔드가 통계를 주지 않을 때)
    pub fn from_logs(logs: &[NetworkLog]) -> Self {
        let total_requests = logs.len() as u64;
        let successful_requests = logs.iter().filter(|l| l.is_success()).count() as u64;
        let avg_response_time = if logs.is_empty() {
            0.0
        } else {
            (logs.iter().map(|l| l.response_time).sum::<f64>() / logs.len() as f64).round()
        };
        Self {
            total_requests,
            successful_requests,
            failed_requests: total_requests - successful_requests,
            avg_response_time,
            total_bandwidth: logs.iter().map(|l| l.bytes_transferred).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_requests == 0
    }
}

/// 바이트 수를 사람이 읽기 쉬운 단위로 (Bytes/KB/MB/GB)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
