//! 화면별 뷰 모델.
//!
//! 각 뷰는 `fetch`(요청 + 태그)와 `apply`(태그 확인 후 반영)로 나뉜다.
//! `load`는 둘을 이어 호출한다. 선택이 바뀐 뒤 도착한 응답은 `apply`에서 버려진다.

pub mod app_logs;
pub mod network_metrics;
pub mod overview;
pub mod server_metrics;

use infrawatch_core::models::metric::{MetricSample, ServerHealth};
use std::collections::HashSet;
use std::fmt;

/// 소수 둘째 자리 반올림
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `(server, environment)` 중복 제거 (먼저 나온 항목 유지)
pub fn dedup_metrics(metrics: Vec<MetricSample>) -> Vec<MetricSample> {
    let mut seen = HashSet::new();
    metrics
        .into_iter()
        .filter(|m| seen.insert((m.server.clone(), m.environment.clone())))
        .collect()
}

/// 서버 집계
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServerStats {
    pub total: usize,
    /// Good
    pub healthy: usize,
    /// Critical 또는 Bad
    pub critical: usize,
    pub avg_cpu: f64,
    pub avg_memory: f64,
    pub avg_disk: f64,
}

impl ServerStats {
    pub fn from_metrics(metrics: &[MetricSample]) -> Self {
        if metrics.is_empty() {
            return Self::default();
        }
        let total = metrics.len();
        let n = total as f64;
        let avg = |f: fn(&MetricSample) -> f64| round2(metrics.iter().map(f).sum::<f64>() / n);

        Self {
            total,
            healthy: metrics
                .iter()
                .filter(|m| m.server_health == ServerHealth::Good)
                .count(),
            critical: metrics
                .iter()
                .filter(|m| m.server_health.is_critical())
                .count(),
            avg_cpu: avg(|m| m.cpu_usage),
            avg_memory: avg(|m| m.memory_usage),
            avg_disk: avg(|m| m.disk_utilization),
        }
    }
}

/// 위험 등급 (요인 1개 medium, 2개 high, 3개 이상 critical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        })
    }
}

/// 메트릭 기반 위험 평가
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskAssessment {
    pub factors: Vec<&'static str>,
}

impl RiskAssessment {
    pub fn of(sample: &MetricSample) -> Self {
        let mut factors = Vec::new();

        let mut check = |value: f64, critical: f64, high: f64, labels: [&'static str; 2]| {
            if value > critical {
                factors.push(labels[0]);
            } else if value > high {
                factors.push(labels[1]);
            }
        };
        check(sample.cpu_usage, 90.0, 80.0, ["Critical CPU usage", "High CPU usage"]);
        check(sample.memory_usage, 90.0, 80.0, ["Critical memory usage", "High memory usage"]);
        check(sample.disk_utilization, 90.0, 85.0, ["Critical disk usage", "High disk usage"]);
        check(sample.cpu_temp, 80.0, 75.0, ["Critical CPU temperature", "High CPU temperature"]);

        match sample.server_health {
            ServerHealth::Critical => factors.push("Critical health status"),
            ServerHealth::Bad | ServerHealth::Warning => factors.push("Poor health status"),
            _ => {}
        }

        Self { factors }
    }

    pub fn is_at_risk(&self) -> bool {
        !self.factors.is_empty()
    }

    pub fn level(&self) -> Option<RiskLevel> {
        match self.factors.len() {
            0 => None,
            1 => Some(RiskLevel::Medium),
            2 => Some(RiskLevel::High),
            _ => Some(RiskLevel::Critical),
        }
    }
}
