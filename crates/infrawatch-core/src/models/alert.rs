//! 알림 모델.
//!
//! 백엔드 알림은 화면용 `{kind, title, message}` 형태로 단방향 변환된다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 백엔드 활성/이력 알림
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(alias = "_id", default)]
    pub id: String,
    /// critical, error, warning, info ...
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub alertname: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub server_name: Option<String>,
    /// Prometheus 라벨 (server_name이 없을 때)
    #[serde(default)]
    pub instance: Option<String>,
    /// 짧은 코드 (Prod, Dev ...)
    #[serde(default)]
    pub environment: String,
    #[serde(rename = "startsAt", alias = "starts_at", default)]
    pub starts_at: Option<String>,
}

/// 화면 표시용 알림 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Error,
    Warning,
    Info,
}

impl AlertKind {
    /// 심각도 → 유형 (critical/error→Error, warning→Warning, 그 외 Info)
    pub fn from_severity(severity: &str) -> Self {
        match severity.trim().to_ascii_lowercase().as_str() {
            "critical" | "error" => AlertKind::Error,
            "warning" => AlertKind::Warning,
            _ => AlertKind::Info,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(AlertKind::Error),
            "warning" => Some(AlertKind::Warning),
            "info" => Some(AlertKind::Info),
            _ => None,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertKind::Error => "error",
            AlertKind::Warning => "warning",
            AlertKind::Info => "info",
        };
        f.write_str(s)
    }
}

/// 화면 표시용 알림
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayAlert {
    pub id: String,
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub server: Option<String>,
    pub environment: String,
    pub starts_at: Option<String>,
}

impl From<&Alert> for DisplayAlert {
    fn from(alert: &Alert) -> Self {
        let server = alert
            .server_name
            .clone()
            .or_else(|| alert.instance.clone());
        let title = alert
            .alertname
            .clone()
            .or_else(|| alert.summary.clone())
            .unwrap_or_else(|| "Unknown Alert".to_string());
        let message = alert
            .summary
            .clone()
            .or_else(|| alert.description.clone())
            .unwrap_or_else(|| {
                format!(
                    "Alert on {} (Env: {})",
                    server.as_deref().unwrap_or("unknown"),
                    alert.environment
                )
            });

        Self {
            id: alert.id.clone(),
            kind: AlertKind::from_severity(&alert.severity),
            title,
            message,
            server,
            environment: alert.environment.clone(),
            starts_at: alert.starts_at.clone(),
        }
    }
}
