//! 애플리케이션 로그 모델.

use super::null_default;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 로그 레벨
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "WARN")]
    Warning,
    Error,
    Critical,
    /// 목록에 없는 레벨 (예: "FATAL")
    #[serde(other)]
    Unknown,
}

impl LogLevel {
    /// 백엔드 쿼리 값
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARNING" | "WARN" => Some(LogLevel::Warning),
            "ERROR" => Some(LogLevel::Error),
            "CRITICAL" => Some(LogLevel::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 로그 한 줄 (읽기 전용, 백엔드 페이지네이션)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// MongoDB `_id` 또는 `id`
    #[serde(alias = "_id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub level: LogLevel,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub message: String,
    /// 로거 이름 (`source`로 오는 경우도 있음)
    #[serde(alias = "source", default, deserialize_with = "null_default::deserialize")]
    pub logger: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub environment: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub server: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub app_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

impl LogEntry {
    /// 예외 정보가 포함된 로그인지
    pub fn has_exception(&self) -> bool {
        self.exception_type.is_some() || self.stacktrace.is_some()
    }
}

/// `/combined_logs` 응답 항목 (`{ "log": {...} }` 래핑)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedLogItem {
    pub log: LogEntry,
}
