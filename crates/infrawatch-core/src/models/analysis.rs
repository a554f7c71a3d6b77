//! LLM 로그 분석 모델.

use serde::{Deserialize, Serialize};

/// 로그 한 건에 대한 LLM 분석 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogAnalysis {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub commands: Vec<String>,
}

/// `POST /generate_llm_analysis` 요청 본문
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub log_id: String,
    pub message: String,
    pub level: String,
    pub logger: String,
    pub environment: String,
    pub server: String,
    pub app_name: String,
}

impl From<&crate::models::log::LogEntry> for AnalysisRequest {
    fn from(entry: &crate::models::log::LogEntry) -> Self {
        Self {
            log_id: entry.id.clone(),
            message: entry.message.clone(),
            level: entry.level.as_str().to_string(),
            logger: entry.logger.clone(),
            environment: entry.environment.clone(),
            server: entry.server.clone(),
            app_name: entry.app_name.clone(),
        }
    }
}
