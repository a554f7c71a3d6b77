//! 예측 유지보수 모델.

use serde::{Deserialize, Serialize};

/// 예측 신뢰도
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// 장애 위험 플래그. 어떤 메트릭 카드에 "Failure Risk" 배지를 붙일지 결정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictiveFlag {
    pub server_name: String,
    /// 짧은 코드 (Prod, Dev ...)
    pub environment: String,
    #[serde(default)]
    pub predicted_issue: String,
    #[serde(default)]
    pub confidence: Confidence,
}

/// 서버 단위 예측 분석 상세
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictiveAnalysis {
    #[serde(default)]
    pub predicted_issue: String,
    #[serde(default)]
    pub preventive_actions: Vec<String>,
    #[serde(default)]
    pub current_state_summary: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub prediction_timestamp: Option<String>,
}
