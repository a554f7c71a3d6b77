//! 챗봇 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 메시지 발신 주체
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
    Error,
}

/// 대화 메시지 (순서가 있는 인메모리 시퀀스에 추가됨)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", alias = "role")]
    pub role: ChatRole,
    /// 구버전 히스토리는 `message` 필드를 쓴다
    #[serde(alias = "message", default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp: Some(Utc::now().to_rfc3339()),
            context: None,
        }
    }

    /// 컨텍스트가 비어 있지 않은지
    pub fn has_context(&self) -> bool {
        match &self.context {
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(serde_json::Value::Null) | None => false,
            Some(_) => true,
        }
    }
}

/// `POST /chat/message` 요청 본문
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// `POST /chat/message` 응답
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
