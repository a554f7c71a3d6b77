//! 챗봇 세션.
//!
//! 사용자 메시지는 전송 전에 추가되고, 응답 또는 오류 메시지는 전송 후에 추가된다.
//! 전송이 성공하면 서버 이력을 다시 읽는다.

use chrono::Utc;
use infrawatch_core::error::CoreError;
use infrawatch_core::filter::Selection;
use infrawatch_core::models::chat::{ChatMessage, ChatRequest, ChatRole};
use infrawatch_core::ports::dashboard_api::DashboardApi;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

pub const GREETING: &str =
    "Hello! I'm your infrastructure monitoring assistant. How can I help you today?";

pub const CHAT_UNAVAILABLE: &str =
    "I'm having trouble connecting to the server. Please try again in a moment.";

/// 이력 조회 개수
pub const HISTORY_LIMIT: u32 = 50;

pub struct ChatSession {
    api: Arc<dyn DashboardApi>,
    messages: Vec<ChatMessage>,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            messages: vec![greeting()],
            history: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// 마지막으로 읽은 서버 이력
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// 서버 이력 로드. 비어 있지 않으면 화면 메시지도 교체한다.
    pub async fn load_history(&mut self) -> usize {
        self.history = self.api.chat_history(HISTORY_LIMIT, None).await;
        if !self.history.is_empty() {
            self.messages = self.history.clone();
        }
        self.history.len()
    }

    /// 메시지 전송. 공백 입력은 무시하고 None.
    pub async fn send(&mut self, input: &str, selection: &Selection) -> Option<&ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::new(
            Uuid::new_v4().to_string(),
            ChatRole::User,
            text,
        ));

        let now = Utc::now();
        let request = ChatRequest {
            message: text.to_string(),
            context: json!({
                "environment": selection.environment,
                "application": selection.application,
                "timestamp": now.to_rfc3339(),
            }),
            timestamp: now,
        };

        match self.api.send_chat(&request).await {
            Ok(reply) => {
                let mut message =
                    ChatMessage::new(Uuid::new_v4().to_string(), ChatRole::Bot, reply.response);
                message.context = reply.context;
                if reply.timestamp.is_some() {
                    message.timestamp = reply.timestamp;
                }
                self.messages.push(message);
                self.history = self.api.chat_history(HISTORY_LIMIT, None).await;
                debug!("챗봇 응답 수신, 이력 {}건", self.history.len());
            }
            Err(e) => {
                warn!("챗봇 요청 실패: {e}");
                self.messages.push(ChatMessage::new(
                    Uuid::new_v4().to_string(),
                    ChatRole::Error,
                    CHAT_UNAVAILABLE,
                ));
            }
        }
        self.messages.last()
    }

    /// 서버 이력 삭제 후 인사말만 남긴다
    pub async fn clear(&mut self) -> Result<(), CoreError> {
        self.api.clear_chat_history().await?;
        self.messages = vec![greeting()];
        self.history.clear();
        Ok(())
    }

    /// 응답 메시지의 컨텍스트 상세
    pub async fn context(&self, message_id: &str) -> Result<serde_json::Value, CoreError> {
        self.api.chat_context(message_id).await
    }
}

fn greeting() -> ChatMessage {
    ChatMessage::new("greeting", ChatRole::Bot, GREETING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    #[tokio::test]
    async fn starts_with_greeting() {
        let session = ChatSession::new(Arc::new(FakeApi::default()));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, GREETING);
        assert_eq!(session.messages()[0].role, ChatRole::Bot);
    }

    #[tokio::test]
    async fn send_appends_user_then_bot() {
        let api = Arc::new(FakeApi::default());
        *api.chat_reply.lock() = Some("CPU is fine.".to_string());
        api.history
            .lock()
            .push(ChatMessage::new("h1", ChatRole::User, "earlier"));
        let mut session = ChatSession::new(api.clone());

        let reply = session
            .send("  how is prod?  ", &Selection::new("Production", "All"))
            .await
            .unwrap();
        assert_eq!(reply.role, ChatRole::Bot);
        assert!(reply.has_context());

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "how is prod?");
        assert_eq!(messages[2].content, "CPU is fine.");
        assert_eq!(session.history().len(), 1);

        let sent = api.sent_chats.lock();
        assert_eq!(sent[0].message, "how is prod?");
        assert_eq!(sent[0].context["environment"], "Production");
    }

    #[tokio::test]
    async fn failure_appends_error_message() {
        let api = Arc::new(FakeApi::default());
        let mut session = ChatSession::new(api);

        let reply = session.send("hello", &Selection::all()).await.unwrap();
        assert_eq!(reply.role, ChatRole::Error);
        assert_eq!(reply.content, CHAT_UNAVAILABLE);
        assert_eq!(session.messages().len(), 3);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let api = Arc::new(FakeApi::default());
        let mut session = ChatSession::new(api.clone());
        assert!(session.send("   ", &Selection::all()).await.is_none());
        assert_eq!(session.messages().len(), 1);
        assert!(api.sent_chats.lock().is_empty());
    }

    #[tokio::test]
    async fn history_replaces_messages_and_clear_resets() {
        let api = Arc::new(FakeApi::default());
        api.history.lock().extend([
            ChatMessage::new("1", ChatRole::User, "q"),
            ChatMessage::new("2", ChatRole::Bot, "a"),
        ]);
        let mut session = ChatSession::new(api.clone());

        assert_eq!(session.load_history().await, 2);
        assert_eq!(session.messages().len(), 2);

        session.clear().await.unwrap();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, GREETING);
        assert!(api.history.lock().is_empty());
    }
}
