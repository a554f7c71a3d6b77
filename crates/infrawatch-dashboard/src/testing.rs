//! 테스트용 가짜 `DashboardApi`.

use async_trait::async_trait;
use infrawatch_core::error::CoreError;
use infrawatch_core::filter::Selection;
use infrawatch_core::models::alert::Alert;
use infrawatch_core::models::analysis::{AnalysisRequest, LogAnalysis};
use infrawatch_core::models::catalog::EnvironmentCatalog;
use infrawatch_core::models::chat::{ChatMessage, ChatReply, ChatRequest};
use infrawatch_core::models::log::CombinedLogItem;
use infrawatch_core::models::metric::MetricSample;
use infrawatch_core::models::page::Page;
use infrawatch_core::models::predictive::{PredictiveAnalysis, PredictiveFlag};
use infrawatch_core::models::stats::DashboardStats;
use infrawatch_core::ports::dashboard_api::{
    AlertHistoryQuery, AlertQuery, DashboardApi, LogPage, LogQuery, NetworkPage, NetworkQuery,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 응답을 미리 채워 두는 가짜 API
#[derive(Default)]
pub struct FakeApi {
    pub stats: Mutex<DashboardStats>,
    pub metrics: Mutex<Vec<MetricSample>>,
    pub network: Mutex<Option<NetworkPage>>,
    pub logs: Mutex<Option<LogPage>>,
    pub catalog: Mutex<Option<EnvironmentCatalog>>,
    pub alerts: Mutex<Vec<Alert>>,
    pub flags: Mutex<Vec<PredictiveFlag>>,
    pub analyses: Mutex<HashMap<String, LogAnalysis>>,
    pub predictive: Mutex<Option<PredictiveAnalysis>>,
    /// None이면 send_chat 실패
    pub chat_reply: Mutex<Option<String>>,
    pub history: Mutex<Vec<ChatMessage>>,
    pub sent_chats: Mutex<Vec<ChatRequest>>,
    pub log_queries: Mutex<Vec<LogQuery>>,
    pub network_queries: Mutex<Vec<NetworkQuery>>,
    pub metric_calls: AtomicUsize,
    pub alert_calls: AtomicUsize,
    /// 서버 메트릭 응답 지연
    pub metrics_delay: Mutex<Option<Duration>>,
}

impl FakeApi {
    pub fn metric_calls(&self) -> usize {
        self.metric_calls.load(Ordering::SeqCst)
    }

    pub fn alert_calls(&self) -> usize {
        self.alert_calls.load(Ordering::SeqCst)
    }
}

pub fn sample(server: &str, environment: &str) -> MetricSample {
    MetricSample {
        server: server.to_string(),
        environment: environment.to_string(),
        ..Default::default()
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn dashboard_stats(&self, _selection: &Selection) -> DashboardStats {
        self.stats.lock().clone()
    }

    async fn server_metrics(&self, _selection: &Selection) -> Vec<MetricSample> {
        self.metric_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.metrics_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.metrics.lock().clone()
    }

    async fn network_metrics(&self, query: &NetworkQuery) -> NetworkPage {
        self.network_queries.lock().push(query.clone());
        self.network
            .lock()
            .clone()
            .unwrap_or_else(|| Page::empty(query.page.limit))
    }

    async fn app_logs(&self, query: &LogQuery) -> LogPage {
        self.log_queries.lock().push(query.clone());
        self.logs
            .lock()
            .clone()
            .unwrap_or_else(|| Page::empty(query.page.limit))
    }

    async fn environments(&self) -> EnvironmentCatalog {
        self.catalog
            .lock()
            .clone()
            .unwrap_or_else(EnvironmentCatalog::fallback)
    }

    async fn applications(&self, environment: Option<&str>) -> Vec<String> {
        let catalog = self.environments().await;
        environment
            .and_then(|env| catalog.applications.get(env).cloned())
            .unwrap_or_default()
    }

    async fn active_alerts(&self, _query: &AlertQuery) -> Vec<Alert> {
        self.alert_calls.fetch_add(1, Ordering::SeqCst);
        self.alerts.lock().clone()
    }

    async fn alert_history(&self, _query: &AlertHistoryQuery) -> Vec<Alert> {
        self.alerts.lock().clone()
    }

    async fn predictive_flags(&self, _selection: &Selection) -> Vec<PredictiveFlag> {
        self.flags.lock().clone()
    }

    async fn predictive_analysis(
        &self,
        server: &str,
        _environment: &str,
    ) -> Result<PredictiveAnalysis, CoreError> {
        self.predictive
            .lock()
            .clone()
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "PredictiveAnalysis".to_string(),
                id: server.to_string(),
            })
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, CoreError> {
        self.sent_chats.lock().push(request.clone());
        let reply = self.chat_reply.lock().clone();
        match reply {
            Some(response) => Ok(ChatReply {
                response,
                context: Some(serde_json::json!({"servers": 1})),
                timestamp: Some("2025-06-06T10:00:00Z".to_string()),
            }),
            None => Err(CoreError::Network("connection refused".to_string())),
        }
    }

    async fn chat_history(&self, _limit: u32, _session_id: Option<&str>) -> Vec<ChatMessage> {
        self.history.lock().clone()
    }

    async fn clear_chat_history(&self) -> Result<(), CoreError> {
        self.history.lock().clear();
        Ok(())
    }

    async fn chat_context(&self, message_id: &str) -> Result<serde_json::Value, CoreError> {
        Ok(serde_json::json!({ "message_id": message_id }))
    }

    async fn log_analysis(&self, log_id: &str) -> Result<LogAnalysis, CoreError> {
        self.analyses
            .lock()
            .get(log_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "LogAnalysis".to_string(),
                id: log_id.to_string(),
            })
    }

    async fn generate_log_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<LogAnalysis, CoreError> {
        let analysis = LogAnalysis {
            issue: format!("generated for {}", request.log_id),
            ..Default::default()
        };
        self.analyses
            .lock()
            .insert(request.log_id.clone(), analysis.clone());
        Ok(analysis)
    }

    async fn combined_logs(&self, _selection: &Selection) -> Vec<CombinedLogItem> {
        Vec::new()
    }

    async fn aggregated_metrics(
        &self,
        _selection: &Selection,
        time_range: &str,
    ) -> Result<serde_json::Value, CoreError> {
        Ok(serde_json::json!({ "time_range": time_range }))
    }

    async fn health(&self) -> bool {
        true
    }
}
