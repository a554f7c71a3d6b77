//! 대시보드 백엔드 API 포트.
//!
//! 구현: `infrawatch-network` crate (reqwest)
//!
//! 실패 정책은 시그니처로 드러난다. 목록형 메서드는 값을 바로 반환하며
//! 실패 시 빈 값(또는 고정 대체 목록)으로 대체한다. 상세 조회는 `Result`를 반환하고
//! 404는 [`CoreError::NotFound`]로 매핑된다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::filter::Selection;
use crate::models::alert::Alert;
use crate::models::analysis::{AnalysisRequest, LogAnalysis};
use crate::models::catalog::EnvironmentCatalog;
use crate::models::chat::{ChatMessage, ChatReply, ChatRequest};
use crate::models::log::{CombinedLogItem, LogEntry};
use crate::models::metric::MetricSample;
use crate::models::network::{NetworkLog, NetworkStats};
use crate::models::page::Page;
use crate::models::predictive::{PredictiveAnalysis, PredictiveFlag};
use crate::models::stats::{DashboardStats, LogStats};

/// 네트워크 메트릭 페이지
pub type NetworkPage = Page<NetworkLog, NetworkStats>;

/// 앱 로그 페이지
pub type LogPage = Page<LogEntry, LogStats>;

/// 페이지 요청 (1부터 시작)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// 네트워크 메트릭 조회 조건
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkQuery {
    pub selection: Selection,
    pub page: PageRequest,
    /// 특정 서버만 (None 또는 "All"이면 전체)
    pub server: Option<String>,
}

/// 앱 로그 조회 조건
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub selection: Selection,
    pub page: PageRequest,
    /// 로그 레벨 (None 또는 "All"이면 전체)
    pub level: Option<String>,
    /// 메시지 검색어
    pub search: Option<String>,
}

/// 활성 알림 조회 조건
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertQuery {
    pub environment: Option<String>,
    pub severity: Option<String>,
    pub limit: Option<u32>,
}

/// 알림 이력 조회 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertHistoryQuery {
    pub days: u32,
    pub environment: Option<String>,
    pub severity: Option<String>,
}

impl Default for AlertHistoryQuery {
    fn default() -> Self {
        Self {
            days: 7,
            environment: None,
            severity: None,
        }
    }
}

/// 대시보드 백엔드 클라이언트
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// 에러/헬스 집계 (실패 시 빈 통계)
    async fn dashboard_stats(&self, selection: &Selection) -> DashboardStats;

    /// 서버별 최신 메트릭 (실패 시 빈 목록)
    async fn server_metrics(&self, selection: &Selection) -> Vec<MetricSample>;

    /// 네트워크 요청 로그 페이지 (실패 시 빈 페이지)
    async fn network_metrics(&self, query: &NetworkQuery) -> NetworkPage;

    /// 애플리케이션 로그 페이지 (실패 시 빈 페이지)
    async fn app_logs(&self, query: &LogQuery) -> LogPage;

    /// 환경/애플리케이션 목록 (실패 시 고정 대체 목록)
    async fn environments(&self) -> EnvironmentCatalog;

    /// 환경별 애플리케이션 이름 (실패 시 빈 목록)
    async fn applications(&self, environment: Option<&str>) -> Vec<String>;

    /// 현재 발생 중인 알림 (실패 시 빈 목록)
    async fn active_alerts(&self, query: &AlertQuery) -> Vec<Alert>;

    /// 지난 알림 이력 (실패 시 빈 목록)
    async fn alert_history(&self, query: &AlertHistoryQuery) -> Vec<Alert>;

    /// 장애 예측 플래그 (실패 시 빈 목록)
    async fn predictive_flags(&self, selection: &Selection) -> Vec<PredictiveFlag>;

    /// 서버 한 대의 예측 분석
    ///
    /// 백엔드의 서버 ID 표기가 일정하지 않아 여러 형식을 순서대로 시도한다.
    async fn predictive_analysis(
        &self,
        server: &str,
        environment: &str,
    ) -> Result<PredictiveAnalysis, CoreError>;

    /// 챗봇 메시지 전송
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, CoreError>;

    /// 대화 이력 (실패 시 빈 목록)
    async fn chat_history(&self, limit: u32, session_id: Option<&str>) -> Vec<ChatMessage>;

    /// 대화 이력 삭제
    async fn clear_chat_history(&self) -> Result<(), CoreError>;

    /// 메시지에 첨부된 컨텍스트 조회
    async fn chat_context(&self, message_id: &str) -> Result<serde_json::Value, CoreError>;

    /// 저장된 로그 분석 조회 (없으면 NotFound)
    async fn log_analysis(&self, log_id: &str) -> Result<LogAnalysis, CoreError>;

    /// 로그 분석 생성 요청
    async fn generate_log_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<LogAnalysis, CoreError>;

    /// 로그 + 분석 결합 목록 (실패 시 빈 목록)
    async fn combined_logs(&self, selection: &Selection) -> Vec<CombinedLogItem>;

    /// 기간별 집계 메트릭 (형태 고정 안 됨)
    async fn aggregated_metrics(
        &self,
        selection: &Selection,
        time_range: &str,
    ) -> Result<serde_json::Value, CoreError>;

    /// 백엔드 헬스 체크 (200이면 true)
    async fn health(&self) -> bool;
}
