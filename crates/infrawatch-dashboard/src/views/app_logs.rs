//! App Logs 화면.
//!
//! 레벨/검색 필터와 페이지를 들고 백엔드 페이지네이션을 그대로 따른다.
//! 로그를 고르면 저장된 LLM 분석을 읽고, 없으면 생성을 요청할 수 있다.

use crate::pagination::PaginationState;
use crate::staleness::{StaleGuard, Tagged};
use infrawatch_core::error::CoreError;
use infrawatch_core::filter::Selection;
use infrawatch_core::models::analysis::{AnalysisRequest, LogAnalysis};
use infrawatch_core::models::log::{LogEntry, LogLevel};
use infrawatch_core::models::page::Pagination;
use infrawatch_core::models::stats::LogStats;
use infrawatch_core::ports::dashboard_api::{DashboardApi, LogPage, LogQuery};
use std::sync::Arc;
use tracing::warn;

/// 레벨 드롭다운의 "전체" 값
pub const LEVEL_ALL: &str = "ALL";

pub const NO_LOGS: &str = "No logs found";
pub const ANALYSIS_NOT_FOUND: &str = "No analysis found for this log";
pub const ANALYSIS_UNAVAILABLE: &str = "No analysis available for this log";
pub const ANALYSIS_FAILED: &str = "Failed to generate analysis";

/// 분석 조회 결과
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Ready(LogAnalysis),
    /// 표시할 안내 문구
    Unavailable(&'static str),
}

impl AnalysisOutcome {
    pub fn analysis(&self) -> Option<&LogAnalysis> {
        match self {
            AnalysisOutcome::Ready(analysis) => Some(analysis),
            AnalysisOutcome::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppLogsData {
    pub selection: Selection,
    pub logs: Vec<LogEntry>,
    pub stats: LogStats,
    pub pagination: Pagination,
}

impl AppLogsData {
    fn from_page(selection: Selection, page: LogPage) -> Self {
        Self {
            selection,
            logs: page.logs,
            stats: page.stats,
            pagination: page.pagination,
        }
    }

    /// `total_pages == 0`이거나 로그가 없으면 빈 상태
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty() || self.pagination.total_pages == 0
    }

    /// 빈 상태 문구
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_LOGS)
    }
}

pub struct AppLogsView {
    api: Arc<dyn DashboardApi>,
    guard: StaleGuard,
    pagination: PaginationState,
    level: Option<LogLevel>,
    search: String,
}

impl AppLogsView {
    pub fn new(api: Arc<dyn DashboardApi>, selection: Selection, page_size: u32) -> Self {
        Self {
            api,
            guard: StaleGuard::new(selection.clone()),
            pagination: PaginationState::new(page_size, selection),
            level: None,
            search: String::new(),
        }
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut PaginationState {
        &mut self.pagination
    }

    pub fn set_selection(&mut self, selection: &Selection) -> bool {
        self.pagination.set_selection(selection);
        self.guard.select(selection.clone())
    }

    /// 레벨 필터. "ALL"이나 알 수 없는 값이면 해제.
    pub fn set_level(&mut self, level: &str) {
        self.level = if level.eq_ignore_ascii_case(LEVEL_ALL) {
            None
        } else {
            LogLevel::parse(level)
        };
        self.pagination.go_to(1);
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_string();
        self.pagination.go_to(1);
    }

    pub fn query(&self) -> LogQuery {
        LogQuery {
            selection: self.guard.selection(),
            page: self.pagination.request(),
            level: self.level.map(|l| l.as_str().to_string()),
            search: (!self.search.is_empty()).then(|| self.search.clone()),
        }
    }

    pub async fn fetch(&self) -> Tagged<AppLogsData> {
        let tag = self.guard.dispatch();
        let query = LogQuery {
            selection: tag.selection.clone(),
            ..self.query()
        };
        let page = self.api.app_logs(&query).await;
        Tagged::new(tag, AppLogsData::from_page(query.selection, page))
    }

    pub fn apply(&mut self, tagged: Tagged<AppLogsData>) -> Option<AppLogsData> {
        let data = self.guard.accept(tagged)?;
        self.pagination.apply(&data.pagination);
        Some(data)
    }

    pub async fn load(&mut self) -> Option<AppLogsData> {
        let tagged = self.fetch().await;
        self.apply(tagged)
    }

    /// 저장된 분석 조회
    pub async fn analysis(&self, log_id: &str) -> AnalysisOutcome {
        match self.api.log_analysis(log_id).await {
            Ok(analysis) => AnalysisOutcome::Ready(analysis),
            Err(CoreError::NotFound { .. }) => AnalysisOutcome::Unavailable(ANALYSIS_NOT_FOUND),
            Err(e) => {
                warn!("로그 분석 조회 실패: {e}");
                AnalysisOutcome::Unavailable(ANALYSIS_UNAVAILABLE)
            }
        }
    }

    /// 분석 생성 요청
    pub async fn generate_analysis(&self, entry: &LogEntry) -> AnalysisOutcome {
        match self.api.generate_log_analysis(&AnalysisRequest::from(entry)).await {
            Ok(analysis) => AnalysisOutcome::Ready(analysis),
            Err(e) => {
                warn!("로그 분석 생성 실패: {e}");
                AnalysisOutcome::Unavailable(ANALYSIS_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use infrawatch_core::models::page::Page;

    fn entry(id: &str) -> LogEntry {
        LogEntry {
            id: id.into(),
            level: LogLevel::Error,
            message: "Database connection failed".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn zero_pages_is_empty_state() {
        let api = Arc::new(FakeApi::default());
        *api.logs.lock() = Some(Page {
            logs: vec![],
            stats: LogStats::default(),
            pagination: Pagination {
                current_page: 1,
                total_pages: 0,
                total_count: 0,
                page_size: 10,
                ..Default::default()
            },
        });
        let mut view = AppLogsView::new(api, Selection::all(), 10);
        let data = view.load().await.unwrap();
        assert!(data.is_empty());
        assert_eq!(data.empty_message(), Some(NO_LOGS));
    }

    #[tokio::test]
    async fn level_all_sentinel_is_dropped() {
        let api = Arc::new(FakeApi::default());
        let mut view = AppLogsView::new(api.clone(), Selection::new("Production", "app1"), 50);

        view.set_level("ALL");
        view.set_search("  timeout ");
        view.load().await;
        view.set_level("error");
        view.load().await;

        let queries = api.log_queries.lock();
        assert_eq!(queries[0].level, None);
        assert_eq!(queries[0].search.as_deref(), Some("timeout"));
        assert_eq!(queries[0].page.limit, 50);
        assert_eq!(queries[1].level.as_deref(), Some("ERROR"));
    }

    #[tokio::test]
    async fn filter_change_resets_page() {
        let api = Arc::new(FakeApi::default());
        let mut view = AppLogsView::new(api, Selection::all(), 10);
        view.pagination_mut().apply(&Pagination {
            total_pages: 6,
            ..Default::default()
        });
        view.pagination_mut().go_to(3);
        view.set_search("oom");
        assert_eq!(view.pagination().page(), 1);

        view.pagination_mut().go_to(3);
        view.set_selection(&Selection::new("Staging", "All"));
        assert_eq!(view.query().page.page, 1);
    }

    #[tokio::test]
    async fn missing_analysis_then_generate() {
        let api = Arc::new(FakeApi::default());
        let view = AppLogsView::new(api, Selection::all(), 10);

        let outcome = view.analysis("abc").await;
        assert_eq!(outcome, AnalysisOutcome::Unavailable(ANALYSIS_NOT_FOUND));

        let generated = view.generate_analysis(&entry("abc")).await;
        assert_eq!(generated.analysis().unwrap().issue, "generated for abc");

        let stored = view.analysis("abc").await;
        assert!(stored.analysis().is_some());
    }
}
