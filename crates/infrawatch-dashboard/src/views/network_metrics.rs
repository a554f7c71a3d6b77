//! Network Metrics 화면.

use crate::pagination::PaginationState;
use crate::staleness::{StaleGuard, Tagged};
use infrawatch_core::filter::{active, Selection};
use infrawatch_core::models::network::{NetworkLog, NetworkStats};
use infrawatch_core::models::page::Pagination;
use infrawatch_core::ports::dashboard_api::{DashboardApi, NetworkPage, NetworkQuery};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct NetworkMetricsData {
    pub selection: Selection,
    pub logs: Vec<NetworkLog>,
    pub stats: NetworkStats,
    pub pagination: Pagination,
}

impl NetworkMetricsData {
    /// 백엔드가 통계를 비워 보내면 현재 페이지로 계산
    fn from_page(selection: Selection, page: NetworkPage) -> Self {
        let stats = if page.stats.is_empty() {
            NetworkStats::from_logs(&page.logs)
        } else {
            page.stats
        };
        Self {
            selection,
            logs: page.logs,
            stats,
            pagination: page.pagination,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

pub struct NetworkMetricsView {
    api: Arc<dyn DashboardApi>,
    guard: StaleGuard,
    pagination: PaginationState,
    server: Option<String>,
}

impl NetworkMetricsView {
    pub fn new(api: Arc<dyn DashboardApi>, selection: Selection, page_size: u32) -> Self {
        Self {
            api,
            guard: StaleGuard::new(selection.clone()),
            pagination: PaginationState::new(page_size, selection),
            server: None,
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

    /// 서버 필터 ("All"이나 빈 값이면 해제). 1페이지로 돌아간다.
    pub fn set_server(&mut self, server: Option<&str>) {
        self.server = active(server).map(str::to_string);
        self.pagination.go_to(1);
    }

    pub fn query(&self) -> NetworkQuery {
        NetworkQuery {
            selection: self.guard.selection(),
            page: self.pagination.request(),
            server: self.server.clone(),
        }
    }

    pub async fn fetch(&self) -> Tagged<NetworkMetricsData> {
        let tag = self.guard.dispatch();
        let query = NetworkQuery {
            selection: tag.selection.clone(),
            ..self.query()
        };
        let page = self.api.network_metrics(&query).await;
        let data = NetworkMetricsData::from_page(query.selection, page);
        Tagged::new(tag, data)
    }

    pub fn apply(&mut self, tagged: Tagged<NetworkMetricsData>) -> Option<NetworkMetricsData> {
        let data = self.guard.accept(tagged)?;
        self.pagination.apply(&data.pagination);
        Some(data)
    }

    pub async fn load(&mut self) -> Option<NetworkMetricsData> {
        let tagged = self.fetch().await;
        self.apply(tagged)
    }
}
