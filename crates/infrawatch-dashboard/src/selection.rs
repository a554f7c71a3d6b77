//! 환경/애플리케이션 선택 상태.

use infrawatch_core::filter::{Selection, ALL};
use infrawatch_core::models::catalog::EnvironmentCatalog;
use infrawatch_core::ports::dashboard_api::DashboardApi;
use tracing::debug;

/// 환경 선택기
///
/// 목록 맨 앞에는 항상 "All"이 온다. 환경이 바뀌면 애플리케이션은 "All"로 돌아간다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSelector {
    catalog: EnvironmentCatalog,
    selection: Selection,
}

impl EnvironmentSelector {
    pub fn new(catalog: EnvironmentCatalog, initial: Selection) -> Self {
        Self {
            catalog,
            selection: initial,
        }
    }

    /// 카탈로그 조회 후 생성 (실패 시 클라이언트가 대체 목록을 준다)
    pub async fn load(api: &dyn DashboardApi, initial: Selection) -> Self {
        Self::new(api.environments().await, initial)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn catalog(&self) -> &EnvironmentCatalog {
        &self.catalog
    }

    pub fn environments(&self) -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(self.catalog.environments.iter().cloned())
            .collect()
    }

    /// 현재 환경에서 고를 수 있는 애플리케이션
    ///
    /// "All" 환경이면 모든 환경의 애플리케이션 합집합 (처음 등장 순서).
    pub fn applications(&self) -> Vec<String> {
        let mut apps = vec![ALL.to_string()];
        match self.selection.environment_filter() {
            Some(env) => {
                if let Some(list) = self.catalog.applications.get(env) {
                    apps.extend(list.iter().cloned());
                }
            }
            None => {
                for env in &self.catalog.environments {
                    for app in self.catalog.applications.get(env).into_iter().flatten() {
                        if !apps.contains(app) {
                            apps.push(app.clone());
                        }
                    }
                }
            }
        }
        apps
    }

    /// 환경 변경. 실제로 바뀌면 애플리케이션을 "All"로 초기화.
    pub fn set_environment(&mut self, environment: &str) -> &Selection {
        if self.selection.environment != environment {
            debug!("환경 변경: {} → {environment}", self.selection.environment);
            self.selection = Selection::new(environment, ALL);
        }
        &self.selection
    }

    pub fn set_application(&mut self, application: &str) -> &Selection {
        self.selection.application = application.to_string();
        &self.selection
    }
}
