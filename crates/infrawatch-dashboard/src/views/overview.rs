//! Overview 화면.
//!
//! 대시보드 통계, 예측 플래그, 서버 메트릭을 한 번에 읽고 성능 요약과 위험 서버 목록을 만든다.

use crate::alerts::error_stat_alerts;
use crate::navigation::{NavigationIntents, ServerFocusIntent};
use crate::staleness::{StaleGuard, Tagged};
use crate::summary::{PerformanceSummary, SummaryService};
use crate::summary_parser::ParsedSummary;
use crate::views::dedup_metrics;
use infrawatch_core::filter::Selection;
use infrawatch_core::models::alert::DisplayAlert;
use infrawatch_core::models::metric::MetricSample;
use infrawatch_core::models::predictive::{Confidence, PredictiveFlag};
use infrawatch_core::models::stats::DashboardStats;
use infrawatch_core::ports::dashboard_api::DashboardApi;
use infrawatch_core::server_naming::global_name;
use std::sync::Arc;
use tracing::debug;

/// 플래그 설명 미리보기 길이
const ISSUE_PREVIEW_CHARS: usize = 100;

/// "Monitoring ..." 문구
pub fn server_count_label(selection: &Selection, count: usize) -> String {
    match (selection.environment_filter(), selection.application_filter()) {
        (None, None) => format!("{count} servers in all environments and all apps"),
        (None, Some(app)) => format!("{count} servers in all environments that host {app}"),
        (Some(env), None) => format!("{count} servers in {env} for all apps"),
        (Some(env), Some(app)) => format!("{count} servers in {env} that host {app}"),
    }
}

/// Good/Warning/Critical 서버 수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthBreakdown {
    pub good: u64,
    pub warning: u64,
    pub critical: u64,
}

/// 위험 서버 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskLine {
    pub global_name: String,
    pub server: String,
    pub environment: String,
    pub confidence: Confidence,
    pub issue_preview: String,
}

impl From<&PredictiveFlag> for RiskLine {
    fn from(flag: &PredictiveFlag) -> Self {
        Self {
            global_name: global_name(&flag.server_name, &flag.environment),
            server: flag.server_name.clone(),
            environment: flag.environment.clone(),
            confidence: flag.confidence,
            issue_preview: flag.predicted_issue.chars().take(ISSUE_PREVIEW_CHARS).collect(),
        }
    }
}

/// Overview 데이터
#[derive(Debug, Clone, Default)]
pub struct OverviewData {
    pub selection: Selection,
    pub stats: DashboardStats,
    pub flags: Vec<PredictiveFlag>,
    pub metrics: Vec<MetricSample>,
}

impl OverviewData {
    pub fn total_errors(&self) -> u64 {
        self.stats.total_errors()
    }

    pub fn health(&self) -> HealthBreakdown {
        HealthBreakdown {
            good: self.stats.health_count("Good"),
            warning: self.stats.health_count("Warning"),
            critical: self.stats.health_count("Critical"),
        }
    }

    pub fn server_count_label(&self) -> String {
        server_count_label(&self.selection, self.metrics.len())
    }

    pub fn risk_lines(&self) -> Vec<RiskLine> {
        self.flags.iter().map(RiskLine::from).collect()
    }

    pub fn error_alerts(&self) -> Vec<DisplayAlert> {
        error_stat_alerts(&self.stats)
    }

    /// 요약 파서가 지목한 서버 + 예측 플래그 서버 (전역 이름, 중복 없음)
    pub fn critical_servers(&self, parsed: &ParsedSummary) -> Vec<String> {
        let mut servers = parsed.at_risk_servers();
        for line in self.risk_lines() {
            if !servers.contains(&line.global_name) {
                servers.push(line.global_name);
            }
        }
        servers
    }
}

pub struct OverviewView {
    api: Arc<dyn DashboardApi>,
    summaries: SummaryService,
    intents: Arc<NavigationIntents>,
    guard: StaleGuard,
}

impl OverviewView {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        summaries: SummaryService,
        intents: Arc<NavigationIntents>,
        selection: Selection,
    ) -> Self {
        Self {
            api,
            summaries,
            intents,
            guard: StaleGuard::new(selection),
        }
    }

    pub fn set_selection(&self, selection: &Selection) -> bool {
        self.guard.select(selection.clone())
    }

    pub fn selection(&self) -> Selection {
        self.guard.selection()
    }

    pub async fn fetch(&self) -> Tagged<OverviewData> {
        let tag = self.guard.dispatch();
        let selection = &tag.selection;
        let (stats, flags, metrics) = futures::join!(
            self.api.dashboard_stats(selection),
            self.api.predictive_flags(selection),
            self.api.server_metrics(selection),
        );
        debug!(
            "Overview 로드: {selection} (플래그 {}, 메트릭 {})",
            flags.len(),
            metrics.len()
        );
        let data = OverviewData {
            selection: selection.clone(),
            stats,
            flags,
            metrics: dedup_metrics(metrics),
        };
        Tagged::new(tag, data)
    }

    pub fn apply(&self, tagged: Tagged<OverviewData>) -> Option<OverviewData> {
        self.guard.accept(tagged)
    }

    pub async fn load(&self) -> Option<OverviewData> {
        let tagged = self.fetch().await;
        self.apply(tagged)
    }

    /// 성능 요약 (캐시 우선)
    pub async fn summary(&self, data: &OverviewData, force: bool) -> PerformanceSummary {
        self.summaries
            .load(&data.selection, &data.metrics, &data.stats, force)
            .await
    }

    /// 위험 서버 선택 → Server Metrics 화면에서 강조 + 분석 자동 열기
    pub fn focus_server(&self, server: &str, environment: &str) -> ServerFocusIntent {
        let intent = ServerFocusIntent::new(server, environment, true);
        self.intents.publish(intent.clone());
        intent
    }
}
