//! Server Metrics 화면.
//!
//! 서버 카드마다 위험 평가와 "Failure Risk" 배지를 붙인다. Overview에서 넘어온 이동 의도가 있으면
//! 해당 서버를 강조하고, 예측 플래그가 있는 서버일 때만 예측 분석을 연다.

use crate::navigation::NavigationIntents;
use crate::refresh::{RefreshPayload, RefreshUpdate};
use crate::staleness::{StaleGuard, Tagged};
use crate::views::{dedup_metrics, RiskAssessment, ServerStats};
use infrawatch_core::environment::same_environment;
use infrawatch_core::error::CoreError;
use infrawatch_core::filter::Selection;
use infrawatch_core::models::metric::MetricSample;
use infrawatch_core::models::predictive::{PredictiveAnalysis, PredictiveFlag};
use infrawatch_core::ports::dashboard_api::DashboardApi;
use infrawatch_core::server_naming::global_name;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 선택 환경의 플래그만 남김
pub fn flags_for_selection(flags: Vec<PredictiveFlag>, selection: &Selection) -> Vec<PredictiveFlag> {
    match selection.environment_filter() {
        Some(env) => flags
            .into_iter()
            .filter(|flag| same_environment(&flag.environment, env))
            .collect(),
        None => flags,
    }
}

/// 서버에 해당하는 플래그
pub fn flag_for<'a>(flags: &'a [PredictiveFlag], sample: &MetricSample) -> Option<&'a PredictiveFlag> {
    flags.iter().find(|flag| {
        flag.server_name == sample.server && same_environment(&flag.environment, &sample.environment)
    })
}

/// 서버 카드
#[derive(Debug, Clone, PartialEq)]
pub struct ServerCard<'a> {
    pub sample: &'a MetricSample,
    pub global_name: String,
    pub risk: RiskAssessment,
    /// "Failure Risk" 배지
    pub failure_risk: Option<&'a PredictiveFlag>,
    pub highlighted: bool,
}

/// 예측 분석 패널
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPanel {
    pub global_name: String,
    pub server: String,
    pub environment: String,
    /// None이면 어떤 ID 형식으로도 찾지 못함
    pub analysis: Option<PredictiveAnalysis>,
}

#[derive(Debug, Clone, Default)]
pub struct ServerMetricsData {
    pub selection: Selection,
    pub metrics: Vec<MetricSample>,
    pub stats: ServerStats,
    pub flags: Vec<PredictiveFlag>,
    /// 강조 중인 서버 (전역 이름)
    pub highlighted: Option<String>,
    pub analysis: Option<AnalysisPanel>,
}

impl ServerMetricsData {
    pub fn cards(&self) -> Vec<ServerCard<'_>> {
        self.metrics
            .iter()
            .map(|sample| {
                let name = global_name(&sample.server, &sample.environment);
                ServerCard {
                    highlighted: self.highlighted.as_deref() == Some(name.as_str()),
                    global_name: name,
                    risk: RiskAssessment::of(sample),
                    failure_risk: flag_for(&self.flags, sample),
                    sample,
                }
            })
            .collect()
    }

    /// 주기 갱신 결과 반영
    fn replace_metrics(&mut self, metrics: Vec<MetricSample>) {
        self.metrics = dedup_metrics(metrics);
        self.stats = ServerStats::from_metrics(&self.metrics);
    }
}

pub struct ServerMetricsView {
    api: Arc<dyn DashboardApi>,
    intents: Arc<NavigationIntents>,
    guard: StaleGuard,
}

impl ServerMetricsView {
    pub fn new(api: Arc<dyn DashboardApi>, intents: Arc<NavigationIntents>, selection: Selection) -> Self {
        Self {
            api,
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

    pub async fn fetch(&self) -> Tagged<ServerMetricsData> {
        let tag = self.guard.dispatch();
        let selection = &tag.selection;
        let (metrics, flags) = futures::join!(
            self.api.server_metrics(selection),
            self.api.predictive_flags(selection),
        );

        let mut data = ServerMetricsData {
            selection: selection.clone(),
            flags: flags_for_selection(flags, selection),
            ..Default::default()
        };
        data.replace_metrics(metrics);
        Tagged::new(tag, data)
    }

    /// 태그 확인 후 이동 의도 처리
    pub async fn apply(&self, tagged: Tagged<ServerMetricsData>) -> Option<ServerMetricsData> {
        let mut data = self.guard.accept(tagged)?;

        if let Some(intent) = self.intents.consume() {
            debug!("이동 의도 처리: {}", intent.global_name);
            data.highlighted = Some(intent.global_name.clone());

            if intent.open_analysis {
                if data.flags.iter().any(|flag| intent.matches_flag(flag)) {
                    data.analysis = Some(self.open_analysis(&intent.server, &intent.environment).await);
                } else {
                    info!("예측 플래그 없음, 분석 생략: {}", intent.global_name);
                }
            }
        }
        Some(data)
    }

    pub async fn load(&self) -> Option<ServerMetricsData> {
        let tagged = self.fetch().await;
        self.apply(tagged).await
    }

    /// 예측 분석 조회
    pub async fn open_analysis(&self, server: &str, environment: &str) -> AnalysisPanel {
        let analysis = match self.api.predictive_analysis(server, environment).await {
            Ok(analysis) => Some(analysis),
            Err(CoreError::NotFound { .. }) => {
                info!("예측 분석 없음: {environment}/{server}");
                None
            }
            Err(e) => {
                warn!("예측 분석 조회 실패: {e}");
                None
            }
        };
        AnalysisPanel {
            global_name: global_name(server, environment),
            server: server.to_string(),
            environment: environment.to_string(),
            analysis,
        }
    }

    /// 갱신 코디네이터 결과 반영. 다른 선택의 결과면 false.
    pub fn apply_refresh(&self, data: &mut ServerMetricsData, update: &RefreshUpdate) -> bool {
        if !self.guard.is_current_selection(&update.key.selection) || data.selection != update.key.selection {
            debug!("다른 선택의 갱신 무시: {}", update.key);
            return false;
        }
        match &update.payload {
            RefreshPayload::ServerMetrics(metrics) => {
                data.replace_metrics(metrics.clone());
                true
            }
            RefreshPayload::ActiveAlerts(_) => false,
        }
    }
}
