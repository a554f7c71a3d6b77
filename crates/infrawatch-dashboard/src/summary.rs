//! 성능 요약 로딩.
//!
//! 캐시 적중이면 그대로 쓰고, 아니면 챗봇에 선택별 프롬프트를 보내 생성한 뒤 캐시에 저장한다.
//! 생성 실패 문구는 캐시하지 않는다.

use crate::summary_parser::{parse_summary, ParsedSummary};
use chrono::{DateTime, Utc};
use infrawatch_core::filter::Selection;
use infrawatch_core::models::chat::ChatRequest;
use infrawatch_core::models::metric::MetricSample;
use infrawatch_core::models::stats::DashboardStats;
use infrawatch_core::ports::dashboard_api::DashboardApi;
use infrawatch_storage::summary_cache::{now_millis, SummaryCache};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 요약 생성 실패 시 표시 문구
pub const SUMMARY_UNAVAILABLE: &str =
    "Unable to generate performance summary at this time. Please check your connection and try again.";

/// 프롬프트 컨텍스트에 포함할 최대 메트릭 수
const CONTEXT_METRICS: usize = 10;

const MARKDOWN_HINT: &str = "Use proper markdown formatting with **bold** for important terms.";

/// 요약 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    Cache,
    Generated,
    Unavailable,
    /// 메트릭이 아직 없어 생성하지 않음
    Empty,
}

/// 로딩된 성능 요약
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub text: String,
    pub source: SummarySource,
    /// 캐시 저장 시각 (epoch ms)
    pub stored_at: Option<i64>,
}

impl PerformanceSummary {
    fn empty() -> Self {
        Self {
            text: String::new(),
            source: SummarySource::Empty,
            stored_at: None,
        }
    }

    /// 섹션 분류 (실패 문구는 overview로만 들어간다)
    pub fn parse(&self, selection: &Selection) -> ParsedSummary {
        parse_summary(&self.text, selection)
    }
}

/// 선택 조합별 프롬프트
pub fn build_prompt(selection: &Selection) -> String {
    match (selection.environment_filter(), selection.application_filter()) {
        (None, None) => format!(
            "Provide a comprehensive performance summary for all applications across all environments for the past day. \
             Include overall system health, critical issues, server failure predictions with specific server names and environments, \
             and recommendations. {MARKDOWN_HINT}"
        ),
        (None, Some(app)) => format!(
            "Provide a performance summary for {app} application across all environments for the past day. \
             Compare performance between environments, identify servers at risk of failure with their environment details, \
             and highlight any concerns. {MARKDOWN_HINT}"
        ),
        (Some(env), None) => format!(
            "Provide a performance summary for all applications in {env} environment for the past day. \
             Include key metrics, health status, server failure predictions with specific server names, \
             and any concerns. {MARKDOWN_HINT}"
        ),
        (Some(env), Some(app)) => format!(
            "Provide a performance summary for {app} in {env} environment for the past day. \
             Include key metrics, health status of specific servers, server failure predictions, \
             and any concerns. Always mention server names with their environment context. {MARKDOWN_HINT}"
        ),
    }
}

/// 프롬프트와 함께 보내는 컨텍스트
pub fn build_context(
    selection: &Selection,
    metrics: &[MetricSample],
    stats: &DashboardStats,
    now: DateTime<Utc>,
) -> Value {
    let head: Vec<&MetricSample> = metrics.iter().take(CONTEXT_METRICS).collect();
    json!({
        "environment": selection.environment,
        "application": selection.application,
        "serverMetrics": head,
        "errorCount": stats.total_errors(),
        "timestamp": now.to_rfc3339(),
        "serverCount": metrics.len(),
    })
}

/// 요약 패널 제목
pub fn summary_title(selection: &Selection) -> String {
    match (selection.environment_filter(), selection.application_filter()) {
        (None, None) => "Performance Summary - All Servers".to_string(),
        (None, Some(app)) => format!("Performance Summary - All Servers Running {app}"),
        (Some(env), None) => format!("Performance Summary - All Servers in {env}"),
        (Some(env), Some(app)) => format!("Performance Summary - {app} Servers in {env}"),
    }
}

/// 요약 서비스
#[derive(Clone)]
pub struct SummaryService {
    api: Arc<dyn DashboardApi>,
    cache: SummaryCache,
}

impl SummaryService {
    pub fn new(api: Arc<dyn DashboardApi>, cache: SummaryCache) -> Self {
        Self { api, cache }
    }

    /// 캐시된 요약만 조회 (선택 변경 직후 표시용)
    pub fn cached(&self, selection: &Selection) -> Option<PerformanceSummary> {
        self.cache
            .read_at(selection, now_millis())
            .map(|hit| PerformanceSummary {
                text: hit.summary,
                source: SummarySource::Cache,
                stored_at: Some(hit.stored_at),
            })
    }

    /// 요약 로딩. `force`면 기존 캐시 항목을 지우고 새로 생성한다.
    pub async fn load(
        &self,
        selection: &Selection,
        metrics: &[MetricSample],
        stats: &DashboardStats,
        force: bool,
    ) -> PerformanceSummary {
        if force {
            if let Err(e) = self.cache.invalidate(selection) {
                warn!("요약 캐시 삭제 실패: {e}");
            }
        } else if let Some(hit) = self.cached(selection) {
            debug!("요약 캐시 적중: {selection}");
            return hit;
        }

        if metrics.is_empty() {
            debug!("메트릭 없음, 요약 생성 생략: {selection}");
            return PerformanceSummary::empty();
        }

        let now = Utc::now();
        let request = ChatRequest {
            message: build_prompt(selection),
            context: build_context(selection, metrics, stats, now),
            timestamp: now,
        };

        match self.api.send_chat(&request).await {
            Ok(reply) => {
                let stored_at = now.timestamp_millis();
                if let Err(e) = self.cache.write_at(selection, &reply.response, stored_at) {
                    warn!("요약 캐시 저장 실패: {e}");
                }
                info!("성능 요약 생성 완료: {selection}");
                PerformanceSummary {
                    text: reply.response,
                    source: SummarySource::Generated,
                    stored_at: Some(stored_at),
                }
            }
            Err(e) => {
                warn!("성능 요약 생성 실패: {e}");
                PerformanceSummary {
                    text: SUMMARY_UNAVAILABLE.to_string(),
                    source: SummarySource::Unavailable,
                    stored_at: None,
                }
            }
        }
    }
}
