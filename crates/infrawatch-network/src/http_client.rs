//! HTTP REST API 클라이언트.
//!
//! `DashboardApi` 포트 구현. 재시도 없음, 고정 타임아웃.
//! 목록형 호출은 실패를 `warn!`으로 남기고 대체값을 반환한다.

use async_trait::async_trait;
use infrawatch_core::config::AppConfig;
use infrawatch_core::error::CoreError;
use infrawatch_core::filter::{QueryParams, Selection};
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
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// 목록 응답. 배열 그대로 오거나 객체로 감싸여 온다
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(
            alias = "history",
            alias = "applications",
            alias = "flags",
            alias = "alerts",
            alias = "logs"
        )]
        items: Vec<T>,
    },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) | ListBody::Wrapped { items } => items,
        }
    }
}

/// 실패를 기록하고 대체값 반환
fn or_fallback<T>(resource: &str, result: Result<T, CoreError>, fallback: impl FnOnce() -> T) -> T {
    result.unwrap_or_else(|e| {
        warn!("{resource} 조회 실패, 대체값 사용: {e}");
        fallback()
    })
}

/// 예측 분석 조회 시 시도할 서버 ID 목록 (순서대로, 중복 제거)
///
/// 백엔드에 `Prod-server1`, `Production-server1`, `server1`, `production-server1`
/// 형식이 섞여 있다.
pub fn predictive_server_ids(server: &str, environment: &str) -> Vec<String> {
    let environment = environment.trim();
    if environment.is_empty() {
        return vec![server.to_string()];
    }
    let prefix: String = environment.chars().take(4).collect();
    let candidates = [
        format!("{environment}-{server}"),
        format!("{prefix}-{server}"),
        server.to_string(),
        format!("{}-{server}", environment.to_lowercase()),
    ];

    let mut ids: Vec<String> = Vec::with_capacity(candidates.len());
    for id in candidates {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// `DashboardApi` 포트의 REST 구현
pub struct HttpDashboardClient {
    client: reqwest::Client,
    /// `base_url` + `api_prefix` (끝 `/` 제거)
    api_root: String,
}

impl HttpDashboardClient {
    /// 새 HTTP 클라이언트 생성
    pub fn new(base_url: &str, api_prefix: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        let root = base_url.trim_end_matches('/');
        let prefix = api_prefix.trim_matches('/');
        let api_root = if prefix.is_empty() {
            root.to_string()
        } else {
            format!("{root}/{prefix}")
        };
        Url::parse(&api_root)
            .map_err(|e| CoreError::Config(format!("잘못된 서버 주소: {api_root}: {e}")))?;

        Ok(Self { client, api_root })
    }

    /// 설정에서 생성
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        Self::new(
            &config.server.base_url,
            &config.server.api_prefix,
            config.request_timeout(),
        )
    }

    /// 엔드포인트 URL 구성 (필터 센티널은 `QueryParams`에서 이미 제거됨)
    pub fn endpoint(&self, path: &str, params: &QueryParams) -> Result<Url, CoreError> {
        let raw = format!("{}{}", self.api_root, path);
        let mut url =
            Url::parse(&raw).map_err(|e| CoreError::Config(format!("잘못된 URL: {raw}: {e}")))?;
        params.apply_to(&mut url);
        Ok(url)
    }

    /// `{path}/{id}` 형태의 URL (id는 경로 세그먼트로 인코딩)
    fn resource_endpoint(&self, path: &str, id: &str) -> Result<Url, CoreError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CoreError::Validation {
                field: "id".to_string(),
                message: "빈 식별자".to_string(),
            });
        }
        let mut url = self.endpoint(path, &QueryParams::new())?;
        url.path_segments_mut()
            .map_err(|_| CoreError::Config(format!("경로를 붙일 수 없는 URL: {}", self.api_root)))?
            .push(id);
        Ok(url)
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        resp: reqwest::Response,
        resource: &str,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let path = resp.url().path().to_string();
        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            404 => Err(CoreError::NotFound {
                resource_type: resource.to_string(),
                id: path,
            }),
            code => Err(CoreError::Http {
                status: code,
                body: text,
            }),
        }
    }

    async fn decode<T: DeserializeOwned>(
        resp: reqwest::Response,
        resource: &str,
    ) -> Result<T, CoreError> {
        resp.json::<T>()
            .await
            .map_err(|e| CoreError::Decode(format!("{resource} 응답 파싱 실패: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T, CoreError> {
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("{resource} 요청 실패: {e}")))?;
        let resp = Self::check_response(resp, resource).await?;
        Self::decode(resp, resource).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B, resource: &str) -> Result<T, CoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("POST {url}");
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("{resource} 요청 실패: {e}")))?;
        let resp = Self::check_response(resp, resource).await?;
        Self::decode(resp, resource).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
        resource: &str,
    ) -> Result<Vec<T>, CoreError> {
        let url = self.endpoint(path, params)?;
        let body: ListBody<T> = self.get_json(url, resource).await?;
        Ok(body.into_vec())
    }

    fn selection_params(selection: &Selection) -> QueryParams {
        QueryParams::new()
            .filter("environment", selection.environment_filter())
            .filter("app_name", selection.application_filter())
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn dashboard_stats(&self, selection: &Selection) -> DashboardStats {
        let result = async {
            let url = self.endpoint("/dashboard_stats", &Self::selection_params(selection))?;
            self.get_json::<DashboardStats>(url, "DashboardStats").await
        }
        .await;
        or_fallback("대시보드 통계", result, DashboardStats::default)
    }

    async fn server_metrics(&self, selection: &Selection) -> Vec<MetricSample> {
        let result = self
            .get_list(
                "/server_metrics",
                &Self::selection_params(selection),
                "ServerMetrics",
            )
            .await;
        or_fallback("서버 메트릭", result, Vec::new)
    }

    async fn network_metrics(&self, query: &NetworkQuery) -> NetworkPage {
        let params = Self::selection_params(&query.selection)
            .value("page", query.page.page)
            .value("limit", query.page.limit)
            .filter("server", query.server.as_deref());
        let result = async {
            let url = self.endpoint("/network-metrics", &params)?;
            self.get_json::<NetworkPage>(url, "NetworkMetrics").await
        }
        .await;
        or_fallback("네트워크 메트릭", result, || Page::empty(query.page.limit))
    }

    async fn app_logs(&self, query: &LogQuery) -> LogPage {
        let params = Self::selection_params(&query.selection)
            .value("page", query.page.page)
            .value("limit", query.page.limit)
            .filter("level", query.level.as_deref())
            .filter("search", query.search.as_deref());
        let result = async {
            let url = self.endpoint("/app-logs", &params)?;
            self.get_json::<LogPage>(url, "AppLogs").await
        }
        .await;
        or_fallback("앱 로그", result, || Page::empty(query.page.limit))
    }

    async fn environments(&self) -> EnvironmentCatalog {
        let result = async {
            let url = self.endpoint("/environments", &QueryParams::new())?;
            self.get_json::<EnvironmentCatalog>(url, "Environments").await
        }
        .await;

        match result {
            Ok(mut catalog) => {
                // 비어 있는 부분만 고정 목록으로 채움
                let fallback = EnvironmentCatalog::fallback();
                if catalog.environments.is_empty() {
                    catalog.environments = fallback.environments;
                }
                if catalog.applications.is_empty() {
                    catalog.applications = fallback.applications;
                }
                catalog
            }
            Err(e) => {
                warn!("환경 목록 조회 실패, 기본 목록 사용: {e}");
                EnvironmentCatalog::fallback()
            }
        }
    }

    async fn applications(&self, environment: Option<&str>) -> Vec<String> {
        let params = QueryParams::new().filter("environment", environment);
        let result = self.get_list("/applications", &params, "Applications").await;
        or_fallback("애플리케이션 목록", result, Vec::new)
    }

    async fn active_alerts(&self, query: &AlertQuery) -> Vec<Alert> {
        let params = QueryParams::new()
            .filter("environment", query.environment.as_deref())
            .filter("severity", query.severity.as_deref())
            .optional("limit", query.limit);
        let result = self.get_list("/alerts/active", &params, "ActiveAlerts").await;
        or_fallback("활성 알림", result, Vec::new)
    }

    async fn alert_history(&self, query: &AlertHistoryQuery) -> Vec<Alert> {
        let params = QueryParams::new()
            .value("days", query.days)
            .filter("environment", query.environment.as_deref())
            .filter("severity", query.severity.as_deref());
        let result = self.get_list("/alerts/history", &params, "AlertHistory").await;
        or_fallback("알림 이력", result, Vec::new)
    }

    async fn predictive_flags(&self, selection: &Selection) -> Vec<PredictiveFlag> {
        let result = self
            .get_list(
                "/predictive-maintenance-flags",
                &Self::selection_params(selection),
                "PredictiveFlags",
            )
            .await;
        or_fallback("예측 플래그", result, Vec::new)
    }

    async fn predictive_analysis(
        &self,
        server: &str,
        environment: &str,
    ) -> Result<PredictiveAnalysis, CoreError> {
        let mut failure: Option<CoreError> = None;

        for server_id in predictive_server_ids(server, environment) {
            let url = self.resource_endpoint("/predictive-analysis", &server_id)?;
            match self
                .get_json::<Option<PredictiveAnalysis>>(url, "PredictiveAnalysis")
                .await
            {
                Ok(Some(analysis)) => {
                    debug!("예측 분석 발견: server_id={server_id}");
                    return Ok(analysis);
                }
                Ok(None) => debug!("예측 분석 빈 응답: server_id={server_id}"),
                Err(e) if e.is_not_found() => debug!("예측 분석 없음: server_id={server_id}"),
                Err(e) => {
                    debug!("예측 분석 조회 실패: server_id={server_id}: {e}");
                    failure.get_or_insert(e);
                }
            }
        }

        Err(failure.unwrap_or_else(|| CoreError::NotFound {
            resource_type: "PredictiveAnalysis".to_string(),
            id: format!("{environment}/{server}"),
        }))
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, CoreError> {
        let url = self.endpoint("/chat/message", &QueryParams::new())?;
        self.post_json(url, request, "ChatMessage").await
    }

    async fn chat_history(&self, limit: u32, session_id: Option<&str>) -> Vec<ChatMessage> {
        let params = QueryParams::new()
            .value("limit", limit)
            .filter("session_id", session_id);
        let result = self.get_list("/chat/history", &params, "ChatHistory").await;
        or_fallback("대화 이력", result, Vec::new)
    }

    async fn clear_chat_history(&self) -> Result<(), CoreError> {
        let url = self.endpoint("/chat/history", &QueryParams::new())?;
        debug!("DELETE {url}");
        let resp = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("대화 이력 삭제 요청 실패: {e}")))?;
        Self::check_response(resp, "ChatHistory").await?;
        Ok(())
    }

    async fn chat_context(&self, message_id: &str) -> Result<serde_json::Value, CoreError> {
        let url = self.resource_endpoint("/chat/context", message_id)?;
        self.get_json(url, "ChatContext").await
    }

    async fn log_analysis(&self, log_id: &str) -> Result<LogAnalysis, CoreError> {
        let url = self.resource_endpoint("/log_analysis", log_id)?;
        self.get_json(url, "LogAnalysis").await
    }

    async fn generate_log_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<LogAnalysis, CoreError> {
        let url = self.endpoint("/generate_llm_analysis", &QueryParams::new())?;
        self.post_json(url, request, "LogAnalysis").await
    }

    async fn combined_logs(&self, selection: &Selection) -> Vec<CombinedLogItem> {
        let result = self
            .get_list(
                "/combined_logs",
                &Self::selection_params(selection),
                "CombinedLogs",
            )
            .await;
        or_fallback("결합 로그", result, Vec::new)
    }

    async fn aggregated_metrics(
        &self,
        selection: &Selection,
        time_range: &str,
    ) -> Result<serde_json::Value, CoreError> {
        let params = QueryParams::new()
            .value("time_range", time_range)
            .filter("environment", selection.environment_filter())
            .filter("app_name", selection.application_filter());
        let url = self.endpoint("/aggregated_metrics", &params)?;
        self.get_json(url, "AggregatedMetrics").await
    }

    async fn health(&self) -> bool {
        let url = match self.endpoint("/health", &QueryParams::new()) {
            Ok(url) => url,
            Err(e) => {
                warn!("헬스 체크 URL 구성 실패: {e}");
                return false;
            }
        };
        match self.client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("헬스 체크 실패: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrawatch_core::ports::dashboard_api::PageRequest;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> HttpDashboardClient {
        HttpDashboardClient::new(&server.url(), "/api", Duration::from_secs(5)).unwrap()
    }

    /// 연결이 거부되는 주소
    fn unreachable_client() -> HttpDashboardClient {
        HttpDashboardClient::new("http://127.0.0.1:1", "/api", Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn endpoint_never_carries_all_sentinel() {
        let client =
            HttpDashboardClient::new("http://localhost:8000/", "api/", Duration::from_secs(1))
                .unwrap();
        let selection = Selection::all();
        let url = client
            .endpoint(
                "/server_metrics",
                &HttpDashboardClient::selection_params(&selection),
            )
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/server_metrics");

        let selection = Selection::new("Production", "All");
        let url = client
            .endpoint(
                "/server_metrics",
                &HttpDashboardClient::selection_params(&selection),
            )
            .unwrap();
        assert_eq!(url.query(), Some("environment=Production"));
    }

    #[test]
    fn empty_prefix_uses_base_url() {
        let client =
            HttpDashboardClient::new("http://localhost:8000", "", Duration::from_secs(1)).unwrap();
        let url = client.endpoint("/health", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/health");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let result = HttpDashboardClient::new("not a url", "/api", Duration::from_secs(1));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn resource_ids_are_path_encoded() {
        let client =
            HttpDashboardClient::new("http://localhost:8000", "/api", Duration::from_secs(1))
                .unwrap();
        let url = client
            .resource_endpoint("/log_analysis", " abc 123 ")
            .unwrap();
        assert_eq!(url.path(), "/api/log_analysis/abc%20123");
        assert!(client.resource_endpoint("/log_analysis", "  ").is_err());
    }

    #[test]
    fn predictive_id_candidates() {
        assert_eq!(
            predictive_server_ids("server3", "Production"),
            vec![
                "Production-server3",
                "Prod-server3",
                "server3",
                "production-server3"
            ]
        );
        // 중복 제거
        assert_eq!(
            predictive_server_ids("server1", "Dev"),
            vec!["Dev-server1", "server1", "dev-server1"]
        );
        assert_eq!(predictive_server_ids("server1", ""), vec!["server1"]);
    }

    #[tokio::test]
    async fn server_metrics_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/server_metrics")
            .match_query(Matcher::UrlEncoded(
                "environment".into(),
                "Production".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"server":"server1","environment":"Prod","cpu_usage":91.5,"server_health":"Critical"},
                    {"server":"server2","environment":"Prod","cpu_usage":12.0,"server_health":"Good"}]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let metrics = client
            .server_metrics(&Selection::new("Production", "All"))
            .await;
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].server, "server1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_metrics_failure_degrades_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/server_metrics")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let metrics = client_for(&server).server_metrics(&Selection::all()).await;
        assert!(metrics.is_empty());
        mock.assert_async().await;

        let metrics = unreachable_client().server_metrics(&Selection::all()).await;
        assert!(metrics.is_empty());
    }

    #[tokio::test]
    async fn irregular_rows_do_not_drop_the_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/server_metrics")
            .with_status(200)
            .with_body(
                r#"[{"server":"server1","environment":"Prod","cpu_usage":40.0,"cpu_temp":55.0},
                    {"server":"server2","environment":"Prod","cpu_usage":20.0,"cpu_temp":null}]"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/api/app-logs")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"logs":[{"_id":"l1","level":"ERROR"},{"_id":"l2","level":"FATAL"}],
                    "pagination":{"current_page":1,"total_pages":1,"total_count":2,"page_size":10}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let metrics = client.server_metrics(&Selection::all()).await;
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[1].cpu_temp, 0.0);

        let query = LogQuery {
            selection: Selection::all(),
            page: PageRequest::new(1, 10),
            level: None,
            search: None,
        };
        let page = client.app_logs(&query).await;
        assert_eq!(page.logs.len(), 2);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn environments_failure_returns_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/environments")
            .with_status(503)
            .create_async()
            .await;

        let catalog = client_for(&server).environments().await;
        assert_eq!(catalog, EnvironmentCatalog::fallback());

        let catalog = unreachable_client().environments().await;
        assert_eq!(
            catalog.environments,
            vec!["Development", "Staging", "Production", "QA"]
        );
    }

    #[tokio::test]
    async fn environments_fills_missing_applications() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/environments")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"environments":["Production","QA"]}"#)
            .create_async()
            .await;

        let catalog = client_for(&server).environments().await;
        assert_eq!(catalog.environments, vec!["Production", "QA"]);
        assert_eq!(catalog.applications["Production"], vec!["app1", "app2", "app3"]);
    }

    #[tokio::test]
    async fn app_logs_page_and_fallback() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/app-logs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("limit".into(), "25".into()),
                Matcher::UrlEncoded("level".into(), "ERROR".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"logs":[{"_id":"l1","level":"ERROR","message":"db down","server":"server1"}],
                    "stats":{"total_logs":26,"error_count":1},
                    "pagination":{"current_page":2,"total_pages":2,"total_count":26,"page_size":25,
                    "has_next":false,"has_prev":true,"start_index":26,"end_index":26}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let query = LogQuery {
            selection: Selection::all(),
            page: PageRequest::new(2, 25),
            level: Some("ERROR".to_string()),
            search: None,
        };
        let page = client.app_logs(&query).await;
        assert_eq!(page.logs.len(), 1);
        assert_eq!(page.logs[0].id, "l1");
        assert!(page.pagination.has_prev);
        mock.assert_async().await;

        let page = unreachable_client().app_logs(&query).await;
        assert!(page.is_empty());
        assert_eq!(page.pagination.page_size, 25);
    }

    #[tokio::test]
    async fn log_analysis_404_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/log_analysis/abc")
            .with_status(404)
            .with_body(r#"{"detail":"not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server).log_analysis("abc").await.unwrap_err();
        assert!(err.is_not_found());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn log_analysis_server_error_is_http() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/log_analysis/abc")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client_for(&server).log_analysis("abc").await.unwrap_err();
        assert!(matches!(err, CoreError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn predictive_analysis_tries_id_formats_in_order() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/api/predictive-analysis/Production-server3")
            .with_status(404)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/predictive-analysis/Prod-server3")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"predicted_issue":"Disk exhaustion","preventive_actions":["Expand volume"],
                    "current_state_summary":"Disk at 93%","confidence":"High"}"#,
            )
            .create_async()
            .await;
        let third = server
            .mock("GET", "/api/predictive-analysis/server3")
            .expect(0)
            .create_async()
            .await;

        let analysis = client_for(&server)
            .predictive_analysis("server3", "Production")
            .await
            .unwrap();
        assert_eq!(analysis.predicted_issue, "Disk exhaustion");
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn predictive_analysis_all_formats_missing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/api/predictive-analysis/.+$".to_string()),
            )
            .with_status(404)
            .expect(4)
            .create_async()
            .await;

        let err = client_for(&server)
            .predictive_analysis("server3", "Production")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chat_history_accepts_bare_and_wrapped() {
        let mut server = mockito::Server::new_async().await;
        let _bare = server
            .mock("GET", "/api/chat/history")
            .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"1","type":"user","content":"hi"}]"#)
            .create_async()
            .await;
        let _wrapped = server
            .mock("GET", "/api/chat/history")
            .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"history":[{"id":"1","type":"bot","content":"a"},{"id":"2","type":"user","content":"b"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(client.chat_history(50, None).await.len(), 1);
        assert_eq!(client.chat_history(5, None).await.len(), 2);
    }

    #[tokio::test]
    async fn send_chat_posts_message_and_context() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat/message")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "message": "which servers are hot?",
                "context": {"environment": "Production"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response":"server3 is at 97% CPU","context":{"servers":1},"timestamp":"2025-06-06T10:00:00Z"}"#)
            .create_async()
            .await;

        let request = ChatRequest {
            message: "which servers are hot?".to_string(),
            context: serde_json::json!({"environment": "Production"}),
            timestamp: chrono::Utc::now(),
        };
        let reply = client_for(&server).send_chat(&request).await.unwrap();
        assert_eq!(reply.response, "server3 is at 97% CPU");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_chat_network_error() {
        let request = ChatRequest {
            message: "hello".to_string(),
            context: serde_json::json!({}),
            timestamp: chrono::Utc::now(),
        };
        let err = unreachable_client().send_chat(&request).await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }

    #[tokio::test]
    async fn clear_chat_history_sends_delete() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/chat/history")
            .with_status(200)
            .create_async()
            .await;

        client_for(&server).clear_chat_history().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn predictive_flags_and_alerts() {
        let mut server = mockito::Server::new_async().await;
        let _flags = server
            .mock("GET", "/api/predictive-maintenance-flags")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"server_name":"server3","environment":"Prod","predicted_issue":"CPU","confidence":"High"}]"#)
            .create_async()
            .await;
        let _alerts = server
            .mock("GET", "/api/alerts/active")
            .match_query(Matcher::UrlEncoded("limit".into(), "20".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"_id":"a1","severity":"critical","alertname":"HighCPU","server_name":"server3","environment":"Prod"}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let flags = client.predictive_flags(&Selection::all()).await;
        assert_eq!(flags[0].server_name, "server3");

        let alerts = client
            .active_alerts(&AlertQuery {
                limit: Some(20),
                ..Default::default()
            })
            .await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "a1");
    }

    #[tokio::test]
    async fn health_check() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/health")
            .with_status(200)
            .create_async()
            .await;

        assert!(client_for(&server).health().await);
        assert!(!unreachable_client().health().await);
    }
}
