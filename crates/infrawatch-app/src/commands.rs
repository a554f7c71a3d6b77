//! 서브커맨드 실행.
//!
//! 각 커맨드는 뷰 모델을 한 번 로드하고 렌더링된 문자열을 돌려준다. 출력은 호출자가 한다.

use anyhow::{anyhow, bail, Context as _, Result};
use infrawatch_core::config::AppConfig;
use infrawatch_core::config_manager::ConfigManager;
use infrawatch_core::environment::{to_short_code, Environment};
use infrawatch_core::filter::Selection;
use infrawatch_core::models::alert::AlertKind;
use infrawatch_core::ports::dashboard_api::{AlertHistoryQuery, AlertQuery, DashboardApi};
use infrawatch_core::ports::local_store::LocalStore;
use infrawatch_core::server_naming::parse_global_name;
use infrawatch_dashboard::alerts::{AlertCenter, AlertFilter};
use infrawatch_dashboard::chat::ChatSession;
use infrawatch_dashboard::navigation::{NavigationIntents, ServerFocusIntent};
use infrawatch_dashboard::selection::EnvironmentSelector;
use infrawatch_dashboard::summary::SummaryService;
use infrawatch_dashboard::views::app_logs::AppLogsView;
use infrawatch_dashboard::views::network_metrics::NetworkMetricsView;
use infrawatch_dashboard::views::overview::OverviewView;
use infrawatch_dashboard::views::server_metrics::ServerMetricsView;
use infrawatch_storage::summary_cache::SummaryCache;
use std::sync::Arc;
use tracing::{info, warn};

use crate::renderer::{self, Style};

/// 커맨드 공용 의존성
pub struct Context {
    pub api: Arc<dyn DashboardApi>,
    pub store: Arc<dyn LocalStore>,
    pub config: AppConfig,
    pub selection: Selection,
    pub intents: Arc<NavigationIntents>,
    pub style: Style,
}

impl Context {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        store: Arc<dyn LocalStore>,
        config: AppConfig,
        selection: Selection,
        style: Style,
    ) -> Self {
        Self {
            api,
            store,
            config,
            selection,
            intents: Arc::new(NavigationIntents::new()),
            style,
        }
    }

    fn summaries(&self) -> SummaryService {
        let cache = SummaryCache::with_ttl(self.store.clone(), self.config.summary_ttl());
        SummaryService::new(self.api.clone(), cache)
    }

    fn page_size(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.config.display.default_page_size)
    }
}

/// 목록 페이지 인자
#[derive(Debug, Clone, Copy, Default)]
pub struct PageArgs {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub async fn overview(ctx: &Context, refresh: bool) -> Result<String> {
    let online = ctx.api.health().await;
    if !online {
        warn!("백엔드 헬스 체크 실패: {}", ctx.config.server.base_url);
    }

    let view = OverviewView::new(
        ctx.api.clone(),
        ctx.summaries(),
        ctx.intents.clone(),
        ctx.selection.clone(),
    );
    let data = view
        .load()
        .await
        .ok_or_else(|| anyhow!("Overview 응답이 폐기됨"))?;
    let summary = view.summary(&data, refresh).await;
    let parsed = summary.parse(&data.selection);
    info!("성능 요약 출처: {:?}", summary.source);

    let mut out = String::new();
    if !online {
        out.push_str("⚠️  Backend health check failed, showing whatever could be loaded\n\n");
    }
    out.push_str(&renderer::overview(&data, &summary, &parsed, ctx.style));
    Ok(out)
}

pub async fn servers(ctx: &Context, focus: Option<&str>, trend: Option<&str>) -> Result<String> {
    if let Some(global) = focus {
        ctx.intents.publish(ServerFocusIntent::from_global(global, true));
    }

    let view = ServerMetricsView::new(ctx.api.clone(), ctx.intents.clone(), ctx.selection.clone());
    let data = view
        .load()
        .await
        .ok_or_else(|| anyhow!("서버 메트릭 응답이 폐기됨"))?;
    let mut out = renderer::servers(&data, ctx.style);

    if let Some(range) = trend {
        out.push('\n');
        match ctx.api.aggregated_metrics(&ctx.selection, range).await {
            Ok(value) => {
                out.push_str(&format!("Aggregated metrics ({range})\n"));
                out.push_str(&serde_json::to_string_pretty(&value)?);
                out.push('\n');
            }
            Err(e) => {
                warn!("집계 메트릭 조회 실패: {e}");
                out.push_str(&format!("Aggregated metrics ({range}) unavailable\n"));
            }
        }
    }
    Ok(out)
}

pub async fn network(ctx: &Context, pages: PageArgs, server: Option<&str>) -> Result<String> {
    let mut view = NetworkMetricsView::new(
        ctx.api.clone(),
        ctx.selection.clone(),
        ctx.page_size(pages.page_size),
    );
    view.set_server(server);

    let mut data = view
        .load()
        .await
        .ok_or_else(|| anyhow!("네트워크 메트릭 응답이 폐기됨"))?;
    // 전체 페이지 수를 알아야 이동할 수 있다
    if let Some(page) = pages.page.filter(|p| *p > 1) {
        view.pagination_mut().go_to(page);
        if view.pagination().page() > 1 {
            data = view
                .load()
                .await
                .ok_or_else(|| anyhow!("네트워크 메트릭 응답이 폐기됨"))?;
        }
    }
    Ok(renderer::network(&data, view.pagination(), ctx.style))
}

pub async fn logs(
    ctx: &Context,
    pages: PageArgs,
    level: Option<&str>,
    search: Option<&str>,
) -> Result<String> {
    let mut view = AppLogsView::new(
        ctx.api.clone(),
        ctx.selection.clone(),
        ctx.page_size(pages.page_size),
    );
    if let Some(level) = level {
        view.set_level(level);
    }
    if let Some(search) = search {
        view.set_search(search);
    }

    let mut data = view
        .load()
        .await
        .ok_or_else(|| anyhow!("앱 로그 응답이 폐기됨"))?;
    if let Some(page) = pages.page.filter(|p| *p > 1) {
        view.pagination_mut().go_to(page);
        if view.pagination().page() > 1 {
            data = view
                .load()
                .await
                .ok_or_else(|| anyhow!("앱 로그 응답이 폐기됨"))?;
        }
    }
    Ok(renderer::logs(&data, view.pagination(), ctx.style))
}

pub async fn analysis(ctx: &Context, log_id: &str, generate: bool) -> Result<String> {
    let view = AppLogsView::new(
        ctx.api.clone(),
        ctx.selection.clone(),
        ctx.page_size(None),
    );

    let outcome = if generate {
        let entry = ctx
            .api
            .combined_logs(&ctx.selection)
            .await
            .into_iter()
            .map(|item| item.log)
            .find(|log| log.id == log_id)
            .with_context(|| format!("로그를 찾을 수 없음: {log_id}"))?;
        view.generate_analysis(&entry).await
    } else {
        view.analysis(log_id).await
    };
    Ok(renderer::log_analysis(log_id, &outcome, ctx.style))
}

/// 예측 분석 조회
///
/// `prod-server3`처럼 알려진 환경 접두어가 붙은 이름은 항상 전역 이름으로 해석한다.
/// 그 외에는 `--environment`, 현재 선택 환경, 이름의 접두어 순으로 환경을 정한다.
pub async fn predict(ctx: &Context, server: &str, environment: Option<&str>) -> Result<String> {
    let (prefix, local) = parse_global_name(server);
    let (server, environment) = if Environment::parse(&prefix).is_some() {
        (local, prefix)
    } else {
        match environment.or(ctx.selection.environment_filter()) {
            Some(env) => (server.to_string(), env.to_string()),
            None if !prefix.is_empty() => (local, prefix),
            None => bail!("환경을 알 수 없음: --environment 또는 prod-server3 형식의 이름이 필요"),
        }
    };

    let view = ServerMetricsView::new(ctx.api.clone(), ctx.intents.clone(), ctx.selection.clone());
    let panel = view.open_analysis(&server, &environment).await;
    Ok(renderer::predictive(&panel, ctx.style))
}

pub async fn chat(ctx: &Context, message: &str) -> Result<String> {
    let mut session = ChatSession::new(ctx.api.clone());
    if session.send(message, &ctx.selection).await.is_none() {
        bail!("빈 메시지");
    }
    // 질문과 응답(또는 오류)만 보여준다
    let messages = session.messages();
    let start = messages.len().saturating_sub(2);
    let mut out = renderer::chat(&messages[start..], ctx.style);
    let stored = session.history().len();
    if stored > 0 {
        out.push_str(&format!("\n({stored} messages in history, see `chat-history`)\n"));
    }
    Ok(out)
}

pub async fn chat_history(ctx: &Context, clear: bool, context_id: Option<&str>) -> Result<String> {
    let mut session = ChatSession::new(ctx.api.clone());

    if clear {
        session.clear().await.context("대화 이력 삭제 실패")?;
        return Ok("Chat history cleared\n".to_string());
    }

    if let Some(id) = context_id {
        let context = session.context(id).await.context("컨텍스트 조회 실패")?;
        return Ok(format!("{}\n", serde_json::to_string_pretty(&context)?));
    }

    if session.load_history().await == 0 {
        return Ok("No chat history\n".to_string());
    }
    Ok(renderer::chat(session.messages(), ctx.style))
}

/// 알림 조회 인자
#[derive(Debug, Clone, Default)]
pub struct AlertArgs {
    pub search: Option<String>,
    pub kind: Option<String>,
    pub history: bool,
    pub days: u32,
}

pub async fn alerts(ctx: &Context, args: &AlertArgs) -> Result<String> {
    let kind = match args.kind.as_deref() {
        Some(value) => Some(
            AlertKind::parse(value)
                .with_context(|| format!("알 수 없는 알림 유형: {value} (error, warning, info)"))?,
        ),
        None => None,
    };

    let alerts = if args.history {
        let query = AlertHistoryQuery {
            days: args.days,
            environment: ctx.selection.environment_filter().map(to_short_code),
            severity: None,
        };
        ctx.api.alert_history(&query).await
    } else {
        ctx.api.active_alerts(&AlertQuery::default()).await
    };

    let mut center = AlertCenter::new();
    center.replace(alerts);
    let filter = AlertFilter::new(args.search.clone().unwrap_or_default(), kind);
    let visible = center.visible(&ctx.selection, &filter);
    Ok(renderer::alerts(&visible, ctx.style))
}

/// 환경/애플리케이션 목록
///
/// `save_to`가 있으면 현재 선택을 카탈로그로 검증한 뒤 기본 선택으로 저장한다.
pub async fn environments(ctx: &Context, save_to: Option<&ConfigManager>) -> Result<String> {
    let mut selector = EnvironmentSelector::load(ctx.api.as_ref(), Selection::all()).await;
    selector.set_environment(&ctx.selection.environment);
    selector.set_application(&ctx.selection.application);

    let mut out = renderer::environments(&selector, ctx.style);
    let Some(manager) = save_to else {
        return Ok(out);
    };

    let selection = selector.selection().clone();
    if !selector.environments().contains(&selection.environment) {
        bail!(
            "알 수 없는 환경: {} (가능: {})",
            selection.environment,
            selector.environments().join(", ")
        );
    }
    if !selector.applications().contains(&selection.application) {
        bail!(
            "{} 환경에 없는 애플리케이션: {} (가능: {})",
            selection.environment,
            selection.application,
            selector.applications().join(", ")
        );
    }

    manager
        .update_with(|config| {
            config.display.default_environment = selection.environment.clone();
            config.display.default_application = selection.application.clone();
        })
        .context("기본 선택 저장 실패")?;
    info!("기본 선택 저장: {selection}");
    out.push_str(&format!("\nSaved default selection: {selection}\n"));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrawatch_network::http_client::HttpDashboardClient;
    use infrawatch_storage::sqlite::SqliteLocalStore;
    use mockito::Matcher;
    use std::time::Duration;

    fn context(server: &mockito::Server, selection: Selection) -> Context {
        let api = HttpDashboardClient::new(&server.url(), "/api", Duration::from_secs(5)).unwrap();
        let store = SqliteLocalStore::open_in_memory().unwrap();
        Context::new(
            Arc::new(api),
            Arc::new(store),
            AppConfig::default_config(),
            selection,
            Style::Plain,
        )
    }

    #[tokio::test]
    async fn logs_empty_state() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/app-logs")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"logs":[],"stats":{},"pagination":{"current_page":1,"total_pages":0,
                    "total_count":0,"page_size":10,"has_next":false,"has_prev":false,
                    "start_index":0,"end_index":0}}"#,
            )
            .create_async()
            .await;

        let ctx = context(&server, Selection::all());
        let out = logs(&ctx, PageArgs::default(), Some("ALL"), None).await.unwrap();
        assert!(out.contains("No logs found"));
    }

    #[tokio::test]
    async fn analysis_not_found_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/log_analysis/abc")
            .with_status(404)
            .create_async()
            .await;

        let ctx = context(&server, Selection::all());
        let out = analysis(&ctx, "abc", false).await.unwrap();
        assert!(out.contains("No analysis found for this log"));
    }

    #[tokio::test]
    async fn alerts_filtered_by_kind() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/alerts/active")
            .with_status(200)
            .with_body(
                r#"[{"id":"1","severity":"critical","alertname":"HighCPU","environment":"Prod"},
                    {"id":"2","severity":"warning","alertname":"DiskSlow","environment":"Prod"},
                    {"id":"3","severity":"critical","alertname":"Down","environment":"Dev"}]"#,
            )
            .create_async()
            .await;

        let ctx = context(&server, Selection::new("Production", "All"));
        let args = AlertArgs {
            kind: Some("error".into()),
            days: 7,
            ..Default::default()
        };
        let out = alerts(&ctx, &args).await.unwrap();
        assert!(out.contains("HighCPU"));
        assert!(!out.contains("DiskSlow"));
        assert!(!out.contains("Down"));

        let bad = AlertArgs {
            kind: Some("fatal".into()),
            ..Default::default()
        };
        assert!(alerts(&ctx, &bad).await.is_err());
    }

    #[tokio::test]
    async fn predict_requires_environment() {
        let server = mockito::Server::new_async().await;
        let ctx = context(&server, Selection::all());
        assert!(predict(&ctx, "server3", None).await.is_err());
    }

    #[tokio::test]
    async fn predict_global_name_overrides_selected_environment() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/predictive-analysis/Development-server1")
            .with_status(200)
            .with_body(
                r#"{"predicted_issue":"memory leak","preventive_actions":["restart"],
                    "current_state_summary":"memory at 91%","confidence":"Medium"}"#,
            )
            .create_async()
            .await;

        let ctx = context(&server, Selection::new("Production", "All"));
        let out = predict(&ctx, "dev-server1", Some("Production")).await.unwrap();
        assert!(out.contains("memory leak"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn predict_unknown_prefix_is_local_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/predictive-analysis/Production-db-1")
            .with_status(200)
            .with_body(r#"{"predicted_issue":"disk wear","confidence":"Low"}"#)
            .create_async()
            .await;

        let ctx = context(&server, Selection::new("Production", "All"));
        let out = predict(&ctx, "db-1", None).await.unwrap();
        assert!(out.contains("disk wear"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn environments_save_validates_against_catalog() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/environments")
            .with_status(503)
            .create_async()
            .await;
        let temp_dir = tempfile::TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.json")).unwrap();

        let ctx = context(&server, Selection::new("Production", "app2"));
        let out = environments(&ctx, Some(&manager)).await.unwrap();
        assert!(out.contains("* app2"));
        assert!(out.contains("Saved default selection: Production-app2"));
        assert_eq!(manager.get().display.default_environment, "Production");
        assert_eq!(manager.get().display.default_application, "app2");

        let ctx = context(&server, Selection::new("Staging", "app9"));
        assert!(environments(&ctx, Some(&manager)).await.is_err());
        assert_eq!(manager.get().display.default_environment, "Production");

        let ctx = context(&server, Selection::new("Sandbox", "All"));
        assert!(environments(&ctx, Some(&manager)).await.is_err());

        // 저장하지 않으면 목록만
        let out = environments(&ctx, None).await.unwrap();
        assert!(!out.contains("Saved"));
    }

    #[tokio::test]
    async fn chat_failure_shows_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat/message")
            .with_status(500)
            .create_async()
            .await;

        let ctx = context(&server, Selection::all());
        let out = chat(&ctx, "why is server3 slow?").await.unwrap();
        assert!(out.contains("You: why is server3 slow?"));
        assert!(out.contains("I'm having trouble connecting to the server"));
        assert!(!out.contains("messages in history"));
        assert!(chat(&ctx, "   ").await.is_err());
    }

    #[tokio::test]
    async fn chat_reply_reports_stored_history() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat/message")
            .with_status(200)
            .with_body(r#"{"response":"server3 looks healthy."}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/chat/history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"id":"m1","type":"user","content":"how is server3?"},
                    {"id":"m2","type":"bot","content":"server3 looks healthy."}]"#,
            )
            .create_async()
            .await;

        let ctx = context(&server, Selection::all());
        let out = chat(&ctx, "how is server3?").await.unwrap();
        assert!(out.contains("Assistant: server3 looks healthy."));
        assert!(out.contains("(2 messages in history"));
    }
}
