//! 감시 모드.
//!
//! 서버 메트릭과 활성 알림을 구독하고, 갱신이 올 때마다 화면을 다시 그린다.
//! 종료 신호가 오면 구독을 풀고 코디네이터를 정리한다.

use anyhow::{anyhow, Result};
use infrawatch_dashboard::alerts::AlertCenter;
use infrawatch_dashboard::refresh::{
    DataSource, PollingIntervals, RefreshCoordinator, RefreshPayload, RefreshUpdate,
};
use infrawatch_dashboard::views::server_metrics::{ServerMetricsData, ServerMetricsView};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::commands::Context;
use crate::event_bus::{AppEvent, EventBus};
use crate::lifecycle::StopSignal;
use crate::renderer::{self, Style};

/// 화면 지우기
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// 렌더러가 들고 있는 화면 상태
struct WatchScreen {
    view: ServerMetricsView,
    data: ServerMetricsData,
    alerts: AlertCenter,
    style: Style,
}

impl WatchScreen {
    /// 갱신 반영. 화면이 바뀌었으면 true.
    fn apply(&mut self, update: &RefreshUpdate) -> bool {
        match &update.payload {
            RefreshPayload::ServerMetrics(_) => self.view.apply_refresh(&mut self.data, update),
            RefreshPayload::ActiveAlerts(alerts) => {
                self.alerts.replace(alerts.clone());
                true
            }
        }
    }

    fn frame(&self, update: &RefreshUpdate) -> String {
        let mut out = String::new();
        if self.style == Style::Ansi {
            out.push_str(CLEAR_SCREEN);
        }
        out.push_str(&format!(
            "infrawatch watch | {} | updated {} ({})\n\n",
            self.data.selection,
            update.fetched_at.format("%H:%M:%S"),
            update.key
        ));
        out.push_str(&renderer::servers(&self.data, self.style));
        out.push('\n');
        let visible = self.alerts.for_selection(&self.data.selection);
        out.push_str(&renderer::alerts(&visible, self.style));
        out
    }
}

/// 렌더러 루프. `Shutdown` 이벤트나 버스 종료에서 끝난다.
async fn render_loop<F>(mut screen: WatchScreen, mut rx: broadcast::Receiver<AppEvent>, mut sink: F)
where
    F: FnMut(String) + Send,
{
    loop {
        match rx.recv().await {
            Ok(AppEvent::Refreshed(update)) => {
                debug!("갱신 수신: {} (세대 {})", update.key, update.generation);
                if screen.apply(&update) {
                    sink(screen.frame(&update));
                }
            }
            Ok(AppEvent::Shutdown) => {
                info!("감시 렌더러 종료");
                break;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("렌더러가 이벤트 {skipped}건 건너뜀");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// 감시 모드 실행
///
/// `sink`는 다시 그린 화면 한 장씩을 받는다. `stop`에 멈춤 이유가 기록되면 반환한다.
pub async fn run<F>(ctx: &Context, mut stop: StopSignal, sink: F) -> Result<()>
where
    F: FnMut(String) + Send + 'static,
{
    let selection = ctx.selection.clone();
    let coordinator = RefreshCoordinator::new(
        ctx.api.clone(),
        PollingIntervals::from_config(&ctx.config),
    );
    let bus = EventBus::default();

    let view = ServerMetricsView::new(ctx.api.clone(), ctx.intents.clone(), selection.clone());
    let data = view
        .load()
        .await
        .ok_or_else(|| anyhow!("서버 메트릭 응답이 폐기됨"))?;
    let screen = WatchScreen {
        view,
        data,
        alerts: AlertCenter::new(),
        style: ctx.style,
    };
    let renderer = tokio::spawn(render_loop(screen, bus.subscribe(), sink));

    let mut metrics = coordinator.subscribe(DataSource::ServerMetrics, &selection);
    let mut alerts = coordinator.subscribe(DataSource::ActiveAlerts, &selection);
    info!(
        "감시 시작: {selection} (서버 메트릭 {:?}, 알림 {:?})",
        ctx.config.server_metrics_interval(),
        ctx.config.alerts_interval()
    );

    loop {
        tokio::select! {
            Some(update) = metrics.next() => {
                bus.publish(AppEvent::Refreshed(update));
            }
            Some(update) = alerts.next() => {
                bus.publish(AppEvent::Refreshed(update));
            }
            reason = stop.stopped() => {
                info!("감시 모드 종료 ({reason})");
                break;
            }
            else => {
                warn!("갱신 작업이 모두 끝남");
                break;
            }
        }
    }

    drop(metrics);
    drop(alerts);
    bus.publish(AppEvent::Shutdown);
    coordinator.shutdown();
    if let Err(e) = renderer.await {
        warn!("렌더러 작업 실패: {e}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{StopReason, WatchLifecycle};
    use infrawatch_core::config::AppConfig;
    use infrawatch_core::filter::Selection;
    use infrawatch_network::http_client::HttpDashboardClient;
    use infrawatch_storage::sqlite::SqliteLocalStore;
    use mockito::Matcher;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[tokio::test]
    async fn renders_frames_until_shutdown() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/server_metrics")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"server":"server3","environment":"Prod","cpu_usage":95.0,"server_health":"Good"}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/predictive-maintenance-flags")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("GET", "/api/alerts/active")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"id":"a1","severity":"critical","alertname":"HighCPU","environment":"Prod"}]"#)
            .create_async()
            .await;

        let mut config = AppConfig::default_config();
        config.polling.server_metrics_interval_ms = 50;
        config.polling.alerts_interval_ms = 50;
        let api = HttpDashboardClient::new(&server.url(), "/api", Duration::from_secs(5)).unwrap();
        let ctx = Context::new(
            Arc::new(api),
            Arc::new(SqliteLocalStore::open_in_memory().unwrap()),
            config,
            Selection::new("Production", "All"),
            Style::Plain,
        );

        let frames = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink_frames = frames.clone();
        let lifecycle = WatchLifecycle::new();
        let stop = lifecycle.stop_signal();

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            lifecycle.stop(StopReason::Requested);
        };
        let (result, _) = tokio::join!(
            run(&ctx, stop, move |frame| sink_frames.lock().push(frame)),
            stopper
        );
        result.unwrap();

        let frames = frames.lock();
        assert!(!frames.is_empty());
        assert!(frames.iter().any(|f| f.contains("prod-server3")));
        assert!(frames.iter().any(|f| f.contains("HighCPU")));
        assert!(frames.iter().all(|f| !f.contains(CLEAR_SCREEN)));
    }
}
