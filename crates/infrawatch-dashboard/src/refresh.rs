//! 주기 갱신 코디네이터.
//!
//! `(데이터 소스, 선택)` 키마다 폴링 작업 하나를 둔다. 같은 키의 구독은 작업을 공유하고,
//! 마지막 구독이 drop되면 작업을 abort한다. 첫 갱신은 구독 직후 바로 일어난다.

use chrono::{DateTime, Utc};
use infrawatch_core::config::AppConfig;
use infrawatch_core::filter::Selection;
use infrawatch_core::models::alert::Alert;
use infrawatch_core::models::metric::MetricSample;
use infrawatch_core::ports::dashboard_api::{AlertQuery, DashboardApi};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// 구독자별 버퍼 크기
const CHANNEL_CAPACITY: usize = 16;

/// 주기적으로 갱신되는 데이터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    ServerMetrics,
    ActiveAlerts,
}

/// 소스별 갱신 주기
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingIntervals {
    pub server_metrics: Duration,
    pub alerts: Duration,
}

impl PollingIntervals {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            server_metrics: config.server_metrics_interval(),
            alerts: config.alerts_interval(),
        }
    }

    pub fn for_source(&self, source: DataSource) -> Duration {
        match source {
            DataSource::ServerMetrics => self.server_metrics,
            DataSource::ActiveAlerts => self.alerts,
        }
    }
}

impl Default for PollingIntervals {
    fn default() -> Self {
        Self {
            server_metrics: Duration::from_secs(30),
            alerts: Duration::from_secs(10),
        }
    }
}

/// 폴링 작업 식별자
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefreshKey {
    pub source: DataSource,
    pub selection: Selection,
}

impl RefreshKey {
    /// 활성 알림은 선택과 무관하게 전체를 받아 화면에서 거르므로 키도 하나로 모은다
    pub fn new(source: DataSource, selection: &Selection) -> Self {
        let selection = match source {
            DataSource::ServerMetrics => selection.clone(),
            DataSource::ActiveAlerts => Selection::all(),
        };
        Self { source, selection }
    }
}

impl fmt::Display for RefreshKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}]", self.source, self.selection)
    }
}

/// 갱신 결과
#[derive(Debug, Clone)]
pub enum RefreshPayload {
    ServerMetrics(Vec<MetricSample>),
    ActiveAlerts(Vec<Alert>),
}

/// 구독자에게 전달되는 갱신
#[derive(Debug, Clone)]
pub struct RefreshUpdate {
    pub key: RefreshKey,
    /// 키별 1부터 증가
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub payload: RefreshPayload,
}

type LatestSlot = Arc<Mutex<Option<Arc<RefreshUpdate>>>>;

struct Entry {
    task: JoinHandle<()>,
    sender: broadcast::Sender<Arc<RefreshUpdate>>,
    notify: Arc<Notify>,
    latest: LatestSlot,
    subscribers: usize,
}

struct Inner {
    api: Arc<dyn DashboardApi>,
    intervals: PollingIntervals,
    entries: Mutex<HashMap<RefreshKey, Entry>>,
    shutdown_tx: watch::Sender<bool>,
}

impl Inner {
    fn release(&self, key: &RefreshKey) {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        entry.subscribers = entry.subscribers.saturating_sub(1);
        if entry.subscribers == 0 {
            if let Some(entry) = entries.remove(key) {
                entry.task.abort();
                debug!("갱신 작업 중단 (구독 없음): {key}");
            }
        }
    }
}

/// 갱신 코디네이터
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl RefreshCoordinator {
    pub fn new(api: Arc<dyn DashboardApi>, intervals: PollingIntervals) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                api,
                intervals,
                entries: Mutex::new(HashMap::new()),
                shutdown_tx,
            }),
        }
    }

    /// 구독 시작 (tokio 런타임 안에서 호출)
    pub fn subscribe(&self, source: DataSource, selection: &Selection) -> Subscription {
        let key = RefreshKey::new(source, selection);

        let mut entries = self.inner.entries.lock();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| self.spawn(&key));
        entry.subscribers += 1;

        Subscription {
            key,
            receiver: entry.sender.subscribe(),
            notify: entry.notify.clone(),
            latest: entry.latest.clone(),
            last_seen: 0,
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn spawn(&self, key: &RefreshKey) -> Entry {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let notify = Arc::new(Notify::new());
        let latest: LatestSlot = Arc::new(Mutex::new(None));
        let period = self.inner.intervals.for_source(key.source);

        info!("갱신 작업 시작: {key} (주기 {period:?})");
        let task = tokio::spawn(poll_loop(PollTask {
            api: self.inner.api.clone(),
            key: key.clone(),
            period,
            notify: notify.clone(),
            sender: sender.clone(),
            latest: latest.clone(),
            shutdown: self.inner.shutdown_tx.subscribe(),
        }));

        Entry {
            task,
            sender,
            notify,
            latest,
            subscribers: 0,
        }
    }

    /// 즉시 갱신 요청 (해당 키의 작업이 없으면 false)
    pub fn refresh_now(&self, key: &RefreshKey) -> bool {
        match self.inner.entries.lock().get(key) {
            Some(entry) => {
                entry.notify.notify_one();
                true
            }
            None => false,
        }
    }

    /// 실행 중인 폴링 작업 수
    pub fn active_tasks(&self) -> usize {
        self.inner.entries.lock().len()
    }

    /// 모든 작업 종료
    pub fn shutdown(&self) {
        let _ = self.inner.shutdown_tx.send(true);
        let drained: Vec<(RefreshKey, Entry)> = self.inner.entries.lock().drain().collect();
        for (key, entry) in drained {
            entry.task.abort();
            debug!("갱신 작업 종료: {key}");
        }
    }
}

/// 구독 핸들. drop 시 작업 참조가 줄어든다.
pub struct Subscription {
    key: RefreshKey,
    receiver: broadcast::Receiver<Arc<RefreshUpdate>>,
    notify: Arc<Notify>,
    latest: LatestSlot,
    last_seen: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    pub fn key(&self) -> &RefreshKey {
        &self.key
    }

    /// 가장 최근 갱신 (아직 없으면 None)
    pub fn latest(&self) -> Option<Arc<RefreshUpdate>> {
        self.latest.lock().clone()
    }

    /// 즉시 갱신 요청
    pub fn refresh_now(&self) {
        self.notify.notify_one();
    }

    /// 다음 갱신 대기. 작업이 끝나면 None.
    pub async fn next(&mut self) -> Option<Arc<RefreshUpdate>> {
        // 구독 전에 이미 나간 갱신
        if let Some(update) = self.latest() {
            if update.generation > self.last_seen {
                self.last_seen = update.generation;
                return Some(update);
            }
        }

        loop {
            match self.receiver.recv().await {
                Ok(update) if update.generation <= self.last_seen => continue,
                Ok(update) => {
                    self.last_seen = update.generation;
                    return Some(update);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("갱신 {skipped}건 건너뜀: {}", self.key);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.release(&self.key);
        }
    }
}

struct PollTask {
    api: Arc<dyn DashboardApi>,
    key: RefreshKey,
    period: Duration,
    notify: Arc<Notify>,
    sender: broadcast::Sender<Arc<RefreshUpdate>>,
    latest: LatestSlot,
    shutdown: watch::Receiver<bool>,
}

async fn fetch(api: &dyn DashboardApi, key: &RefreshKey) -> RefreshPayload {
    match key.source {
        DataSource::ServerMetrics => {
            RefreshPayload::ServerMetrics(api.server_metrics(&key.selection).await)
        }
        DataSource::ActiveAlerts => {
            RefreshPayload::ActiveAlerts(api.active_alerts(&AlertQuery::default()).await)
        }
    }
}

async fn poll_loop(task: PollTask) {
    let PollTask {
        api,
        key,
        period,
        notify,
        sender,
        latest,
        mut shutdown,
    } = task;

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut generation = 0u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = notify.notified() => {
                debug!("수동 갱신: {key}");
                interval.reset();
            }
            _ = shutdown.changed() => {
                info!("갱신 루프 종료: {key}");
                break;
            }
        }

        generation += 1;
        let payload = fetch(api.as_ref(), &key).await;
        let update = Arc::new(RefreshUpdate {
            key: key.clone(),
            generation,
            fetched_at: Utc::now(),
            payload,
        });
        *latest.lock() = Some(update.clone());
        if sender.send(update).is_err() {
            debug!("수신자 없음: {key}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample, FakeApi};
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    fn slow_intervals() -> PollingIntervals {
        PollingIntervals {
            server_metrics: Duration::from_secs(3600),
            alerts: Duration::from_secs(3600),
        }
    }

    #[tokio::test]
    async fn fetches_immediately_on_subscribe() {
        let api = Arc::new(FakeApi::default());
        *api.metrics.lock() = vec![sample("server1", "Prod")];
        let coordinator = RefreshCoordinator::new(api.clone(), slow_intervals());

        let mut sub = coordinator.subscribe(DataSource::ServerMetrics, &Selection::all());
        let update = timeout(WAIT, sub.next()).await.unwrap().unwrap();

        assert_eq!(update.generation, 1);
        match &update.payload {
            RefreshPayload::ServerMetrics(metrics) => assert_eq!(metrics.len(), 1),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn identical_keys_share_one_task() {
        let api = Arc::new(FakeApi::default());
        let coordinator = RefreshCoordinator::new(api.clone(), slow_intervals());
        let selection = Selection::new("Production", "app1");

        let mut a = coordinator.subscribe(DataSource::ServerMetrics, &selection);
        let mut b = coordinator.subscribe(DataSource::ServerMetrics, &selection);
        assert_eq!(coordinator.active_tasks(), 1);

        let ua = timeout(WAIT, a.next()).await.unwrap().unwrap();
        let ub = timeout(WAIT, b.next()).await.unwrap().unwrap();
        assert_eq!(ua.generation, 1);
        assert_eq!(ub.generation, 1);
        assert_eq!(api.metric_calls(), 1);
    }

    #[tokio::test]
    async fn distinct_keys_get_distinct_tasks() {
        let api = Arc::new(FakeApi::default());
        let coordinator = RefreshCoordinator::new(api.clone(), slow_intervals());

        let _a = coordinator.subscribe(DataSource::ServerMetrics, &Selection::all());
        let _b = coordinator.subscribe(DataSource::ServerMetrics, &Selection::new("QA", "All"));
        let mut c = coordinator.subscribe(DataSource::ActiveAlerts, &Selection::all());
        assert_eq!(coordinator.active_tasks(), 3);

        let update = timeout(WAIT, c.next()).await.unwrap().unwrap();
        assert!(matches!(update.payload, RefreshPayload::ActiveAlerts(_)));
    }

    #[tokio::test]
    async fn alert_subscriptions_share_one_task_across_selections() {
        let api = Arc::new(FakeApi::default());
        let coordinator = RefreshCoordinator::new(api.clone(), slow_intervals());

        let mut a = coordinator.subscribe(DataSource::ActiveAlerts, &Selection::new("Production", "All"));
        let mut b = coordinator.subscribe(DataSource::ActiveAlerts, &Selection::new("QA", "app1"));
        assert_eq!(coordinator.active_tasks(), 1);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().selection, Selection::all());

        timeout(WAIT, a.next()).await.unwrap().unwrap();
        timeout(WAIT, b.next()).await.unwrap().unwrap();
        assert_eq!(api.alert_calls(), 1);
    }

    #[tokio::test]
    async fn dropping_last_subscription_stops_task() {
        let api = Arc::new(FakeApi::default());
        let coordinator = RefreshCoordinator::new(api.clone(), slow_intervals());

        let a = coordinator.subscribe(DataSource::ServerMetrics, &Selection::all());
        let b = coordinator.subscribe(DataSource::ServerMetrics, &Selection::all());
        let key = a.key().clone();

        drop(a);
        assert_eq!(coordinator.active_tasks(), 1);
        drop(b);
        assert_eq!(coordinator.active_tasks(), 0);
        assert!(!coordinator.refresh_now(&key));
    }

    #[tokio::test]
    async fn refresh_now_triggers_fetch() {
        let api = Arc::new(FakeApi::default());
        let coordinator = RefreshCoordinator::new(api.clone(), slow_intervals());

        let mut sub = coordinator.subscribe(DataSource::ServerMetrics, &Selection::all());
        timeout(WAIT, sub.next()).await.unwrap().unwrap();

        sub.refresh_now();
        let update = timeout(WAIT, sub.next()).await.unwrap().unwrap();
        assert_eq!(update.generation, 2);
        assert_eq!(api.metric_calls(), 2);

        assert!(coordinator.refresh_now(sub.key()));
        let update = timeout(WAIT, sub.next()).await.unwrap().unwrap();
        assert_eq!(update.generation, 3);
    }

    #[tokio::test]
    async fn polls_on_interval() {
        let api = Arc::new(FakeApi::default());
        let coordinator = RefreshCoordinator::new(
            api.clone(),
            PollingIntervals {
                server_metrics: Duration::from_millis(30),
                alerts: Duration::from_secs(3600),
            },
        );

        let mut sub = coordinator.subscribe(DataSource::ServerMetrics, &Selection::all());
        for expected in 1..=3 {
            let update = timeout(WAIT, sub.next()).await.unwrap().unwrap();
            assert_eq!(update.generation, expected);
        }
    }

    #[tokio::test]
    async fn shutdown_stops_everything() {
        let api = Arc::new(FakeApi::default());
        let coordinator = RefreshCoordinator::new(api.clone(), slow_intervals());

        let _a = coordinator.subscribe(DataSource::ServerMetrics, &Selection::all());
        let _b = coordinator.subscribe(DataSource::ActiveAlerts, &Selection::all());
        coordinator.shutdown();
        assert_eq!(coordinator.active_tasks(), 0);
    }

    #[test]
    fn intervals_from_config() {
        let config = AppConfig::default_config();
        let intervals = PollingIntervals::from_config(&config);
        assert_eq!(intervals, PollingIntervals::default());
        assert_eq!(
            intervals.for_source(DataSource::ActiveAlerts),
            Duration::from_secs(10)
        );
    }
}
