//! 알림 센터.
//!
//! 활성 알림을 선택 환경(짧은 코드 기준)으로 거르고 화면 표기로 바꾼 뒤,
//! 검색어와 유형으로 한 번 더 거른다. 대시보드 `error_stats`에서도 알림을 만든다.

use infrawatch_core::environment::same_environment;
use infrawatch_core::filter::Selection;
use infrawatch_core::models::alert::{Alert, AlertKind, DisplayAlert};
use infrawatch_core::models::stats::DashboardStats;

/// 검색/유형 필터
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub search: String,
    /// None이면 전체 유형
    pub kind: Option<AlertKind>,
}

impl AlertFilter {
    pub fn new(search: impl Into<String>, kind: Option<AlertKind>) -> Self {
        Self {
            search: search.into(),
            kind,
        }
    }

    /// 제목/메시지/서버에 검색어 포함 (대소문자 무시) + 유형 일치
    pub fn matches(&self, alert: &DisplayAlert) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || alert.title.to_lowercase().contains(&needle)
            || alert.message.to_lowercase().contains(&needle)
            || alert
                .server
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle));
        let matches_kind = self.kind.map_or(true, |kind| alert.kind == kind);
        matches_search && matches_kind
    }
}

/// 유형별 개수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl AlertCounts {
    pub fn of(alerts: &[DisplayAlert]) -> Self {
        alerts.iter().fold(Self::default(), |mut acc, alert| {
            match alert.kind {
                AlertKind::Error => acc.error += 1,
                AlertKind::Warning => acc.warning += 1,
                AlertKind::Info => acc.info += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }
}

/// `error_stats` 버킷 → 알림 (count > 0만)
pub fn error_stat_alerts(stats: &DashboardStats) -> Vec<DisplayAlert> {
    stats
        .error_stats
        .iter()
        .filter(|bucket| bucket.count > 0)
        .map(|bucket| DisplayAlert {
            id: format!("error-stat-{}", bucket.key),
            kind: if bucket.key == "Critical" {
                AlertKind::Error
            } else {
                AlertKind::Warning
            },
            title: bucket.key.clone(),
            message: format!("There are {} {} level errors.", bucket.count, bucket.key),
            server: None,
            environment: String::new(),
            starts_at: None,
        })
        .collect()
}

/// 활성 알림 보관소
#[derive(Debug, Clone, Default)]
pub struct AlertCenter {
    active: Vec<Alert>,
}

impl AlertCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 폴링 결과로 통째로 교체
    pub fn replace(&mut self, alerts: Vec<Alert>) {
        self.active = alerts;
    }

    pub fn active(&self) -> &[Alert] {
        &self.active
    }

    /// 선택 환경의 알림 (환경이 "All"이면 전체)
    pub fn for_selection(&self, selection: &Selection) -> Vec<DisplayAlert> {
        self.active
            .iter()
            .filter(|alert| match selection.environment_filter() {
                Some(env) => same_environment(&alert.environment, env),
                None => true,
            })
            .map(DisplayAlert::from)
            .collect()
    }

    /// 환경 + 검색 + 유형 필터 적용
    pub fn visible(&self, selection: &Selection, filter: &AlertFilter) -> Vec<DisplayAlert> {
        self.for_selection(selection)
            .into_iter()
            .filter(|alert| filter.matches(alert))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrawatch_core::models::stats::StatBucket;

    fn alert(id: &str, severity: &str, name: &str, server: &str, env: &str) -> Alert {
        Alert {
            id: id.to_string(),
            severity: severity.to_string(),
            alertname: Some(name.to_string()),
            server_name: Some(server.to_string()),
            environment: env.to_string(),
            ..Default::default()
        }
    }

    fn center() -> AlertCenter {
        let mut center = AlertCenter::new();
        center.replace(vec![
            alert("1", "critical", "HighCPU", "server1", "Prod"),
            alert("2", "warning", "DiskFilling", "server2", "Prod"),
            alert("3", "info", "Deploy", "server3", "Dev"),
        ]);
        center
    }

    #[test]
    fn environment_filter_uses_short_code() {
        let center = center();
        let prod = center.for_selection(&Selection::new("Production", "All"));
        assert_eq!(prod.len(), 2);
        assert!(prod.iter().all(|a| a.environment == "Prod"));

        assert_eq!(center.for_selection(&Selection::all()).len(), 3);
        assert!(center.for_selection(&Selection::new("QA", "All")).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_title_message_server() {
        let center = center();
        let all = Selection::all();
        assert_eq!(center.visible(&all, &AlertFilter::new("highcpu", None)).len(), 1);
        assert_eq!(center.visible(&all, &AlertFilter::new("SERVER2", None)).len(), 1);
        assert_eq!(center.visible(&all, &AlertFilter::new("env: dev", None)).len(), 1);
        assert!(center.visible(&all, &AlertFilter::new("nothing", None)).is_empty());
    }

    #[test]
    fn kind_filter_and_counts() {
        let center = center();
        let all = Selection::all();
        let errors = center.visible(&all, &AlertFilter::new("", Some(AlertKind::Error)));
        assert_eq!(errors.len(), 1);

        let counts = AlertCounts::of(&center.for_selection(&all));
        assert_eq!(counts, AlertCounts { error: 1, warning: 1, info: 1 });
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn error_stats_become_alerts() {
        let stats = DashboardStats {
            error_stats: vec![
                StatBucket { key: "Critical".into(), count: 2 },
                StatBucket { key: "Error".into(), count: 5 },
                StatBucket { key: "Warning".into(), count: 0 },
            ],
            health_stats: vec![],
        };
        let alerts = error_stat_alerts(&stats);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Error);
        assert_eq!(alerts[0].message, "There are 2 Critical level errors.");
        assert_eq!(alerts[1].kind, AlertKind::Warning);
        assert_eq!(alerts[1].title, "Error");
    }
}
