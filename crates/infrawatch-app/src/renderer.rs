//! 터미널 렌더러.
//!
//! 뷰 모델을 사람이 읽는 텍스트로 바꾼다. 출력은 stdout, 로그는 stderr.
//! 모든 함수는 문자열을 돌려주며 직접 출력하지 않는다.

use infrawatch_core::models::alert::{AlertKind, DisplayAlert};
use infrawatch_core::models::chat::{ChatMessage, ChatRole};
use infrawatch_core::models::network::format_bytes;
use infrawatch_core::models::predictive::Confidence;
use infrawatch_dashboard::alerts::AlertCounts;
use infrawatch_dashboard::markdown::{InlineText, Span};
use infrawatch_dashboard::pagination::PaginationState;
use infrawatch_dashboard::selection::EnvironmentSelector;
use infrawatch_dashboard::summary::{summary_title, PerformanceSummary, SummarySource};
use infrawatch_dashboard::summary_parser::{ParsedSummary, Severity};
use infrawatch_dashboard::views::app_logs::{AnalysisOutcome, AppLogsData};
use infrawatch_dashboard::views::network_metrics::NetworkMetricsData;
use infrawatch_dashboard::views::overview::OverviewData;
use infrawatch_dashboard::views::server_metrics::{AnalysisPanel, ServerMetricsData};
use std::fmt::Write;

/// 출력 스타일
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Ansi,
}

impl Style {
    /// stdout이 터미널이면 ANSI
    pub fn detect() -> Self {
        use std::io::IsTerminal;
        if std::io::stdout().is_terminal() {
            Style::Ansi
        } else {
            Style::Plain
        }
    }

    fn bold(self, text: &str) -> String {
        match self {
            Style::Ansi => format!("\x1b[1m{text}\x1b[0m"),
            Style::Plain => text.to_string(),
        }
    }

    fn dim(self, text: &str) -> String {
        match self {
            Style::Ansi => format!("\x1b[2m{text}\x1b[0m"),
            Style::Plain => text.to_string(),
        }
    }
}

/// 섹션 제목 줄
fn heading(out: &mut String, style: Style, title: &str) {
    let _ = writeln!(out, "{}", style.bold(title));
    let _ = writeln!(out, "{}", "─".repeat(title.chars().count().max(8)));
}

/// 인라인 마크다운 렌더
pub fn inline(text: &InlineText, style: Style) -> String {
    let mut out = String::new();
    for span in text.spans() {
        match span {
            Span::Text(s) => out.push_str(s),
            Span::Bold(s) => out.push_str(&style.bold(s)),
            Span::Emphasis(s) => out.push_str(&style.dim(s)),
            Span::Code(s) => {
                let _ = write!(out, "`{s}`");
            }
            Span::Heading(s) => out.push_str(&style.bold(s)),
            Span::LineBreak => out.push('\n'),
        }
    }
    out
}

fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "High Risk",
        Confidence::Medium => "Medium Risk",
        Confidence::Low => "Low Risk",
    }
}

pub fn overview(
    data: &OverviewData,
    summary: &PerformanceSummary,
    parsed: &ParsedSummary,
    style: Style,
) -> String {
    let mut out = String::new();
    let health = data.health();

    heading(&mut out, style, "Dashboard");
    let _ = writeln!(out, "Total Application Errors : {}", data.total_errors());
    let _ = writeln!(
        out,
        "Health Status            : {} healthy, {} warning, {} critical",
        health.good, health.warning, health.critical
    );
    for alert in data.error_alerts() {
        let _ = writeln!(out, "  [{}] {}", alert.kind, alert.message);
    }
    out.push('\n');

    heading(&mut out, style, &summary_title(&data.selection));
    let _ = writeln!(out, "Past 24 Hours • Monitoring {}", data.server_count_label());
    match summary.source {
        SummarySource::Empty => {
            let _ = writeln!(out, "(요약 없음: 서버 메트릭 대기 중)");
        }
        SummarySource::Unavailable => {
            let _ = writeln!(out, "{}", summary.text);
        }
        SummarySource::Cache | SummarySource::Generated => {
            if !parsed.overview.is_empty() {
                let _ = writeln!(out, "\n{}", style.bold("System Overview"));
                let _ = writeln!(out, "{}", inline(&parsed.overview, style).trim_end());
            }
            if !parsed.critical_issues.is_empty() {
                let _ = writeln!(out, "\n{}", style.bold("Critical Issues"));
                for issue in &parsed.critical_issues {
                    let _ = writeln!(out, "  • {}", inline(issue, style));
                }
            }
            if !parsed.failure_predictions.is_empty() {
                let _ = writeln!(out, "\n{}", style.bold("Server Failure Predictions"));
                for prediction in &parsed.failure_predictions {
                    let severity = match prediction.severity {
                        Severity::Critical => "CRITICAL",
                        Severity::High => "HIGH",
                    };
                    let _ = writeln!(
                        out,
                        "  • {} [{severity}] {}",
                        prediction.server,
                        inline(&prediction.issue, style)
                    );
                }
            }
            if !parsed.server_health.is_empty() {
                let _ = writeln!(out, "\n{}", style.bold("Server Health"));
                for note in &parsed.server_health {
                    let _ = writeln!(out, "  • {}: {}", note.server, inline(&note.status, style));
                }
            }
            if !parsed.recommendations.is_empty() {
                let _ = writeln!(out, "\n{}", style.bold("Recommendations"));
                for rec in &parsed.recommendations {
                    let _ = writeln!(out, "  • {}", inline(rec, style));
                }
            }
        }
    }

    let lines = data.risk_lines();
    if !lines.is_empty() {
        out.push('\n');
        heading(&mut out, style, "Critical Servers - Failure Risk Detected");
        for line in lines {
            let _ = writeln!(
                out,
                "  {} ({})\n    Server Performance: {} is experiencing {}...",
                line.global_name,
                confidence_label(line.confidence),
                line.global_name,
                line.issue_preview
            );
        }
    }

    let critical = data.critical_servers(parsed);
    if !critical.is_empty() {
        let _ = writeln!(out, "\nAt-risk servers: {}", critical.join(", "));
    }
    out
}

pub fn servers(data: &ServerMetricsData, style: Style) -> String {
    let mut out = String::new();
    let stats = &data.stats;
    heading(&mut out, style, "Server Metrics");
    let _ = writeln!(
        out,
        "Total {} | Healthy {} | Critical {} | Avg CPU {:.2}% | Avg Memory {:.2}% | Avg Disk {:.2}%",
        stats.total, stats.healthy, stats.critical, stats.avg_cpu, stats.avg_memory, stats.avg_disk
    );
    if data.metrics.is_empty() {
        let _ = writeln!(out, "No server metrics available");
        return out;
    }
    out.push('\n');

    for card in data.cards() {
        let marker = if card.highlighted { "▶ " } else { "  " };
        let name = if card.highlighted {
            style.bold(&card.global_name)
        } else {
            card.global_name.clone()
        };
        let badge = if card.failure_risk.is_some() {
            " [Failure Risk]"
        } else {
            ""
        };
        let s = card.sample;
        let _ = writeln!(
            out,
            "{marker}{name}{badge}  {:?}  CPU {:.1}%  MEM {:.1}%  DISK {:.1}%  TEMP {:.1}°C",
            s.server_health, s.cpu_usage, s.memory_usage, s.disk_utilization, s.cpu_temp
        );
        if let Some(level) = card.risk.level() {
            let _ = writeln!(out, "    risk {level}: {}", card.risk.factors.join(", "));
        }
        if let Some(flag) = card.failure_risk {
            let _ = writeln!(out, "    predicted: {}", flag.predicted_issue);
        }
    }

    if let Some(panel) = &data.analysis {
        out.push('\n');
        out.push_str(&predictive(panel, style));
    }
    out
}

pub fn predictive(panel: &AnalysisPanel, style: Style) -> String {
    let mut out = String::new();
    heading(&mut out, style, &format!("Predictive Analysis - {}", panel.global_name));
    match &panel.analysis {
        Some(analysis) => {
            let _ = writeln!(out, "Predicted Issue : {}", analysis.predicted_issue);
            let _ = writeln!(out, "Confidence      : {:?}", analysis.confidence);
            if !analysis.current_state_summary.is_empty() {
                let _ = writeln!(out, "Current State   : {}", analysis.current_state_summary);
            }
            if let Some(ts) = &analysis.prediction_timestamp {
                let _ = writeln!(out, "Predicted At    : {ts}");
            }
            if !analysis.preventive_actions.is_empty() {
                let _ = writeln!(out, "Preventive Actions:");
                for (i, action) in analysis.preventive_actions.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {action}", i + 1);
                }
            }
        }
        None => {
            let _ = writeln!(out, "No predictive analysis available for this server");
        }
    }
    out
}

fn page_footer(out: &mut String, pagination: &PaginationState) {
    let _ = writeln!(
        out,
        "\nPage {} of {} ({} total, {} per page)",
        pagination.page(),
        pagination.total_pages().max(1),
        pagination.total_count(),
        pagination.page_size()
    );
}

pub fn network(data: &NetworkMetricsData, pagination: &PaginationState, style: Style) -> String {
    let mut out = String::new();
    let stats = &data.stats;
    heading(&mut out, style, "Network Metrics");
    let _ = writeln!(
        out,
        "Requests {} | Success {} | Failed {} | Avg Response {}ms | Bandwidth {}",
        stats.total_requests,
        stats.successful_requests,
        stats.failed_requests,
        stats.avg_response_time,
        format_bytes(stats.total_bandwidth)
    );
    if data.is_empty() {
        let _ = writeln!(out, "No network logs found");
        return out;
    }
    out.push('\n');
    for log in &data.logs {
        let _ = writeln!(
            out,
            "{}  {} → {}  {}:{}  {}  {}  {}ms  [{}/{}]",
            log.timestamp,
            log.source_ip,
            log.destination_ip,
            log.protocol,
            log.port,
            log.status,
            format_bytes(log.bytes_transferred),
            log.response_time,
            log.environment,
            log.server
        );
    }
    page_footer(&mut out, pagination);
    out
}

pub fn logs(data: &AppLogsData, pagination: &PaginationState, style: Style) -> String {
    let mut out = String::new();
    heading(&mut out, style, "Application Logs");
    let stats = &data.stats;
    let _ = writeln!(
        out,
        "Total {} | Critical {} | Error {} | Warning {} | Info {}",
        stats.total_logs, stats.critical_count, stats.error_count, stats.warning_count, stats.info_count
    );
    if let Some(message) = data.empty_message() {
        let _ = writeln!(out, "{message}");
        return out;
    }
    out.push('\n');
    for entry in &data.logs {
        let _ = writeln!(
            out,
            "{} {:<8} {} [{}] {}/{}/{}  ({})",
            entry.timestamp,
            entry.level.as_str(),
            entry.message,
            entry.logger,
            entry.environment,
            entry.server,
            entry.app_name,
            entry.id
        );
        if let Some(kind) = &entry.exception_type {
            let _ = writeln!(
                out,
                "    {kind}: {}",
                entry.exception_message.as_deref().unwrap_or("")
            );
        }
    }
    page_footer(&mut out, pagination);
    out
}

pub fn log_analysis(log_id: &str, outcome: &AnalysisOutcome, style: Style) -> String {
    let mut out = String::new();
    heading(&mut out, style, &format!("LLM Analysis - {log_id}"));
    match outcome {
        AnalysisOutcome::Ready(analysis) => {
            let _ = writeln!(out, "Issue      : {}", analysis.issue);
            let _ = writeln!(out, "Impact     : {}", analysis.impact);
            let _ = writeln!(out, "Resolution : {}", analysis.resolution);
            if !analysis.commands.is_empty() {
                let _ = writeln!(out, "Commands:");
                for cmd in &analysis.commands {
                    let _ = writeln!(out, "  $ {cmd}");
                }
            }
        }
        AnalysisOutcome::Unavailable(message) => {
            let _ = writeln!(out, "{message}");
        }
    }
    out
}

pub fn alerts(alerts: &[DisplayAlert], style: Style) -> String {
    let mut out = String::new();
    let counts = AlertCounts::of(alerts);
    heading(&mut out, style, "Alerts");
    let _ = writeln!(
        out,
        "{} total ({} error, {} warning, {} info)",
        counts.total(),
        counts.error,
        counts.warning,
        counts.info
    );
    if alerts.is_empty() {
        let _ = writeln!(out, "No active alerts");
        return out;
    }
    for alert in alerts {
        let icon = match alert.kind {
            AlertKind::Error => "✖",
            AlertKind::Warning => "▲",
            AlertKind::Info => "ℹ",
        };
        let _ = writeln!(out, "{icon} {}: {}", style.bold(&alert.title), alert.message);
        let mut meta = Vec::new();
        if let Some(server) = &alert.server {
            meta.push(format!("Server: {server}"));
        }
        if !alert.environment.is_empty() {
            meta.push(format!("Environment: {}", alert.environment));
        }
        if let Some(ts) = &alert.starts_at {
            meta.push(format!("Since: {ts}"));
        }
        if !meta.is_empty() {
            let _ = writeln!(out, "    {}", meta.join(" | "));
        }
    }
    out
}

pub fn chat(messages: &[ChatMessage], style: Style) -> String {
    let mut out = String::new();
    for message in messages {
        let who = match message.role {
            ChatRole::User => "You",
            ChatRole::Bot => "Assistant",
            ChatRole::Error => "Error",
        };
        let body = inline(&InlineText::parse(&message.content), style);
        let _ = writeln!(out, "{}: {body}", style.bold(who));
        if message.has_context() {
            let _ = writeln!(out, "    (context: {})", message.id);
        }
    }
    out
}

pub fn environments(selector: &EnvironmentSelector, style: Style) -> String {
    let mut out = String::new();
    heading(&mut out, style, "Environments");
    for env in selector.environments() {
        let marker = if env == selector.selection().environment {
            "*"
        } else {
            " "
        };
        let _ = writeln!(out, "{marker} {env}");
    }
    out.push('\n');
    heading(
        &mut out,
        style,
        &format!("Applications ({})", selector.selection().environment),
    );
    for app in selector.applications() {
        let marker = if app == selector.selection().application {
            "*"
        } else {
            " "
        };
        let _ = writeln!(out, "{marker} {app}");
    }
    out
}
