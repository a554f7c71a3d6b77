//! LLM 성능 요약 분류기.
//!
//! 자유 형식 요약을 문장 단위로 나눠 다섯 버킷에 넣는다. 문장마다 아래 순서로
//! 첫 번째로 맞는 규칙 하나만 적용한다.
//!
//! 1. 서버 토큰 + 위험 어휘 → 장애 예측 (전역 서버 이름 기준 중복 제거)
//! 2. 위험 어휘만 → 주요 이슈
//! 3. 권고 어휘 → 권고 사항
//! 4. 서버 토큰만 → 서버 상태 (전역 서버 이름 기준 중복 제거)
//! 5. 나머지 → 개요 문단

use infrawatch_core::filter::Selection;
use infrawatch_core::server_naming::global_name;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::markdown::InlineText;

struct Patterns {
    header: Regex,
    sentence_end: Regex,
    server: Regex,
    critical: Regex,
    severe: Regex,
    recommendation: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        header: Regex::new(r"#+\s*").expect("header pattern"),
        sentence_end: Regex::new(r"[.!?]+").expect("sentence pattern"),
        server: Regex::new(r"(?i)server\d+").expect("server pattern"),
        critical: Regex::new(
            r"(?i)critical|100%|fluctuating|slow|impacting|high cpu|high memory|performance issues|spikes to 100%|resource exhaustion|failure|risk",
        )
        .expect("critical pattern"),
        severe: Regex::new(r"(?i)critical|100%").expect("severity pattern"),
        recommendation: Regex::new(
            r"(?i)recommend|investigate|implement|expand|address|next steps|consider|restart|analyze|pinpoint",
        )
        .expect("recommendation pattern"),
    })
}

/// 장애 예측 심각도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    High,
}

/// 장애 예측 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailurePrediction {
    /// 전역 서버 이름 (예: `prod-server3`)
    pub server: String,
    /// 로컬 서버 ID (소문자)
    pub local_server: String,
    pub issue: InlineText,
    pub severity: Severity,
    pub environment: String,
}

/// 서버 상태 언급
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHealthNote {
    pub server: String,
    pub local_server: String,
    pub status: InlineText,
    pub environment: String,
}

/// 분류 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSummary {
    pub overview: InlineText,
    pub critical_issues: Vec<InlineText>,
    pub server_health: Vec<ServerHealthNote>,
    pub recommendations: Vec<InlineText>,
    pub failure_predictions: Vec<FailurePrediction>,
    pub environment: String,
    pub application: String,
}

impl ParsedSummary {
    /// 장애 예측에 오른 서버의 전역 이름
    pub fn at_risk_servers(&self) -> Vec<String> {
        self.failure_predictions
            .iter()
            .map(|p| p.server.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.overview.is_empty()
            && self.critical_issues.is_empty()
            && self.server_health.is_empty()
            && self.recommendations.is_empty()
            && self.failure_predictions.is_empty()
    }
}

/// 문장 안의 서버 토큰 (소문자, 등장 순)
fn server_tokens(sentence: &str) -> Vec<String> {
    patterns()
        .server
        .find_iter(sentence)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

/// 요약 텍스트 분류
pub fn parse_summary(text: &str, selection: &Selection) -> ParsedSummary {
    let p = patterns();
    let mut parsed = ParsedSummary {
        environment: selection.environment.clone(),
        application: selection.application.clone(),
        ..Default::default()
    };
    let mut predicted: HashSet<String> = HashSet::new();
    let mut mentioned: HashSet<String> = HashSet::new();

    let cleaned = p.header.replace_all(text, "");
    for sentence in p.sentence_end.split(cleaned.trim()) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let servers = server_tokens(sentence);
        let is_critical = p.critical.is_match(sentence);
        let is_recommendation = p.recommendation.is_match(sentence);

        if is_critical && !servers.is_empty() {
            let severity = if p.severe.is_match(sentence) {
                Severity::Critical
            } else {
                Severity::High
            };
            for server in servers {
                let global = global_name(&server, &selection.environment);
                if predicted.insert(global.clone()) {
                    parsed.failure_predictions.push(FailurePrediction {
                        server: global,
                        local_server: server,
                        issue: InlineText::parse(sentence),
                        severity,
                        environment: selection.environment.clone(),
                    });
                }
            }
        } else if is_critical {
            parsed.critical_issues.push(InlineText::parse(sentence));
        } else if is_recommendation {
            parsed.recommendations.push(InlineText::parse(sentence));
        } else if !servers.is_empty() {
            for server in servers {
                let global = global_name(&server, &selection.environment);
                if mentioned.insert(global.clone()) {
                    parsed.server_health.push(ServerHealthNote {
                        server: global,
                        local_server: server,
                        status: InlineText::parse(sentence),
                        environment: selection.environment.clone(),
                    });
                }
            }
        } else {
            parsed.overview.append(InlineText::parse(sentence));
            parsed.overview.push_text(". ");
        }
    }

    parsed
}
