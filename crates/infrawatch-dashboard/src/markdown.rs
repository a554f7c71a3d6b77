//! 인라인 마크다운 → 타입 있는 스팬.
//!
//! `**굵게**`, `*기울임*`, `` `코드` ``, `## 제목` 줄만 다룬다. HTML 문자열은 만들지 않는다.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// 인라인 스팬
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    Emphasis(String),
    Code(String),
    Heading(String),
    LineBreak,
}

impl Span {
    /// 서식 없는 본문
    pub fn text(&self) -> &str {
        match self {
            Span::Text(s) | Span::Bold(s) | Span::Emphasis(s) | Span::Code(s) | Span::Heading(s) => s,
            Span::LineBreak => "\n",
        }
    }
}

/// 스팬 시퀀스
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineText {
    spans: Vec<Span>,
}

fn inline_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\*\*(?P<bold>.+?)\*\*|\*(?P<em>[^*]+)\*|`(?P<code>[^`]*)`")
            .expect("inline markdown pattern")
    })
}

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*#{2,}\s*(.*)$").expect("heading pattern"))
}

impl InlineText {
    /// 마크다운 문자열 파싱
    pub fn parse(text: &str) -> Self {
        let mut out = Self::default();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.spans.push(Span::LineBreak);
            }
            if let Some(caps) = heading_pattern().captures(line) {
                out.spans.push(Span::Heading(caps[1].trim().to_string()));
                continue;
            }
            out.parse_line(line);
        }
        out
    }

    fn parse_line(&mut self, line: &str) {
        let mut last = 0;
        for caps in inline_pattern().captures_iter(line) {
            let Some(whole) = caps.get(0) else { continue };
            self.push_text(&line[last..whole.start()]);
            let span = if let Some(m) = caps.name("bold") {
                Span::Bold(m.as_str().to_string())
            } else if let Some(m) = caps.name("em") {
                Span::Emphasis(m.as_str().to_string())
            } else if let Some(m) = caps.name("code") {
                Span::Code(m.as_str().to_string())
            } else {
                Span::Text(whole.as_str().to_string())
            };
            self.spans.push(span);
            last = whole.end();
        }
        self.push_text(&line[last..]);
    }

    /// 평문 추가 (인접 평문과 합침)
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Span::Text(prev)) = self.spans.last_mut() {
            prev.push_str(text);
        } else {
            self.spans.push(Span::Text(text.to_string()));
        }
    }

    /// 다른 텍스트를 뒤에 이어 붙임
    pub fn append(&mut self, other: InlineText) {
        for span in other.spans {
            match span {
                Span::Text(s) => self.push_text(&s),
                span => self.spans.push(span),
            }
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// 서식을 제거한 문자열
    pub fn plain(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }
}

impl fmt::Display for InlineText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(span.text())?;
        }
        Ok(())
    }
}
