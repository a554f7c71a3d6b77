//! 환경 이름 매핑.
//!
//! 프론트 표기(Development, Staging, Production, QA)와 백엔드 표기
//! (Dev, Stage, Prod, QA)를 상호 변환한다. 필터가 컴포넌트 경계를 넘을 때마다
//! 이 모듈을 거쳐야 서버/플래그/알림 비교가 일관된다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 알려진 배포 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
    #[serde(rename = "QA")]
    Qa,
}

impl Environment {
    /// 선택기에 노출되는 순서
    pub const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Staging,
        Environment::Production,
        Environment::Qa,
    ];

    /// 긴 이름 또는 짧은 코드를 대소문자 구분 없이 파싱
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "staging" | "stage" => Some(Environment::Staging),
            "production" | "prod" => Some(Environment::Production),
            "qa" => Some(Environment::Qa),
            _ => None,
        }
    }

    /// 화면 표기 (Development, Staging, Production, QA)
    pub fn display_name(self) -> &'static str {
        match self {
            Environment::Development => "Development",
            Environment::Staging => "Staging",
            Environment::Production => "Production",
            Environment::Qa => "QA",
        }
    }

    /// 백엔드 저장 표기 (Dev, Stage, Prod, QA)
    pub fn short_code(self) -> &'static str {
        match self {
            Environment::Development => "Dev",
            Environment::Staging => "Stage",
            Environment::Production => "Prod",
            Environment::Qa => "QA",
        }
    }

    /// 전역 서버 이름 접두어 (dev, stage, prod, qa)
    pub fn slug(self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Staging => "stage",
            Environment::Production => "prod",
            Environment::Qa => "qa",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 임의 문자열을 백엔드 표기로 정규화 (알 수 없는 값은 그대로)
pub fn to_short_code(name: &str) -> String {
    Environment::parse(name)
        .map(|e| e.short_code().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// 임의 문자열을 화면 표기로 정규화 (알 수 없는 값은 그대로)
pub fn to_display_name(name: &str) -> String {
    Environment::parse(name)
        .map(|e| e.display_name().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// 두 환경 표기가 같은 환경을 가리키는지 비교
pub fn same_environment(a: &str, b: &str) -> bool {
    match (Environment::parse(a), Environment::parse(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.eq_ignore_ascii_case(b),
    }
}
