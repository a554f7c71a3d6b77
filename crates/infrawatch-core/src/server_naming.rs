//! 전역 서버 이름 매핑.
//!
//! `(로컬 서버 ID, 환경)` → `"{env_slug}-{server}"` (예: `prod-server3`).
//! 표시와 동등 비교에만 사용한다. 백엔드 호출은 항상 원래 로컬 이름 + 환경을 쓴다.

use crate::environment::Environment;

/// 전역 서버 이름 계산
///
/// 환경은 긴 이름/짧은 코드 모두 허용하며, 알 수 없는 환경은 소문자로 그대로 쓴다.
pub fn global_name(server: &str, environment: &str) -> String {
    format!("{}-{}", environment_slug(environment), server)
}

/// 전역 이름의 환경 접두어
pub fn environment_slug(environment: &str) -> String {
    Environment::parse(environment)
        .map(|e| e.slug().to_string())
        .unwrap_or_else(|| environment.trim().to_lowercase())
}

/// 전역 이름을 (환경 화면 표기, 로컬 서버 ID)로 분해
///
/// 첫 번째 `-`에서 나눈다. 구분자가 없으면 환경은 빈 문자열.
pub fn parse_global_name(global: &str) -> (String, String) {
    match global.split_once('-') {
        Some((slug, server)) if !slug.is_empty() && !server.is_empty() => {
            let environment = Environment::parse(slug)
                .map(|e| e.display_name().to_string())
                .unwrap_or_else(|| slug.to_string());
            (environment, server.to_string())
        }
        _ => (String::new(), global.to_string()),
    }
}
