//! # infrawatch-dashboard
//!
//! 화면 독립적인 대시보드 로직.
//! 포트(`DashboardApi`, `LocalStore`)만 의존하며 렌더링은 `infrawatch-app`이 담당한다.
//!
//! ## 모듈
//! - `summary_parser` / `markdown`: LLM 성능 요약 분류, 인라인 마크다운 스팬
//! - `summary`: 캐시 → 챗봇 프롬프트 → 캐시 순의 요약 로딩
//! - `refresh` / `staleness`: 주기 갱신 코디네이터, 오래된 응답 폐기
//! - `pagination` / `navigation` / `selection`: 페이지, 교차 화면 의도, 환경 선택 상태
//! - `alerts` / `chat`: 알림 센터, 챗봇 세션
//! - `views`: Overview, Server Metrics, Network Metrics, App Logs 뷰 모델

pub mod alerts;
pub mod chat;
pub mod markdown;
pub mod navigation;
pub mod pagination;
pub mod refresh;
pub mod selection;
pub mod staleness;
pub mod summary;
pub mod summary_parser;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;
