//! # infrawatch-storage
//!
//! 로컬 저장소 어댑터.
//! 브라우저 localStorage 역할을 하는 SQLite 키/값 테이블과
//! 그 위에서 동작하는 TTL 기반 요약 캐시를 제공한다.
//!
//! ## 모듈
//! - `sqlite`: 키/값 저장소 (`LocalStore` 구현)
//! - `migration`: 스키마 마이그레이션
//! - `summary_cache`: 환경/앱별 성능 요약 캐시

pub mod migration;
pub mod sqlite;
pub mod summary_cache;
