//! # infrawatch-core
//!
//! infrawatch 도메인 모델, 포트(trait) 정의, 에러 타입, 설정.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 백엔드 DTO (serde Serialize/Deserialize)
//! - [`ports`]: 어댑터가 구현하는 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`] / [`config_manager`]: 설정 구조체와 파일 로드/저장
//! - [`environment`] / [`filter`] / [`server_naming`]: 환경 표기, "All" 센티널, 전역 서버 이름

pub mod config;
pub mod config_manager;
pub mod environment;
pub mod error;
pub mod filter;
pub mod models;
pub mod ports;
pub mod server_naming;
