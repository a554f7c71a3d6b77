//! 포트 인터페이스 (trait).
//!
//! 어댑터 crate(`infrawatch-network`, `infrawatch-storage`)가 이 trait들을 구현하며,
//! `infrawatch-app`에서 `Arc<dyn T>`로 와이어링한다.
//! 비동기 trait은 object safety를 위해 `async_trait` 매크로를 사용한다.

pub mod dashboard_api;
pub mod local_store;
