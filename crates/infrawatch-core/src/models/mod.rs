//! infrawatch 도메인 모델.
//!
//! 백엔드에서 수신하는 DTO. 상태 머신이 아니며 매 폴링마다 통째로 교체된다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현하고, 누락 필드는 기본값으로 채운다.

pub mod alert;
pub mod analysis;
pub mod catalog;
pub mod chat;
pub mod log;
pub mod metric;
pub mod network;
pub mod page;
pub mod predictive;
pub mod stats;

/// `null`을 기본값으로 읽는 역직렬화 (`#[serde(default, deserialize_with = ...)]`와 함께 사용)
///
/// 필드 누락은 `default`가, 명시적 `null`은 이 함수가 처리한다.
pub mod null_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
