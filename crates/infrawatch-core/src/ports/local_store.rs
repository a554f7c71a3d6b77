//! 로컬 키/값 저장소 포트.
//!
//! 구현: `infrawatch-storage` crate (SQLite)

use crate::error::CoreError;

/// 재시작 후에도 유지되는 문자열 키/값 저장소
///
/// 호출은 짧은 동기 작업이므로 async가 아니다.
pub trait LocalStore: Send + Sync {
    /// 값 조회 (없으면 None)
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (기존 값 덮어씀)
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 값 삭제 (없어도 성공)
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}
