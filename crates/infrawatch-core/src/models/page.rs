//! 페이지네이션 응답 모델.
//!
//! 목록 엔드포인트(네트워크 메트릭, 앱 로그)는 모두 `{ logs, stats, pagination }` 형태다.

use serde::{Deserialize, Serialize};

/// 페이지네이션 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub page_size: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub start_index: u64,
    pub end_index: u64,
}

impl Pagination {
    /// 결과 없음
    pub fn empty(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size,
            ..Default::default()
        }
    }
}

/// 페이지 단위 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize, S: Serialize",
    deserialize = "T: Deserialize<'de>, S: Deserialize<'de> + Default"
))]
pub struct Page<T, S> {
    #[serde(default = "Vec::new")]
    pub logs: Vec<T>,
    #[serde(default)]
    pub stats: S,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T, S: Default> Page<T, S> {
    /// 빈 페이지 (호출 실패 시 대체값)
    pub fn empty(page_size: u32) -> Self {
        Self {
            logs: Vec::new(),
            stats: S::default(),
            pagination: Pagination::empty(page_size),
        }
    }

    /// 표시할 항목이 없는지 (total_pages == 0 포함)
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty() || self.pagination.total_pages == 0 && self.pagination.total_count == 0
    }
}
