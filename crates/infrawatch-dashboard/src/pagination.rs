//! 목록 페이지 상태.
//!
//! 페이지 크기는 10/25/50/100 중 하나. 크기나 선택이 바뀌면 1페이지로 돌아간다.

use infrawatch_core::config::PAGE_SIZES;
use infrawatch_core::error::CoreError;
use infrawatch_core::filter::Selection;
use infrawatch_core::models::page::Pagination;
use infrawatch_core::ports::dashboard_api::PageRequest;
use tracing::warn;

/// 페이지 크기 허용 여부
pub fn is_valid_page_size(size: u32) -> bool {
    PAGE_SIZES.contains(&size)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    page: u32,
    page_size: u32,
    total_pages: u32,
    total_count: u64,
    selection: Selection,
}

impl PaginationState {
    /// 허용되지 않는 크기는 기본값(10)으로 대체
    pub fn new(page_size: u32, selection: Selection) -> Self {
        let page_size = if is_valid_page_size(page_size) {
            page_size
        } else {
            warn!("허용되지 않는 페이지 크기 {page_size}, {} 사용", PAGE_SIZES[0]);
            PAGE_SIZES[0]
        };
        Self {
            page: 1,
            page_size,
            total_pages: 0,
            total_count: 0,
            selection,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// 페이지 크기 변경 → 1페이지
    pub fn set_page_size(&mut self, size: u32) -> Result<(), CoreError> {
        if !is_valid_page_size(size) {
            return Err(CoreError::Validation {
                field: "page_size".to_string(),
                message: format!("{size}는 {PAGE_SIZES:?} 중 하나가 아님"),
            });
        }
        if size != self.page_size {
            self.page_size = size;
            self.page = 1;
        }
        Ok(())
    }

    /// 선택 변경 → 1페이지. 바뀌었으면 true.
    pub fn set_selection(&mut self, selection: &Selection) -> bool {
        if &self.selection == selection {
            return false;
        }
        self.selection = selection.clone();
        self.page = 1;
        true
    }

    fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    /// 지정 페이지로 이동 (1..=마지막 페이지로 제한)
    pub fn go_to(&mut self, page: u32) {
        self.page = page.clamp(1, self.last_page());
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// 응답 메타데이터 반영
    pub fn apply(&mut self, pagination: &Pagination) {
        self.total_pages = pagination.total_pages;
        self.total_count = pagination.total_count;
        if self.total_pages > 0 && self.page > self.total_pages {
            self.page = self.total_pages;
        }
    }

    /// 다음 요청 파라미터
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(PAGE_SIZES[0], Selection::all())
    }
}
