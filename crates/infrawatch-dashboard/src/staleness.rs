//! 오래된 응답 폐기.
//!
//! 요청마다 세대 번호와 당시 선택 상태를 붙인다. 응답이 도착했을 때 태그가
//! 현재 상태와 다르면(선택이 바뀌었거나 더 새 요청이 나갔으면) 버린다.

use infrawatch_core::filter::Selection;
use parking_lot::Mutex;
use tracing::debug;

/// 요청 시점 태그
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTag {
    pub generation: u64,
    pub selection: Selection,
}

/// 태그가 붙은 응답
#[derive(Debug, Clone)]
pub struct Tagged<T> {
    pub tag: DispatchTag,
    pub value: T,
}

impl<T> Tagged<T> {
    pub fn new(tag: DispatchTag, value: T) -> Self {
        Self { tag, value }
    }
}

#[derive(Debug)]
struct GuardState {
    generation: u64,
    selection: Selection,
}

/// 세대 카운터 + 선택 스냅샷
#[derive(Debug)]
pub struct StaleGuard {
    state: Mutex<GuardState>,
}

impl StaleGuard {
    pub fn new(selection: Selection) -> Self {
        Self {
            state: Mutex::new(GuardState {
                generation: 0,
                selection,
            }),
        }
    }

    /// 새 요청 시작. 이전에 나간 요청들은 이 시점부터 오래된 것으로 본다.
    pub fn dispatch(&self) -> DispatchTag {
        let mut state = self.state.lock();
        state.generation += 1;
        DispatchTag {
            generation: state.generation,
            selection: state.selection.clone(),
        }
    }

    /// 선택 변경. 진행 중인 요청은 모두 무효가 된다.
    pub fn select(&self, selection: Selection) -> bool {
        let mut state = self.state.lock();
        if state.selection == selection {
            return false;
        }
        state.selection = selection;
        state.generation += 1;
        true
    }

    pub fn selection(&self) -> Selection {
        self.state.lock().selection.clone()
    }

    /// 최신 요청의 응답인지
    pub fn is_current(&self, tag: &DispatchTag) -> bool {
        let state = self.state.lock();
        tag.generation == state.generation && tag.selection == state.selection
    }

    /// 선택만 비교 (다른 작업이 보낸 갱신 결과용)
    pub fn is_current_selection(&self, selection: &Selection) -> bool {
        self.state.lock().selection == *selection
    }

    /// 현재 응답이면 값을 꺼내고 아니면 버림
    pub fn accept<T>(&self, tagged: Tagged<T>) -> Option<T> {
        if self.is_current(&tagged.tag) {
            Some(tagged.value)
        } else {
            debug!(
                "오래된 응답 폐기: generation={}, selection={}",
                tagged.tag.generation, tagged.tag.selection
            );
            None
        }
    }
}

impl Default for StaleGuard {
    fn default() -> Self {
        Self::new(Selection::all())
    }
}
