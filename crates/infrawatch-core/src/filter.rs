//! 필터 센티널("All") 처리와 쿼리 파라미터 빌더.
//!
//! 드롭다운의 "필터 없음" 선택은 리터럴 `"All"`로 표현된다.
//! 백엔드 호출 시 `"All"`, 빈 문자열, `None`은 쿼리에서 제외되어야 한다.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// "필터 없음" 센티널 값
pub const ALL: &str = "All";

/// 값이 실제 필터로 쓰일 수 있는지 판별 (`None`, 빈 문자열, "All" 제외)
pub fn is_active(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.trim().is_empty() && v != ALL)
}

/// 활성 필터 값만 통과
pub fn active(value: Option<&str>) -> Option<&str> {
    value.filter(|v| is_active(Some(v)))
}

/// 환경 + 애플리케이션 선택 상태
///
/// 최상위 UI 상태로 보관되어 각 뷰 모델에 전달된다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// 환경 이름 (화면 표기 또는 "All")
    pub environment: String,
    /// 애플리케이션 이름 또는 "All"
    pub application: String,
}

impl Selection {
    pub fn new(environment: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            application: application.into(),
        }
    }

    /// 전체 환경 + 전체 애플리케이션
    pub fn all() -> Self {
        Self::new(ALL, ALL)
    }

    /// 쿼리용 환경 값 (센티널이면 None)
    pub fn environment_filter(&self) -> Option<&str> {
        active(Some(&self.environment))
    }

    /// 쿼리용 애플리케이션 값 (센티널이면 None)
    pub fn application_filter(&self) -> Option<&str> {
        active(Some(&self.application))
    }

    pub fn is_all_environments(&self) -> bool {
        self.environment_filter().is_none()
    }

    pub fn is_all_applications(&self) -> bool {
        self.application_filter().is_none()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.environment, self.application)
    }
}

/// 센티널 규칙을 강제하는 쿼리 파라미터 빌더
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 필터 파라미터 추가. "All"/빈 값/None이면 생략
    pub fn filter(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = active(value) {
            self.pairs.push((key.to_string(), v.to_string()));
        }
        self
    }

    /// 항상 전송하는 파라미터 추가 (페이지 번호, limit 등)
    pub fn value(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// 값이 있을 때만 추가 (센티널 검사 없음)
    pub fn optional(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.value(key, v),
            None => self,
        }
    }

    /// 키로 값 조회
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// URL에 쿼리 문자열 적용 (빈 경우 `?`도 붙이지 않음)
    pub fn apply_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (k, v) in &self.pairs {
            query.append_pair(k, v);
        }
    }
}
