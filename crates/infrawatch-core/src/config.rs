//! 애플리케이션 설정 구조체.
//!
//! 백엔드 주소, 폴링 주기, 요약 캐시 TTL, 로컬 DB 경로, 기본 선택 상태를 정의한다.
//! 파일(JSON)에서 로드한 뒤 `INFRAWATCH__` 접두 환경변수와 CLI 플래그로 덮어쓴다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::filter::ALL;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 백엔드 연결 설정
    pub server: ServerConfig,
    /// 자동 갱신 주기
    #[serde(default)]
    pub polling: PollingConfig,
    /// 요약 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 초기 선택/표시 설정
    #[serde(default)]
    pub display: DisplayConfig,
}

/// 백엔드 연결 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API 서버 기본 URL (예: "http://localhost:8000")
    pub base_url: String,
    /// 모든 엔드포인트 앞에 붙는 경로
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// 자동 갱신 주기
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// 서버 메트릭 갱신 주기 (밀리초)
    #[serde(default = "default_server_metrics_interval_ms")]
    pub server_metrics_interval_ms: u64,
    /// 알림 갱신 주기 (밀리초)
    #[serde(default = "default_alerts_interval_ms")]
    pub alerts_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            server_metrics_interval_ms: default_server_metrics_interval_ms(),
            alerts_interval_ms: default_alerts_interval_ms(),
        }
    }
}

/// 요약 캐시 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 요약 캐시 유효 기간 (밀리초)
    #[serde(default = "default_summary_ttl_ms")]
    pub summary_ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            summary_ttl_ms: default_summary_ttl_ms(),
        }
    }
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite DB 파일 경로 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// 초기 선택/표시 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_all")]
    pub default_environment: String,
    #[serde(default = "default_all")]
    pub default_application: String,
    /// 목록 페이지 크기 (10, 25, 50, 100 중 하나)
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_environment: default_all(),
            default_application: default_all(),
            default_page_size: default_page_size(),
        }
    }
}

/// 허용되는 페이지 크기
pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8000".to_string(),
                api_prefix: default_api_prefix(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            polling: PollingConfig::default(),
            cache: CacheConfig::default(),
            storage: StorageConfig::default(),
            display: DisplayConfig::default(),
        }
    }

    /// 값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if url::Url::parse(&self.server.base_url).is_err() {
            return Err(CoreError::Validation {
                field: "server.base_url".to_string(),
                message: format!("올바른 URL이 아님: {}", self.server.base_url),
            });
        }
        if self.server.request_timeout_ms == 0 {
            return Err(CoreError::Validation {
                field: "server.request_timeout_ms".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        if self.polling.server_metrics_interval_ms == 0 || self.polling.alerts_interval_ms == 0 {
            return Err(CoreError::Validation {
                field: "polling".to_string(),
                message: "갱신 주기는 0보다 커야 함".to_string(),
            });
        }
        if !PAGE_SIZES.contains(&self.display.default_page_size) {
            return Err(CoreError::Validation {
                field: "display.default_page_size".to_string(),
                message: format!("{:?} 중 하나여야 함", PAGE_SIZES),
            });
        }
        Ok(())
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// 서버 메트릭 갱신 주기를 Duration으로 반환
    pub fn server_metrics_interval(&self) -> Duration {
        Duration::from_millis(self.polling.server_metrics_interval_ms)
    }

    /// 알림 갱신 주기를 Duration으로 반환
    pub fn alerts_interval(&self) -> Duration {
        Duration::from_millis(self.polling.alerts_interval_ms)
    }

    /// 요약 캐시 TTL을 Duration으로 반환
    pub fn summary_ttl(&self) -> Duration {
        Duration::from_millis(self.cache.summary_ttl_ms)
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_api_prefix() -> String {
    "/api".to_string()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_server_metrics_interval_ms() -> u64 {
    30_000
}
fn default_alerts_interval_ms() -> u64 {
    10_000
}
fn default_summary_ttl_ms() -> u64 {
    300_000 // 5분
}
fn default_all() -> String {
    ALL.to_string()
}
fn default_page_size() -> u32 {
    10
}
