//! 화면 간 이동 의도.
//!
//! Overview에서 위험 서버를 누르면 Server Metrics 화면이 해당 서버를 강조하고
//! 조건이 맞으면 예측 분석을 연다. 의도는 한 번만 소비된다.

use infrawatch_core::environment::same_environment;
use infrawatch_core::models::predictive::PredictiveFlag;
use infrawatch_core::server_naming::{global_name, parse_global_name};
use parking_lot::Mutex;
use tracing::debug;

/// 서버 강조 + 분석 자동 열기 의도
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFocusIntent {
    /// 강조 대상 전역 이름
    pub global_name: String,
    /// 로컬 서버 ID
    pub server: String,
    pub environment: String,
    /// 예측 분석 패널 자동 열기
    pub open_analysis: bool,
}

impl ServerFocusIntent {
    pub fn new(server: &str, environment: &str, open_analysis: bool) -> Self {
        Self {
            global_name: global_name(server, environment),
            server: server.to_string(),
            environment: environment.to_string(),
            open_analysis,
        }
    }

    /// 전역 이름(`prod-server3`)에서 생성
    pub fn from_global(global: &str, open_analysis: bool) -> Self {
        let (environment, server) = parse_global_name(global);
        Self {
            global_name: global.to_string(),
            server,
            environment,
            open_analysis,
        }
    }

    /// 예측 플래그와 같은 서버인지
    pub fn matches_flag(&self, flag: &PredictiveFlag) -> bool {
        flag.server_name == self.server && same_environment(&flag.environment, &self.environment)
    }
}

/// 단일 슬롯 의도 저장소
#[derive(Debug, Default)]
pub struct NavigationIntents {
    slot: Mutex<Option<ServerFocusIntent>>,
}

impl NavigationIntents {
    pub fn new() -> Self {
        Self::default()
    }

    /// 의도 등록 (이전 의도는 덮어씀)
    pub fn publish(&self, intent: ServerFocusIntent) {
        debug!("이동 의도 등록: {}", intent.global_name);
        *self.slot.lock() = Some(intent);
    }

    /// 의도 꺼내기. 이후 호출은 None.
    pub fn consume(&self) -> Option<ServerFocusIntent> {
        self.slot.lock().take()
    }
}
