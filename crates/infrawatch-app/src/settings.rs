//! 설정 레이어링.
//!
//! 설정 파일(`ConfigManager`) → `INFRAWATCH__*` 환경변수 → CLI 플래그 순으로 덮어쓴다.

use anyhow::{Context, Result};
use infrawatch_core::config::AppConfig;
use infrawatch_core::config_manager::ConfigManager;
use infrawatch_core::environment::to_display_name;
use infrawatch_core::filter::{Selection, ALL};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 환경변수 접두어 (`INFRAWATCH__SERVER__BASE_URL` → `server.base_url`)
pub const ENV_PREFIX: &str = "INFRAWATCH";

/// 로컬 DB 파일 이름
const DB_FILE_NAME: &str = "infrawatch.db";

/// CLI에서 넘어온 덮어쓰기 값
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub environment: Option<String>,
    pub application: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// 파일 설정 로드. 실패하면 기본 설정.
pub fn load_file_config() -> AppConfig {
    match ConfigManager::new() {
        Ok(manager) => {
            info!("설정 파일: {}", manager.config_path().display());
            manager.get()
        }
        Err(e) => {
            warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
            AppConfig::default_config()
        }
    }
}

/// 환경변수 레이어 적용
pub fn apply_env(base: &AppConfig, env: config::Environment) -> Result<AppConfig> {
    let merged = config::Config::builder()
        .add_source(config::Config::try_from(base).context("기본 설정 변환 실패")?)
        .add_source(env)
        .build()
        .context("환경변수 설정 병합 실패")?;
    merged
        .try_deserialize::<AppConfig>()
        .context("설정 역직렬화 실패")
}

/// 프로세스 환경변수 소스
pub fn process_env() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// CLI 플래그 적용 + 검증
pub fn apply_overrides(mut config: AppConfig, overrides: &Overrides) -> Result<AppConfig> {
    if let Some(server) = &overrides.server {
        config.server.base_url = server.clone();
    }
    if let Some(env) = &overrides.environment {
        config.display.default_environment = normalize_environment(env);
    }
    if let Some(app) = &overrides.application {
        config.display.default_application = app.clone();
    }
    if let Some(dir) = &overrides.data_dir {
        config.storage.db_path = Some(dir.join(DB_FILE_NAME));
    }
    config.validate().context("설정 검증 실패")?;
    Ok(config)
}

/// 전체 레이어 적용
pub fn load(overrides: &Overrides) -> Result<AppConfig> {
    let file = load_file_config();
    let layered = apply_env(&file, process_env())?;
    apply_overrides(layered, overrides)
}

/// `prod` → `Production`. "All"은 대소문자 무관하게 센티널로.
pub fn normalize_environment(env: &str) -> String {
    if env.eq_ignore_ascii_case(ALL) {
        ALL.to_string()
    } else {
        to_display_name(env)
    }
}

/// 초기 선택 상태
pub fn initial_selection(config: &AppConfig) -> Selection {
    Selection::new(
        config.display.default_environment.clone(),
        config.display.default_application.clone(),
    )
}

/// 로컬 DB 경로 (설정 → 플랫폼 데이터 디렉토리 → 현재 디렉토리)
pub fn resolve_db_path(config: &AppConfig) -> PathBuf {
    config
        .storage
        .db_path
        .clone()
        .or_else(|| ConfigManager::default_db_path().ok())
        .unwrap_or_else(|| Path::new(".").join(DB_FILE_NAME))
}
