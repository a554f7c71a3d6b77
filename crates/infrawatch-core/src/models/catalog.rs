//! 환경/애플리케이션 목록 모델.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 선택기에 노출할 환경 + 환경별 애플리케이션 목록
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentCatalog {
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(default)]
    pub applications: BTreeMap<String, Vec<String>>,
}

impl EnvironmentCatalog {
    /// 백엔드 호출 실패 시 사용하는 고정 목록
    pub fn fallback() -> Self {
        let environments: Vec<String> = ["Development", "Staging", "Production", "QA"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let apps: Vec<String> = ["app1", "app2", "app3"].iter().map(|s| s.to_string()).collect();
        let applications = environments
            .iter()
            .map(|env| (env.clone(), apps.clone()))
            .collect();
        Self {
            environments,
            applications,
        }
    }
}
