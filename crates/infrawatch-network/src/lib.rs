//! # infrawatch-network
//!
//! 대시보드 백엔드 REST 어댑터.
//! `DashboardApi` 포트를 reqwest로 구현한다. 필터 센티널 제거, 실패 시 대체값,
//! 404 → `NotFound` 매핑을 한곳에서 처리한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use infrawatch_network::http_client::HttpDashboardClient;
//!
//! let client = HttpDashboardClient::new("http://localhost:8000", "/api", Duration::from_secs(10))?;
//! let metrics = client.server_metrics(&Selection::all()).await;
//! ```

pub mod http_client;
