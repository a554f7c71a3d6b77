//! # infrawatch
//!
//! 인프라 모니터링 대시보드 터미널 클라이언트.
//! DI 와이어링, 서브커맨드 실행, 감시 모드 라이프사이클.

mod commands;
mod event_bus;
mod lifecycle;
mod renderer;
mod settings;
mod watch;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use infrawatch_core::config_manager::ConfigManager;
use infrawatch_core::ports::dashboard_api::DashboardApi;
use infrawatch_core::ports::local_store::LocalStore;
use infrawatch_network::http_client::HttpDashboardClient;
use infrawatch_storage::sqlite::SqliteLocalStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{AlertArgs, Context, PageArgs};
use crate::lifecycle::WatchLifecycle;
use crate::renderer::Style;
use crate::settings::Overrides;

/// infrawatch 대시보드 클라이언트
///
/// 서버 메트릭, 네트워크/앱 로그, 알림, 예측 분석, 챗봇을 터미널에서 조회한다.
#[derive(Parser, Debug)]
#[command(name = "infrawatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 백엔드 URL (기본: http://localhost:8000)
    #[arg(long, short = 's', global = true, env = "INFRAWATCH_SERVER")]
    server: Option<String>,

    /// 환경 (Development, Staging, Production, QA, All)
    #[arg(long = "env", short = 'e', global = true)]
    environment: Option<String>,

    /// 애플리케이션 (기본: All)
    #[arg(long = "app", short = 'a', global = true)]
    application: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', global = true, default_value = "warn")]
    log_level: String,

    /// 로컬 DB 디렉토리 (기본: 플랫폼 데이터 디렉토리)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 대시보드 통계, 성능 요약, 위험 서버
    Overview {
        /// 요약 캐시를 무시하고 새로 생성
        #[arg(long)]
        refresh: bool,
    },
    /// 서버 메트릭 카드
    Servers {
        /// 강조할 서버 (예: prod-server3). 예측 플래그가 있으면 분석도 연다.
        #[arg(long)]
        focus: Option<String>,
        /// 집계 메트릭 기간 (예: 24h, 7d)
        #[arg(long)]
        trend: Option<String>,
    },
    /// 네트워크 로그
    Network {
        #[arg(long)]
        page: Option<u32>,
        /// 10, 25, 50, 100
        #[arg(long)]
        page_size: Option<u32>,
        /// 특정 서버의 로그만 (로컬 서버 ID)
        #[arg(long = "server-name")]
        server_name: Option<String>,
    },
    /// 애플리케이션 로그
    Logs {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        /// ALL, CRITICAL, ERROR, WARNING, INFO, DEBUG
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// 알림 목록
    Alerts {
        #[arg(long)]
        search: Option<String>,
        /// error, warning, info
        #[arg(long)]
        kind: Option<String>,
        /// 활성 알림 대신 이력 조회
        #[arg(long)]
        history: bool,
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// 로그 한 건의 LLM 분석
    Analysis {
        log_id: String,
        /// 저장된 분석 대신 새로 생성
        #[arg(long)]
        generate: bool,
    },
    /// 서버 예측 분석
    Predict {
        /// 로컬 서버 ID 또는 전역 이름 (prod-server3)
        #[arg(value_name = "SERVER")]
        server_name: String,
        /// 서버의 환경 (생략하면 --env 선택 환경)
        #[arg(long = "environment")]
        server_environment: Option<String>,
    },
    /// 챗봇에 질문
    Chat { message: String },
    /// 챗봇 대화 이력
    ChatHistory {
        #[arg(long)]
        clear: bool,
        /// 메시지 컨텍스트 조회
        #[arg(long)]
        context: Option<String>,
    },
    /// 환경/애플리케이션 목록
    Environments {
        /// --env/--app 선택을 검증해 기본값으로 저장
        #[arg(long)]
        save: bool,
    },
    /// 주기 갱신 감시 모드 (Ctrl+C로 종료)
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화 (stdout은 렌더링 출력 전용)
    let log_filter = format!(
        "infrawatch={},infrawatch_app={},infrawatch_core={},infrawatch_network={},infrawatch_storage={},infrawatch_dashboard={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    // 설정 로드 (파일 → 환경변수 → CLI)
    let overrides = Overrides {
        server: args.server.clone(),
        environment: args.environment.clone(),
        application: args.application.clone(),
        data_dir: args.data_dir.clone(),
    };
    let config = settings::load(&overrides)?;
    let selection = settings::initial_selection(&config);
    info!("서버: {}, 선택: {selection}", config.server.base_url);

    // ── 어댑터 생성 (DI 와이어링) ──

    let api: Arc<dyn DashboardApi> =
        Arc::new(HttpDashboardClient::from_config(&config).context("HTTP 클라이언트 생성 실패")?);

    let db_path = settings::resolve_db_path(&config);
    let store: Arc<dyn LocalStore> = Arc::new(
        SqliteLocalStore::open(&db_path)
            .with_context(|| format!("로컬 DB 열기 실패: {}", db_path.display()))?,
    );
    info!("로컬 DB: {}", db_path.display());

    let ctx = Context::new(api, store, config, selection, Style::detect());

    // ── 커맨드 실행 ──

    let output = match args.command {
        Command::Overview { refresh } => commands::overview(&ctx, refresh).await?,
        Command::Servers { focus, trend } => {
            commands::servers(&ctx, focus.as_deref(), trend.as_deref()).await?
        }
        Command::Network {
            page,
            page_size,
            server_name,
        } => {
            commands::network(&ctx, PageArgs { page, page_size }, server_name.as_deref()).await?
        }
        Command::Logs {
            page,
            page_size,
            level,
            search,
        } => {
            commands::logs(
                &ctx,
                PageArgs { page, page_size },
                level.as_deref(),
                search.as_deref(),
            )
            .await?
        }
        Command::Alerts {
            search,
            kind,
            history,
            days,
        } => {
            let alert_args = AlertArgs {
                search,
                kind,
                history,
                days,
            };
            commands::alerts(&ctx, &alert_args).await?
        }
        Command::Analysis { log_id, generate } => {
            commands::analysis(&ctx, &log_id, generate).await?
        }
        Command::Predict {
            server_name,
            server_environment,
        } => {
            let environment = server_environment
                .as_deref()
                .map(settings::normalize_environment);
            commands::predict(&ctx, &server_name, environment.as_deref()).await?
        }
        Command::Chat { message } => commands::chat(&ctx, &message).await?,
        Command::ChatHistory { clear, context } => {
            commands::chat_history(&ctx, clear, context.as_deref()).await?
        }
        Command::Environments { save } => {
            let manager = if save {
                Some(ConfigManager::new().context("설정 관리자 초기화 실패")?)
            } else {
                None
            };
            commands::environments(&ctx, manager.as_ref()).await?
        }
        Command::Watch => {
            let lifecycle = Arc::new(WatchLifecycle::new());
            let signals = lifecycle.clone();
            tokio::spawn(async move {
                if let Err(e) = signals.stop_on_signal().await {
                    warn!("시그널 핸들러 등록 실패: {e}");
                }
            });
            watch::run(&ctx, lifecycle.stop_signal(), |frame| print!("{frame}")).await?;
            if let Some(reason) = lifecycle.stop_reason() {
                info!("감시 종료 이유: {reason}");
            }
            info!("infrawatch 종료");
            return Ok(());
        }
    };

    print!("{output}");
    Ok(())
}
