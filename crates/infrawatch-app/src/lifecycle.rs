//! 감시 모드 수명.
//!
//! 감시 루프는 `StopSignal`을 들고 있다가 멈춤 이유가 기록되면 빠져나온다.
//! 이유는 처음 기록된 것 하나만 남는다.

use std::fmt;
use std::io;
use tokio::sync::watch;
use tracing::info;

/// 감시 모드가 멈춘 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
    /// 코드에서 직접 요청
    Requested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Interrupt => "interrupt",
            StopReason::Terminate => "terminate",
            StopReason::Requested => "requested",
        })
    }
}

/// 감시 모드 수명 관리
pub struct WatchLifecycle {
    stop_tx: watch::Sender<Option<StopReason>>,
}

impl WatchLifecycle {
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(None);
        Self { stop_tx }
    }

    /// 감시 루프에 넘길 수신 측
    pub fn stop_signal(&self) -> StopSignal {
        StopSignal {
            rx: self.stop_tx.subscribe(),
        }
    }

    /// 멈춤 기록. 이미 멈췄으면 false.
    pub fn stop(&self, reason: StopReason) -> bool {
        let recorded = self.stop_tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
        if recorded {
            info!("감시 모드 멈춤 요청: {reason}");
        }
        recorded
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        *self.stop_tx.borrow()
    }

    /// OS 시그널이 올 때까지 기다렸다가 멈춤을 기록한다
    ///
    /// 핸들러 등록 실패는 호출자에게 돌려준다.
    pub async fn stop_on_signal(&self) -> io::Result<()> {
        #[cfg(unix)]
        let reason = {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::select! {
                _ = sigint.recv() => StopReason::Interrupt,
                _ = sigterm.recv() => StopReason::Terminate,
            }
        };

        #[cfg(not(unix))]
        let reason = {
            tokio::signal::ctrl_c().await?;
            StopReason::Interrupt
        };

        self.stop(reason);
        Ok(())
    }
}

impl Default for WatchLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// 멈춤 대기 핸들
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<Option<StopReason>>,
}

impl StopSignal {
    /// 멈춤 이유가 기록될 때까지 대기 (이미 기록됐으면 바로 반환)
    ///
    /// `WatchLifecycle`이 먼저 사라지면 `Requested`로 본다.
    pub async fn stopped(&mut self) -> StopReason {
        loop {
            if let Some(reason) = *self.rx.borrow_and_update() {
                return reason;
            }
            if self.rx.changed().await.is_err() {
                return StopReason::Requested;
            }
        }
    }
}
