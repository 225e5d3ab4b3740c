use derive_more::Display;
use tokio::signal;
use tracing::{error, warn};

/// Which signal ended the server.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    #[display("Ctrl+C")]
    Interrupt,
    #[display("SIGTERM")]
    Terminate,
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to listen for SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}

/// Resolves once the process is asked to stop. In-flight requests are left to
/// the HTTP server's own graceful shutdown.
pub async fn shutdown_signal() -> ShutdownReason {
    let reason = tokio::select! {
        _ = interrupt() => ShutdownReason::Interrupt,
        _ = terminate() => ShutdownReason::Terminate,
    };
    warn!(%reason, "Shutdown requested, stopping contact API");
    reason
}
