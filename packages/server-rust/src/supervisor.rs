//! Process supervisor.
//!
//! Runs the HTTP listener and a termination-signal watcher side by side. The
//! first of them to finish decides the process outcome; the other is aborted.

use std::fmt;
use std::future::Future;
use std::io;

use tokio::signal;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use crate::network::NetworkModule;

/// Lifecycle state observed through [`Supervisor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Terminating,
}

/// Why the supervisor stopped.
#[derive(Debug)]
pub enum Termination {
    /// The listener returned, normally only because of an I/O error.
    Listener(io::Result<()>),
    /// A termination signal was received.
    Signal(&'static str),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listener(Ok(())) => f.write_str("listener stopped"),
            Self::Listener(Err(e)) => write!(f, "listener failed: {e}"),
            Self::Signal(name) => f.write_str(name),
        }
    }
}

/// Races the listener against a termination signal.
pub struct Supervisor {
    state: watch::Sender<ProcessState>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(ProcessState::Running);
        Self { state }
    }

    #[must_use]
    pub fn state(&self) -> ProcessState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProcessState> {
        self.state.subscribe()
    }

    /// Serves `module` until it fails or `signal` resolves.
    ///
    /// Each contender reports once into a channel with room for both; the
    /// first report wins. Returns the winning [`Termination`] after moving
    /// to [`ProcessState::Terminating`] and aborting both tasks. In-flight
    /// requests are not drained.
    pub async fn run<F>(&self, module: NetworkModule, signal: F) -> Termination
    where
        F: Future<Output = &'static str> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Termination>(2);

        let listener_tx = tx.clone();
        let listener = tokio::spawn(async move {
            let result = module.run().await;
            let _ = listener_tx.send(Termination::Listener(result)).await;
        });

        let watcher = tokio::spawn(async move {
            let name = signal.await;
            let _ = tx.send(Termination::Signal(name)).await;
        });

        let cause = rx.recv().await.unwrap_or_else(|| {
            Termination::Listener(Err(io::Error::other(
                "supervised tasks exited without reporting",
            )))
        });

        self.state.send_replace(ProcessState::Terminating);
        listener.abort();
        watcher.abort();

        info!(terminated = %cause, "terminating");
        cause
    }
}

/// Resolves with the signal name on SIGINT, or SIGTERM on Unix.
///
/// A handler that cannot be installed never resolves.
pub async fn terminate_signal() -> &'static str {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(err) => {
                error!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                "SIGTERM"
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::routing::get;
    use axum::Router;
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn signal_terminates_running_listener() {
        let supervisor = Supervisor::new();
        let mut state = supervisor.subscribe();
        assert_eq!(supervisor.state(), ProcessState::Running);

        let module = NetworkModule::new("127.0.0.1:0", Router::new());
        let cause = supervisor.run(module, async { "SIGTEST" }).await;

        assert!(matches!(cause, Termination::Signal("SIGTEST")));
        assert_eq!(cause.to_string(), "SIGTEST");
        assert_eq!(supervisor.state(), ProcessState::Terminating);
        assert!(state.has_changed().unwrap());
        assert_eq!(*state.borrow_and_update(), ProcessState::Terminating);
    }

    #[tokio::test]
    async fn listener_failure_terminates_without_signal() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let supervisor = Supervisor::new();
        let module = NetworkModule::new(addr.to_string(), Router::new());
        let cause = supervisor
            .run(module, std::future::pending::<&'static str>())
            .await;

        match cause {
            Termination::Listener(Err(e)) => assert_eq!(e.kind(), io::ErrorKind::AddrInUse),
            other => panic!("unexpected termination: {other}"),
        }
        assert_eq!(supervisor.state(), ProcessState::Terminating);
    }

    #[tokio::test]
    async fn serves_until_signalled() {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let mut module = NetworkModule::new("127.0.0.1:0", router);
        let addr = module.start().await.unwrap();

        let supervisor = Arc::new(Supervisor::new());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let running = {
            let supervisor = Arc::clone(&supervisor);
            tokio::spawn(async move {
                supervisor
                    .run(module, async move {
                        let _ = stop_rx.await;
                        "SIGTERM"
                    })
                    .await
            })
        };

        let body = reqwest::get(format!("http://{addr}/ping"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");
        assert_eq!(supervisor.state(), ProcessState::Running);

        stop_tx.send(()).unwrap();
        let cause = running.await.unwrap();
        assert!(matches!(cause, Termination::Signal("SIGTERM")));
        assert_eq!(supervisor.state(), ProcessState::Terminating);
    }

    #[test]
    fn termination_messages() {
        assert_eq!(Termination::Listener(Ok(())).to_string(), "listener stopped");
        let failed = Termination::Listener(Err(io::Error::other("boom")));
        assert_eq!(failed.to_string(), "listener failed: boom");
    }
}
