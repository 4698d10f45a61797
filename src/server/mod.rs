// Server module entry
// Listener construction, the accept loop, and shutdown coordination.

pub mod connection;
pub mod listener;
pub mod signal;

// Re-export commonly used items
pub use listener::create_listener;
pub use signal::ShutdownSignal;

use crate::config::AppState;
use crate::logger;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Accept loop. Runs until the shutdown signal fires, then drains in-flight
/// connections for up to the configured grace period.
///
/// Accept errors are logged and the loop continues; nothing that happens on
/// an individual connection can take the server down.
pub async fn run(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<ShutdownSignal>) {
    let active = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state, &active);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
            () = shutdown.notified() => break,
        }
    }

    // Stop accepting before draining
    drop(listener);
    drain_connections(&active, state.config.server.shutdown_grace).await;
    logger::log_shutdown();
}

/// Wait for in-flight connections to finish, polling in 100ms steps
async fn drain_connections(active: &Arc<AtomicUsize>, grace_secs: u64) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(grace_secs);
    while active.load(Ordering::SeqCst) > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let remaining = active.load(Ordering::SeqCst);
    if remaining > 0 {
        logger::log_warning(&format!(
            "{remaining} connection(s) still open after {grace_secs}s grace period"
        ));
    }
}
