use isoserve::{config, logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // Build the Tokio runtime, sizing the thread pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(cfg)?);

    // Bind failures (port in use, permission denied) surface here and the
    // process exits nonzero
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&listener.local_addr()?, &state);

    let shutdown = Arc::new(server::ShutdownSignal::new());
    server::signal::spawn_signal_listener(Arc::clone(&shutdown));

    server::run(listener, state, shutdown).await;
    Ok(())
}
