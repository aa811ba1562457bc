use std::sync::Arc;

use tunehub_proto::config::Config;
use tunehub_web::{app::App, gateway::HttpGateway, http, poller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = tunehub_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("web.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("tunehub log: {}", log_path.display());

    tracing::info!("tunehub-web starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {}", e);
        Config::default()
    });

    // ── Backend gateway + controller ─────────────────────────────────────────
    let gateway = HttpGateway::from_config(&config.backend)?;
    tracing::info!("backend at {}", gateway.base_url());
    let app = Arc::new(App::new(Arc::new(gateway), &config.ui));

    // ── Initial data for the home page ───────────────────────────────────────
    if let Err(e) = app.load_settings().await {
        tracing::warn!("initial settings load failed: {}", e);
    }
    if let Err(e) = app.load_toplists(&config.ui.default_source).await {
        tracing::warn!("initial toplist load failed: {}", e);
    }

    // ── Download poller ──────────────────────────────────────────────────────
    let poll_task = poller::spawn(app.clone(), config.ui.poll_interval());

    // ── UI server ────────────────────────────────────────────────────────────
    let server_task = http::start_server(config.http.bind_address.clone(), config.http.port, app);
    eprintln!("tunehub ui: http://{}", config.listen_address());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("ctrl-c received, shutting down"),
        _ = server_task => tracing::error!("UI server stopped"),
    }
    poll_task.abort();

    Ok(())
}
