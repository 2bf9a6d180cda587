use crate::frameworks::config;
use crate::interface_adapters::clients::{ServiceAccountCredentials, SheetsClient, SheetsConfig};
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{AppState, SystemClock};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Wires the reqwest adapters behind the domain ports.
pub fn build_state(config: SheetsConfig, timeout: Duration) -> Result<AppState, reqwest::Error> {
    let sheet_name: Arc<str> = Arc::from(config.sheet_name.as_str());
    let config = Arc::new(config);
    let gateway = Arc::new(SheetsClient::new(config.clone(), timeout)?);
    let credentials = Arc::new(ServiceAccountCredentials::new(config, SystemClock, timeout)?);

    Ok(AppState {
        gateway,
        credentials,
        sheet_name,
    })
}

// Serve the app on an already-bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, routes::app(state)).await
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let sheets = config::sheets_config();
    if let Err(err) = sheets.require() {
        // Keep serving; every sheet-backed request will report the gap.
        tracing::warn!(error = %err, "spreadsheet configuration incomplete");
    }
    tracing::debug!(config = ?sheets, "spreadsheet client configured.");

    let state = match build_state(sheets, config::sheets_http_timeout()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to build http clients");
            return;
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    // Bind TCP listener with error handling.
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return; // Abort startup on bind failure.
        }
    };
    tracing::info!(%addr, "listening");

    // Serve app and report errors rather than panicking.
    if let Err(e) = serve(listener, state).await {
        tracing::error!(error = %e, "server error");
    }
}
