use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api_rest::{router, AppState};
use rackdiag_core::{
    config::{diagnose_url_from_env_value, timeout_from_env_value},
    ClientConfig, HttpDiagnoseClient,
};

/// `RUST_LOG` plus info-level logging for the gateway, its router and the core library.
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("rackdiag_run=info".parse()?)
        .add_directive("api_rest=info".parse()?)
        .add_directive("rackdiag_core=info".parse()?))
}

/// Main entry point for the rackdiag gateway
///
/// Serves the diagnostic type registry and relays validated diagnose requests to the external
/// diagnose endpoint.
///
/// # Environment Variables
/// - `RACKDIAG_REST_ADDR`: gateway address (default: "0.0.0.0:3000")
/// - `RACKDIAG_DIAGNOSE_URL`: upstream diagnose endpoint (default: "http://127.0.0.1:8000/api/diagnose")
/// - `RACKDIAG_TIMEOUT_SECS`: per-request upstream deadline in seconds (default: 30)
///
/// # Errors
/// Returns an error if configuration is invalid, the address cannot be bound, or the server
/// fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("RACKDIAG_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let diagnose_url = diagnose_url_from_env_value(std::env::var("RACKDIAG_DIAGNOSE_URL").ok());
    let timeout = timeout_from_env_value(std::env::var("RACKDIAG_TIMEOUT_SECS").ok())?;

    let cfg = ClientConfig::new(diagnose_url, timeout)?;
    let client = HttpDiagnoseClient::new(&cfg)?;

    tracing::info!("++ Starting rackdiag gateway on {}", rest_addr);
    tracing::info!("++ Relaying diagnose requests to {}", cfg.diagnose_url());

    let app = router(AppState::new(Arc::new(client), cfg.timeout()));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_covers_gateway_and_core() {
        let filter = log_filter().unwrap().to_string();
        for target in ["rackdiag_run=info", "api_rest=info", "rackdiag_core=info"] {
            assert!(filter.contains(target), "{target} missing from {filter}");
        }
    }
}
