//! Entry point for the `slipway-gateway` HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use slipway_gateway::{browser, routes::create_router};
use slipway_launcher::{Registry, RegistryConfig};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let addr = std::env::var("SLIPWAY_LISTEN_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:5000".to_owned());
    let apps_dir = std::env::var("SLIPWAY_APPS_DIR").unwrap_or_else(|_| "apps".to_owned());
    let ui_dir = PathBuf::from(std::env::var("SLIPWAY_UI_DIR").unwrap_or_else(|_| "ui".to_owned()));

    let registry = match Registry::for_host(RegistryConfig::new(apps_dir)) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            tracing::error!(error = %e, "cannot launch applications on this host");
            std::process::exit(1);
        }
    };

    let app = create_router(Arc::clone(&registry), &ui_dir);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, "slipway-gateway listening");

    // The successful bind above is the readiness signal; only now is the
    // browser pointed at the UI.
    if std::env::var_os("SLIPWAY_NO_BROWSER").is_none() {
        browser::open(format!("http://{addr}/"));
    }

    let serve = axum::serve(listener, app).with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
    });

    if let Err(e) = serve.await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }

    info!("shutting down, stopping launched applications");
    registry.shutdown().await;
}
