use astra::Server;
use chrono::Utc;
use courier_dashboard::config::Config;
use courier_dashboard::dashboard::{ApiSource, Dashboard};
use courier_dashboard::domain::{DashboardState, MonthKey};
use courier_dashboard::responses::html_error_response;
use courier_dashboard::router::handle;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1️⃣ Settings from COURIER_* variables
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Upstream client
    let source = match ApiSource::from_config(&config) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("HTTP client initialization failed: {e}");
            std::process::exit(1);
        }
    };

    // 3️⃣ Dashboard state, first load in the background
    let state = DashboardState::new(
        config.status_table.clone(),
        config.recent_limit,
        MonthKey::of(&Utc::now()),
    );
    let app = Dashboard::new(state, Arc::new(source));
    let _ = app.spawn_refresh();

    // 4️⃣ Serve requests
    let addr = config.bind_addr;
    tracing::info!(api_base = %config.api_base, "Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);
    let handler_app = app.clone();
    let result = server.serve(move |req, _info| match handle(req, &handler_app) {
        Ok(resp) => resp,
        Err(err) => {
            tracing::debug!(error = %err, "request failed");
            html_error_response(err)
        }
    });

    app.close();

    if let Err(e) = result {
        tracing::error!("Server ended with error: {e}");
        std::process::exit(1);
    }

    tracing::info!("Server shut down cleanly.");
}
