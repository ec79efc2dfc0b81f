/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! REST API adapter
//!
//! Routes:
//! - `GET /temperature`, `/configuration`, `/voltages`, `/clock`, `/throttled[?human=true]`
//! - `GET /metrics` when a metrics exporter is supplied
//! - `GET /redoc` when API documentation is enabled

pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::ApiError;
pub use middleware::BearerAuth;

use super::MetricsExporter;
use crate::ports::TelemetryService;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Options shaping the router
#[derive(Debug, Clone, Default)]
pub struct ApiOptions {
    /// Bearer token check for data and metrics routes
    pub auth: BearerAuth,
    /// Serve the ReDoc viewer and OpenAPI document
    pub redoc: bool,
}

/// Build the complete application router
pub fn router(
    telemetry: Arc<dyn TelemetryService>,
    metrics: Option<Arc<MetricsExporter>>,
    options: ApiOptions,
) -> Router {
    // Layers run outermost first: headers, auth, accept
    let api = Router::new()
        .route("/temperature", get(handlers::temperature))
        .route("/configuration", get(handlers::configuration))
        .route("/voltages", get(handlers::voltages))
        .route("/throttled", get(handlers::throttled))
        .route("/clock", get(handlers::clock))
        .route_layer(axum::middleware::from_fn(middleware::require_json_accept))
        .route_layer(axum::middleware::from_fn_with_state(
            options.auth.clone(),
            middleware::authorize,
        ))
        .route_layer(axum::middleware::from_fn(middleware::response_headers))
        .with_state(telemetry);

    let mut app = Router::new().merge(api);

    if let Some(exporter) = metrics {
        let metrics = Router::new()
            .route("/metrics", get(handlers::metrics))
            .route_layer(axum::middleware::from_fn_with_state(
                options.auth.clone(),
                middleware::authorize,
            ))
            .with_state(exporter);
        app = app.merge(metrics);
    }

    if options.redoc {
        let docs = Router::new()
            .route("/redoc", get(handlers::redoc))
            .route("/redoc/", get(handlers::redoc))
            .route("/redoc/index.html", get(handlers::redoc))
            .route("/redoc/openapi.json", get(handlers::openapi));
        app = app.merge(docs);
    }

    app.fallback(handlers::not_found)
        .layer(axum::middleware::map_response(
            middleware::method_not_allowed_detail,
        ))
        .layer(axum::middleware::from_fn(middleware::access_log))
}

/// Serve `app` until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
