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

//! Raspberry Pi telemetry over HTTP
//!
//! This library reads hardware telemetry from the `vcgencmd` firmware tool and
//! serves it as JSON and as Prometheus metrics, using a Ports and Adapters
//! (Hexagonal) architecture.
//!
//! # Architecture
//!
//! - **Domain**: Output parsing, throttle decoding and response assembly
//! - **Ports**: Interfaces for running the diagnostic tool and serving queries
//! - **Adapters**: Process execution, the REST API and the metrics exporter
//!
//! # Usage
//!
//! ```rust,no_run
//! use rpinfo::{ServerConfig, ServiceContainer};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = ServiceContainer::default();
//!     let config = ServerConfig::default();
//!
//!     let app = container.create_router(&config)?;
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//!     rpinfo::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod container;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod version;

pub use adapters::{
    router, serve, ApiError, ApiOptions, BearerAuth, MetricsExporter, UnixCommandExecutor,
    VcgencmdRunner,
};
pub use container::{ContainerConfig, ContainerConfigBuilder, ServiceContainer};
pub use domain::{
    CommandError, ConfigError, LogFormat, LogLevel, QueryError, RawQueryResult, ServerConfig,
    TelemetryCollectionService, ThrottleRendering,
};
pub use ports::{CommandExecutor, DiagnosticRunner, TelemetryService};
