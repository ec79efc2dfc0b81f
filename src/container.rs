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

//! Dependency injection container for the telemetry server

use crate::adapters::{
    router, ApiOptions, BearerAuth, MetricsExporter, UnixCommandExecutor, VcgencmdRunner,
};
use crate::domain::{ServerConfig, TelemetryCollectionService, VCGENCMD};
use crate::ports::{CommandExecutor, DiagnosticRunner, TelemetryService};
use axum::Router;
use log::{info, warn};
use std::error::Error;
use std::sync::Arc;
use sysinfo::System;

/// Configuration for the dependency injection container
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Diagnostic tool to invoke
    pub diagnostic_program: String,
    /// Value of the `node` label on exported metrics
    pub node_name: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            diagnostic_program: VCGENCMD.to_string(),
            node_name: System::host_name().unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// Dependency injection container
pub struct ServiceContainer {
    config: ContainerConfig,
}

impl ServiceContainer {
    /// Create a new service container with configuration
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Create the command executor
    pub fn create_command_executor(&self) -> Arc<dyn CommandExecutor> {
        Arc::new(UnixCommandExecutor::new())
    }

    /// Create the diagnostic tool runner
    pub fn create_diagnostic_runner(&self) -> Arc<dyn DiagnosticRunner> {
        Arc::new(VcgencmdRunner::with_program(
            self.create_command_executor(),
            &self.config.diagnostic_program,
        ))
    }

    /// Create the telemetry service backing the JSON routes
    pub fn create_telemetry_service(&self) -> Arc<dyn TelemetryService> {
        Arc::new(TelemetryCollectionService::new(
            self.create_diagnostic_runner(),
        ))
    }

    /// Create the Prometheus exporter
    pub fn create_metrics_exporter(&self) -> Result<Arc<MetricsExporter>, Box<dyn Error>> {
        let exporter =
            MetricsExporter::new(self.create_diagnostic_runner(), &self.config.node_name)?;
        Ok(Arc::new(exporter))
    }

    /// Wire up the HTTP router for `server_config`
    pub fn create_router(&self, server_config: &ServerConfig) -> Result<Router, Box<dyn Error>> {
        server_config.validate()?;

        let metrics = if server_config.metrics {
            info!("Exporting metrics for node {}", self.config.node_name);
            Some(self.create_metrics_exporter()?)
        } else {
            None
        };

        let auth = if server_config.auth {
            BearerAuth::with_token(&server_config.token)
        } else {
            BearerAuth::disabled()
        };

        let options = ApiOptions {
            auth,
            redoc: server_config.redoc,
        };

        Ok(router(self.create_telemetry_service(), metrics, options))
    }

    /// Warn when the diagnostic tool is not on `PATH`
    ///
    /// The server still starts; requests fail until the tool shows up.
    pub async fn check_dependencies(&self) -> bool {
        let program = &self.config.diagnostic_program;
        match self
            .create_command_executor()
            .is_command_available(program)
            .await
        {
            Ok(true) => true,
            Ok(false) => {
                warn!("'{program}' not found in PATH; telemetry requests will fail");
                false
            }
            Err(e) => {
                warn!("Could not check for '{program}': {e}");
                false
            }
        }
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

/// Builder pattern for container configuration
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
        }
    }

    /// Set the diagnostic tool to invoke
    pub fn diagnostic_program(mut self, program: &str) -> Self {
        self.config.diagnostic_program = program.to_string();
        self
    }

    /// Set the metrics node label
    pub fn node_name(mut self, node: &str) -> Self {
        self.config.node_name = node.to_string();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ContainerConfig {
        self.config
    }
}

impl Default for ContainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
