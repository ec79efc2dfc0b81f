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

use clap::{Args, Parser, Subcommand};
use log::info;
use rpinfo::logging::init_logger;
use rpinfo::{version, LogFormat, LogLevel, ServerConfig, ServiceContainer};
use std::error::Error;
use std::path::PathBuf;
use tokio::net::TcpListener;

/// Publish Raspberry Pi information via REST API
#[derive(Parser)]
#[command(name = "rpinfo", about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server
    Server(ServerArgs),
    /// Print version information
    Version,
}

#[derive(Args, Debug, Default)]
struct ServerArgs {
    /// TOML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host to run the server on [default: localhost]
    #[arg(long)]
    host: Option<String>,

    /// Port to run the server on [default: 8080]
    #[arg(long)]
    port: Option<u16>,

    /// Enable bearer token authentication
    #[arg(long)]
    auth: bool,

    /// Bearer token for authentication
    #[arg(long, env = "RPINFO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable Prometheus metrics
    #[arg(long)]
    metrics: bool,

    /// Enable ReDoc API documentation
    #[arg(long)]
    redoc: bool,

    /// Log format (text, structured, json) [default: text]
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Log level (debug, info, warn, error) [default: info]
    #[arg(long)]
    log_level: Option<LogLevel>,
}

impl ServerArgs {
    /// Merge flags over the configuration file, or the defaults without one
    fn into_config(self) -> Result<ServerConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_toml_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(token) = self.token {
            config.token = token;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config.auth |= self.auth;
        config.metrics |= self.metrics;
        config.redoc |= self.redoc;

        config.validate()?;
        Ok(config)
    }
}

async fn run_server(args: ServerArgs) -> Result<(), Box<dyn Error>> {
    let config = args.into_config()?;
    init_logger(config.log_level, config.log_format)?;

    let container = ServiceContainer::default();
    container.check_dependencies().await;
    let app = container.create_router(&config)?;

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        "Starting rpinfo {} (commit {}) on {}, auth={} metrics={} redoc={}",
        version::release(),
        version::commit(),
        listener.local_addr()?,
        config.auth,
        config.metrics,
        config.redoc
    );

    rpinfo::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Server(args) => run_server(args).await,
        Command::Version => {
            version::print();
            Ok(())
        }
    }
}
