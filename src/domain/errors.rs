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

use thiserror::Error;

/// Command execution errors (adapter level, never shown to API clients)
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// The process could not be started at all
    #[error("failed to start '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    /// The process ran but reported failure
    #[error("{}", describe_failure(.command, .exit_code, .output))]
    Failed {
        command: String,
        exit_code: Option<i32>,
        /// Trimmed stdout/stderr, kept for diagnostics only
        output: String,
    },
}

fn describe_failure(command: &str, exit_code: &Option<i32>, output: &str) -> String {
    let mut message = format!("'{command}' failed");
    if let Some(code) = exit_code {
        message.push_str(&format!(" with exit code {code}"));
    }
    if !output.is_empty() {
        message.push_str(&format!(": {output}"));
    }
    message
}

/// Throttle mask could not be interpreted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThrottleDecodeError {
    #[error("invalid throttle mask '{value}': {reason}")]
    InvalidMask { value: String, reason: String },
}

/// Errors that abort a whole logical query
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// A sub-command invocation failed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A result that must carry exactly one field did not
    #[error("expected exactly one field from '{sub_command}', found {found}")]
    FieldCount { sub_command: String, found: usize },

    /// A result lacked the field the query reads
    #[error("field '{field}' missing from '{sub_command}' output")]
    MissingField { sub_command: String, field: String },
}

/// Server configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),

    #[error("unknown log format: {0}")]
    UnknownLogFormat(String),

    #[error("authentication is enabled but no token was given")]
    MissingToken,

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Metrics registration and encoding errors
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics registry error: {0}")]
    Registry(#[from] prometheus::Error),

    #[error("metrics output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failure_display() {
        let err = CommandError::Failed {
            command: "vcgencmd measure_temp".to_string(),
            exit_code: Some(255),
            output: "VCHI initialization failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'vcgencmd measure_temp' failed with exit code 255: VCHI initialization failed"
        );

        let err = CommandError::Failed {
            command: "vcgencmd".to_string(),
            exit_code: None,
            output: String::new(),
        };
        assert_eq!(err.to_string(), "'vcgencmd' failed");
    }

    #[test]
    fn test_query_error_wraps_command_error() {
        let err: QueryError = CommandError::SpawnFailed {
            command: "vcgencmd".to_string(),
            reason: "No such file or directory".to_string(),
        }
        .into();
        assert!(matches!(err, QueryError::Command(_)));
        assert!(err.to_string().contains("No such file or directory"));
    }
}
