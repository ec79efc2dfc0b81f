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

//! Unix command execution adapter

use crate::domain::CommandError;
use crate::ports::{CommandExecutor, CommandOutput, SystemCommand};
use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use tokio::process::Command;

/// Unix-based command executor
///
/// Runs each command exactly once. There is no retry and no timeout beyond
/// what the process itself does.
#[derive(Debug, Default, Clone)]
pub struct UnixCommandExecutor;

impl UnixCommandExecutor {
    /// Create a new Unix command executor
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for UnixCommandExecutor {
    async fn execute(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null());

        debug!("Executing: {command}");

        let output = cmd.output().await.map_err(|e| CommandError::SpawnFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let success = output.status.success();
        let exit_code = output.status.code();

        if !success {
            debug!("Command '{command}' failed with exit code: {exit_code:?}");
        }

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code,
            success,
        })
    }

    async fn is_command_available(&self, command_name: &str) -> Result<bool, CommandError> {
        let which_cmd = SystemCommand::new("which").args(&[command_name]);

        match self.execute(&which_cmd).await {
            Ok(output) => Ok(output.success && !output.stdout.trim().is_empty()),
            Err(_) => Ok(false), // If 'which' fails, assume command is not available
        }
    }
}
