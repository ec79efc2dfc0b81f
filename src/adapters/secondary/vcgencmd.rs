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

//! `vcgencmd` diagnostic runner

use crate::domain::{parse_diagnostic_output, CommandError, RawQueryResult, VCGENCMD};
use crate::ports::{CommandExecutor, DiagnosticRunner, SystemCommand};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs `vcgencmd` sub-commands and parses their output
pub struct VcgencmdRunner {
    command_executor: Arc<dyn CommandExecutor>,
    program: String,
}

impl VcgencmdRunner {
    /// Create a runner invoking `vcgencmd` from `PATH`
    pub fn new(command_executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_program(command_executor, VCGENCMD)
    }

    /// Create a runner invoking a different binary with the same interface
    pub fn with_program(command_executor: Arc<dyn CommandExecutor>, program: &str) -> Self {
        Self {
            command_executor,
            program: program.to_string(),
        }
    }
}

#[async_trait]
impl DiagnosticRunner for VcgencmdRunner {
    async fn run(&self, args: &[&str]) -> Result<RawQueryResult, CommandError> {
        let command = SystemCommand::new(&self.program).args(args);
        let output = self.command_executor.execute(&command).await?;

        if !output.success {
            let detail = [output.stdout.trim(), output.stderr.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" - ");

            return Err(CommandError::Failed {
                command: command.to_string(),
                exit_code: output.exit_code,
                output: detail,
            });
        }

        Ok(parse_diagnostic_output(&output.stdout))
    }
}
