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

use crate::domain::{CommandError, RawQueryResult};
use async_trait::async_trait;

/// Secondary port - Diagnostic tool runner
///
/// Runs one sub-command of the diagnostic tool (e.g. `measure_volts core`)
/// and returns its parsed output. Implementations must not retry.
#[async_trait]
pub trait DiagnosticRunner: Send + Sync {
    /// Run a sub-command
    ///
    /// # Arguments
    /// * `args` - Sub-command name followed by its arguments
    ///
    /// # Returns
    /// * `Ok(RawQueryResult)` - Parsed `key=value` output (possibly empty)
    /// * `Err(CommandError)` - The tool could not run or reported failure
    async fn run(&self, args: &[&str]) -> Result<RawQueryResult, CommandError>;
}
