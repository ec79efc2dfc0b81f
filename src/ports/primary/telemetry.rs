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

use crate::domain::{QueryError, RawQueryResult, ThrottleRendering};
use async_trait::async_trait;

/// Primary port - Main interface offered by the telemetry domain
///
/// This is what external systems (REST API, library consumers) use to query
/// the board. Every call runs the diagnostic tool afresh; nothing is cached.
#[async_trait]
pub trait TelemetryService: Send + Sync {
    /// SoC temperature, as reported (`{"temp": "45.0'C"}`)
    async fn temperature(&self) -> Result<RawQueryResult, QueryError>;

    /// Boot configuration, integer and string options merged
    async fn configuration(&self) -> Result<RawQueryResult, QueryError>;

    /// Voltage per power rail, keyed by rail name
    async fn voltages(&self) -> Result<RawQueryResult, QueryError>;

    /// Frequency in hertz per clock domain, keyed by domain name
    async fn clock(&self) -> Result<RawQueryResult, QueryError>;

    /// Throttle status
    ///
    /// # Arguments
    /// * `rendering` - Report the raw mask or its decoded conditions
    async fn throttled(&self, rendering: ThrottleRendering)
        -> Result<RawQueryResult, QueryError>;
}
