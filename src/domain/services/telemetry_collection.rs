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

use crate::domain::{
    decode_throttle_mask, parse_clock_hertz, parse_temperature_celsius, parse_voltage_volts,
    render_throttle_conditions, QueryError, RawQueryResult, TelemetrySample, ThrottleRendering,
    CLOCK_DOMAINS, CONFIG_CATEGORIES, THROTTLED_FIELD, VOLTAGE_FIELD, VOLTAGE_RAILS,
};
use crate::ports::{DiagnosticRunner, TelemetryService};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

/// Domain service that assembles telemetry responses
///
/// Each query runs one or more diagnostic sub-commands in sequence and shapes
/// their output. Any failing sub-command fails the whole query.
pub struct TelemetryCollectionService {
    /// Diagnostic tool runner
    runner: Arc<dyn DiagnosticRunner>,
}

impl TelemetryCollectionService {
    /// Create a new telemetry collection service
    ///
    /// # Arguments
    /// * `runner` - Runner for diagnostic sub-commands
    pub fn new(runner: Arc<dyn DiagnosticRunner>) -> Self {
        Self { runner }
    }

    async fn run(&self, args: &[&str]) -> Result<RawQueryResult, QueryError> {
        debug!("Running diagnostic sub-command: {}", args.join(" "));
        Ok(self.runner.run(args).await?)
    }
}

#[async_trait]
impl TelemetryService for TelemetryCollectionService {
    async fn temperature(&self) -> Result<RawQueryResult, QueryError> {
        self.run(&["measure_temp"]).await
    }

    async fn configuration(&self) -> Result<RawQueryResult, QueryError> {
        let mut config = RawQueryResult::new();
        for category in CONFIG_CATEGORIES {
            config.merge(self.run(&["get_config", category]).await?);
        }
        Ok(config)
    }

    async fn voltages(&self) -> Result<RawQueryResult, QueryError> {
        let mut voltages = RawQueryResult::new();
        for rail in VOLTAGE_RAILS {
            let out = self.run(&["measure_volts", rail]).await?;
            let volt = out.get(VOLTAGE_FIELD).ok_or_else(|| QueryError::MissingField {
                sub_command: format!("measure_volts {rail}"),
                field: VOLTAGE_FIELD.to_string(),
            })?;
            voltages.insert(rail, volt);
        }
        Ok(voltages)
    }

    async fn clock(&self) -> Result<RawQueryResult, QueryError> {
        let mut clock = RawQueryResult::new();
        for domain in CLOCK_DOMAINS {
            let out = self.run(&["measure_clock", domain]).await?;
            let frequency = out.sole_value().map_err(|found| QueryError::FieldCount {
                sub_command: format!("measure_clock {domain}"),
                found,
            })?;
            clock.insert(domain, frequency);
        }
        Ok(clock)
    }

    async fn throttled(
        &self,
        rendering: ThrottleRendering,
    ) -> Result<RawQueryResult, QueryError> {
        let mut throttled = self.run(&["get_throttled"]).await?;

        if rendering == ThrottleRendering::HumanReadable {
            let decoded = throttled.get(THROTTLED_FIELD).map(decode_throttle_mask);
            match decoded {
                Some(Ok(conditions)) => {
                    throttled.insert(THROTTLED_FIELD, render_throttle_conditions(&conditions));
                }
                Some(Err(e)) => warn!("Reporting raw throttle value: {e}"),
                None => warn!("No '{THROTTLED_FIELD}' field in get_throttled output"),
            }
        }

        Ok(throttled)
    }
}

/// Collect the numeric readings exported as metrics
///
/// Readings run sequentially. A failed sub-command or unparsable value is
/// logged and reported as 0.
pub async fn collect_sample(runner: &dyn DiagnosticRunner) -> TelemetrySample {
    let mut sample = TelemetrySample {
        temperature: read_or_zero(runner, &["measure_temp"], parse_temperature_celsius).await,
        ..TelemetrySample::default()
    };

    for rail in VOLTAGE_RAILS {
        let volts = read_or_zero(runner, &["measure_volts", rail], parse_voltage_volts).await;
        sample.voltages.insert(rail.to_string(), volts);
    }

    for domain in CLOCK_DOMAINS {
        let hertz = read_or_zero(runner, &["measure_clock", domain], parse_clock_hertz).await;
        sample.clocks.insert(domain.to_string(), hertz);
    }

    sample
}

async fn read_or_zero(
    runner: &dyn DiagnosticRunner,
    args: &[&str],
    parse: fn(&RawQueryResult) -> Result<f64, String>,
) -> f64 {
    match runner.run(args).await {
        Ok(out) => parse(&out).unwrap_or_else(|e| {
            warn!("Unusable reading from '{}': {e}", args.join(" "));
            0.0
        }),
        Err(e) => {
            warn!("Reading '{}' failed: {e}", args.join(" "));
            0.0
        }
    }
}
