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

//! Prometheus exporter for temperature, voltage and clock gauges

use crate::domain::{collect_sample, MetricsError, TelemetrySample, CLOCK_DOMAINS, VOLTAGE_RAILS};
use crate::ports::DiagnosticRunner;
use log::debug;
use prometheus::{Encoder, Gauge, Opts, Registry, TextEncoder};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Gauges for one node, refreshed on every scrape
pub struct MetricsExporter {
    registry: Registry,
    runner: Arc<dyn DiagnosticRunner>,
    temperature: Gauge,
    voltages: BTreeMap<&'static str, Gauge>,
    clocks: BTreeMap<&'static str, Gauge>,
}

impl MetricsExporter {
    /// Register all gauges, labelled with `node`
    pub fn new(runner: Arc<dyn DiagnosticRunner>, node: &str) -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let gauge = |name: String, help: String| -> Result<Gauge, MetricsError> {
            let gauge = Gauge::with_opts(Opts::new(name, help).const_label("node", node))?;
            registry.register(Box::new(gauge.clone()))?;
            Ok(gauge)
        };

        let temperature = gauge(
            "rpi_temperature".to_string(),
            "SoC temperature in degrees Celsius".to_string(),
        )?;

        let mut voltages = BTreeMap::new();
        for rail in VOLTAGE_RAILS {
            let g = gauge(
                format!("rpi_voltage_{rail}"),
                format!("Voltage of the {rail} rail in volts"),
            )?;
            voltages.insert(rail, g);
        }

        let mut clocks = BTreeMap::new();
        for domain in CLOCK_DOMAINS {
            let g = gauge(
                format!("rpi_clock_{domain}"),
                format!("Frequency of the {domain} clock in hertz"),
            )?;
            clocks.insert(domain, g);
        }

        Ok(Self {
            registry,
            runner,
            temperature,
            voltages,
            clocks,
        })
    }

    /// Content type of the exposition format
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Take fresh readings and render every gauge
    pub async fn scrape(&self) -> Result<String, MetricsError> {
        let sample = collect_sample(self.runner.as_ref()).await;
        self.record(&sample);
        self.encode()
    }

    fn record(&self, sample: &TelemetrySample) {
        self.temperature.set(sample.temperature);
        for (rail, gauge) in &self.voltages {
            gauge.set(sample.voltages.get(*rail).copied().unwrap_or_default());
        }
        for (domain, gauge) in &self.clocks {
            gauge.set(sample.clocks.get(*domain).copied().unwrap_or_default());
        }
        debug!("Recorded sample: {sample:?}");
    }

    fn encode(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommandError, RawQueryResult};
    use async_trait::async_trait;

    struct FixedRunner;

    #[async_trait]
    impl DiagnosticRunner for FixedRunner {
        async fn run(&self, args: &[&str]) -> Result<RawQueryResult, CommandError> {
            let out: RawQueryResult = match args {
                ["measure_temp"] => [("temp", "45.0'C")].into_iter().collect(),
                ["measure_volts", "core"] => [("volt", "1.3500V")].into_iter().collect(),
                ["measure_volts", _] => [("volt", "1.2000V")].into_iter().collect(),
                ["measure_clock", "arm"] => [("frequency(48)", "1500000000")].into_iter().collect(),
                ["measure_clock", "h264"] => {
                    return Err(CommandError::Failed {
                        command: "vcgencmd measure_clock h264".to_string(),
                        exit_code: Some(2),
                        output: String::new(),
                    })
                }
                ["measure_clock", _] => [("frequency(1)", "0")].into_iter().collect(),
                _ => RawQueryResult::new(),
            };
            Ok(out)
        }
    }

    #[tokio::test]
    async fn test_scrape_renders_labelled_gauges() {
        let exporter = MetricsExporter::new(Arc::new(FixedRunner), "testhost").unwrap();
        let body = exporter.scrape().await.unwrap();

        assert!(body.contains("# TYPE rpi_temperature gauge"));
        assert!(body.contains("rpi_temperature{node=\"testhost\"} 45"));
        assert!(body.contains("rpi_voltage_core{node=\"testhost\"} 1.35"));
        assert!(body.contains("rpi_voltage_sdram_p{node=\"testhost\"} 1.2"));
        assert!(body.contains("rpi_clock_arm{node=\"testhost\"} 1500000000"));
        assert!(body.contains("rpi_clock_h264{node=\"testhost\"} 0"));
    }

    #[tokio::test]
    async fn test_every_gauge_is_exported() {
        let exporter = MetricsExporter::new(Arc::new(FixedRunner), "pi").unwrap();
        let body = exporter.scrape().await.unwrap();

        for rail in VOLTAGE_RAILS {
            assert!(body.contains(&format!("rpi_voltage_{rail}{{")), "missing {rail}");
        }
        for domain in CLOCK_DOMAINS {
            assert!(body.contains(&format!("rpi_clock_{domain}{{")), "missing {domain}");
        }
    }

    #[test]
    fn test_content_type_is_text_exposition() {
        let exporter = MetricsExporter::new(Arc::new(FixedRunner), "pi").unwrap();
        assert!(exporter.content_type().starts_with("text/plain"));
    }
}
