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

//! Numeric projections of raw readings

use super::common::parse_numeric_prefix;
use crate::domain::{RawQueryResult, TEMPERATURE_FIELD, VOLTAGE_FIELD};

/// Degrees Celsius from `measure_temp` output (e.g. `temp=45.0'C`)
pub fn parse_temperature_celsius(result: &RawQueryResult) -> Result<f64, String> {
    let raw = result
        .get(TEMPERATURE_FIELD)
        .ok_or_else(|| format!("No '{TEMPERATURE_FIELD}' field"))?;
    parse_numeric_prefix(raw)
}

/// Volts from `measure_volts` output (e.g. `volt=1.2000V`)
pub fn parse_voltage_volts(result: &RawQueryResult) -> Result<f64, String> {
    let raw = result
        .get(VOLTAGE_FIELD)
        .ok_or_else(|| format!("No '{VOLTAGE_FIELD}' field"))?;
    parse_numeric_prefix(raw)
}

/// Hertz from `measure_clock` output (e.g. `frequency(48)=600000000`)
///
/// The key names the clock index, so only the sole value is read.
pub fn parse_clock_hertz(result: &RawQueryResult) -> Result<f64, String> {
    let raw = result
        .sole_value()
        .map_err(|found| format!("Expected exactly one field, found {found}"))?;
    raw.trim()
        .parse::<u64>()
        .map(|hz| hz as f64)
        .map_err(|e| format!("Invalid frequency '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(pairs: &[(&str, &str)]) -> RawQueryResult {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_parse_temperature() {
        assert_eq!(
            parse_temperature_celsius(&result(&[("temp", "45.0'C")])).unwrap(),
            45.0
        );
        assert!(parse_temperature_celsius(&result(&[("temp", "'C")])).is_err());
        assert!(parse_temperature_celsius(&RawQueryResult::new()).is_err());
    }

    #[test]
    fn test_parse_voltage() {
        assert_eq!(
            parse_voltage_volts(&result(&[("volt", "1.3500V")])).unwrap(),
            1.35
        );
        assert!(parse_voltage_volts(&result(&[("voltage", "1.3500V")])).is_err());
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(
            parse_clock_hertz(&result(&[("frequency(48)", "600000000")])).unwrap(),
            600000000.0
        );
        assert!(parse_clock_hertz(&result(&[("frequency(48)", "fast")])).is_err());
        assert!(parse_clock_hertz(&RawQueryResult::new()).is_err());
        assert!(parse_clock_hertz(&result(&[("a", "1"), ("b", "2")])).is_err());
    }
}
