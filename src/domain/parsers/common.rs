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

//! Common parsing utilities and helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref NUMERIC_PREFIX_RE: Regex = Regex::new(r"^[+-]?\d+(?:\.\d+)?").unwrap();
}

/// Parse a key-value pair from tool output
///
/// Only the first separator splits; the value may contain further separators.
///
/// # Arguments
/// * `line` - Line to parse (e.g., "temp=45.0'C")
/// * `separator` - Separator character (usually '=')
///
/// # Returns
/// * `Ok((String, String))` - Trimmed key-value pair
/// * `Err(String)` - Parse error
pub fn parse_key_value(line: &str, separator: char) -> Result<(String, String), String> {
    if let Some((key, value)) = line.split_once(separator) {
        Ok((key.trim().to_string(), value.trim().to_string()))
    } else {
        Err(format!("No separator '{separator}' found in line: {line}"))
    }
}

/// Parse the leading decimal number of a reading, dropping any unit suffix
///
/// # Arguments
/// * `value` - Raw reading (e.g., "45.0'C", "1.2000V", "600000000")
///
/// # Returns
/// * `Ok(f64)` - The numeric part
/// * `Err(String)` - No leading number
pub fn parse_numeric_prefix(value: &str) -> Result<f64, String> {
    let value = value.trim();
    let number = NUMERIC_PREFIX_RE
        .find(value)
        .ok_or_else(|| format!("No numeric value in: {value}"))?;

    number
        .as_str()
        .parse::<f64>()
        .map_err(|e| format!("Invalid number '{}': {e}", number.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        let (key, value) = parse_key_value(" temp = 45.0'C ", '=').unwrap();
        assert_eq!(key, "temp");
        assert_eq!(value, "45.0'C");
    }

    #[test]
    fn test_parse_key_value_splits_once() {
        let (key, value) = parse_key_value("cmdline=console=serial0,115200", '=').unwrap();
        assert_eq!(key, "cmdline");
        assert_eq!(value, "console=serial0,115200");
    }

    #[test]
    fn test_parse_key_value_no_separator() {
        assert!(parse_key_value("error: unknown command", '=').is_err());
    }

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!(parse_numeric_prefix("45.0'C").unwrap(), 45.0);
        assert_eq!(parse_numeric_prefix("1.2250V").unwrap(), 1.225);
        assert_eq!(parse_numeric_prefix("600000000").unwrap(), 600000000.0);
        assert_eq!(parse_numeric_prefix("-3.5'C").unwrap(), -3.5);
        assert!(parse_numeric_prefix("V").is_err());
        assert!(parse_numeric_prefix("").is_err());
    }
}
