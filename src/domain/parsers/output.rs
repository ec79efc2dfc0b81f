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

//! Diagnostic tool output parsing

use super::common::parse_key_value;
use crate::domain::RawQueryResult;
use log::warn;

/// Parse `key=value` lines from diagnostic tool stdout
///
/// Lines without a separator are skipped with a warning; they never fail the
/// parse. Empty output yields an empty result.
pub fn parse_diagnostic_output(stdout: &str) -> RawQueryResult {
    let mut result = RawQueryResult::new();

    let output = stdout.trim();
    if output.is_empty() {
        return result;
    }

    for line in output.lines() {
        match parse_key_value(line, '=') {
            Ok((key, value)) => {
                result.insert(key, value);
            }
            Err(_) => warn!("vcgencmd: skipping data: {}", line.trim()),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_field() {
        let result = parse_diagnostic_output("temp=45.0'C\n");
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("temp"), Some("45.0'C"));
    }

    #[test]
    fn test_parse_config_output() {
        let output = "arm_freq=1500\ncore_freq=500\ninit_uart_clock=0x2dc6c00\ntotal_mem=3840";
        let result = parse_diagnostic_output(output);
        assert_eq!(result.len(), 4);
        assert_eq!(result.get("init_uart_clock"), Some("0x2dc6c00"));
        assert_eq!(result.get("total_mem"), Some("3840"));
    }

    #[test]
    fn test_entries_trimmed() {
        let result = parse_diagnostic_output("  overlay_prefix =  overlays/  \r\n\tarm_64bit= 1");
        assert_eq!(result.get("overlay_prefix"), Some("overlays/"));
        assert_eq!(result.get("arm_64bit"), Some("1"));
    }

    #[test]
    fn test_skips_malformed_lines() {
        let output = "frequency(48)=600000000\nthis line has no separator\n\nvolt=1.2000V";
        let result = parse_diagnostic_output(output);
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("frequency(48)"), Some("600000000"));
        assert_eq!(result.get("volt"), Some("1.2000V"));
    }

    #[test]
    fn test_value_keeps_extra_separators() {
        let result = parse_diagnostic_output("device_tree=/boot/a=b.dtb");
        assert_eq!(result.get("device_tree"), Some("/boot/a=b.dtb"));
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_diagnostic_output("").is_empty());
        assert!(parse_diagnostic_output("   \n  ").is_empty());
        assert!(parse_diagnostic_output("garbage only").is_empty());
    }

    #[test]
    fn test_size_matches_well_formed_lines() {
        let lines: Vec<String> = (0..50).map(|i| format!("key_{i} = value {i}")).collect();
        let result = parse_diagnostic_output(&lines.join("\n"));
        assert_eq!(result.len(), 50);
        for i in 0..50 {
            assert_eq!(result.get(&format!("key_{i}")), Some(format!("value {i}").as_str()));
        }
    }
}
