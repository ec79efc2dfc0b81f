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

//! Throttle mask decoding
//!
//! `vcgencmd get_throttled` reports a packed bitmask such as `throttled=0x50000`.
//! The low nibble describes current conditions, bits 16-19 describe conditions
//! seen since boot.

use crate::domain::{ThrottleDecodeError, NO_THROTTLING, THROTTLE_FLAGS};

/// Parse a hexadecimal mask, with or without the `0x` prefix
pub fn parse_throttle_mask(value: &str) -> Result<u32, ThrottleDecodeError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    u32::from_str_radix(digits, 16).map_err(|e| ThrottleDecodeError::InvalidMask {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Descriptions of every known condition set in `mask`, in table order
pub fn throttle_conditions(mask: u32) -> Vec<&'static str> {
    THROTTLE_FLAGS
        .iter()
        .filter(|flag| mask & (1 << flag.bit) != 0)
        .map(|flag| flag.description)
        .collect()
}

/// Decode a raw mask string into condition descriptions
pub fn decode_throttle_mask(value: &str) -> Result<Vec<&'static str>, ThrottleDecodeError> {
    parse_throttle_mask(value).map(throttle_conditions)
}

/// Join condition descriptions for display
pub fn render_throttle_conditions(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        NO_THROTTLING.to_string()
    } else {
        conditions.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_historical_flags() {
        assert_eq!(
            decode_throttle_mask("0x50000").unwrap(),
            vec!["Undervoltage has occurred", "Throttling has occurred"]
        );
    }

    #[test]
    fn test_decode_zero() {
        let conditions = decode_throttle_mask("0x0").unwrap();
        assert!(conditions.is_empty());
        assert_eq!(render_throttle_conditions(&conditions), "No throttling");
    }

    #[test]
    fn test_decode_bare_hex() {
        assert_eq!(
            decode_throttle_mask("5").unwrap(),
            vec!["Undervoltage detected", "Currently throttled"]
        );
        assert_eq!(parse_throttle_mask("0XF000F").unwrap(), 0xF000F);
    }

    #[test]
    fn test_decode_all_flags_in_table_order() {
        let conditions = decode_throttle_mask("0xf000f").unwrap();
        let expected: Vec<&str> = THROTTLE_FLAGS.iter().map(|f| f.description).collect();
        assert_eq!(conditions, expected);
    }

    #[test]
    fn test_unknown_bits_ignored() {
        assert!(decode_throttle_mask("0xfff0fff0").unwrap().is_empty());
        assert_eq!(throttle_conditions(0xfff1_0100), vec!["Undervoltage has occurred"]);
    }

    #[test]
    fn test_invalid_mask() {
        for value in ["", "0x", "0xZZ", "throttled", "0x1ffffffff"] {
            assert!(
                matches!(
                    decode_throttle_mask(value),
                    Err(ThrottleDecodeError::InvalidMask { .. })
                ),
                "expected failure for {value:?}"
            );
        }
    }

    #[test]
    fn test_render_joins() {
        assert_eq!(
            render_throttle_conditions(&["Undervoltage has occurred", "Throttling has occurred"]),
            "Undervoltage has occurred, Throttling has occurred"
        );
    }

    #[test]
    fn test_conditions_reproduce_known_bits() {
        let known_mask: u32 = THROTTLE_FLAGS.iter().map(|f| 1u32 << f.bit).sum();
        let samples = [
            0u32,
            1,
            0x2,
            0x8,
            0x10000,
            0x50005,
            0x80008,
            0xdead_beef,
            0x1234_5678,
            u32::MAX,
        ];

        for mask in samples.into_iter().chain((0..32).map(|bit| 1u32 << bit)) {
            let rebuilt: u32 = throttle_conditions(mask)
                .into_iter()
                .map(|desc| {
                    let flag = THROTTLE_FLAGS
                        .iter()
                        .find(|f| f.description == desc)
                        .unwrap();
                    1u32 << flag.bit
                })
                .sum();
            assert_eq!(rebuilt, mask & known_mask, "mask {mask:#x}");
        }
    }
}
