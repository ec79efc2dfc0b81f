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

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Name of the vendor diagnostic tool
pub const VCGENCMD: &str = "vcgencmd";

/// Power rails reported by `measure_volts`
pub const VOLTAGE_RAILS: [&str; 4] = ["core", "sdram_c", "sdram_i", "sdram_p"];

/// Clock domains reported by `measure_clock`
pub const CLOCK_DOMAINS: [&str; 12] = [
    "arm", "core", "h264", "isp", "v3d", "uart", "pwm", "emmc", "pixel", "vec", "hdmi", "dpi",
];

/// `get_config` option categories, in merge order
pub const CONFIG_CATEGORIES: [&str; 2] = ["int", "str"];

/// Field holding the raw mask in `get_throttled` output
pub const THROTTLED_FIELD: &str = "throttled";

/// Field holding the reading in `measure_temp` output
pub const TEMPERATURE_FIELD: &str = "temp";

/// Field holding the reading in `measure_volts` output
pub const VOLTAGE_FIELD: &str = "volt";

/// Key/value pairs produced by one diagnostic tool invocation
///
/// Keys are kept sorted so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawQueryResult(BTreeMap<String, String>);

impl RawQueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value if the key was present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Copy all fields of `other` into `self`; `other` wins on collision
    pub fn merge(&mut self, other: RawQueryResult) {
        self.0.extend(other.0);
    }

    /// The value of the only field present
    ///
    /// Returns the number of fields found when there is not exactly one.
    pub fn sole_value(&self) -> Result<&str, usize> {
        let mut values = self.0.values();
        match (values.next(), values.next()) {
            (Some(value), None) => Ok(value.as_str()),
            _ => Err(self.0.len()),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawQueryResult {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for RawQueryResult {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A single throttle condition bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleFlag {
    /// Bit position in the mask
    pub bit: u32,
    /// Human readable meaning
    pub description: &'static str,
}

/// Known throttle conditions, in reporting order. Bit positions never change.
pub const THROTTLE_FLAGS: [ThrottleFlag; 8] = [
    ThrottleFlag {
        bit: 0,
        description: "Undervoltage detected",
    },
    ThrottleFlag {
        bit: 1,
        description: "Arm frequency capped",
    },
    ThrottleFlag {
        bit: 2,
        description: "Currently throttled",
    },
    ThrottleFlag {
        bit: 3,
        description: "Soft temperature limit active",
    },
    ThrottleFlag {
        bit: 16,
        description: "Undervoltage has occurred",
    },
    ThrottleFlag {
        bit: 17,
        description: "Arm frequency capping has occurred",
    },
    ThrottleFlag {
        bit: 18,
        description: "Throttling has occurred",
    },
    ThrottleFlag {
        bit: 19,
        description: "Soft temperature limit has occurred",
    },
];

/// Text shown for an empty throttle mask in human readable mode
pub const NO_THROTTLING: &str = "No throttling";

/// How the throttle mask is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThrottleRendering {
    /// Hexadecimal value as reported by the tool
    #[default]
    Raw,
    /// Comma separated condition descriptions
    HumanReadable,
}

impl ThrottleRendering {
    pub fn from_human_flag(human: bool) -> Self {
        if human {
            ThrottleRendering::HumanReadable
        } else {
            ThrottleRendering::Raw
        }
    }
}

/// Numeric projection of the telemetry for metrics export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySample {
    /// Degrees Celsius
    pub temperature: f64,
    /// Volts, keyed by rail
    pub voltages: BTreeMap<String, f64>,
    /// Hertz, keyed by clock domain
    pub clocks: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_later_wins() {
        let mut config: RawQueryResult = [("total_mem", "512"), ("arm_freq", "1500")]
            .into_iter()
            .collect();
        config.merge([("total_mem", "1024")].into_iter().collect());

        assert_eq!(config.len(), 2);
        assert_eq!(config.get("total_mem"), Some("1024"));
        assert_eq!(config.get("arm_freq"), Some("1500"));
    }

    #[test]
    fn test_sole_value() {
        let single: RawQueryResult = [("frequency(48)", "600000000")].into_iter().collect();
        assert_eq!(single.sole_value(), Ok("600000000"));

        assert_eq!(RawQueryResult::new().sole_value(), Err(0));

        let double: RawQueryResult = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(double.sole_value(), Err(2));
    }

    #[test]
    fn test_serializes_sorted() {
        let result: RawQueryResult = [("total_mem", "512"), ("init_uart_clock", "0x2dc6c00")]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"init_uart_clock":"0x2dc6c00","total_mem":"512"}"#
        );
    }

    #[test]
    fn test_throttle_table_ascending() {
        assert!(THROTTLE_FLAGS.windows(2).all(|w| w[0].bit < w[1].bit));
    }
}
