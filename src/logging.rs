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

//! Logger setup on top of `env_logger`

use crate::domain::{ConfigError, LogFormat, LogLevel};
use env_logger::{Builder, Target};
use log::Record;
use serde_json::json;
use std::io::Write;

/// Install the global logger writing to stdout
pub fn init_logger(level: LogLevel, format: LogFormat) -> Result<(), ConfigError> {
    let mut builder = Builder::new();
    builder
        .filter_level(level.to_level_filter())
        .target(Target::Stdout);

    match format {
        LogFormat::Text => {}
        LogFormat::Structured => {
            builder.format(|buf, record| {
                let line = structured_line(&buf.timestamp().to_string(), record);
                writeln!(buf, "{line}")
            });
        }
        LogFormat::Json => {
            builder.format(|buf, record| {
                let line = json_line(&buf.timestamp().to_string(), record);
                writeln!(buf, "{line}")
            });
        }
    }

    builder.try_init()?;
    Ok(())
}

fn structured_line(time: &str, record: &Record) -> String {
    let msg = record.args().to_string();
    format!(
        "time={time} level={} target={} msg={msg:?}",
        record.level().as_str().to_lowercase(),
        record.target()
    )
}

fn json_line(time: &str, record: &Record) -> String {
    json!({
        "time": time,
        "level": record.level().as_str().to_lowercase(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}
