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

//! Build version information

const BANNER: &str = r"
            _        __
 _ __ _ __ (_)_ __  / _| ___
| '__| '_ \| | '_ \| |_ / _ \
| |  | |_) | | | | |  _| (_) |
|_|  | .__/|_|_| |_|_|  \___/
     |_|
";

/// Release name, `RPINFO_VERSION` at build time or the crate version
pub fn release() -> &'static str {
    option_env!("RPINFO_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Git commit the binary was built from, empty when unknown
pub fn commit() -> &'static str {
    option_env!("RPINFO_GIT_COMMIT").unwrap_or_default()
}

pub fn banner() -> &'static str {
    BANNER
}

/// Banner plus release and commit lines
pub fn render(color: bool) -> String {
    let banner = if color {
        format!("\x1b[34m{BANNER}\x1b[0m")
    } else {
        BANNER.to_string()
    };
    format!(
        "{banner}\nRelease: {}\nCommit:  {}\n",
        release(),
        commit()
    )
}

/// Print version information, honouring `NO_COLOR`
pub fn print() {
    let no_color = std::env::var("NO_COLOR").is_ok_and(|v| !v.is_empty());
    print!("{}", render(!no_color));
}
