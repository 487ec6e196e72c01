//! Log output setup shared by both binaries
//!
//! Lines look like `2026-01-01 12:00:00 | INFO | crebain_examples::flow | message`.

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Environment variable selecting the log level
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Parse a level name such as `debug` or `WARNING`; unknown names give `None`.
pub fn parse_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "warning" => Some(LevelFilter::Warn),
        "critical" | "fatal" => Some(LevelFilter::Error),
        other => other.parse().ok(),
    }
}

/// Initialize logging from `LOG_LEVEL`, defaulting to `info`.
pub fn init() {
    let level = std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|raw| parse_level(&raw))
        .unwrap_or(DEFAULT_LEVEL);
    init_with_level(level);
}

/// Initialize logging at `level`. Later calls are no-ops.
pub fn init_with_level(level: LevelFilter) {
    let _ = Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {} | {} | {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
