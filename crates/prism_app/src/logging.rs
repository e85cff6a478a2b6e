//! Logger installation for binaries.
//!
//! Library crates only use the `log` macros; the application installs a
//! `fern` dispatcher once at startup:
//!
//! ```text
//! [   0.042s INFO  prism_renderer::upload] Uploaded 24 vertices, ...
//! ```
//!
//! The level comes from `PRISM_LOG` (`error`, `warn`, `info`, `debug`,
//! `trace`); the wgpu internals stay at `warn` regardless.
use std::time::Instant;

use log::LevelFilter;

pub const LOG_ENV: &str = "PRISM_LOG";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Noisy dependency targets capped at [`LevelFilter::Warn`].
const QUIET_TARGETS: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

/// Level named by `PRISM_LOG`, `Info` when unset or unparseable.
pub fn level_from_env() -> LevelFilter {
    match std::env::var(LOG_ENV) {
        Ok(value) => parse_level(&value).unwrap_or_else(|| {
            eprintln!("{LOG_ENV}={value} is not a log level, using {DEFAULT_LEVEL}");
            DEFAULT_LEVEL
        }),
        Err(_) => DEFAULT_LEVEL,
    }
}

pub fn dispatch(level: LevelFilter) -> fern::Dispatch {
    let start = Instant::now();
    let dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{:>8.3}s {:<5} {}] {}",
                start.elapsed().as_secs_f32(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level);
    QUIET_TARGETS
        .iter()
        .fold(dispatch, |d, target| d.level_for(*target, level.min(LevelFilter::Warn)))
        .chain(std::io::stderr())
}

/// Installs the global logger. Fails if one is already installed.
pub fn init() -> Result<(), log::SetLoggerError> {
    dispatch(level_from_env()).apply()
}
