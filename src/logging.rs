//! File logging for the terminal binary.
//!
//! The game owns the terminal, so log output can only go to a file. Nothing is
//! installed unless `CONTRAST_TETRIS_LOG` names one.

use std::env;

use anyhow::Result;
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

pub const ENV_LOG: &str = "CONTRAST_TETRIS_LOG";
pub const ENV_LOG_LEVEL: &str = "CONTRAST_TETRIS_LOG_LEVEL";

/// Install the file logger if `CONTRAST_TETRIS_LOG` is set.
/// The level comes from `CONTRAST_TETRIS_LOG_LEVEL` (default `info`).
pub fn init_from_env() -> Result<()> {
    let Some(path) = env::var(ENV_LOG).ok().filter(|s| !s.trim().is_empty()) else {
        return Ok(());
    };
    let level = env::var(ENV_LOG_LEVEL)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(LevelFilter::Info);
    init_log(level, path.trim())
}

pub fn init_log(level: LevelFilter, file_path: &str) -> Result<()> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {t} {m}{n}",
        )))
        .build(file_path)?;
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}
