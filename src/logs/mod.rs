pub mod config;

use std::io::{self, IsTerminal};
use std::time::SystemTime;

use anyhow::{Context, Result};
use config::{LogConfig, LogLevel, LogTarget};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

pub fn init_logger(cfg: &LogConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        match cfg.level {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    };

    let is_terminal = match cfg.target {
        LogTarget::Stdout => io::stdout().is_terminal(),
        LogTarget::Stderr => io::stderr().is_terminal(),
        LogTarget::File => false,
    };

    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .warn(Color::Yellow)
        .debug(Color::Magenta);

    let dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            let now = humantime::format_rfc3339_millis(SystemTime::now());
            if is_terminal {
                out.finish(format_args!(
                    "{} [{}] {}",
                    now,
                    colors.color(record.level()),
                    message
                ))
            } else {
                out.finish(format_args!("{} [{}] {}", now, record.level(), message))
            }
        })
        .level(level)
        // Dependencies are noisy on debug level.
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn);

    let dispatch = match cfg.target {
        LogTarget::Stdout => dispatch.chain(io::stdout()),
        LogTarget::Stderr => dispatch.chain(io::stderr()),
        LogTarget::File => {
            let file = fern::log_file(&cfg.file_path)
                .with_context(|| format!("open log file '{}'", cfg.file_path))?;
            dispatch.chain(file)
        }
    };

    dispatch.apply().context("init logger")?;
    Ok(())
}
