// ============================================================================
// vidtoolz-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup for the CLI
//
// Diagnostics go to stderr through the `log` facade; command results are
// printed to stdout by the handlers. The default level is `warn` so normal
// runs only show problems. `-v/--verbose` raises it to `debug`, which logs
// every ffmpeg command line. RUST_LOG, when set, overrides both.

use std::io::Write;

use log::LevelFilter;
use owo_colors::OwoColorize;

use crate::terminal;

/// Level used when RUST_LOG is not set.
#[must_use]
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Initializes the global logger. Safe to call more than once.
pub fn init(verbose: bool) {
    let level = default_level(verbose);
    let use_color = terminal::should_use_color();

    let result = env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format(move |buf, record| {
            let timestamp = buf.timestamp();
            let level_str = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };

            if use_color {
                let level_colored = match record.level() {
                    log::Level::Error => level_str.bright_red().to_string(),
                    log::Level::Warn => level_str.yellow().to_string(),
                    log::Level::Info => level_str.green().to_string(),
                    log::Level::Debug => level_str.blue().to_string(),
                    log::Level::Trace => level_str.magenta().to_string(),
                };
                writeln!(buf, "{} {} {}", timestamp.dimmed(), level_colored, record.args())
            } else {
                writeln!(buf, "{} {} {}", timestamp, level_str, record.args())
            }
        })
        .try_init();

    match result {
        Ok(()) => log::debug!("Logger initialized with level: {}", level),
        Err(_) => log::debug!("Logger already initialized"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels() {
        assert_eq!(default_level(false), LevelFilter::Warn);
        assert_eq!(default_level(true), LevelFilter::Debug);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}
