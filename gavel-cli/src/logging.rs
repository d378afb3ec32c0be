// gavel-cli/src/logging.rs
//
// Logging setup for the Gavel CLI. The core library logs through the
// standard `log` facade; this module installs an env_logger backend with
// a compact colored format.

use std::io::Write;

use console::style;
use log::LevelFilter;

/// Initialize the logger, at Debug level when verbose is requested.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .format(|buf, record| {
            let level_str = match record.level() {
                log::Level::Error => style("ERROR").red().bold(),
                log::Level::Warn => style("WARN ").yellow(),
                log::Level::Info => style("INFO ").green(),
                log::Level::Debug => style("DEBUG").blue(),
                log::Level::Trace => style("TRACE").magenta(),
            };
            writeln!(buf, "{} {}", level_str, record.args())
        })
        .filter(None, level)
        .init();
}

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS",
/// used to label validation runs in the logs.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
