use colored::Colorize;
use env_logger::Builder;
use log::Level;
use std::io::Write;

use crate::utils::config::PackagePaths;

/// Short label for debug lines: the pipeline stage the record came from.
fn stage_label(target: &str) -> &'static str {
    match target.rsplit("::").next() {
        Some("walk") => "walk",
        Some("reader") => "reader",
        Some("merge") => "merge",
        Some("drain") => "sort",
        _ => "debug",
    }
}

pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let name = PackagePaths::get().pkg_name();

    // try_init: library tests and repeated CLI handlers may call this more than once.
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(name, level)
        .format(move |buf, record| {
            let line = match record.level() {
                Level::Error => format!("[{} {}] {}", name.cyan(), "ERROR".red(), record.args()),
                Level::Warn => format!("[{} {}] {}", name.cyan(), "WARN".yellow(), record.args()),
                Level::Debug | Level::Trace => format!(
                    "[{} {}] {}",
                    name.cyan(),
                    stage_label(record.target()).dimmed(),
                    record.args()
                ),
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .target(env_logger::Target::Stderr)
        .try_init();
}
