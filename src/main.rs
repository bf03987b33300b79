//! Tabsort CLI: sort CSV records from stdin, `-i FILE`, or every file under `-d DIR`.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tabsort::engine::arg_parser::Cli;
use tabsort::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code);
    });
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
