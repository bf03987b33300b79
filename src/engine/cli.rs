//! CLI run handler: pick the ingestion path, sort, and write the result.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cancel::{CancelToken, install_signal_handler};
use crate::codec::{format_bracketed, read_delimited_lines, write_csv_file};
use crate::engine::arg_parser::Cli;
use crate::pipeline::collect_sorted;
use crate::sorting::sort_records;
use crate::utils::{
    PackagePaths, STDIN_ORIGIN, TabsortToml, apply_file_to_opts, load_tabsort_toml, setup_logging,
};
use crate::{Opts, Row, Source, sort_file};

/// Defaults, then the project file when it parsed, then the flags.
fn layer_opts(cli: &Cli, file: Option<&TabsortToml>) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    cli.apply_to(&mut opts);
    opts
}

/// Build opts from the project file (if any) and then the flags, and start logging.
/// A malformed project file is reported once the logger is up and otherwise ignored.
pub fn setup_opts(cli: &Cli) -> Opts {
    let loaded = load_tabsort_toml(Path::new("."));
    let opts = layer_opts(cli, loaded.as_ref().ok().and_then(Option::as_ref));
    setup_logging(opts.verbose);
    match &loaded {
        Ok(Some(_)) => debug!("Loaded settings from project file"),
        Ok(None) => {}
        Err(e) => warn!(
            "{}: {}; ignoring it",
            PackagePaths::get().config_filename(),
            e
        ),
    }
    opts
}

fn run_stdin(opts: &Opts, cancel: &CancelToken) -> Result<Vec<Row>> {
    let mut rows = read_delimited_lines(io::stdin().lock(), STDIN_ORIGIN, cancel)?;
    if cancel.is_cancelled() {
        warn!("Interrupted: sorting the {} rows read before the signal", rows.len());
    }
    sort_records(&mut rows, &opts.directive)?;
    Ok(rows)
}

fn run_file(path: &Path, opts: &Opts, cancel: &CancelToken) -> Result<Vec<Row>> {
    let rows =
        sort_file(path, &opts.directive).with_context(|| format!("sort {}", path.display()))?;
    if cancel.is_cancelled() {
        warn!("Interrupted after {} was read; emitting it in full", path.display());
    }
    Ok(rows)
}

fn run_dir(root: &Path, opts: &Opts, cancel: &CancelToken) -> Result<Vec<Row>> {
    let (rows, report) = collect_sorted(root, opts, cancel)
        .with_context(|| format!("sort records under {}", root.display()))?;
    if report.cancelled {
        warn!(
            "Interrupted: output holds {} rows from the files read before the signal",
            report.rows
        );
    } else {
        debug!("{} rows from {} files", report.rows, report.files);
    }
    Ok(rows)
}

/// Write rows as CSV to `output`, or print them bracketed to stdout.
pub fn emit_records(rows: &[Row], output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            write_csv_file(path, rows)?;
            info!("File created: {}", path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", format_bracketed(rows)).context("write to stdout")?;
        }
    }
    Ok(())
}

/// Sort from the selected source and emit. Nothing is written unless sorting succeeded.
///
/// The first SIGINT/SIGTERM stops ingestion on every path and the rows read so far are
/// still sorted and emitted.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    let source = opts.source()?;
    let cancel = CancelToken::new();
    install_signal_handler(&cancel)?;
    info!("===Started===");
    let rows = match &source {
        Source::Stdin => run_stdin(&opts, &cancel)?,
        Source::File(path) => run_file(path, &opts, &cancel)?,
        Source::Dir(root) => run_dir(root, &opts, &cancel)?,
    };
    emit_records(&rows, opts.output.as_ref())?;
    info!("===Finished===");
    Ok(())
}
