//! Tabsort: sort comma-delimited records from stdin, a file, or a directory tree by one column.

pub mod cancel;
pub mod codec;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod sorting;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use cancel::CancelToken;
pub use error::SortError;
pub use pipeline::SortedRows;

use log::debug;
use std::path::Path;
use utils::config::PackagePaths;

/// Result alias used by public tabsort API
pub type Result<T> = std::result::Result<T, SortError>;

/// Single entry point for the directory pipeline: sort every record of every file under `root`.
///
/// Returns a lazy [`SortedRows`]; iterate it, then call [`SortedRows::finish`] for the
/// [`PipelineReport`] or the first error. Firing `cancel` winds every stage down; rows read
/// before that point are still sorted and yielded.
///
/// ```ignore
/// let cancel = tabsort::CancelToken::new();
/// let opts = tabsort::SortOpts { workers: Some(4), ..Default::default() };
/// let mut rows = tabsort::sort_dir(Path::new("data"), &opts, &cancel)?;
/// for row in rows.by_ref() {
///     println!("{}", row.join(","));
/// }
/// let report = rows.finish()?;
/// ```
pub fn sort_dir(root: &Path, opts: &SortOpts, cancel: &CancelToken) -> Result<SortedRows> {
    let opts = Opts::from(opts);
    let config_str = format!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );
    debug!("{}", config_str);

    let handles = pipeline::run_pipeline(root, &opts, cancel)?;
    Ok(SortedRows::new(handles))
}

/// Sort a single CSV file in memory.
pub fn sort_file(path: &Path, directive: &SortDirective) -> Result<Vec<Row>> {
    let mut rows = codec::read_csv_file(path)?;
    sorting::sort_records(&mut rows, directive)?;
    Ok(rows)
}
