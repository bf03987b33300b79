//! Public and internal types for the tabsort API and pipeline.

use std::path::PathBuf;

/// One record: ordered text fields. Arity is fixed per source file.
pub type Row = Vec<String>;

/// All rows of one source file, in on-disk order.
pub type FileContent = Vec<Row>;

/// How the record buffer is ordered.
///
/// `ignore_header` pins `rows[0]` in place and sorts only `rows[1..]`.
/// `field` is a zero-based column index compared as raw text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortDirective {
    pub ignore_header: bool,
    pub reverse: bool,
    pub field: usize,
}

/// Summary returned by [`SortedRows::finish`](crate::pipeline::SortedRows::finish) once every stage has exited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Paths handed out by the walk stage.
    pub files: usize,
    /// Rows emitted to the consumer.
    pub rows: usize,
    /// True when the cancellation signal fired during the run.
    pub cancelled: bool,
}

/// Lib-only options for [`sort_dir`](crate::sort_dir). Only the fields that apply to the directory pipeline.
#[derive(Clone, Debug, Default)]
pub struct SortOpts {
    pub directive: SortDirective,
    /// Fan-out width of the read stage. When None, derived from available threads.
    pub workers: Option<usize>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl From<&SortOpts> for Opts {
    fn from(o: &SortOpts) -> Self {
        Opts {
            input: None,
            output: None,
            dir: None,
            directive: o.directive,
            workers: o.workers,
            follow_links: o.follow_links,
            verbose: false,
        }
    }
}

/// Full options (CLI). Use [`SortOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Single input file (`-i`). Mutually exclusive with `dir`.
    pub input: Option<PathBuf>,
    /// Output CSV file (`-o`). When None, records are printed to stdout.
    pub output: Option<PathBuf>,
    /// Directory root (`-d`); selects the parallel pipeline.
    pub dir: Option<PathBuf>,
    pub directive: SortDirective,
    /// Override worker count. When None, derived from available threads.
    pub workers: Option<usize>,
    pub follow_links: bool,
    pub verbose: bool,
}

/// Which ingestion path a run takes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
    Dir(PathBuf),
}

impl Opts {
    /// Resolve the ingestion source. `-i` and `-d` together is a usage error.
    pub fn source(&self) -> crate::Result<Source> {
        match (&self.input, &self.dir) {
            (Some(_), Some(_)) => Err(crate::SortError::Usage(
                "options -i and -d cannot be used at the same time".to_string(),
            )),
            (Some(file), None) => Ok(Source::File(file.clone())),
            (None, Some(dir)) => Ok(Source::Dir(dir.clone())),
            (None, None) => Ok(Source::Stdin),
        }
    }
}
