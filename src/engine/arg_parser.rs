use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::Opts;

/// Sort comma-delimited records by one column.
///
/// Reads stdin when neither -i nor -d is given. `-h` is the header flag, so help is `--help` only.
#[derive(Clone, Debug, Parser)]
#[command(name = "tabsort", disable_help_flag = true)]
#[command(about = "Sort CSV records from stdin, a file (-i), or every file under a directory (-d).")]
pub struct Cli {
    /// Use a file with the name file-name as an input.
    #[arg(short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write sorted records as CSV to this file instead of printing them.
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Read every file under this directory (recursively). Cannot be combined with -i.
    #[arg(short = 'd', value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// The first line is a header: kept first in the output, excluded from sorting.
    #[arg(short = 'h', long = "header")]
    pub header: bool,

    /// Sort by column N (zero-based). Default: 0.
    #[arg(short = 'f', long = "field", value_name = "N")]
    pub field: Option<usize>,

    /// Sort in descending order.
    #[arg(short = 'r', long = "reverse")]
    pub reverse: bool,

    /// Number of parallel file readers for -d. Default: available threads, capped.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Follow symbolic links while walking -d.
    #[arg(long)]
    pub follow_links: bool,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    /// Layer flags over `opts` (already holding file config). Switches only ever turn on.
    pub fn apply_to(&self, opts: &mut Opts) {
        opts.input = self.input.clone();
        opts.output = self.output.clone();
        opts.dir = self.dir.clone();
        opts.directive.ignore_header |= self.header;
        opts.directive.reverse |= self.reverse;
        if let Some(field) = self.field {
            opts.directive.field = field;
        }
        if self.workers.is_some() {
            opts.workers = self.workers;
        }
        opts.follow_links |= self.follow_links;
        opts.verbose |= self.verbose;
    }
}
