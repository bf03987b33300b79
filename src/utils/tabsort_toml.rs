//! Load `.tabsort.toml` from a directory (CLI only). Lib callers pass [`SortOpts`](crate::SortOpts) directly.

use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct TabsortToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    workers: Option<usize>,
    header: Option<bool>,
    reverse: Option<bool>,
    field: Option<usize>,
    follow_links: Option<bool>,
    verbose: Option<bool>,
}

/// Load the project file from `dir`. `Ok(None)` when there is no readable file; a parse error is
/// returned so the caller can warn once logging is up, then carry on without the file.
pub fn load_tabsort_toml(dir: &Path) -> Result<Option<TabsortToml>, toml::de::Error> {
    let path = dir.join(PackagePaths::get().config_filename());
    match std::fs::read_to_string(&path) {
        Ok(s) => parse_tabsort_toml(&s).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_tabsort_toml(s: &str) -> Result<TabsortToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $($opts_field:ident).+) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$($opts_field).+ = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
/// Input, output, and directory are never read from the file.
pub fn apply_file_to_opts(file: &TabsortToml, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(n) = sec.workers {
        opts.workers = Some(n);
    }
    apply_file_opt!(sec, opts, header => directive.ignore_header);
    apply_file_opt!(sec, opts, reverse => directive.reverse);
    apply_file_opt!(sec, opts, field => directive.field);
    apply_file_opt!(sec, opts, follow_links => follow_links);
    apply_file_opt!(sec, opts, verbose => verbose);
}
