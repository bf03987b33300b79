//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / names (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Project file looked up in the working directory (e.g. `.tabsort.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

/// Origin label used in errors for records read from standard input.
pub const STDIN_ORIGIN: &str = "<stdin>";

// ---- Worker threads ----

/// Bounds for the read stage fan-out width.
/// Use [`WorkerLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerLimits {
    /// Available threads (from rayon); set by [`WorkerLimits::current()`].
    pub all_threads: usize,
    pub floor: usize,
    pub max: usize,
}

impl Default for WorkerLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_WORKERS,
            max: Self::MAX_WORKERS,
        }
    }
}

impl WorkerLimits {
    pub const FLOOR_WORKERS: usize = 1;
    /// Reads are I/O bound and each in-flight file is held in memory; more lanes stop helping.
    pub const MAX_WORKERS: usize = 16;

    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Worker count to use: the override if given, else available threads clamped to [floor, max].
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(n) => n,
            None => self.all_threads.clamp(self.floor, self.max),
        }
    }
}

// ---- Sorting ----

/// Buffers at least this long are sorted with rayon's stable parallel sort.
pub const PAR_SORT_THRESHOLD: usize = 50_000;

// ---- Buffering ----

/// Initial capacity of the record buffer in the sort stage.
pub const RECORD_BUFFER_CAPACITY: usize = 1000;
