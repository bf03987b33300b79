pub mod config;
pub mod logger;
pub mod tabsort_toml;

pub use config::*;
pub use logger::setup_logging;
pub use tabsort_toml::{TabsortToml, apply_file_to_opts, load_tabsort_toml};
