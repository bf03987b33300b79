//! Directory pipeline: walk, parallel read, merge, sort-and-drain.

pub mod context;
pub mod drain;
pub mod error_handler;
pub mod merge;
pub mod orchestrator;
pub mod reader;
pub mod walk;

pub use context::{
    Offer, PipelineChannels, PipelineContext, PipelineTuning, StopSignals,
    create_pipeline_channels,
};
pub use drain::{run_sort_drain, spawn_sort_drain};
pub use error_handler::{fail_pipeline, take_first_error};
pub use merge::spawn_merge;
pub use orchestrator::{
    PipelineHandles, SortedRows, collect_sorted, run_pipeline, setup_pipeline_root_and_tuning,
};
pub use reader::spawn_read_workers;
pub use walk::{TreeScanner, run_walk_loop, spawn_walk_thread};
