use crossbeam_channel::Receiver;
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crate::cancel::CancelToken;
use crate::pipeline;
use crate::utils::config::WorkerLimits;
use crate::{Opts, PipelineReport, Result, Row, SortError};

use super::context::{PipelineContext, PipelineTuning};
use super::error_handler::take_first_error;

/// Handles for a running pipeline. The caller receives from `row_rx` and joins the rest when done.
pub struct PipelineHandles {
    pub row_rx: Receiver<Row>,
    pub walk_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<usize>>,
    pub merge_handle: JoinHandle<usize>,
    pub drain_handle: JoinHandle<usize>,
    pub ctx: PipelineContext,
}

/// Check the root is a readable directory and compute the fan-out width.
pub fn setup_pipeline_root_and_tuning(
    root: &Path,
    opts: &Opts,
) -> Result<(PathBuf, PipelineTuning)> {
    let meta = std::fs::metadata(root).map_err(|e| SortError::io(root, e))?;
    if !meta.is_dir() {
        return Err(SortError::io(
            root,
            io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }
    let workers = WorkerLimits::current().resolve(opts.workers);
    if workers == 0 {
        return Err(SortError::Usage("worker count must be at least 1".to_string()));
    }
    debug!("Reading with {} worker(s)", workers);
    let tuning = PipelineTuning {
        workers,
        follow_links: opts.follow_links,
    };
    Ok((root.to_path_buf(), tuning))
}

/// Start walk → read workers → merge → sort-and-drain. Every stage runs on its own thread and
/// every handoff is a rendezvous. Returns as soon as the threads are spawned.
pub fn run_pipeline(root: &Path, opts: &Opts, cancel: &CancelToken) -> Result<PipelineHandles> {
    let (root, tuning) = setup_pipeline_root_and_tuning(root, opts)?;
    let ctx = PipelineContext::new(root, opts.directive, cancel.clone());

    let pipeline::PipelineChannels {
        path_tx,
        path_rx,
        lanes,
        merged_tx,
        merged_rx,
        row_tx,
        row_rx,
    } = pipeline::create_pipeline_channels(&tuning);
    let (lane_txs, lane_rxs): (Vec<_>, Vec<_>) = lanes.into_iter().unzip();

    let walk_handle = pipeline::spawn_walk_thread(path_tx, ctx.clone(), tuning.follow_links);
    let worker_handles = pipeline::spawn_read_workers(path_rx, lane_txs, &ctx);
    let merge_handle = pipeline::spawn_merge(lane_rxs, merged_tx, &ctx);
    let drain_handle = pipeline::spawn_sort_drain(merged_rx, row_tx, &ctx);

    Ok(PipelineHandles {
        row_rx,
        walk_handle,
        worker_handles,
        merge_handle,
        drain_handle,
        ctx,
    })
}

fn join_stage(handle: JoinHandle<usize>, stage: &'static str) -> Result<usize> {
    handle.join().map_err(|_| SortError::StagePanicked(stage))
}

/// Sorted rows of a directory run, pulled lazily from the drain stage.
///
/// Iterate to the end, then call [`finish`](Self::finish) to join the stages and learn whether
/// the run failed. Stopping early is allowed: `finish` aborts the remaining stages.
pub struct SortedRows {
    handles: PipelineHandles,
    emitted: usize,
    exhausted: bool,
}

impl SortedRows {
    pub fn new(handles: PipelineHandles) -> Self {
        Self {
            handles,
            emitted: 0,
            exhausted: false,
        }
    }

    /// Join every stage and return the report, or the first error any stage recorded.
    pub fn finish(self) -> Result<PipelineReport> {
        let SortedRows {
            handles,
            emitted,
            exhausted,
        } = self;
        let PipelineHandles {
            row_rx,
            walk_handle,
            worker_handles,
            merge_handle,
            drain_handle,
            ctx,
        } = handles;

        if !exhausted {
            ctx.stop.abort.cancel();
        }
        drop(row_rx);

        let files = join_stage(walk_handle, "walk")?;
        let mut read = 0_usize;
        for h in worker_handles {
            read += join_stage(h, "reader")?;
        }
        let merged = join_stage(merge_handle, "merge")?;
        join_stage(drain_handle, "sort")?;
        debug!(
            "pipeline joined: {} paths, {} files read, {} batches merged, {} rows out",
            files, read, merged, emitted
        );

        if let Some(err) = take_first_error(&ctx.first_error) {
            return Err(err);
        }
        Ok(PipelineReport {
            files,
            rows: emitted,
            cancelled: ctx.stop.cancel.is_cancelled(),
        })
    }
}

impl Iterator for SortedRows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        match self.handles.row_rx.recv() {
            Ok(row) => {
                self.emitted += 1;
                Some(row)
            }
            Err(_) => {
                self.exhausted = true;
                None
            }
        }
    }
}

/// Main orchestrator: run the directory pipeline to completion and collect the sorted rows.
/// Rows are returned only when no stage failed.
pub fn collect_sorted(
    root: &Path,
    opts: &Opts,
    cancel: &CancelToken,
) -> Result<(Vec<Row>, PipelineReport)> {
    let mut sorted = SortedRows::new(run_pipeline(root, opts, cancel)?);
    let rows: Vec<Row> = sorted.by_ref().collect();
    debug!("main: row channel closed, {} rows received", rows.len());
    let report = sorted.finish()?;
    Ok((rows, report))
}
