//! Sort-and-drain: take ownership of every merged batch, sort once, then hand rows out one by one.

use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::sorting::sort_records;
use crate::utils::config::RECORD_BUFFER_CAPACITY;
use crate::{FileContent, Row};

use super::context::{Offer, PipelineContext};
use super::error_handler::fail_pipeline;

/// Concatenate batches in arrival order until the merged channel closes or a signal fires.
fn accumulate(merged_rx: &Receiver<FileContent>, ctx: &PipelineContext) -> Vec<Row> {
    let mut buffer = Vec::with_capacity(RECORD_BUFFER_CAPACITY);
    while let Some(batch) = ctx.stop.pull(merged_rx) {
        buffer.extend(batch);
    }
    buffer
}

/// Run the stage to completion. Returns the number of rows emitted.
///
/// After a user cancel the rows buffered so far are still sorted and emitted; after an abort
/// nothing is emitted. Column validation happens before the first row leaves.
pub fn run_sort_drain(
    merged_rx: Receiver<FileContent>,
    row_tx: Sender<Row>,
    ctx: &PipelineContext,
) -> usize {
    let mut buffer = accumulate(&merged_rx, ctx);
    drop(merged_rx);

    if ctx.stop.abort.is_cancelled() {
        return 0;
    }
    if ctx.stop.cancel.is_cancelled() {
        log::warn!("Cancelled; sorting the {} rows read so far", buffer.len());
    }
    log::debug!("{} rows buffered", buffer.len());
    if let Err(err) = sort_records(&mut buffer, &ctx.directive) {
        fail_pipeline(ctx, err);
        return 0;
    }

    let mut emitted = 0_usize;
    for row in buffer {
        match ctx.stop.offer_unless_aborted(&row_tx, row) {
            Offer::Delivered => emitted += 1,
            Offer::Stopped | Offer::Disconnected => break,
        }
    }
    emitted
}

pub fn spawn_sort_drain(
    merged_rx: Receiver<FileContent>,
    row_tx: Sender<Row>,
    ctx: &PipelineContext,
) -> JoinHandle<usize> {
    let ctx = ctx.clone();
    thread::spawn(move || run_sort_drain(merged_rx, row_tx, &ctx))
}
