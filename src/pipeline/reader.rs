use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::FileContent;
use crate::codec::read_csv_file;

use super::context::{Offer, PipelineContext};
use super::error_handler::fail_pipeline;

/// Single read worker: pull paths from the shared source, decode each file, offer the batch on
/// this worker's own lane. Returns the number of files delivered. The lane closes when the
/// worker returns, on every exit path.
fn read_worker_loop(
    id: usize,
    path_rx: Receiver<PathBuf>,
    lane_tx: Sender<FileContent>,
    ctx: PipelineContext,
) -> usize {
    let mut delivered = 0_usize;
    while let Some(path) = ctx.stop.pull(&path_rx) {
        let content = match read_csv_file(&path) {
            Ok(content) => content,
            Err(err) => {
                fail_pipeline(&ctx, err);
                break;
            }
        };
        log::debug!(
            "lane {}: {} rows from {}",
            id,
            content.len(),
            path.display()
        );
        match ctx.stop.offer(&lane_tx, content) {
            Offer::Delivered => delivered += 1,
            Offer::Stopped | Offer::Disconnected => break,
        }
    }
    drop(lane_tx);
    delivered
}

/// Spawn one read worker per lane. Each worker owns its lane sender; the caller keeps the receivers.
pub fn spawn_read_workers(
    path_rx: Receiver<PathBuf>,
    lane_txs: Vec<Sender<FileContent>>,
    ctx: &PipelineContext,
) -> Vec<JoinHandle<usize>> {
    lane_txs
        .into_iter()
        .enumerate()
        .map(|(id, lane_tx)| {
            let path_rx = path_rx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || read_worker_loop(id, path_rx, lane_tx, ctx))
        })
        .collect()
}
