//! Fan-in: one forwarder thread per worker lane, all offering onto a single merged channel.
//! The merged channel closes only after every forwarder has finished.

use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::FileContent;

use super::context::{Offer, PipelineContext};

fn forward_lane(
    lane_rx: Receiver<FileContent>,
    merged_tx: Sender<FileContent>,
    ctx: PipelineContext,
) -> usize {
    let mut forwarded = 0_usize;
    while let Some(batch) = ctx.stop.pull(&lane_rx) {
        match ctx.stop.offer(&merged_tx, batch) {
            Offer::Delivered => forwarded += 1,
            Offer::Stopped | Offer::Disconnected => break,
        }
    }
    forwarded
}

/// Start the merge stage. Returns a handle that yields the number of batches forwarded once all
/// lanes are drained. A panicked forwarder is logged and counted as zero.
pub fn spawn_merge(
    lane_rxs: Vec<Receiver<FileContent>>,
    merged_tx: Sender<FileContent>,
    ctx: &PipelineContext,
) -> JoinHandle<usize> {
    let ctx = ctx.clone();
    thread::spawn(move || {
        let forwarders: Vec<JoinHandle<usize>> = lane_rxs
            .into_iter()
            .map(|lane_rx| {
                let merged_tx = merged_tx.clone();
                let ctx = ctx.clone();
                thread::spawn(move || forward_lane(lane_rx, merged_tx, ctx))
            })
            .collect();
        // Only the forwarders may keep the merged channel open.
        drop(merged_tx);

        let mut total = 0_usize;
        for h in forwarders {
            match h.join() {
                Ok(n) => total += n,
                Err(_) => log::error!("merge forwarder panicked"),
            }
        }
        log::debug!("{} batches forwarded", total);
        total
    })
}
