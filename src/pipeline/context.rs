//! Pipeline context: stop signals shared by every stage, the select-based handoff
//! primitives, and the first-error slot.

use crossbeam_channel::{Receiver, Sender, bounded, select};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::cancel::CancelToken;
use crate::{FileContent, Row, SortDirective, SortError};

/// Result of offering a value downstream.
#[derive(Debug, PartialEq, Eq)]
pub enum Offer {
    /// A consumer took the value.
    Delivered,
    /// Cancellation or abort fired first; the value was dropped.
    Stopped,
    /// The consumer hung up; the value was dropped.
    Disconnected,
}

/// The two ways a run winds down early: the caller's cancellation token (user interrupt,
/// partial results are kept) and the run-local abort token (a stage failed, results are void).
#[derive(Clone, Debug)]
pub struct StopSignals {
    pub cancel: CancelToken,
    pub abort: CancelToken,
}

impl StopSignals {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            abort: CancelToken::new(),
        }
    }

    pub fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.abort.is_cancelled()
    }

    /// Hand `value` to a consumer, or give up when either signal fires. One select: the send
    /// and the signals race, so a producer never stays parked on a consumer that is gone.
    pub fn offer<T>(&self, tx: &Sender<T>, value: T) -> Offer {
        select! {
            send(tx, value) -> res => match res {
                Ok(()) => Offer::Delivered,
                Err(_) => Offer::Disconnected,
            },
            recv(self.cancel.signal()) -> _ => Offer::Stopped,
            recv(self.abort.signal()) -> _ => Offer::Stopped,
        }
    }

    /// Like [`offer`](Self::offer) but only the abort signal ends the wait. Used where
    /// user cancellation must not discard work already accepted.
    pub fn offer_unless_aborted<T>(&self, tx: &Sender<T>, value: T) -> Offer {
        select! {
            send(tx, value) -> res => match res {
                Ok(()) => Offer::Delivered,
                Err(_) => Offer::Disconnected,
            },
            recv(self.abort.signal()) -> _ => Offer::Stopped,
        }
    }

    /// Take the next value from `rx`. None when the producer closed or either signal fired.
    pub fn pull<T>(&self, rx: &Receiver<T>) -> Option<T> {
        select! {
            recv(rx) -> msg => msg.ok(),
            recv(self.cancel.signal()) -> _ => None,
            recv(self.abort.signal()) -> _ => None,
        }
    }
}

/// First error wins; later ones are logged and dropped.
pub type FirstError = Arc<Mutex<Option<SortError>>>;

/// Fan-out width and walk mode for one run.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub workers: usize,
    pub follow_links: bool,
}

/// Shared context for every stage thread. Cheap to clone.
#[derive(Clone)]
pub struct PipelineContext {
    pub root: PathBuf,
    pub directive: SortDirective,
    pub stop: StopSignals,
    pub first_error: FirstError,
}

impl PipelineContext {
    pub fn new(root: PathBuf, directive: SortDirective, cancel: CancelToken) -> Self {
        Self {
            root,
            directive,
            stop: StopSignals::new(cancel),
            first_error: Arc::new(Mutex::new(None)),
        }
    }
}

/// Rendezvous channels between stages. Every channel has capacity 0: a send completes only
/// when a receiver takes the value.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    /// One private lane per read worker.
    pub lanes: Vec<(Sender<FileContent>, Receiver<FileContent>)>,
    pub merged_tx: Sender<FileContent>,
    pub merged_rx: Receiver<FileContent>,
    pub row_tx: Sender<Row>,
    pub row_rx: Receiver<Row>,
}

pub fn create_pipeline_channels(tuning: &PipelineTuning) -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<PathBuf>(0);
    let lanes = (0..tuning.workers)
        .map(|_| bounded::<FileContent>(0))
        .collect();
    let (merged_tx, merged_rx) = bounded::<FileContent>(0);
    let (row_tx, row_rx) = bounded::<Row>(0);
    PipelineChannels {
        path_tx,
        path_rx,
        lanes,
        merged_tx,
        merged_rx,
        row_tx,
        row_rx,
    }
}
