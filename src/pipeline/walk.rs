//! Tree scanner and the path source stage: walk the root lazily and offer each file path
//! to the read workers, one rendezvous at a time.

use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use crate::{Result, SortError};

use super::context::{Offer, PipelineContext};
use super::error_handler::fail_pipeline;

/// Lazy recursive listing of every non-directory entry under a root.
/// Order is whatever the filesystem returns. A directory that cannot be read yields an error item.
pub struct TreeScanner {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl TreeScanner {
    pub fn new(root: &Path, follow_links: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            inner: WalkDir::new(root).follow_links(follow_links).into_iter(),
        }
    }
}

impl Iterator for TreeScanner {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) if entry.file_type().is_dir() => continue,
                Ok(entry) => return Some(Ok(entry.into_path())),
                Err(err) => return Some(Err(SortError::from_walk(err, &self.root))),
            }
        }
    }
}

pub fn spawn_walk_thread(
    path_tx: Sender<PathBuf>,
    ctx: PipelineContext,
    follow_links: bool,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let iter = TreeScanner::new(&ctx.root, follow_links);
        run_walk_loop(path_tx, &ctx, iter)
    })
}

/// Offer each scanned path on `path_tx` until the scan ends, a signal fires, or the readers hang up.
/// A scan error is fatal: it is recorded and the run aborts. Drops `path_tx` on return so readers
/// see the source close. Returns the count of paths delivered.
pub fn run_walk_loop<I>(path_tx: Sender<PathBuf>, ctx: &PipelineContext, iter: I) -> usize
where
    I: Iterator<Item = Result<PathBuf>>,
{
    let mut count = 0_usize;
    for outcome in iter {
        if ctx.stop.should_stop() {
            break;
        }
        match outcome {
            Ok(path) => match ctx.stop.offer(&path_tx, path) {
                Offer::Delivered => count += 1,
                Offer::Stopped | Offer::Disconnected => break,
            },
            Err(err) => {
                fail_pipeline(ctx, err);
                break;
            }
        }
    }
    log::debug!("{} paths handed out", count);
    drop(path_tx);
    count
}
