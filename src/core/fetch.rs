//! Parallel secret reads.
//!
//! A fixed pool of worker threads pulls read requests from a shared
//! channel, calls the store, and publishes one result per request on a
//! single completion channel. Results arrive in completion order, not
//! submission order; each carries the `owner` tag of its request so
//! callers can attribute it without relying on ordering.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, select, Receiver, Sender, TryRecvError};
use tracing::{debug, trace, warn};

use crate::core::store::{Attributes, SecretStore};
use crate::error::{Result, StoreError};

/// A single path to read, tagged with whoever asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub owner: usize,
    pub path: String,
}

/// Outcome of one [`FetchRequest`].
///
/// `outcome` is `Ok(None)` when the store has nothing at `path`. Store
/// failures are carried here rather than surfaced by the engine.
#[derive(Debug)]
pub struct FetchResult {
    pub owner: usize,
    pub path: String,
    pub outcome: std::result::Result<Option<Attributes>, StoreError>,
}

/// Bounded-concurrency reader over a [`SecretStore`].
pub struct ParallelReader {
    requests: Option<Sender<FetchRequest>>,
    results: Receiver<FetchResult>,
    // Dropping this sender is the cancellation signal.
    cancel: Option<Sender<()>>,
    workers: Vec<JoinHandle<()>>,
    outstanding: usize,
}

impl ParallelReader {
    /// Start `workers` reader threads (at least one) against `store`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a worker thread cannot be spawned.
    pub fn open(store: Arc<dyn SecretStore>, workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let (request_tx, request_rx) = channel::unbounded::<FetchRequest>();
        let (result_tx, result_rx) = channel::unbounded::<FetchResult>();
        let (cancel_tx, cancel_rx) = channel::bounded::<()>(0);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let store = Arc::clone(&store);
            let requests = request_rx.clone();
            let results = result_tx.clone();
            let cancel = cancel_rx.clone();

            let handle = thread::Builder::new()
                .name(format!("fetch-worker-{}", id))
                .spawn(move || worker_loop(id, store.as_ref(), requests, results, cancel))?;
            handles.push(handle);
        }
        debug!(workers, "fetch engine started");

        // Only workers hold result senders, so `next` can detect a dead pool.
        drop(result_tx);

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            cancel: Some(cancel_tx),
            workers: handles,
            outstanding: 0,
        })
    }

    /// Queue a read of `path` on behalf of `owner`. Never blocks.
    pub fn submit(&mut self, owner: usize, path: impl Into<String>) {
        let request = FetchRequest {
            owner,
            path: path.into(),
        };
        trace!(owner, path = %request.path, "submitting read");

        match &self.requests {
            Some(tx) if tx.send(request).is_ok() => self.outstanding += 1,
            _ => warn!("fetch engine is closed, dropping read request"),
        }
    }

    /// Wait for the next completed read.
    ///
    /// Returns `None` when no submitted request is still outstanding, or
    /// when every worker has stopped.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<FetchResult> {
        if self.outstanding == 0 {
            return None;
        }

        let result = self.results.recv().ok()?;
        self.outstanding -= 1;
        Some(result)
    }

    /// Number of submitted requests whose results have not been taken yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Stop workers from taking new requests.
    ///
    /// Reads already in progress run to completion and their results
    /// remain available through [`next`](Self::next).
    pub fn cancel(&mut self) {
        if self.cancel.take().is_some() {
            debug!("fetch engine cancelled");
        }
    }
}

impl Drop for ParallelReader {
    fn drop(&mut self) {
        self.cancel();
        self.requests.take();

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    id: usize,
    store: &dyn SecretStore,
    requests: Receiver<FetchRequest>,
    results: Sender<FetchResult>,
    cancel: Receiver<()>,
) {
    loop {
        let request = select! {
            recv(cancel) -> _ => break,
            recv(requests) -> msg => match msg {
                Ok(request) => request,
                Err(_) => break,
            },
        };

        // Both arms may be ready at once; cancellation wins.
        if let Err(TryRecvError::Disconnected) = cancel.try_recv() {
            break;
        }

        let outcome = store.read(&request.path);
        trace!(worker = id, path = %request.path, ok = outcome.is_ok(), "read finished");

        let result = FetchResult {
            owner: request.owner,
            path: request.path,
            outcome,
        };
        if results.send(result).is_err() {
            break;
        }
    }

    trace!(worker = id, "fetch worker exiting");
}
