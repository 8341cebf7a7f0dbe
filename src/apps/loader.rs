use crossbeam::channel::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::scanner::{AppCatalogScanner, ScanResults};
use crate::common::errors::Result;

/// A catalog scan running on a worker thread.
///
/// Cancelling drops the result; since a scan writes nothing, there is no
/// cleanup. To reload, cancel the old task and spawn a new one.
pub struct ScanTask {
    receiver: Receiver<Result<ScanResults>>,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ScanTask {
    pub fn spawn(scanner: AppCatalogScanner) -> Self {
        let (sender, receiver) = channel::bounded(1);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = std::thread::spawn(move || {
            let result = scanner.scan_detailed();
            if flag.load(Ordering::SeqCst) {
                tracing::debug!("scan cancelled, discarding result");
                return;
            }
            let _ = sender.send(result);
        });

        Self {
            receiver,
            cancelled,
            handle: Some(handle),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Non-blocking poll. `None` while running, after cancel, or once taken.
    pub fn try_result(&self) -> Option<Result<ScanResults>> {
        if self.is_cancelled() {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the scan finishes, calling `on_tick` every `tick`.
    pub fn wait_with(mut self, tick: Duration, mut on_tick: impl FnMut()) -> Option<Result<ScanResults>> {
        let outcome = loop {
            if self.is_cancelled() {
                break None;
            }
            match self.receiver.recv_timeout(tick) {
                Ok(result) => break Some(result),
                Err(RecvTimeoutError::Timeout) => on_tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::warn!("scan worker exited without a result");
                    break None;
                }
            }
        };
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        if self.is_cancelled() {
            None
        } else {
            outcome
        }
    }

    /// Block until the scan finishes. `None` if it was cancelled.
    pub fn wait(self) -> Option<Result<ScanResults>> {
        self.wait_with(Duration::from_millis(100), || {})
    }
}

impl Drop for ScanTask {
    fn drop(&mut self) {
        // the worker is left to finish on its own
        self.cancel();
    }
}
