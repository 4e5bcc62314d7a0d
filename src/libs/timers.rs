//! Background timers feeding the event loop.
//!
//! Timers only ever send an event into the loop's queue. The refresh timer
//! runs until the queue is closed; the deselect timer is cancelled by
//! starting a new one or by dropping it.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// Sends `make()` every `interval` until the receiver goes away.
pub fn spawn_refresh<T, F>(interval: Duration, tx: UnboundedSender<T>, make: F) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Fn() -> T + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            sleep(interval).await;
            if tx.send(make()).is_err() {
                debug!("refresh timer stopped");
                break;
            }
        }
    })
}

/// Single pending timeout; starting it again cancels the previous one.
pub struct DeselectTimer {
    timeout: Duration,
    cancel: Option<oneshot::Sender<()>>,
}

impl DeselectTimer {
    pub fn new(timeout: Duration) -> Self {
        DeselectTimer { timeout, cancel: None }
    }

    pub fn start<T: Send + 'static>(&mut self, tx: UnboundedSender<T>, event: T) {
        self.cancel();

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        self.cancel = Some(cancel_tx);
        let timeout = self.timeout;

        tokio::spawn(async move {
            tokio::select! {
                _ = sleep(timeout) => {
                    let _ = tx.send(event);
                }
                _ = cancel_rx => {
                    debug!("deselect timer cancelled");
                }
            }
        });
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    pub fn is_armed(&self) -> bool {
        self.cancel.as_ref().is_some_and(|cancel| !cancel.is_closed())
    }
}

impl Drop for DeselectTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
