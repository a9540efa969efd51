use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Handle to a background timer. Dropping the handle cancels the task: the
/// worker wakes up on the closed channel and exits without firing again.
#[derive(Debug)]
pub struct TaskHandle {
    cancel: Sender<()>,
}

impl TaskHandle {
    pub fn cancel(self) {
        let _ = self.cancel.send(());
    }
}

/// Runs `on_tick` every `period` until cancelled or until it returns `false`.
pub fn spawn_periodic<F>(period: Duration, mut on_tick: F) -> TaskHandle
where
    F: FnMut() -> bool + Send + 'static,
{
    let (cancel, cancelled) = channel::<()>();
    thread::spawn(move || loop {
        match cancelled.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {
                if !on_tick() {
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    });
    TaskHandle { cancel }
}

/// Runs `on_deadline` once after `after` unless cancelled first.
pub fn spawn_once<F>(after: Duration, on_deadline: F) -> TaskHandle
where
    F: FnOnce() + Send + 'static,
{
    let (cancel, cancelled) = channel::<()>();
    thread::spawn(move || {
        if let Err(RecvTimeoutError::Timeout) = cancelled.recv_timeout(after) {
            on_deadline();
        }
    });
    TaskHandle { cancel }
}
