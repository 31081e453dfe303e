use std::time::Duration;
use tokio::sync::mpsc;

/// Sending half handed to the host's scroll listener.
pub type Trigger = mpsc::UnboundedSender<()>;

/// Trailing-edge debouncer over a stream of unit events.
///
/// A burst is considered settled once `wait` passes without a new event. Every
/// event inside the burst restarts the timer.
pub struct Debouncer {
    events: mpsc::UnboundedReceiver<()>,
    wait: Duration,
    closed: bool,
}

impl Debouncer {
    pub fn channel(wait: Duration) -> (Trigger, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Self {
                events: rx,
                wait,
                closed: false,
            },
        )
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Wait for the next burst to settle.
    ///
    /// Returns `false` once every trigger has been dropped. A burst cut short
    /// by the channel closing still settles once.
    pub async fn settled(&mut self) -> bool {
        if self.closed || self.events.recv().await.is_none() {
            self.closed = true;
            return false;
        }

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    if event.is_none() {
                        self.closed = true;
                        return true;
                    }
                }
                _ = tokio::time::sleep(self.wait) => return true,
            }
        }
    }
}
