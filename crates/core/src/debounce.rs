//! Search-box debouncing.
//!
//! [`SearchDebouncer`] watches the live search-box value and forwards a
//! "settled" value once the input has been left alone for the quiet period.
//! Every change restarts the timer and only the latest value is kept, so a
//! burst of keystrokes produces a single query.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::search::SEARCH_QUIET_PERIOD;

/// Capacity of the settled-value channel returned by [`SearchDebouncer::spawn`].
const SETTLED_CHANNEL_CAPACITY: usize = 16;

/// Converts a continuously-updating input into rate-limited settled values.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet_period: Duration,
}

impl SearchDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self { quiet_period }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Run the debouncer on its own task.
    ///
    /// Returns the receiving end of the settled-value channel together with
    /// the task handle.
    pub fn spawn(self, input: watch::Receiver<String>) -> (mpsc::Receiver<String>, JoinHandle<()>) {
        let (settled_tx, settled_rx) = mpsc::channel(SETTLED_CHANNEL_CAPACITY);
        let handle = tokio::spawn(self.run(input, settled_tx));
        (settled_rx, handle)
    }

    /// Forward settled values from `input` to `settled` until either side
    /// closes.
    ///
    /// The value present at start is pending like any other change, so the
    /// initial (usually empty) value settles after one quiet period. A
    /// settled value equal to the last emitted one is dropped. When the input
    /// closes, a pending value is emitted once its quiet period has run out.
    pub async fn run(self, mut input: watch::Receiver<String>, settled: mpsc::Sender<String>) {
        let mut pending = Some(input.borrow_and_update().clone());
        let mut deadline = Instant::now() + self.quiet_period;
        let mut last_emitted: Option<String> = None;

        loop {
            let Some(value) = pending.take() else {
                if input.changed().await.is_err() {
                    tracing::debug!("Search input closed, stopping debouncer");
                    return;
                }
                pending = Some(input.borrow_and_update().clone());
                deadline = Instant::now() + self.quiet_period;
                continue;
            };

            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        tokio::time::sleep_until(deadline).await;
                        emit(&settled, &mut last_emitted, value).await;
                        tracing::debug!("Search input closed, stopping debouncer");
                        return;
                    }
                    pending = Some(input.borrow_and_update().clone());
                    deadline = Instant::now() + self.quiet_period;
                }
                _ = tokio::time::sleep_until(deadline) => {
                    if !emit(&settled, &mut last_emitted, value).await {
                        return;
                    }
                }
            }
        }
    }
}

/// Send `value` unless it repeats the last emitted one. Returns `false`
/// once the receiver is gone.
async fn emit(
    settled: &mpsc::Sender<String>,
    last_emitted: &mut Option<String>,
    value: String,
) -> bool {
    if last_emitted.as_deref() == Some(value.as_str()) {
        return true;
    }
    tracing::debug!(query = %value, "Search input settled");
    if settled.send(value.clone()).await.is_err() {
        return false;
    }
    *last_emitted = Some(value);
    true
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    fn start() -> (watch::Sender<String>, mpsc::Receiver<String>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(String::new());
        let (settled, handle) = SearchDebouncer::new(QUIET).spawn(rx);
        (tx, settled, handle)
    }

    /// Assert nothing further is emitted for a generous amount of time.
    async fn assert_silent(settled: &mut mpsc::Receiver<String>) {
        let next = tokio::time::timeout(Duration::from_secs(10), settled.recv()).await;
        assert!(next.is_err(), "unexpected settled value: {next:?}");
    }

    #[test]
    fn default_uses_search_quiet_period() {
        assert_eq!(SearchDebouncer::default().quiet_period(), SEARCH_QUIET_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_value_settles_after_quiet_period() {
        let (_tx, mut settled, _handle) = start();

        let early = tokio::time::timeout(QUIET - Duration::from_millis(1), settled.recv()).await;
        assert!(early.is_err(), "initial value emitted before quiet period");

        assert_eq!(settled.recv().await.as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn burst_emits_only_last_value() {
        let (tx, mut settled, _handle) = start();
        assert_eq!(settled.recv().await.as_deref(), Some(""));

        for value in ["b", "ba", "bat", "batm", "batman"] {
            tx.send(value.to_string()).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(settled.recv().await.as_deref(), Some("batman"));
        assert_silent(&mut settled).await;
    }

    #[tokio::test(start_paused = true)]
    async fn each_change_restarts_the_timer() {
        let (tx, mut settled, _handle) = start();
        assert_eq!(settled.recv().await.as_deref(), Some(""));

        tx.send("al".into()).unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        tx.send("alien".into()).unwrap();

        // 400 ms after the second change the first timer would long have fired.
        let early = tokio::time::timeout(Duration::from_millis(400), settled.recv()).await;
        assert!(early.is_err());

        assert_eq!(settled.recv().await.as_deref(), Some("alien"));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_pauses_emit_separate_values() {
        let (tx, mut settled, _handle) = start();
        assert_eq!(settled.recv().await.as_deref(), Some(""));

        tx.send("heat".into()).unwrap();
        assert_eq!(settled.recv().await.as_deref(), Some("heat"));

        tx.send("ronin".into()).unwrap();
        assert_eq!(settled.recv().await.as_deref(), Some("ronin"));
    }

    #[tokio::test(start_paused = true)]
    async fn returning_to_last_settled_value_is_not_reemitted() {
        let (tx, mut settled, _handle) = start();
        assert_eq!(settled.recv().await.as_deref(), Some(""));

        tx.send("x".into()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(String::new()).unwrap();

        assert_silent(&mut settled).await;
    }

    #[tokio::test(start_paused = true)]
    async fn closing_input_flushes_pending_value() {
        let (tx, mut settled, handle) = start();
        assert_eq!(settled.recv().await.as_deref(), Some(""));

        tx.send("heat".into()).unwrap();
        drop(tx);

        assert_eq!(settled.recv().await.as_deref(), Some("heat"));
        handle.await.unwrap();
        assert_eq!(settled.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_idle_input_stops_the_task() {
        let (tx, mut settled, handle) = start();
        assert_eq!(settled.recv().await.as_deref(), Some(""));

        drop(tx);

        handle.await.unwrap();
        assert_eq!(settled.recv().await, None);
    }
}
