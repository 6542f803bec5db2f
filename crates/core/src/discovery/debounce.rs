//! Quiescence gate for search input.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::metrics::{DEBOUNCE_EMITTED, DEBOUNCE_SUPERSEDED};

/// Emits a value only after no newer value arrived for `window`.
///
/// At most one timer is pending. A new value, `cancel()` or dropping the
/// gate invalidates it, and an invalidated timer never emits.
pub struct DebounceGate<T> {
    window: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<CancellationToken>,
}

impl<T> DebounceGate<T> {
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Invalidate the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            // A fired timer cancels its own token, so it isn't counted here.
            if !token.is_cancelled() {
                token.cancel();
                DEBOUNCE_SUPERSEDED.inc();
            }
        }
    }
}

impl<T: Send + 'static> DebounceGate<T> {
    /// Create a gate and the receiver its emissions arrive on.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let gate = Self {
            window,
            tx,
            pending: None,
        };
        (gate, rx)
    }

    /// Record a raw value, restarting the quiescence window.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let tx = self.tx.clone();
        let window = self.window;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    trace!("Debounce timer invalidated");
                }
                _ = tokio::time::sleep(window) => {
                    token.cancel();
                    DEBOUNCE_EMITTED.inc();
                    let _ = tx.send(value);
                }
            }
        });
    }
}

impl<T> Drop for DebounceGate<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    async fn next(rx: &mut mpsc::UnboundedReceiver<String>) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_value() {
        let (mut gate, mut rx) = DebounceGate::new(WINDOW);

        for term in ["i", "in", "inc", "ince", "inception"] {
            gate.push(term.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(next(&mut rx).await.as_deref(), Some("inception"));
        assert!(!gate.is_pending());
        assert_eq!(next(&mut rx).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_updates_each_emit() {
        let (mut gate, mut rx) = DebounceGate::new(WINDOW);

        gate.push("dune".to_string());
        assert_eq!(next(&mut rx).await.as_deref(), Some("dune"));

        gate.push("alien".to_string());
        assert_eq!(next(&mut rx).await.as_deref(), Some("alien"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_emission_before_window() {
        let (mut gate, mut rx) = DebounceGate::new(WINDOW);

        gate.push("heat".to_string());
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());
        assert!(gate.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().ok().as_deref(), Some("heat"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_emission() {
        let (mut gate, mut rx) = DebounceGate::new(WINDOW);

        gate.push("heat".to_string());
        gate.cancel();
        assert!(!gate.is_pending());

        assert_eq!(next(&mut rx).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_prevents_emission() {
        let (mut gate, mut rx) = DebounceGate::new(WINDOW);

        gate.push("heat".to_string());
        drop(gate);

        // Sender dropped and timer invalidated: channel closes empty.
        assert_eq!(rx.recv().await, None);
    }
}
