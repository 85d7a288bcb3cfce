//! Coalesces rapid search input into the queries worth running.
//!
//! A query is emitted only after the input has been quiet for the
//! configured period, and only if it differs from the previously emitted
//! query. A query still pending when the input closes is flushed under the
//! same rule.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

const OUTPUT_BUFFER: usize = 16;

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet: Duration,
    cancel: CancellationToken,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl SearchDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop debouncing when `token` is cancelled; the output then closes
    /// without flushing.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run on a new task and return the stream of debounced queries.
    pub fn spawn(self, input: mpsc::Receiver<String>) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(OUTPUT_BUFFER);
        tokio::spawn(self.run(input, tx));
        rx
    }

    /// Forward debounced queries from `input` to `output` until the input
    /// closes, the output is dropped, or the token is cancelled.
    pub async fn run(self, mut input: mpsc::Receiver<String>, output: mpsc::Sender<String>) {
        let mut pending: Option<String> = None;
        let mut last_emitted: Option<String> = None;

        let timer = time::sleep(self.quiet);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return,
                received = input.recv() => match received {
                    Some(query) => {
                        trace!(%query, "search input");
                        pending = Some(query);
                        timer.as_mut().reset(Instant::now() + self.quiet);
                    }
                    None => break,
                },
                () = &mut timer, if pending.is_some() => {
                    if !emit(pending.take(), &mut last_emitted, &output).await {
                        return;
                    }
                }
            }
        }

        emit(pending, &mut last_emitted, &output).await;
    }
}

/// Send `query` unless it repeats the last emitted one. Returns `false` once
/// the receiver is gone.
async fn emit(
    query: Option<String>,
    last_emitted: &mut Option<String>,
    output: &mpsc::Sender<String>,
) -> bool {
    let Some(query) = query else {
        return true;
    };
    if last_emitted.as_ref() == Some(&query) {
        trace!(%query, "duplicate search suppressed");
        return true;
    }
    *last_emitted = Some(query.clone());
    output.send(query).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debounced() -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(16);
        (tx, SearchDebouncer::default().spawn(rx))
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn burst_emits_only_latest() {
        let (tx, mut out) = debounced();
        for query in ["l", "la", "lam", "lamp"] {
            tx.send(query.into()).await.unwrap();
        }
        assert_eq!(out.recv().await.as_deref(), Some("lamp"));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn pauses_longer_than_quiet_period_emit_each_query() {
        let (tx, mut out) = debounced();
        tx.send("desk".into()).await.unwrap();
        time::sleep(Duration::from_millis(400)).await;
        tx.send("lamp".into()).await.unwrap();

        assert_eq!(out.recv().await.as_deref(), Some("desk"));
        assert_eq!(out.recv().await.as_deref(), Some("lamp"));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn input_within_quiet_period_restarts_the_timer() {
        let (tx, mut out) = debounced();
        tx.send("desk".into()).await.unwrap();
        time::sleep(Duration::from_millis(200)).await;
        tx.send("desk lamp".into()).await.unwrap();
        time::sleep(Duration::from_millis(200)).await;
        drop(tx);

        assert_eq!(out.recv().await.as_deref(), Some("desk lamp"));
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn repeated_query_is_suppressed() {
        let (tx, mut out) = debounced();
        tx.send("lamp".into()).await.unwrap();
        assert_eq!(out.recv().await.as_deref(), Some("lamp"));

        tx.send("lamp".into()).await.unwrap();
        time::sleep(Duration::from_secs(1)).await;
        tx.send("desk".into()).await.unwrap();
        assert_eq!(out.recv().await.as_deref(), Some("desk"));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn closing_input_flushes_pending_query() {
        let (tx, mut out) = debounced();
        tx.send("chair".into()).await.unwrap();
        drop(tx);

        assert_eq!(out.recv().await.as_deref(), Some("chair"));
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn cancellation_closes_output_without_flush() {
        let token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(16);
        let mut out = SearchDebouncer::default()
            .with_cancellation(token.clone())
            .spawn(rx);

        tx.send("chair".into()).await.unwrap();
        token.cancel();

        assert_eq!(out.recv().await, None);
    }
}
