use crate::core::forwarder::Forwarder;
use crate::domain::model::{ForwardOutcome, RelayStats};
use crate::domain::ports::{HttpTransport, LineSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const DEFAULT_IDLE_DELAY: Duration = Duration::from_millis(10);

/// Process-wide stop request, raised once by the interrupt listener.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`Shutdown::trigger`] has been called.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // 發送端由 self 持有，wait_for 不會因通道關閉而提前返回
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Main polling loop: poll the line source, forward candidates, repeat until
/// shutdown is triggered.
///
/// A trigger cancels the iteration in progress, including a request that has
/// not answered yet. Every error inside an iteration is logged and the next
/// iteration starts as if nothing happened.
pub struct Relay<S: LineSource, T: HttpTransport> {
    source: S,
    forwarder: Forwarder<T>,
    idle_delay: Duration,
    stats: RelayStats,
}

impl<S: LineSource, T: HttpTransport> Relay<S, T> {
    pub fn new(source: S, forwarder: Forwarder<T>) -> Self {
        Self {
            source,
            forwarder,
            idle_delay: DEFAULT_IDLE_DELAY,
            stats: RelayStats::default(),
        }
    }

    /// Pause after a poll that found no data. Zero disables the pause.
    pub fn with_idle_delay(mut self, idle_delay: Duration) -> Self {
        self.idle_delay = idle_delay;
        self
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// One poll plus at most one forward attempt. `None` when no non-empty line was read.
    pub async fn run_once(&mut self) -> Option<ForwardOutcome> {
        self.stats.polls += 1;

        let line = match self.source.poll() {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(e) => {
                self.stats.read_errors += 1;
                tracing::error!("[ERROR] {}", e);
                return None;
            }
        };

        if line.is_empty() {
            return None;
        }
        self.stats.lines += 1;
        tracing::debug!("Serial line: {}", line);

        let outcome = self.forwarder.forward(&line).await;
        self.stats.record(&outcome);
        Some(outcome)
    }

    /// Runs until `shutdown` is triggered, then closes the line source and logs the exit.
    pub async fn run(mut self, shutdown: &Shutdown) -> RelayStats {
        while !shutdown.is_triggered() {
            let idle = tokio::select! {
                biased;
                _ = shutdown.triggered() => break,
                outcome = self.run_once() => outcome.is_none(),
            };

            if idle && !self.idle_delay.is_zero() {
                tokio::time::sleep(self.idle_delay).await;
            }
        }

        let Relay { source, stats, .. } = self;
        stats.log_final_stats();
        drop(source);
        tracing::info!("[EXIT] User interrupted");
        stats
    }
}

/// Spawns a task that triggers the returned [`Shutdown`] on Ctrl-C.
pub fn spawn_interrupt_listener() -> Shutdown {
    let shutdown = Shutdown::new();
    let signal = shutdown.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal.trigger(),
            Err(e) => tracing::error!("[ERROR] Unable to listen for interrupt signal: {}", e),
        }
    });

    shutdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forwarder::DEFAULT_FORWARD_PREFIX;
    use crate::domain::model::HttpReply;
    use crate::utils::error::{RelayError, Result};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct QueuedSource {
        polls: VecDeque<Result<Option<String>>>,
    }

    impl QueuedSource {
        fn new(polls: Vec<Result<Option<String>>>) -> Self {
            Self {
                polls: polls.into(),
            }
        }
    }

    impl LineSource for QueuedSource {
        fn poll(&mut self) -> Result<Option<String>> {
            self.polls.pop_front().unwrap_or(Ok(None))
        }
    }

    #[derive(Clone, Default)]
    struct CountingTransport {
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl HttpTransport for CountingTransport {
        async fn get(&self, url: &str) -> Result<HttpReply> {
            self.calls.lock().unwrap().push(url.to_string());
            Ok(HttpReply {
                status: 302,
                body: String::new(),
            })
        }
    }

    fn line(text: &str) -> Result<Option<String>> {
        Ok(Some(text.to_string()))
    }

    #[tokio::test]
    async fn test_run_once_skips_idle_and_empty_polls() {
        let transport = CountingTransport::default();
        let source = QueuedSource::new(vec![Ok(None), line("")]);
        let mut relay = Relay::new(source, Forwarder::new(transport.clone(), DEFAULT_FORWARD_PREFIX));

        assert_eq!(relay.run_once().await, None);
        assert_eq!(relay.run_once().await, None);
        assert_eq!(relay.stats().polls, 2);
        assert_eq!(relay.stats().lines, 0);
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_error_does_not_stop_polling() {
        let transport = CountingTransport::default();
        let source = QueuedSource::new(vec![
            Err(RelayError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "framing error",
            ))),
            line("http://script.google.com/exec"),
        ]);
        let mut relay = Relay::new(source, Forwarder::new(transport.clone(), DEFAULT_FORWARD_PREFIX));

        assert_eq!(relay.run_once().await, None);
        let outcome = relay.run_once().await;

        assert_eq!(
            outcome.as_ref().and_then(|o| o.forward_url()),
            Some("https://script.google.com/exec")
        );
        assert_eq!(relay.stats().read_errors, 1);
        assert_eq!(relay.stats().delivered, 1);
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_already_shut_down() {
        let transport = CountingTransport::default();
        let source = QueuedSource::new(vec![line("http://script.google.com/exec")]);
        let relay = Relay::new(source, Forwarder::new(transport.clone(), DEFAULT_FORWARD_PREFIX));

        let shutdown = Shutdown::new();
        shutdown.trigger();

        let stats = relay.run(&shutdown).await;

        assert_eq!(stats, RelayStats::default());
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_counts_as_delivered() {
        let transport = CountingTransport::default();
        let source = QueuedSource::new(vec![line("http://script.google.com/exec")]);
        let mut relay = Relay::new(source, Forwarder::new(transport, DEFAULT_FORWARD_PREFIX));

        let outcome = relay.run_once().await;

        assert!(matches!(
            outcome,
            Some(ForwardOutcome::Delivered { status: 302, .. })
        ));
        assert_eq!(relay.stats().failed, 0);
    }

    struct StallingTransport;

    #[async_trait]
    impl HttpTransport for StallingTransport {
        async fn get(&self, _url: &str) -> Result<HttpReply> {
            std::future::pending().await
        }
    }

    /// Triggers shutdown from inside the request, then answers normally.
    struct InterruptingTransport {
        shutdown: Shutdown,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl HttpTransport for InterruptingTransport {
        async fn get(&self, url: &str) -> Result<HttpReply> {
            self.calls.lock().unwrap().push(url.to_string());
            self.shutdown.trigger();
            Ok(HttpReply {
                status: 200,
                body: "OK".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_interrupt_cancels_stalled_request() {
        let source = QueuedSource::new(vec![line("http://script.google.com/exec")]);
        let relay = Relay::new(source, Forwarder::new(StallingTransport, DEFAULT_FORWARD_PREFIX))
            .with_idle_delay(Duration::ZERO);
        let shutdown = Shutdown::new();

        let signal = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            signal.trigger();
        });

        let stats = tokio::time::timeout(Duration::from_secs(3), relay.run(&shutdown))
            .await
            .expect("relay should stop once interrupted");

        assert_eq!(stats.polls, 1);
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.forwarded, 0);
    }

    #[tokio::test]
    async fn test_interrupt_during_forward_stops_after_that_iteration() {
        let shutdown = Shutdown::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = InterruptingTransport {
            shutdown: shutdown.clone(),
            calls: Arc::clone(&calls),
        };
        let source = QueuedSource::new(vec![
            line("http://script.google.com/first"),
            line("http://script.google.com/second"),
        ]);
        let relay = Relay::new(source, Forwarder::new(transport, DEFAULT_FORWARD_PREFIX))
            .with_idle_delay(Duration::ZERO);

        let stats = relay.run(&shutdown).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["https://script.google.com/first".to_string()]
        );
        assert_eq!(stats.polls, 1);
        assert_eq!(stats.delivered, 1);
    }
}
