/// Status code and body text of one forwarded GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// What the forwarder did with one decoded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Line did not start with the forward prefix; nothing was sent.
    Ignored,
    Delivered {
        url: String,
        status: u16,
        preview: String,
    },
    Failed {
        url: String,
        message: String,
    },
}

impl ForwardOutcome {
    pub fn forward_url(&self) -> Option<&str> {
        match self {
            ForwardOutcome::Ignored => None,
            ForwardOutcome::Delivered { url, .. } | ForwardOutcome::Failed { url, .. } => {
                Some(url)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub polls: u64,
    pub lines: u64,
    pub forwarded: u64,
    pub delivered: u64,
    pub failed: u64,
    pub read_errors: u64,
}

impl RelayStats {
    pub fn record(&mut self, outcome: &ForwardOutcome) {
        match outcome {
            ForwardOutcome::Ignored => {}
            ForwardOutcome::Delivered { .. } => {
                self.forwarded += 1;
                self.delivered += 1;
            }
            ForwardOutcome::Failed { .. } => {
                self.forwarded += 1;
                self.failed += 1;
            }
        }
    }

    pub fn log_final_stats(&self) {
        tracing::info!(
            "📊 Final Stats - polls: {}, lines: {}, forwarded: {} (ok: {}, failed: {}), read errors: {}",
            self.polls,
            self.lines,
            self.forwarded,
            self.delivered,
            self.failed,
            self.read_errors
        );
    }
}
