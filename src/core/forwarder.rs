use crate::domain::model::ForwardOutcome;
use crate::domain::ports::HttpTransport;

pub const DEFAULT_FORWARD_PREFIX: &str = "http://script.google.com";
pub const PREVIEW_CHARS: usize = 200;

pub struct Forwarder<T: HttpTransport> {
    transport: T,
    prefix: String,
}

impl<T: HttpTransport> Forwarder<T> {
    pub fn new(transport: T, prefix: impl Into<String>) -> Self {
        Self {
            transport,
            prefix: prefix.into(),
        }
    }

    /// Case-sensitive literal prefix match, no further trimming.
    pub fn is_candidate(&self, line: &str) -> bool {
        line.starts_with(self.prefix.as_str())
    }

    /// Sends one GET for a candidate line. Lines without the prefix are ignored
    /// without logging; request errors are logged and returned, never raised.
    pub async fn forward(&self, line: &str) -> ForwardOutcome {
        if !self.is_candidate(line) {
            return ForwardOutcome::Ignored;
        }

        tracing::info!("[FORWARDING] {}", line);
        let url = to_forward_url(line);
        tracing::info!("[DEBUG URL] {}", url);

        match self.transport.get(&url).await {
            Ok(reply) => {
                let preview = preview(&reply.body, PREVIEW_CHARS).to_string();
                tracing::info!("[RESPONSE] {} - {}...", reply.status, preview);
                ForwardOutcome::Delivered {
                    url,
                    status: reply.status,
                    preview,
                }
            }
            Err(e) => {
                tracing::error!("[REQUEST ERROR] {}", e);
                ForwardOutcome::Failed {
                    url,
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Upgrades the first `http://` to `https://`; everything else is left untouched.
pub fn to_forward_url(line: &str) -> String {
    line.replacen("http://", "https://", 1)
}

/// First `limit` characters of `body`, or all of it when shorter.
pub fn preview(body: &str, limit: usize) -> &str {
    match body.char_indices().nth(limit) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
