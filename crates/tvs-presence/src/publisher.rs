use std::sync::Arc;

use tvs_types::{MetricReading, format_usd};

use crate::session::{Presence, PresenceSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Presence set to the contained text
    Updated(String),
    SkippedNoData,
    SkippedNotReady,
    Failed,
}

impl PublishOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Updated(_) => "updated",
            Self::SkippedNoData => "skipped_no_data",
            Self::SkippedNotReady => "skipped_not_ready",
            Self::Failed => "failed",
        }
    }
}

/// Turns a reading into the bot status. Never queues or retries.
#[derive(Clone)]
pub struct StatusPublisher {
    session: Arc<dyn PresenceSession>,
    protocol_name: String,
}

impl StatusPublisher {
    pub fn new(session: Arc<dyn PresenceSession>, protocol_name: impl Into<String>) -> Self {
        Self {
            session,
            protocol_name: protocol_name.into(),
        }
    }

    pub fn session(&self) -> &Arc<dyn PresenceSession> {
        &self.session
    }

    /// `<ProtocolName> TVS: <formatted total>`
    pub fn status_text(&self, total: f64) -> String {
        format!("{} TVS: {}", self.protocol_name, format_usd(total))
    }

    pub async fn publish(&self, reading: Option<&MetricReading>) -> PublishOutcome {
        let Some(reading) = reading else {
            tracing::warn!("[StatusPublisher] Failed to fetch TVS, skipping status update");
            return PublishOutcome::SkippedNoData;
        };

        let text = self.status_text(reading.total);

        if !self.session.is_ready() {
            tracing::warn!("[StatusPublisher] ⚠️ Session not ready yet, skipping status update");
            return PublishOutcome::SkippedNotReady;
        }

        match self.session.set_presence(Presence::watching(text.clone())).await {
            Ok(()) => {
                tracing::info!("[StatusPublisher] ✅ Bot status updated: {text}");
                PublishOutcome::Updated(text)
            }
            Err(e) => {
                tracing::error!("[StatusPublisher] 🔴 Error updating bot status: {e}");
                PublishOutcome::Failed
            }
        }
    }
}
