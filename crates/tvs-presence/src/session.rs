use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("Session is not ready")]
    NotReady,

    #[error("Gateway error: {0}")]
    Gateway(String),
}

/// A "Watching <activity_name>" activity with the online status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub activity_name: String,
}

impl Presence {
    pub fn watching(activity_name: impl Into<String>) -> Self {
        Self {
            activity_name: activity_name.into(),
        }
    }
}

/// Long-lived messaging session the bot publishes through.
#[async_trait::async_trait]
pub trait PresenceSession: Send + Sync {
    fn is_ready(&self) -> bool;

    /// Resolves once the session has been ready at least once.
    async fn wait_until_ready(&self);

    async fn set_presence(&self, presence: Presence) -> Result<(), PresenceError>;
}
