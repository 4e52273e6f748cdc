use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use serenity::all::{
    ActivityData, ConnectionStage, Context, EventHandler, GatewayIntents, OnlineStatus, Ready,
    ShardStageUpdateEvent,
};
use tokio::sync::watch;

use crate::session::{Presence, PresenceError, PresenceSession};

/// Presence only needs the guilds intent.
pub const DISCORD_INTENTS: GatewayIntents = GatewayIntents::GUILDS;

/// Shared view of the serenity client, fed by [`DiscordHandler`].
pub struct DiscordSession {
    context: RwLock<Option<Context>>,
    connected: AtomicBool,
    ready_tx: watch::Sender<bool>,
}

impl DiscordSession {
    pub fn new() -> Arc<Self> {
        let (ready_tx, _) = watch::channel(false);
        Arc::new(Self {
            context: RwLock::new(None),
            connected: AtomicBool::new(false),
            ready_tx,
        })
    }

    /// Event handler to register on the serenity client.
    pub fn handler(self: &Arc<Self>) -> DiscordHandler {
        DiscordHandler {
            session: Arc::clone(self),
        }
    }

    fn current_context(&self) -> Option<Context> {
        self.context.read().ok().and_then(|context| context.clone())
    }

    fn on_ready(&self, ctx: Context) {
        if let Ok(mut context) = self.context.write() {
            *context = Some(ctx);
        }
        self.connected.store(true, Ordering::SeqCst);
        self.ready_tx.send_replace(true);
    }

    fn on_stage_change(&self, old: ConnectionStage, new: ConnectionStage) {
        match (old, new) {
            (_, ConnectionStage::Connected) => self.connected.store(true, Ordering::SeqCst),
            (ConnectionStage::Connected, _) => self.connected.store(false, Ordering::SeqCst),
            _ => {}
        }
    }
}

#[async_trait::async_trait]
impl PresenceSession for DiscordSession {
    fn is_ready(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && *self.ready_tx.borrow()
    }

    async fn wait_until_ready(&self) {
        let mut ready_rx = self.ready_tx.subscribe();
        // The sender lives as long as `self`, so this only returns once ready.
        let _ = ready_rx.wait_for(|ready| *ready).await;
    }

    async fn set_presence(&self, presence: Presence) -> Result<(), PresenceError> {
        let ctx = self.current_context().ok_or(PresenceError::NotReady)?;
        ctx.set_presence(Some(activity_data(presence)), OnlineStatus::Online);
        Ok(())
    }
}

pub struct DiscordHandler {
    session: Arc<DiscordSession>,
}

#[async_trait::async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("[DiscordSession] ✅ Logged in as {}", ready.user.tag());
        self.session.on_ready(ctx);
    }

    async fn shard_stage_update(&self, _ctx: Context, event: ShardStageUpdateEvent) {
        if event.new == ConnectionStage::Connected {
            tracing::info!("[DiscordSession] Shard {} connected", event.shard_id);
        } else if event.old == ConnectionStage::Connected {
            tracing::warn!(
                "[DiscordSession] ⚠️ Shard {} left connected state: {:?}",
                event.shard_id,
                event.new
            );
        }
        self.session.on_stage_change(event.old, event.new);
    }
}

fn activity_data(presence: Presence) -> ActivityData {
    ActivityData::watching(presence.activity_name)
}

#[cfg(test)]
mod tests {
    use serenity::all::ActivityType;

    use super::*;

    #[test]
    fn test_new_session_is_not_ready() {
        let session = DiscordSession::new();
        assert!(!session.is_ready());
    }

    #[tokio::test]
    async fn test_set_presence_before_ready_fails() {
        let session = DiscordSession::new();
        let result = session
            .set_presence(Presence::watching("RedStone TVS: $1.00B"))
            .await;
        assert!(matches!(result, Err(PresenceError::NotReady)));
    }

    #[test]
    fn test_stage_changes_toggle_readiness_after_ready() {
        let session = DiscordSession::new();
        session.ready_tx.send_replace(true);

        session.on_stage_change(ConnectionStage::Handshake, ConnectionStage::Connected);
        assert!(session.is_ready());

        session.on_stage_change(ConnectionStage::Connected, ConnectionStage::Resuming);
        assert!(!session.is_ready());

        session.on_stage_change(ConnectionStage::Resuming, ConnectionStage::Connected);
        assert!(session.is_ready());
    }

    #[test]
    fn test_activity_mapping() {
        let activity = activity_data(Presence::watching("RedStone TVS: $1.23B"));
        assert_eq!(activity.kind, ActivityType::Watching);
        assert_eq!(activity.name, "RedStone TVS: $1.23B");
    }
}
