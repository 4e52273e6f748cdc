use std::sync::Arc;

use anyhow::Context as _;
use pragma_common::services::{Service, ServiceRunner};
use serenity::Client;
use tvs_presence::{DISCORD_INTENTS, DiscordSession};

use crate::service::UpdateService;

pub struct UpdateTask {
    service: Arc<UpdateService>,
}

impl UpdateTask {
    pub const fn new(service: Arc<UpdateService>) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Service for UpdateTask {
    async fn start<'a>(&mut self, mut runner: ServiceRunner<'a>) -> anyhow::Result<()> {
        let service = Arc::clone(&self.service);

        // `run_forever` watches the token itself so it can drain in-flight cycles.
        runner.spawn_loop(move |ctx| async move { service.run_forever(ctx.token.clone()).await });

        Ok(())
    }
}

/// Owns the serenity client. Reconnects are handled by serenity itself,
/// an error out of `start` (bad token, failed login) ends the service group.
pub struct DiscordTask {
    bot_token: String,
    session: Arc<DiscordSession>,
}

impl DiscordTask {
    pub const fn new(bot_token: String, session: Arc<DiscordSession>) -> Self {
        Self { bot_token, session }
    }
}

#[async_trait::async_trait]
impl Service for DiscordTask {
    async fn start<'a>(&mut self, mut runner: ServiceRunner<'a>) -> anyhow::Result<()> {
        let bot_token = self.bot_token.clone();
        let session = Arc::clone(&self.session);

        runner.spawn_loop(move |ctx| async move {
            let mut client = Client::builder(&bot_token, DISCORD_INTENTS)
                .event_handler(session.handler())
                .await
                .context("Failed to create the Discord client")?;
            let shard_manager = Arc::clone(&client.shard_manager);

            tracing::info!("[DiscordTask] 🚀 Logging in to Discord...");
            match ctx.run_until_cancelled(client.start()).await {
                Some(result) => result.context("Failed to login to Discord")?,
                None => {
                    tracing::info!("[DiscordTask] Shutting down Discord shards");
                    shard_manager.shutdown_all().await;
                }
            }

            anyhow::Ok(())
        });

        Ok(())
    }
}
