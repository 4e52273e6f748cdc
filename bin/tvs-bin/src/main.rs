mod cli;

use std::{sync::Arc, time::Duration};

use crate::cli::BotCli;
use anyhow::{Context, Result, bail};
use clap::Parser;
use dotenvy::dotenv;
use pragma_common::{
    services::{Service, ServiceContext, ServiceGroup, ServiceRunner},
    telemetry::init_telemetry,
};
use tokio::{signal, task::JoinSet};

use tvs_fetcher::{MetricFetcher, MetricSource, SourceConfig};
use tvs_metrics::MetricsRegistry;
use tvs_presence::{DiscordSession, StatusPublisher};
use tvs_scheduler::{DiscordTask, UpdateService, UpdateTask, parse_schedule};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let BotCli {
        discord_bot_token,
        otel_collector_endpoint,
        protocol_name,
        protocol_slug,
        source,
        api_base_url,
        page_base_url,
        update_schedule,
        http_timeout_secs,
    } = BotCli::parse();

    let app_name = "tvs_presence_bot";
    let mut telemetry = match init_telemetry(app_name, otel_collector_endpoint) {
        Ok(providers) => providers,
        Err(e) => bail!("Could not init telemetry: {e}"),
    };

    tracing::info!("🚀 Starting {protocol_name} TVS Discord bot...");

    let Some(bot_token) = discord_bot_token.filter(|token| !token.trim().is_empty()) else {
        tracing::error!("❌ DISCORD_BOT_TOKEN environment variable is required!");
        bail!("Missing Discord bot token");
    };

    let schedule = parse_schedule(&update_schedule)?;

    let source = SourceConfig {
        kind: source,
        api_base_url,
        page_base_url,
        protocol_slug,
        request_timeout: Duration::from_secs(http_timeout_secs),
    }
    .build()
    .context("Could not init the TVS source")?;
    tracing::info!("Reading TVS from the {} source", source.name());

    let metrics = MetricsRegistry::new();
    let session = DiscordSession::new();

    let update_service = Arc::new(UpdateService::new(
        MetricFetcher::new(source),
        StatusPublisher::new(session.clone(), protocol_name),
        schedule,
        metrics.updates.clone(),
    ));

    let ctx = ServiceContext::new();
    let mut join_set = JoinSet::new();
    let mut services = ServiceGroup::default()
        .with_critical(DiscordTask::new(bot_token, session))
        .with_critical(UpdateTask::new(update_service));
    services
        .start(ServiceRunner::new(ctx.clone(), &mut join_set))
        .await
        .context("Could not start the services")?;

    let shutdown_ctx = ctx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("🛑 Shutdown requested, stopping services...");
        shutdown_ctx.cancel();
    });

    while let Some(result) = join_set.join_next().await {
        result??;
    }

    tracing::info!("👋 Bot stopped");
    if let Err(e) = telemetry.shutdown() {
        eprintln!("Could not flush telemetry: {e}");
    }

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
