use clap::Parser;
use tvs_fetcher::SourceKind;
use tvs_scheduler::DEFAULT_UPDATE_SCHEDULE;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct BotCli {
    /// Discord bot token
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    pub discord_bot_token: Option<String>,

    /// OTEL collector endpoint
    #[arg(long, env = "OTEL_COLLECTOR_ENDPOINT")]
    pub otel_collector_endpoint: Option<String>,

    /// Name shown in the bot status
    #[arg(long, env = "PROTOCOL_NAME", default_value = "RedStone")]
    pub protocol_name: String,

    /// Protocol identifier on the analytics API and page
    #[arg(long, env = "PROTOCOL_SLUG", default_value = "redstone")]
    pub protocol_slug: String,

    /// Where the TVS is read from: api, page or api-with-page-fallback
    #[arg(long, env = "TVS_SOURCE", default_value_t = SourceKind::Api)]
    pub source: SourceKind,

    /// Analytics API base URL
    #[arg(long, env = "API_BASE_URL", default_value = "https://api.llama.fi")]
    pub api_base_url: Url,

    /// Analytics web page base URL
    #[arg(long, env = "PAGE_BASE_URL", default_value = "https://defillama.com")]
    pub page_base_url: Url,

    /// Cron expression of the recurring update
    #[arg(long, env = "UPDATE_SCHEDULE", default_value = DEFAULT_UPDATE_SCHEDULE)]
    pub update_schedule: String,

    /// Timeout of a single upstream request, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "20")]
    pub http_timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = BotCli::try_parse_from(["tvs-bot", "--discord-bot-token", "token"]).unwrap();

        assert_eq!(cli.protocol_name, "RedStone");
        assert_eq!(cli.protocol_slug, "redstone");
        assert_eq!(cli.source, SourceKind::Api);
        assert_eq!(cli.api_base_url.as_str(), "https://api.llama.fi/");
        assert_eq!(cli.update_schedule, "*/15 * * * *");
        assert_eq!(cli.http_timeout_secs, 20);
    }

    #[test]
    fn test_source_flag() {
        let cli = BotCli::try_parse_from(["tvs-bot", "--source", "api-with-page-fallback"]).unwrap();
        assert_eq!(cli.source, SourceKind::ApiWithPageFallback);

        assert!(BotCli::try_parse_from(["tvs-bot", "--source", "carrier-pigeon"]).is_err());
    }
}
