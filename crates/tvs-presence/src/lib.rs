pub mod discord;
pub mod publisher;
pub mod session;

pub use discord::{DISCORD_INTENTS, DiscordHandler, DiscordSession};
pub use publisher::{PublishOutcome, StatusPublisher};
pub use session::{Presence, PresenceError, PresenceSession};
