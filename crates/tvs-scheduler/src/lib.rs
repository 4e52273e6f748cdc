pub mod config;
pub mod service;
pub mod task;

#[cfg(test)]
mod testing;

pub use config::{DEFAULT_UPDATE_SCHEDULE, ScheduleError, parse_schedule};
pub use service::UpdateService;
pub use task::{DiscordTask, UpdateTask};
