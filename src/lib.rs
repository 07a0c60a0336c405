pub mod ban;
pub mod config;
pub mod duration;
pub mod error;
pub mod feed;
pub mod logging;
pub mod notifier;
pub mod novelty;
pub mod relay;

pub const APP_NAME: &str = "ban_relay";
pub const FEED_TARGET: &str = "ban_relay::feed";
pub const NOTIFY_TARGET: &str = "ban_relay::notify";
pub const RELAY_TARGET: &str = "ban_relay::relay";
pub const ERROR_TARGET: &str = "ban_relay::error";
pub const CONSOLE_TARGET: &str = "ban_relay";

pub use ban::{BanId, BanRecord};
pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use relay::{CycleOutcome, PollLoop, RelayState};
pub type Error = Box<dyn std::error::Error + Send + Sync>;
