use crate::ban::BanRecord;
use crate::error::RelayError;
use crate::{CONSOLE_TARGET, ERROR_TARGET, RELAY_TARGET};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log directory name
pub const LOG_DIR: &str = "logs";
/// Relay activity log file name
pub const RELAY_LOG_FILE: &str = "relay";

/// Initialize the logging system with console and file outputs
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init() -> Result<(), RelayError> {
    if !Path::new(LOG_DIR).exists() {
        std::fs::create_dir_all(LOG_DIR)?;
    }

    let relay_file = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, RELAY_LOG_FILE);

    // Human-readable console output
    let console_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(true);

    // JSON relay log
    let relay_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(false)
        .json()
        .with_writer(relay_file);

    // RUST_LOG wins; otherwise INFO with the HTTP stacks quietened
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(relay_layer)
        .init();

    info!("Logging system initialized");
    Ok(())
}

fn default_filter() -> EnvFilter {
    ["serenity=error", "reqwest=warn", "hyper=warn"]
        .into_iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(EnvFilter::new("info"), EnvFilter::add_directive)
}

/// Log a ban that is about to be relayed
pub fn log_ban_detected(record: &BanRecord) {
    info!(
        target: RELAY_TARGET,
        subject_id = %record.subject_id,
        subject_name = %record.subject_name,
        punishment = %record.punishment_type,
        banned_at = ?record.banned_at_utc(),
        unbanned_at = ?record.unbanned_at_utc(),
        event = "ban_detected",
        "New ban detected"
    );
}

/// Log a failed ban-list fetch
pub fn log_fetch_error(error: &RelayError) {
    error!(
        target: ERROR_TARGET,
        error = %error,
        event = "fetch_failed",
        "Failed to fetch ban list, skipping cycle"
    );
}

/// Log a notification that could not be delivered
pub fn log_notify_error(record: &BanRecord, error: &RelayError) {
    error!(
        target: ERROR_TARGET,
        subject_id = %record.subject_id,
        error = %error,
        event = "notify_failed",
        "Failed to deliver ban notification"
    );
}

/// Log that every fetched ban is new, so older ones may have been missed
pub fn log_cursor_lost(fetched: usize) {
    warn!(
        target: RELAY_TARGET,
        fetched = fetched,
        event = "cursor_lost",
        "Last seen ban is outside the fetched window, older bans may have been skipped"
    );
}

pub fn log_console(message: &str) {
    info!(
        target: CONSOLE_TARGET,
        message = %message,
        event = "console",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_builds() {
        let filter = default_filter().to_string();
        assert!(filter.contains("serenity=error"));
        assert!(filter.contains("info"));
    }
}
