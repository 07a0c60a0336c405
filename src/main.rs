use ban_relay::feed::HttpBanFeed;
use ban_relay::notifier::WebhookNotifier;
use ban_relay::{APP_NAME, Error, PollLoop, RelayConfig, RelayState, logging};
use tracing::{error, info};

/// Main function to run the relay
async fn async_main() -> Result<(), Error> {
    // Initialize logging
    logging::init()?;

    let config = RelayConfig::load().await?;
    logging::log_console(&format!(
        "{APP_NAME} polling {} every {}s for the latest {} bans",
        config.ban_list_url, config.poll_interval_secs, config.window
    ));

    let feed = HttpBanFeed::from_config(reqwest::Client::new(), &config);
    let notifier = WebhookNotifier::from_config(&config);
    let relay = PollLoop::new(feed, notifier, config.poll_interval());

    let mut state = RelayState::new();
    relay.prime(&mut state).await;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    let state = relay.run(state, shutdown).await;

    info!(cursor = ?state.cursor, "Relay stopped");
    Ok(())
}

fn main() {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start runtime: {err}");
            std::process::exit(1);
        }
    };

    // Handle any errors that occurred during execution
    if let Err(err) = runtime.block_on(async_main()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
