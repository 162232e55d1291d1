//! slircbridge - IRC <-> Slack relay daemon

use anyhow::Context;
use clap::Parser;
use slirc_bridge::config::{self, Config, SAMPLE_CONFIG};
use slirc_bridge::http::{self, AppState};
use slirc_bridge::irc::{Relay, SessionHandle, SessionManager};
use slirc_bridge::slack::{self, EventFilter, IdentityCache, SlackApi, SlackPoster};
use slirc_bridge::{metrics, telemetry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// How often expired identity cache entries are swept.
const PRUNE_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug, Parser)]
#[command(name = "slircbridge", version, about = "Relay an IRC channel to and from Slack")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Print an annotated sample configuration and exit.
    #[arg(long)]
    sample_config: bool,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.sample_config {
        print!("{SAMPLE_CONFIG}");
        return Ok(());
    }

    telemetry::init(cli.log_json);

    let config = Config::load(&cli.config).map_err(|e| {
        error!(path = %cli.config.display(), error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), cli.config.display());
    }

    if cli.check {
        info!(path = %cli.config.display(), "Configuration OK");
        return Ok(());
    }

    info!(
        server = %config.irc.server,
        channel = %config.irc.channel,
        nickname = %config.irc.nickname,
        listen = %config.slack.listen,
        "Starting slircbridge"
    );

    metrics::init();

    let client = slack::http_client().context("failed to build HTTP client")?;
    let poster = Arc::new(SlackPoster::new(client.clone(), config.slack.webhook_url.clone()));
    let api = Arc::new(SlackApi::new(
        client,
        config.slack.api_base.clone(),
        config.slack.api_token.clone(),
    ));
    let identities = Arc::new(IdentityCache::new(api));
    let relay = Relay::spawn(poster);
    let handle = SessionHandle::new();

    // The webhook listener only starts once IRC is registered.
    let (ready_tx, ready_rx) = oneshot::channel();
    let manager = SessionManager::new(config.irc.clone(), handle.clone(), relay);
    let mut session_task = tokio::spawn(manager.run(ready_tx));

    if ready_rx.await.is_err() {
        // The sender is dropped without firing only when the first attempt fails.
        return match session_task.await {
            Ok(Err(e)) => Err(e).context("initial IRC connection failed"),
            Ok(Ok(())) => anyhow::bail!("IRC session ended before becoming ready"),
            Err(e) => Err(e).context("IRC session task panicked"),
        };
    }
    info!("IRC session ready");

    {
        let identities = Arc::clone(&identities);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = identities.prune_expired();
                debug!(removed, remaining = identities.len(), "Pruned identity cache");
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(config.slack.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.slack.listen))?;

    let state = AppState {
        session: handle,
        identities,
        filter: Arc::new(EventFilter::from(&config.slack)),
        channel: Arc::from(config.irc.channel.as_str()),
    };

    tokio::select! {
        result = http::serve(listener, state) => {
            result.context("webhook listener failed")?;
        }
        result = &mut session_task => {
            match result {
                Ok(Ok(())) => info!("IRC session ended"),
                Ok(Err(e)) => return Err(e).context("IRC session failed"),
                Err(e) => return Err(e).context("IRC session task panicked"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
