use anyhow::{bail, Context};
use notification_feed::{telemetry, FeedConfig, FeedSession, Intent, NotificationId, Outcome};

/// What to do after the initial fetch
enum Command {
    Show,
    Delete(NotificationId),
    Clear,
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let command = match args.next().as_deref() {
            None | Some("show") => Command::Show,
            Some("delete") => match args.next() {
                Some(id) => Command::Delete(NotificationId::new(id)),
                None => bail!("usage: notification-feed delete <id>"),
            },
            Some("clear") => Command::Clear,
            Some(other) => bail!(
                "unknown command {:?}; expected show, delete <id> or clear",
                other
            ),
        };
        Ok(command)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = FeedConfig::from_env().context("Failed to load configuration")?;
    telemetry::init_tracing(&config).context("Failed to initialize tracing")?;

    let command = Command::parse(std::env::args().skip(1))?;

    tracing::info!(api = %config.api_base_url, "Opening notification feed");
    let session = FeedSession::from_config(&config)?;
    session.refresh().await;

    let intent = match command {
        Command::Show => None,
        Command::Delete(id) => Some(Intent::DeleteOne(id)),
        Command::Clear => Some(Intent::DeleteAll),
    };

    if let Some(intent) = intent {
        match session.dispatch(intent).await {
            Ok(Outcome::Applied(_)) => {}
            Ok(Outcome::Skipped) => tracing::warn!("Another deletion was in flight"),
            // Already reported as a toast
            Err(e) => tracing::debug!(error = %e, "Mutation failed"),
        }
    }

    print!("{}", session.view());
    for toast in session.drain_toasts() {
        println!("{}", toast);
    }

    Ok(())
}
