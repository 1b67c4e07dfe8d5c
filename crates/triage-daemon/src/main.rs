use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use triage_daemon::config::{DaemonArgs, DaemonConfig};
use triage_daemon::fixtures::load_snapshots;
use triage_daemon::runner::{spawn_event_logger, write_tickets, Daemon};

#[tokio::main]
async fn main() -> Result<()> {
    let args = DaemonArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DaemonConfig::from_args(args)?;
    info!(
        sessions = %config.sessions_path.display(),
        agents = %config.agents_path.display(),
        selection = ?config.engine.selection,
        once = config.once,
        "Triage daemon starting"
    );

    let snapshots = load_snapshots(&config)?;
    let daemon = Daemon::new(&config, &snapshots);

    let cancel = CancellationToken::new();
    let logger = spawn_event_logger(daemon.events(), cancel.child_token());

    daemon.ingest(snapshots.sessions).await;

    if !config.once {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping sweeper");
                    cancel.cancel();
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
            }
        });
    }

    let report = daemon.run(&config, cancel.clone()).await;
    info!(
        checked = report.checked,
        escalated = report.escalated,
        skipped = report.skipped,
        "Sweeping finished"
    );

    cancel.cancel();
    match logger.await {
        Ok(logged) => debug!(logged, "Event logger stopped"),
        Err(e) => warn!("Event logger task failed: {e}"),
    }

    write_tickets(&daemon.tickets().await, config.output_path.as_deref())
}
