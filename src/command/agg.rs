//! The `agg` command.

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::interval::parse_interval;
use super::{Command, State};
use crate::rss::{Aggregator, RssFetcher};
use crate::Result;

/// `agg <interval>`: collect feeds every interval until interrupted.
pub fn handle_agg<'a>(state: &'a mut State, cmd: &'a Command) -> BoxFuture<'a, Result<()>> {
    async move {
        cmd.expect_args(1, "agg <interval>")?;
        let period = parse_interval(&cmd.args[0])?;

        let fetcher = RssFetcher::new(&state.config.rss)?;
        let aggregator = Aggregator::new(state.db.clone(), fetcher);

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Interrupt received, stopping");
            let _ = shutdown_tx.send(());
        });

        println!("Collecting feeds every {}", cmd.args[0]);
        let cycles = aggregator.run(period, shutdown_rx).await;
        info!("Aggregator stopped after {} cycle(s)", cycles);
        Ok(())
    }
    .boxed()
}
