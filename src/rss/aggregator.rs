//! Feed aggregation loop for gator.
//!
//! Each cycle claims the feed that has waited longest, marks it fetched,
//! fetches it and reports what it found. Cycles never fail the loop.

use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::db::Database;
use crate::error::GatorError;
use crate::rss::fetcher::{FeedSource, RssFetcher};
use crate::rss::repository::FeedRepository;
use crate::rss::types::{Feed, ParsedItem};

/// What a single aggregation cycle did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// There was nothing to claim.
    NoFeeds,
    /// The cycle was abandoned. `feed` is set when the claim succeeded.
    Failed {
        feed: Option<Feed>,
        error: GatorError,
    },
    /// The feed was fetched and its items reported.
    Fetched { feed: Feed, items: Vec<ParsedItem> },
}

impl CycleOutcome {
    /// The feed this cycle claimed, if any.
    pub fn feed(&self) -> Option<&Feed> {
        match self {
            CycleOutcome::NoFeeds => None,
            CycleOutcome::Failed { feed, .. } => feed.as_ref(),
            CycleOutcome::Fetched { feed, .. } => Some(feed),
        }
    }
}

/// Runs aggregation cycles against the feed store.
pub struct Aggregator<F: FeedSource = RssFetcher> {
    db: Database,
    source: F,
}

impl<F: FeedSource> Aggregator<F> {
    /// Create an aggregator over `db` that fetches through `source`.
    pub fn new(db: Database, source: F) -> Self {
        Self { db, source }
    }

    /// Run one cycle immediately, then one per `period`, until `shutdown`
    /// fires or its sender is dropped.
    ///
    /// Shutdown also abandons a cycle in progress. Returns the number of
    /// completed cycles.
    pub async fn run(&self, period: Duration, mut shutdown: broadcast::Receiver<()>) -> u64 {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = 0;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!("Aggregator shutdown requested after {} cycle(s)", cycles);
                    break;
                }
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = shutdown.recv() => {
                            info!("Aggregator shutdown requested during a cycle");
                            break;
                        }
                        _ = self.scrape_once() => cycles += 1,
                    }
                }
            }
        }

        cycles
    }

    /// Run a single claim, mark, fetch and report cycle.
    pub async fn scrape_once(&self) -> CycleOutcome {
        let feeds = FeedRepository::new(self.db.pool());

        let feed = match feeds.get_next_to_fetch().await {
            Ok(Some(feed)) => feed,
            Ok(None) => {
                info!("No feeds to fetch");
                return CycleOutcome::NoFeeds;
            }
            Err(e) => {
                error!("Failed to get next feed to fetch: {}", e);
                return CycleOutcome::Failed {
                    feed: None,
                    error: e,
                };
            }
        };

        // Marked before fetching so a failing feed still rotates to the back.
        match feeds.mark_fetched(feed.id).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Feed {} disappeared before it could be marked", feed.id);
                return CycleOutcome::Failed {
                    error: GatorError::NotFound(format!("feed {}", feed.id)),
                    feed: Some(feed),
                };
            }
            Err(e) => {
                error!("Failed to mark feed {} fetched: {}", feed.id, e);
                return CycleOutcome::Failed {
                    feed: Some(feed),
                    error: e,
                };
            }
        }

        debug!("Fetching feed {} ({})", feed.name, feed.url);

        let parsed = match self.source.fetch(&feed.url).await {
            Ok(parsed) => parsed,
            Err(e) if !e.is_fetch_error() => {
                error!("Failed to fetch feed {}: {}", feed.url, e);
                return CycleOutcome::Failed {
                    feed: Some(feed),
                    error: e,
                };
            }
            Err(e) => {
                match &e {
                    GatorError::Network(msg) => {
                        warn!("Network error fetching {}: {}", feed.url, msg)
                    }
                    GatorError::HttpStatus(status) => {
                        warn!("Feed {} returned HTTP status {}", feed.url, status)
                    }
                    other => warn!("Could not parse feed {}: {}", feed.url, other),
                }
                return CycleOutcome::Failed {
                    feed: Some(feed),
                    error: e,
                };
            }
        };

        for item in &parsed.items {
            println!("Found post: {}", item.title);
        }
        info!(
            "Feed {} collected, {} post(s) found",
            feed.name,
            parsed.items.len()
        );

        CycleOutcome::Fetched {
            feed,
            items: parsed.items,
        }
    }
}
