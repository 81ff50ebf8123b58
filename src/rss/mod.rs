//! Feed storage, fetching and aggregation for gator.

pub mod aggregator;
pub mod fetcher;
pub mod repository;
pub mod types;

pub use aggregator::{Aggregator, CycleOutcome};
pub use fetcher::{decode_html_entities, parse_feed, validate_url, FeedSource, RssFetcher};
pub use repository::{FeedFollowRepository, FeedRepository};
pub use types::{
    Feed, FeedFollow, FeedFollowDetails, FeedWithCreator, NewFeed, ParsedFeed, ParsedItem,
};
