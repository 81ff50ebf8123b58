//! Fetcher and aggregation tests against a local HTTP server.

use chrono::{Duration as ChronoDuration, Utc};
use httpmock::prelude::*;

use gator::config::RssConfig;
use gator::datetime::format_timestamp;
use gator::rss::{
    Aggregator, CycleOutcome, FeedRepository, FeedSource, NewFeed, RssFetcher,
};
use gator::{Database, GatorError, UserRepository};

const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Boot.dev Blog</title>
    <link>https://example.com</link>
    <description>Posts &amp;amp; news</description>
    <item>
      <title>Rust &amp;amp; SQLite</title>
      <link>https://example.com/posts/1</link>
      <guid>1</guid>
      <description>First</description>
    </item>
    <item>
      <title>It&amp;#8217;s done</title>
      <link>https://example.com/posts/2</link>
      <guid>2</guid>
    </item>
  </channel>
</rss>"#;

async fn setup_db() -> (Database, i64) {
    let db = Database::open_in_memory().await.unwrap();
    let user = UserRepository::new(db.pool()).create("alice").await.unwrap();
    (db, user.id)
}

fn fetcher() -> RssFetcher {
    RssFetcher::new(&RssConfig::default()).unwrap()
}

// ============================================================================
// Fetcher
// ============================================================================

#[tokio::test]
async fn test_fetch_parses_and_decodes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/feed.xml")
                .header("user-agent", RssConfig::default().user_agent);
            then.status(200)
                .header("Content-Type", "application/rss+xml")
                .body(SAMPLE_RSS);
        })
        .await;

    let feed = fetcher().fetch(&server.url("/feed.xml")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(feed.title, "Boot.dev Blog");
    assert_eq!(feed.description, "Posts & news");
    assert_eq!(feed.items.len(), 2);
    assert_eq!(feed.items[0].title, "Rust & SQLite");
    assert_eq!(feed.items[1].title, "It\u{2019}s done");
}

#[tokio::test]
async fn test_fetch_http_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gone.xml");
            then.status(404).body("Not Found");
        })
        .await;

    let result = fetcher().fetch(&server.url("/gone.xml")).await;

    assert!(matches!(result, Err(GatorError::HttpStatus(404))));
}

#[tokio::test]
async fn test_fetch_unparseable_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/page.html");
            then.status(200).body("<html><body>Not a feed</body></html>");
        })
        .await;

    let result = fetcher().fetch(&server.url("/page.html")).await;

    assert!(matches!(result, Err(GatorError::FeedParse(_))));
}

#[tokio::test]
async fn test_fetch_too_large() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed.xml");
            then.status(200).body(SAMPLE_RSS);
        })
        .await;

    let config = RssConfig {
        max_feed_size_bytes: 64,
        ..RssConfig::default()
    };
    let result = RssFetcher::new(&config)
        .unwrap()
        .fetch(&server.url("/feed.xml"))
        .await;

    match result {
        Err(GatorError::FeedParse(msg)) => assert!(msg.contains("too large")),
        other => panic!("Expected FeedParse error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let result = fetcher().fetch("http://127.0.0.1:1/feed.xml").await;

    assert!(matches!(result, Err(GatorError::Network(_))));
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_cycles_claim_distinct_feeds() {
    let server = MockServer::start_async().await;
    let mut mocks = Vec::new();
    for path in ["/a.xml", "/b.xml", "/c.xml"] {
        mocks.push(
            server
                .mock_async(|when, then| {
                    when.method(GET).path(path);
                    then.status(200).body(SAMPLE_RSS);
                })
                .await,
        );
    }

    let (db, user_id) = setup_db().await;
    let feeds = FeedRepository::new(db.pool());
    for (name, path) in [("A", "/a.xml"), ("B", "/b.xml"), ("C", "/c.xml")] {
        feeds
            .create(&NewFeed::new(name, server.url(path), user_id))
            .await
            .unwrap();
    }

    let aggregator = Aggregator::new(db.clone(), fetcher());
    let mut claimed = Vec::new();
    for _ in 0..3 {
        match aggregator.scrape_once().await {
            CycleOutcome::Fetched { feed, items } => {
                assert_eq!(items.len(), 2);
                claimed.push(feed.name);
            }
            other => panic!("Expected Fetched, got {other:?}"),
        }
    }

    assert_eq!(claimed, vec!["A", "B", "C"]);
    for mock in &mocks {
        assert_eq!(mock.hits_async().await, 1);
    }
}

#[tokio::test]
async fn test_never_fetched_feed_claimed_first() {
    let (db, user_id) = setup_db().await;
    let feeds = FeedRepository::new(db.pool());
    let b = feeds
        .create(&NewFeed::new("B", "http://127.0.0.1:1/b.xml", user_id))
        .await
        .unwrap();
    feeds
        .create(&NewFeed::new("A", "http://127.0.0.1:1/a.xml", user_id))
        .await
        .unwrap();

    let ten_minutes_ago = format_timestamp(&(Utc::now() - ChronoDuration::minutes(10)));
    sqlx::query("UPDATE feeds SET last_fetched_at = ? WHERE id = ?")
        .bind(&ten_minutes_ago)
        .bind(b.id)
        .execute(db.pool())
        .await
        .unwrap();

    let outcome = Aggregator::new(db.clone(), fetcher()).scrape_once().await;

    assert_eq!(outcome.feed().unwrap().name, "A");
}

#[tokio::test]
async fn test_failed_fetch_still_advances_feed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/broken.xml");
            then.status(500).body("Internal Server Error");
        })
        .await;

    let (db, user_id) = setup_db().await;
    let feeds = FeedRepository::new(db.pool());
    let feed = feeds
        .create(&NewFeed::new("Broken", server.url("/broken.xml"), user_id))
        .await
        .unwrap();
    let aggregator = Aggregator::new(db.clone(), fetcher());

    let outcome = aggregator.scrape_once().await;
    assert!(matches!(
        outcome,
        CycleOutcome::Failed {
            error: GatorError::HttpStatus(500),
            ..
        }
    ));
    let first = feeds
        .get_by_id(feed.id)
        .await
        .unwrap()
        .unwrap()
        .last_fetched_at
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    aggregator.scrape_once().await;
    let second = feeds
        .get_by_id(feed.id)
        .await
        .unwrap()
        .unwrap()
        .last_fetched_at
        .unwrap();

    assert!(second > first);
}

#[tokio::test]
async fn test_no_feeds() {
    let (db, _) = setup_db().await;

    let outcome = Aggregator::new(db, fetcher()).scrape_once().await;

    assert!(matches!(outcome, CycleOutcome::NoFeeds));
}
