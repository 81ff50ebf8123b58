//! RSS feed fetcher.
//!
//! Fetches a feed over HTTP, parses it with feed-rs and decodes HTML
//! entities left in titles and descriptions.

use std::future::Future;
use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;
use tracing::debug;

use crate::config::RssConfig;
use crate::error::{GatorError, Result};
use crate::rss::types::{ParsedFeed, ParsedItem};

/// Longest entity name we try to decode (`&thetasym;` is the longest HTML one).
const MAX_ENTITY_LEN: usize = 10;

/// Anything that can turn a feed URL into a parsed feed.
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the feed at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<ParsedFeed>> + Send;
}

/// HTTP feed fetcher.
pub struct RssFetcher {
    client: Client,
    max_feed_size: u64,
}

impl RssFetcher {
    /// Create a fetcher with the given settings.
    pub fn new(config: &RssConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GatorError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    async fn fetch_url(&self, url: &str) -> Result<ParsedFeed> {
        validate_url(url)?;
        debug!("Fetching feed {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatorError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatorError::HttpStatus(status.as_u16()));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(GatorError::FeedParse(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, self.max_feed_size
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatorError::Network(format!("failed to read response: {e}")))?;

        if bytes.len() as u64 > self.max_feed_size {
            return Err(GatorError::FeedParse(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_feed_size
            )));
        }

        parse_feed(&bytes)
    }
}

impl FeedSource for RssFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<ParsedFeed>> + Send {
        self.fetch_url(url)
    }
}

/// Validate that a feed URL is an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| GatorError::Validation(format!("invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(GatorError::Validation(format!(
                "unsupported URL scheme: {scheme}"
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(GatorError::Validation("URL has no host".to_string()));
    }

    Ok(())
}

/// Parse feed bytes into a ParsedFeed.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes).map_err(|e| GatorError::FeedParse(e.to_string()))?;

    let title = feed
        .title
        .map(|t| decode_html_entities(&t.content))
        .unwrap_or_else(|| "Untitled Feed".to_string());
    let description = feed
        .description
        .map(|d| decode_html_entities(&d.content))
        .unwrap_or_default();
    let link = feed.links.first().map(|l| l.href.clone());

    let items = feed
        .entries
        .into_iter()
        .map(|entry| ParsedItem {
            title: entry
                .title
                .map(|t| decode_html_entities(&t.content))
                .unwrap_or_else(|| "Untitled".to_string()),
            description: entry
                .summary
                .map(|s| decode_html_entities(&s.content))
                .unwrap_or_default(),
            link: entry.links.first().map(|l| l.href.clone()),
            published_at: entry.published.or(entry.updated),
        })
        .collect();

    Ok(ParsedFeed {
        title,
        description,
        link,
        items,
    })
}

/// Decode HTML character references (`&amp;`, `&#39;`, `&#x2019;`, ...).
///
/// Unknown or malformed references are kept as written.
pub fn decode_html_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match decode_entity(tail) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the reference at the start of `s` (which begins with `&`).
///
/// Returns the character and the number of bytes consumed.
fn decode_entity(s: &str) -> Option<(char, usize)> {
    let semi = s[1..].find(';')? + 1;
    if semi > MAX_ENTITY_LEN + 1 {
        return None;
    }

    let name = &s[1..semi];
    let ch = match name.strip_prefix('#') {
        Some(number) => parse_numeric_entity(number)?,
        None => named_entity(name)?,
    };
    Some((ch, semi + 1))
}

/// Parse the digits of a numeric reference ("65" or "x41").
fn parse_numeric_entity(number: &str) -> Option<char> {
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse().ok()?,
    };
    char::from_u32(code)
}

fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "hellip" => '\u{2026}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "euro" => '\u{20ac}',
        _ => return None,
    };
    Some(ch)
}
