//! Goodreads shelf feed
//!
//! Builds the RSS URL for a user's shelf, fetches it, and parses the
//! feed into a [`Shelf`].

use std::collections::HashMap;
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Shelf, ShelfItem};

/// Default Goodreads host
pub const GOODREADS_BASE_URL: &str = "https://www.goodreads.com";

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 30;

/// Errors that can occur while fetching or parsing a shelf feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// The request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Goodreads answered with a non-success status
    #[error("Goodreads returned {status} for {url}. Check the user ID and shelf name.")]
    Status { url: String, status: u16 },

    /// The body is not a usable RSS document
    #[error("Invalid shelf feed: {0}")]
    Parse(String),

    /// The shelf URL could not be built
    #[error("Invalid shelf URL: {0}")]
    InvalidUrl(String),
}

/// Build the RSS URL of a shelf on the default Goodreads host
pub fn shelf_url(user_id: &str, shelf: &str) -> Result<Url, FeedError> {
    shelf_url_with_base(GOODREADS_BASE_URL, user_id, shelf)
}

/// Build the RSS URL of a shelf: `{base}/review/list_rss/{user_id}?shelf={shelf}`
pub fn shelf_url_with_base(base: &str, user_id: &str, shelf: &str) -> Result<Url, FeedError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(FeedError::InvalidUrl("user ID is empty".to_string()));
    }

    let mut url = Url::parse(base).map_err(|e| FeedError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| FeedError::InvalidUrl(format!("cannot use '{}' as a base URL", base)))?
        .pop_if_empty()
        .extend(["review", "list_rss", user_id]);
    url.query_pairs_mut().append_pair("shelf", shelf.trim());

    Ok(url)
}

/// HTTP client for shelf feeds
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a client for the default Goodreads host
    pub fn new() -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent(concat!("readshelf/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: GOODREADS_BASE_URL.to_string(),
        })
    }

    /// Use a different host (mirrors, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch and parse a user's shelf
    pub async fn fetch_shelf(&self, user_id: &str, shelf: &str) -> Result<Shelf, FeedError> {
        let url = shelf_url_with_base(&self.base_url, user_id, shelf)?;
        info!("Fetching shelf feed {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let shelf = parse_shelf(&body)?;
        info!("Feed contains {} item(s)", shelf.items.len());
        Ok(shelf)
    }
}

/// Where the element currently being read sits in the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// A direct child of `<channel>` other than `<item>`
    Channel,
    /// A direct child of `<item>`
    Item,
    /// Anything else (nested elements, images, unknown roots)
    Other,
}

fn slot_of(stack: &[String]) -> Slot {
    match stack {
        [_, channel, field] if channel == "channel" && field != "item" => Slot::Channel,
        [_, channel, item, _] if channel == "channel" && item == "item" => Slot::Item,
        _ => Slot::Other,
    }
}

/// Parse an RSS document into a [`Shelf`]
///
/// Elements are matched by local name, so namespaced extras such as
/// `atom:link` are ignored. Items without a `book_id` are dropped.
pub fn parse_shelf(xml: &str) -> Result<Shelf, FeedError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut channel: HashMap<String, String> = HashMap::new();
    let mut item: Option<HashMap<String, String>> = None;
    let mut items = Vec::new();
    let mut saw_channel = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            FeedError::Parse(format!(
                "XML error at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(name);

                match stack.as_slice() {
                    [_, channel] if channel == "channel" => saw_channel = true,
                    [_, channel, item_tag] if channel == "channel" && item_tag == "item" => {
                        item = Some(HashMap::new());
                    }
                    _ => {}
                }

                if slot_of(&stack) != Slot::Other {
                    text.clear();
                }
            }
            Event::End(_) => {
                match slot_of(&stack) {
                    Slot::Channel => {
                        if let Some(name) = stack.last() {
                            channel.insert(name.clone(), text.trim().to_string());
                        }
                    }
                    Slot::Item => {
                        if let (Some(fields), Some(name)) = (item.as_mut(), stack.last()) {
                            fields.insert(name.clone(), text.trim().to_string());
                        }
                    }
                    Slot::Other => {
                        if let [_, channel, item_tag] = stack.as_slice() {
                            if channel == "channel" && item_tag == "item" {
                                if let Some(fields) = item.take() {
                                    items.push(ShelfItem::from_fields(fields));
                                }
                            }
                        }
                    }
                }
                stack.pop();
            }
            Event::Text(e) => {
                if slot_of(&stack) != Slot::Other {
                    match e.unescape() {
                        Ok(unescaped) => text.push_str(&unescaped),
                        // HTML entities such as &nbsp; are not XML; keep them verbatim
                        Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Event::CData(e) => {
                if slot_of(&stack) != Slot::Other {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_channel {
        return Err(FeedError::Parse(
            "document has no <channel> element".to_string(),
        ));
    }

    let mut take = |name: &str| channel.remove(name).unwrap_or_default();
    let mut shelf = Shelf {
        title: take("title"),
        link: take("link"),
        description: take("description"),
        last_build_date: take("lastBuildDate"),
        items: Vec::with_capacity(items.len()),
    };

    for item in items {
        let book_id = item.book_id.trim();
        if book_id.is_empty() {
            warn!("Skipping feed item without a book_id: {:?}", item.title);
            continue;
        }
        let item = ShelfItem {
            book_id: book_id.to_string(),
            ..item
        };
        debug!("Parsed book {} ({})", item.book_id, item.title);
        shelf.items.push(item);
    }

    Ok(shelf)
}
