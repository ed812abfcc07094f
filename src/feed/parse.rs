// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};

use crate::error::FeedError;

/// A fetched and parsed show feed
#[derive(Debug, Clone)]
pub struct Feed {
    /// Channel author, used when tagging downloaded audio; empty when the
    /// feed does not declare one
    pub author: String,
    /// Entries in feed order (newest first, per RSS convention)
    pub episodes: Vec<Episode>,
}

/// A single feed entry.
///
/// Every field defaults to empty when the feed item omits it, so downstream
/// code never has to probe for presence.
#[derive(Debug, Clone, Default)]
pub struct Episode {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub content_html: String,
    pub episode_number: String,
    /// Enclosure URL; empty when the entry has nothing to fetch
    pub enclosure_url: String,
    pub published_at: Option<DateTime<FixedOffset>>,
}

/// Parse RSS feed XML bytes into a Feed
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Feed, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    let author = channel
        .itunes_ext()
        .and_then(|ext| ext.author().map(String::from))
        .or_else(|| channel.managing_editor().map(String::from))
        .unwrap_or_default();

    let episodes = channel.items().iter().map(parse_episode).collect();

    Ok(Feed { author, episodes })
}

fn parse_episode(item: &rss::Item) -> Episode {
    let published_at = item.pub_date().and_then(|date_str| {
        DateTime::parse_from_rfc2822(date_str)
            .or_else(|_| parse_relaxed_date(date_str))
            .ok()
    });

    Episode {
        guid: item
            .guid()
            .map(|g| g.value().to_string())
            .unwrap_or_default(),
        title: item.title().unwrap_or_default().to_string(),
        link: item.link().unwrap_or_default().to_string(),
        description: item.description().unwrap_or_default().to_string(),
        content_html: item.content().unwrap_or_default().to_string(),
        episode_number: item
            .itunes_ext()
            .and_then(|ext| ext.episode().map(String::from))
            .unwrap_or_default(),
        enclosure_url: item
            .enclosure()
            .map(|e| e.url().to_string())
            .unwrap_or_default(),
        published_at,
    }
}

/// Try to parse dates that don't strictly conform to RFC 2822
fn parse_relaxed_date(date_str: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let formats = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
    ];

    for format in formats {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Ok(dt);
        }
    }

    Err(chrono::DateTime::parse_from_rfc2822("invalid").unwrap_err())
}
