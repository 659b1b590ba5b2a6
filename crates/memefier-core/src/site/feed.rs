//! Caption feeds built from caption and image rows.
//!
//! Rows come from the data store as-is; these functions only join, filter
//! and order them.

use super::votes::VoteValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default size of the top-rated list.
pub const TOP_RATED_LIMIT: usize = 10;

/// A row of the captions table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionRow {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub created_datetime_utc: Option<DateTime<Utc>>,
}

/// A row of the images table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRow {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A caption offered for voting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionForVoting {
    pub id: String,
    pub content: String,
    pub image_url: String,
    pub image_id: String,
    pub user_vote: Option<VoteValue>,
}

/// A top-rated caption with its image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meme {
    pub id: String,
    pub title: String,
    pub image: String,
    pub score: i64,
    pub created_at: Option<DateTime<Utc>>,
}

fn image_urls(images: &[ImageRow]) -> HashMap<&str, &str> {
    images
        .iter()
        .filter_map(|img| match img.url.as_deref() {
            Some(url) if !img.id.is_empty() && !url.is_empty() => Some((img.id.as_str(), url)),
            _ => None,
        })
        .collect()
}

/// Captions the user has not voted on yet, each joined to its image URL.
///
/// Entries with empty content or no resolvable image are dropped. Input order
/// is preserved.
pub fn assemble_voting_feed(
    captions: &[CaptionRow],
    images: &[ImageRow],
    voted_caption_ids: &HashSet<String>,
) -> Vec<CaptionForVoting> {
    let urls = image_urls(images);
    captions
        .iter()
        .filter(|c| !voted_caption_ids.contains(&c.id))
        .filter_map(|c| {
            let content = c.content.as_deref().unwrap_or_default();
            let image_id = c.image_id.as_deref()?;
            let image_url = urls.get(image_id)?;
            if content.is_empty() {
                return None;
            }
            Some(CaptionForVoting {
                id: c.id.clone(),
                content: content.to_string(),
                image_url: image_url.to_string(),
                image_id: image_id.to_string(),
                user_vote: None,
            })
        })
        .collect()
}

/// The `limit` most-liked captions that have an image.
pub fn top_rated(captions: &[CaptionRow], images: &[ImageRow], limit: usize) -> Vec<Meme> {
    let urls = image_urls(images);
    let mut ranked: Vec<&CaptionRow> = captions.iter().collect();
    ranked.sort_by(|a, b| b.like_count.cmp(&a.like_count));

    ranked
        .into_iter()
        .filter_map(|c| {
            let image = urls.get(c.image_id.as_deref()?)?;
            Some(Meme {
                id: c.id.clone(),
                title: c.content.clone().unwrap_or_default(),
                image: image.to_string(),
                score: c.like_count,
                created_at: c.created_datetime_utc,
            })
        })
        .take(limit)
        .collect()
}
