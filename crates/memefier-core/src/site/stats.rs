//! Taste statistics over a voter's history: totals, favourite words, busiest
//! weekday and a day-by-day timeline.

use super::votes::VoteValue;
use crate::config::StatsConfig;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// One recorded vote, joined with the caption it was cast on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub caption_id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub vote_value: VoteValue,
    pub created_at: DateTime<Utc>,
}

/// Read a JSON array of vote records from `path`.
pub fn load_votes(path: &Path) -> crate::Result<Vec<VoteRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// A word and how often it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Summary of a voter's taste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteStats {
    pub total_likes: usize,
    pub total_dislikes: usize,
    pub most_active_day: Option<&'static str>,
    pub top_words: Vec<WordCount>,
}

impl TasteStats {
    /// Compute stats from a vote history. Only liked captions feed the word counts.
    pub fn from_votes(votes: &[VoteRecord], config: &StatsConfig) -> Self {
        let total_likes = votes.iter().filter(|v| v.vote_value == VoteValue::Up).count();
        let total_dislikes = votes.len() - total_likes;

        let liked = votes
            .iter()
            .filter(|v| v.vote_value == VoteValue::Up)
            .filter_map(|v| v.content.as_deref());

        Self {
            total_likes,
            total_dislikes,
            most_active_day: most_active_day(votes.iter().map(|v| v.created_at), &timezone(config))
                .map(weekday_name),
            top_words: top_words(liked, config),
        }
    }
}

/// Votes cast on one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    pub date: NaiveDate,
    pub display_date: String,
    pub likes: usize,
    pub dislikes: usize,
    pub items: Vec<VoteRecord>,
}

/// The configured day-bucketing time zone. Unknown names fall back to UTC.
pub fn timezone(config: &StatsConfig) -> Tz {
    config.timezone.parse().unwrap_or(Tz::UTC)
}

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Most frequent words across `contents`.
///
/// Words are lowercased and stripped to `a-z`; short words and stop words are
/// skipped. Ties keep first-seen order.
pub fn top_words<'a, I>(contents: I, config: &StatsConfig) -> Vec<WordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let stop: HashSet<&str> = config.stop_words.iter().map(String::as_str).collect();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<WordCount> = Vec::new();

    for content in contents {
        for raw in content.to_lowercase().split_whitespace() {
            let word: String = raw.chars().filter(|c| c.is_ascii_lowercase()).collect();
            if word.len() < config.min_word_length || stop.contains(word.as_str()) {
                continue;
            }
            match index.get(&word) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(word.clone(), counts.len());
                    counts.push(WordCount { word, count: 1 });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(config.top_words);
    counts
}

/// Weekday with the most timestamps in local time of `tz`.
///
/// Ties go to the earliest day counting from Sunday. `None` for no timestamps.
pub fn most_active_day<I, Z>(timestamps: I, tz: &Z) -> Option<Weekday>
where
    I: IntoIterator<Item = DateTime<Utc>>,
    Z: TimeZone,
{
    let mut counts = [0usize; 7];
    for ts in timestamps {
        let day = ts.with_timezone(tz).weekday();
        counts[day.num_days_from_sunday() as usize] += 1;
    }

    let max = *counts.iter().max()?;
    if max == 0 {
        return None;
    }
    let idx = counts.iter().position(|&c| c == max)?;
    Some(SUNDAY_FIRST[idx])
}

const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Group a newest-first vote history into local calendar days.
///
/// Only the first (newest) vote per caption is kept, and votes whose caption
/// has no image are dropped. Groups come back newest day first.
pub fn group_by_day<Z: TimeZone>(votes: &[VoteRecord], tz: &Z) -> Vec<DayGroup> {
    let mut seen = HashSet::new();
    let mut groups: BTreeMap<NaiveDate, Vec<VoteRecord>> = BTreeMap::new();

    for vote in votes {
        if !seen.insert(vote.caption_id.as_str()) {
            continue;
        }
        if vote.image_url.as_deref().unwrap_or_default().is_empty() {
            continue;
        }
        let date = vote.created_at.with_timezone(tz).date_naive();
        groups.entry(date).or_default().push(vote.clone());
    }

    groups
        .into_iter()
        .rev()
        .map(|(date, items)| {
            let likes = items.iter().filter(|v| v.vote_value == VoteValue::Up).count();
            DayGroup {
                date,
                display_date: date.format("%A, %B %-d, %Y").to_string(),
                likes,
                dislikes: items.len() - likes,
                items,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn vote(id: &str, content: &str, value: VoteValue, ts: &str) -> VoteRecord {
        VoteRecord {
            caption_id: id.into(),
            content: Some(content.into()),
            image_url: Some(format!("https://cdn/{id}.png")),
            vote_value: value,
            created_at: at(ts),
        }
    }

    fn new_york() -> Tz {
        chrono_tz::America::New_York
    }

    #[test]
    fn test_top_words_filters_and_counts() {
        let config = StatsConfig::default();
        let contents = [
            "When the CODE finally compiles!",
            "This code is cursed, with cursed bugs",
            "what a day: code code",
        ];
        let words = top_words(contents, &config);
        assert_eq!(words[0], WordCount { word: "code".into(), count: 4 });
        assert_eq!(words[1], WordCount { word: "cursed".into(), count: 2 });
        // "this", "with", "what" are stop words; "the", "a", "is" are too short.
        assert!(words.iter().all(|w| !["this", "with", "what", "the"].contains(&w.word.as_str())));
        assert!(words.len() <= config.top_words);
    }

    #[test]
    fn test_top_words_ties_keep_first_seen_order() {
        let config = StatsConfig::default();
        let words = top_words(["zebra apple", "apple zebra mango"], &config);
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_top_words_strips_punctuation_and_digits() {
        let config = StatsConfig::default();
        let words = top_words(["memes!!! m3m3s memes, memes"], &config);
        assert_eq!(words, vec![WordCount { word: "memes".into(), count: 3 }]);
    }

    #[test]
    fn test_most_active_day_uses_timezone() {
        // 03:00 UTC Monday is still Sunday evening in New York.
        let ts = vec![at("2026-01-05T03:00:00Z"), at("2026-01-05T04:00:00Z")];
        assert_eq!(most_active_day(ts.clone(), &new_york()), Some(Weekday::Sun));
        assert_eq!(most_active_day(ts, &Utc), Some(Weekday::Mon));
    }

    #[test]
    fn test_most_active_day_tie_prefers_earliest() {
        // Tuesday and Monday once each: Monday wins.
        let ts = vec![at("2026-01-06T15:00:00Z"), at("2026-01-05T15:00:00Z")];
        assert_eq!(most_active_day(ts, &Utc), Some(Weekday::Mon));
    }

    #[test]
    fn test_most_active_day_empty() {
        assert_eq!(most_active_day(Vec::new(), &Utc), None);
    }

    #[test]
    fn test_taste_stats() {
        let votes = vec![
            vote("c1", "cursed code again", VoteValue::Up, "2026-01-07T15:00:00Z"),
            vote("c2", "boring boring boring", VoteValue::Down, "2026-01-07T16:00:00Z"),
            vote("c3", "more cursed memes", VoteValue::Up, "2026-01-06T15:00:00Z"),
        ];
        let stats = TasteStats::from_votes(&votes, &StatsConfig::default());
        assert_eq!(stats.total_likes, 2);
        assert_eq!(stats.total_dislikes, 1);
        assert_eq!(stats.most_active_day, Some("Wednesday"));
        assert_eq!(stats.top_words[0], WordCount { word: "cursed".into(), count: 2 });
        assert!(stats.top_words.iter().all(|w| w.word != "boring"));
    }

    #[test]
    fn test_taste_stats_empty() {
        let stats = TasteStats::from_votes(&[], &StatsConfig::default());
        assert_eq!(stats.total_likes, 0);
        assert_eq!(stats.most_active_day, None);
        assert!(stats.top_words.is_empty());
    }

    #[test]
    fn test_group_by_day() {
        let mut no_image = vote("c4", "x", VoteValue::Up, "2026-01-06T12:00:00Z");
        no_image.image_url = None;
        let votes = vec![
            vote("c1", "a", VoteValue::Up, "2026-01-07T15:00:00Z"),
            vote("c2", "b", VoteValue::Down, "2026-01-07T14:00:00Z"),
            // Older vote on c1 is ignored.
            vote("c1", "a", VoteValue::Down, "2026-01-06T15:00:00Z"),
            no_image,
            // Late evening in New York, early next day in UTC.
            vote("c3", "c", VoteValue::Up, "2026-01-06T02:00:00Z"),
        ];

        let groups = group_by_day(&votes, &new_york());
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
        assert_eq!(groups[0].display_date, "Wednesday, January 7, 2026");
        assert_eq!(groups[0].likes, 1);
        assert_eq!(groups[0].dislikes, 1);
        assert_eq!(groups[0].items.len(), 2);

        assert_eq!(groups[1].date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(groups[1].items[0].caption_id, "c3");
    }

    #[test]
    fn test_vote_record_json() {
        let record: VoteRecord = serde_json::from_str(
            r#"{"captionId":"c1","content":"hi","voteValue":-1,"createdAt":"2026-01-05T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.vote_value, VoteValue::Down);
        assert!(record.image_url.is_none());
        assert_eq!(record.created_at, Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_load_votes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        std::fs::write(
            &path,
            r#"[{"captionId":"c1","voteValue":1,"createdAt":"2026-01-05T10:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(load_votes(&path).unwrap()[0].caption_id, "c1");

        std::fs::write(&path, r#"[{"captionId":"c1","voteValue":0}]"#).unwrap();
        assert!(matches!(load_votes(&path), Err(crate::MemefierError::Json(_))));

        let missing = dir.path().join("nope.json");
        assert!(matches!(load_votes(&missing), Err(crate::MemefierError::Io(_))));
    }

    #[test]
    fn test_timezone_from_config() {
        let mut config = StatsConfig::default();
        assert_eq!(timezone(&config), chrono_tz::America::New_York);

        config.timezone = "Not/AZone".into();
        assert_eq!(timezone(&config), Tz::UTC);
    }

    #[test]
    fn test_daylight_saving_shifts_day_boundary() {
        let tz = timezone(&StatsConfig::default());

        // 00:30 EDT on Monday 6 July; a fixed UTC-5 would say Sunday 23:30.
        let summer = vote("c1", "x", VoteValue::Up, "2026-07-06T04:30:00Z");
        assert_eq!(most_active_day([summer.created_at], &tz), Some(Weekday::Mon));
        let groups = group_by_day(std::slice::from_ref(&summer), &tz);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2026, 7, 6).unwrap());
        assert_eq!(groups[0].display_date, "Monday, July 6, 2026");

        // The same UTC time in January is 23:30 EST on Sunday.
        let winter = vote("c2", "x", VoteValue::Up, "2026-01-05T04:30:00Z");
        assert_eq!(most_active_day([winter.created_at], &tz), Some(Weekday::Sun));
        let groups = group_by_day(std::slice::from_ref(&winter), &tz);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
    }
}
