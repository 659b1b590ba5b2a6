//! Site logic that does not depend on the data store: vote toggling, caption
//! feeds and taste statistics.

pub mod feed;
pub mod stats;
pub mod votes;

pub use feed::{assemble_voting_feed, top_rated, CaptionForVoting, CaptionRow, ImageRow, Meme};
pub use stats::{
    group_by_day, load_votes, most_active_day, top_words, DayGroup, TasteStats, VoteRecord,
};
pub use votes::{resolve_vote, InvalidVote, VoteAction, VoteValue};
