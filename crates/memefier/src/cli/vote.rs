//! The `memefier vote` command.

use clap::Args;
use memefier_core::site::{resolve_vote, VoteAction, VoteValue};

/// Arguments for the `vote` command.
#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Vote already stored for the caption, if any
    #[arg(long, allow_hyphen_values = true, value_parser = parse_vote)]
    pub existing: Option<VoteValue>,

    /// Vote being cast
    #[arg(long, allow_hyphen_values = true, value_parser = parse_vote)]
    pub new: VoteValue,
}

fn parse_vote(raw: &str) -> Result<VoteValue, String> {
    let value: i64 = raw.trim().parse().map_err(|_| format!("not a number: {raw}"))?;
    VoteValue::try_from(value).map_err(|e| e.to_string())
}

/// Execute the vote command.
pub fn execute(args: VoteArgs) -> anyhow::Result<()> {
    let action = resolve_vote(args.existing, args.new);
    tracing::debug!(?action, "resolved vote");
    println!("{}", action_name(action));
    Ok(())
}

fn action_name(action: VoteAction) -> &'static str {
    match action {
        VoteAction::Create => "created",
        VoteAction::Update => "updated",
        VoteAction::Remove => "removed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vote() {
        assert_eq!(parse_vote("1").unwrap(), VoteValue::Up);
        assert_eq!(parse_vote("-1").unwrap(), VoteValue::Down);
        assert!(parse_vote("0").unwrap_err().contains("got 0"));
        assert!(parse_vote("up").unwrap_err().contains("not a number"));
    }

    #[test]
    fn test_action_name_matches_serde() {
        for action in [VoteAction::Create, VoteAction::Update, VoteAction::Remove] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action_name(action)));
        }
    }
}
