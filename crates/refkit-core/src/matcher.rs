//! Identifier-vs-entity matching.
//!
//! Strategies, first hit wins:
//! - exact ID
//! - mention token for the candidate's category
//! - exact display name (case-folded)
//! - display-name substring (case-folded)
//!
//! Guilds only take the ID path; private channels skip the name paths.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{Entity, EntityKind, Snowflake};

static EMOJI_MENTION: OnceLock<Regex> = OnceLock::new();
static CHANNEL_MENTION: OnceLock<Regex> = OnceLock::new();
static USER_MENTION: OnceLock<Regex> = OnceLock::new();
static ROLE_MENTION: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex"))
}

/// Mention pattern for a category; `None` for guilds.
pub fn mention_pattern(kind: EntityKind) -> Option<&'static Regex> {
    match kind {
        EntityKind::Emoji { .. } => Some(compiled(
            &EMOJI_MENTION,
            r"<a?:[a-zA-Z0-9_]+:(\d{17,19})>",
        )),
        EntityKind::Channel { .. } => Some(compiled(&CHANNEL_MENTION, r"<#(\d{17,19})>")),
        EntityKind::User | EntityKind::Member => {
            Some(compiled(&USER_MENTION, r"<@!?(\d{17,19})>"))
        }
        EntityKind::Role => Some(compiled(&ROLE_MENTION, r"<@&(\d{17,19})>")),
        EntityKind::Guild => None,
    }
}

/// Decode the ID carried by a mention token of the given category.
pub fn decode_mention(identifier: &str, kind: EntityKind) -> Option<Snowflake> {
    let caps = mention_pattern(kind)?.captures(identifier)?;
    caps.get(1)?.as_str().parse().ok()
}

pub fn matches(identifier: &str, candidate: &Entity) -> bool {
    if identifier == candidate.id.to_string() {
        return true;
    }

    if matches!(candidate.kind, EntityKind::Guild) {
        return false;
    }

    if decode_mention(identifier, candidate.kind) == Some(candidate.id) {
        return true;
    }

    if candidate.is_private_channel() {
        return false;
    }

    name_matches(identifier, candidate.display_name())
}

fn name_matches(identifier: &str, display_name: Option<&str>) -> bool {
    let Some(name) = display_name.map(str::to_lowercase).filter(|n| !n.is_empty()) else {
        return false;
    };

    // An empty needle is a substring of everything.
    if identifier.trim().is_empty() {
        return false;
    }

    let needle = identifier.to_lowercase();
    name == needle || name.contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChannelKind;

    const ID: u64 = 222222222222222222;

    #[test]
    fn matches_raw_id() {
        assert!(matches("222222222222222222", &Entity::role(ID, "Mods")));
        assert!(matches("222222222222222222", &Entity::guild(ID, "Home")));
    }

    #[test]
    fn mention_pattern_depends_on_category() {
        let role = Entity::role(ID, "x");
        let user = Entity::user(ID, "x", None);
        let chan = Entity::channel(ID, ChannelKind::Voice, "x");
        let emoji = Entity::emoji(ID, "x", false);

        assert!(matches("<@&222222222222222222>", &role));
        assert!(!matches("<@&222222222222222222>", &user));
        assert!(matches("<@222222222222222222>", &user));
        assert!(matches("<@!222222222222222222>", &user));
        assert!(matches("<#222222222222222222>", &chan));
        assert!(!matches("<#222222222222222222>", &role));
        assert!(matches("<a:dance:222222222222222222>", &emoji));
        assert!(matches("<:dance:222222222222222222>", &emoji));
    }

    #[test]
    fn mention_must_carry_candidate_id() {
        let user = Entity::user(ID, "x", None);
        assert!(!matches("<@333333333333333333>", &user));
        // Too short to be a snowflake.
        assert!(decode_mention("<@1234>", EntityKind::User).is_none());
    }

    #[test]
    fn names_are_case_folded() {
        let role = Entity::role(ID, "Moderator");
        assert!(matches("moderator", &role));
        assert!(matches("MODERATOR", &role));
        assert!(matches("mod", &role));
        assert!(!matches("admin", &role));
    }

    #[test]
    fn user_and_member_match_on_tag() {
        let user = Entity::user(ID, "alice", Some("0420"));
        assert!(matches("alice#0420", &user));
        assert!(matches("#04", &user));

        let member = Entity::member(ID, "bob", None);
        assert!(matches("Bob", &member));
    }

    #[test]
    fn empty_identifier_never_matches_by_name() {
        assert!(!matches("", &Entity::role(ID, "Moderator")));
        assert!(!matches("   ", &Entity::role(ID, "Moderator")));
        assert!(!matches("", &Entity::new(Snowflake(ID), EntityKind::Role, None)));
    }

    #[test]
    fn private_channels_skip_names() {
        let dm = Entity::channel(ID, ChannelKind::Dm, "alice");
        assert!(!matches("alice", &dm));
        assert!(matches("<#222222222222222222>", &dm));
    }

    #[test]
    fn guilds_ignore_names() {
        assert!(!matches("home", &Entity::guild(ID, "Home")));
    }
}
