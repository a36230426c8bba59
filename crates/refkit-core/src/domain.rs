use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Discord-style numeric ID. Serialized as a string, like the gateway does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Snowflake(pub u64);

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidId(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(Snowflake)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }
}

impl TryFrom<String> for Snowflake {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Snowflake> for String {
    fn from(id: Snowflake) -> Self {
        id.to_string()
    }
}

/// Channel flavours. Only `Dm` and `GroupDm` are private.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
    Thread,
    Category,
    News,
    Stage,
    Dm,
    GroupDm,
}

impl ChannelKind {
    pub fn is_private(self) -> bool {
        matches!(self, Self::Dm | Self::GroupDm)
    }
}

/// Category tag carried by every entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    Channel {
        #[serde(default)]
        channel: ChannelKind,
    },
    Role,
    Member,
    User,
    Emoji {
        #[serde(default)]
        animated: bool,
    },
    Guild,
}

impl EntityKind {
    pub fn category(self) -> Category {
        match self {
            Self::Channel { .. } => Category::Channel,
            Self::Role => Category::Role,
            Self::Member => Category::Member,
            Self::User => Category::User,
            Self::Emoji { .. } => Category::Emoji,
            Self::Guild => Category::Guild,
        }
    }
}

/// Coarse entity category; one resolver exists per category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Channel,
    Role,
    Member,
    User,
    Emoji,
    Guild,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Role => "role",
            Self::Member => "member",
            Self::User => "user",
            Self::Emoji => "emoji",
            Self::Guild => "guild",
        }
    }

    /// Roles and members only exist inside a guild.
    pub fn requires_guild(self) -> bool {
        matches!(self, Self::Role | Self::Member)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "channel" => Ok(Self::Channel),
            "role" => Ok(Self::Role),
            "member" => Ok(Self::Member),
            "user" => Ok(Self::User),
            "emoji" => Ok(Self::Emoji),
            "guild" => Ok(Self::Guild),
            other => Err(Error::Config(format!("unknown category: {other}"))),
        }
    }
}

/// Read-only view of an externally owned entity.
///
/// `name` holds the display name: the tag for users and members, the plain
/// name for everything else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Snowflake,
    #[serde(flatten)]
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Entity {
    pub fn new(id: Snowflake, kind: EntityKind, name: Option<String>) -> Self {
        Self { id, kind, name }
    }

    pub fn channel(id: u64, channel: ChannelKind, name: &str) -> Self {
        Self::new(
            Snowflake(id),
            EntityKind::Channel { channel },
            Some(name.to_string()),
        )
    }

    pub fn role(id: u64, name: &str) -> Self {
        Self::new(Snowflake(id), EntityKind::Role, Some(name.to_string()))
    }

    pub fn user(id: u64, username: &str, discriminator: Option<&str>) -> Self {
        Self::new(
            Snowflake(id),
            EntityKind::User,
            Some(user_tag(username, discriminator)),
        )
    }

    pub fn member(id: u64, username: &str, discriminator: Option<&str>) -> Self {
        Self::new(
            Snowflake(id),
            EntityKind::Member,
            Some(user_tag(username, discriminator)),
        )
    }

    pub fn emoji(id: u64, name: &str, animated: bool) -> Self {
        Self::new(
            Snowflake(id),
            EntityKind::Emoji { animated },
            Some(name.to_string()),
        )
    }

    pub fn guild(id: u64, name: &str) -> Self {
        Self::new(Snowflake(id), EntityKind::Guild, Some(name.to_string()))
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn is_private_channel(&self) -> bool {
        matches!(self.kind, EntityKind::Channel { channel } if channel.is_private())
    }

    /// Display name used for name matching, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Canonical string form: the mention token for mentionable categories, the
/// bare ID for guilds.
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntityKind::Channel { .. } => write!(f, "<#{}>", self.id),
            EntityKind::Role => write!(f, "<@&{}>", self.id),
            EntityKind::Member | EntityKind::User => write!(f, "<@{}>", self.id),
            EntityKind::Emoji { animated } => {
                let prefix = if animated { "a" } else { "" };
                let name = self.name.as_deref().unwrap_or("_");
                write!(f, "<{prefix}:{name}:{}>", self.id)
            }
            EntityKind::Guild => write!(f, "{}", self.id),
        }
    }
}

/// `name#discriminator`, or just `name` for accounts without a legacy
/// discriminator.
pub fn user_tag(username: &str, discriminator: Option<&str>) -> String {
    match discriminator.map(str::trim) {
        Some(d) if !d.is_empty() && d != "0" => format!("{username}#{d}"),
        _ => username.to_string(),
    }
}
