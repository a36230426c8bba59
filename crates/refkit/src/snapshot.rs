//! Gateway cache snapshot loaded from JSON.
//!
//! Records marked `"cached": false` are left out of the cache and only
//! reachable through the fetcher, which stands in for the REST API.

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use refkit_core::{
    cache::Collection,
    domain::{Category, Entity, Snowflake},
    errors::Error,
    ports::{EntityCache, EntityFetcher, EntitySource, GuildScope},
    resolver::{CachedSource, Resolvers},
    Result,
};

type SnapshotSource = CachedSource<Collection, SnapshotFetcher>;

#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    channels: Vec<Value>,
    #[serde(default)]
    users: Vec<Value>,
    #[serde(default)]
    guilds: Vec<GuildFile>,
}

#[derive(Debug, Deserialize)]
struct GuildFile {
    id: Snowflake,
    name: String,
    #[serde(default)]
    roles: Vec<Value>,
    #[serde(default)]
    members: Vec<Value>,
}

/// Fetch-by-ID over the uncached records of one category.
pub struct SnapshotFetcher {
    category: Category,
    remote: Collection,
}

#[async_trait]
impl EntityFetcher for SnapshotFetcher {
    async fn fetch(&self, id: &str) -> Result<Entity> {
        let key: Snowflake = id.parse()?;
        self.remote
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("unknown {} {id}", self.category)))
    }
}

pub struct SnapshotGuild {
    id: Snowflake,
    name: String,
    roles: SnapshotSource,
    members: SnapshotSource,
}

impl SnapshotGuild {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl GuildScope for SnapshotGuild {
    fn id(&self) -> Snowflake {
        self.id
    }

    fn roles(&self) -> &dyn EntitySource {
        &self.roles
    }

    fn members(&self) -> &dyn EntitySource {
        &self.members
    }
}

pub struct Snapshot {
    channels: Arc<SnapshotSource>,
    users: Arc<SnapshotSource>,
    guilds: Vec<SnapshotGuild>,
}

impl Snapshot {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(raw)?;

        let mut guilds = Vec::with_capacity(file.guilds.len());
        for g in file.guilds {
            guilds.push(SnapshotGuild {
                id: g.id,
                name: g.name,
                roles: source(Category::Role, g.roles)?,
                members: source(Category::Member, g.members)?,
            });
        }

        Ok(Self {
            channels: Arc::new(source(Category::Channel, file.channels)?),
            users: Arc::new(source(Category::User, file.users)?),
            guilds,
        })
    }

    pub fn resolvers(&self) -> Resolvers {
        Resolvers::new(self.channels.clone(), self.users.clone())
    }

    /// Guilds are looked up by ID only.
    pub fn guild(&self, id: Snowflake) -> Option<&SnapshotGuild> {
        self.guilds.iter().find(|g| g.id == id)
    }

    /// Display names currently cached for a category.
    pub fn cached_names(&self, category: Category, guild: Option<&SnapshotGuild>) -> Vec<String> {
        let cache: Option<&dyn EntityCache> = match category {
            Category::Channel => Some(&self.channels.cache),
            Category::User => Some(&self.users.cache),
            Category::Role => guild.map(|g| &g.roles.cache as &dyn EntityCache),
            Category::Member => guild.map(|g| &g.members.cache as &dyn EntityCache),
            Category::Emoji | Category::Guild => None,
        };

        cache
            .map(|c| {
                c.values()
                    .filter_map(|e| e.display_name().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn source(category: Category, records: Vec<Value>) -> Result<SnapshotSource> {
    let mut cached = Collection::new();
    let mut remote = Collection::new();

    for mut record in records {
        let is_cached = record
            .as_object_mut()
            .and_then(|obj| obj.remove("cached"))
            .and_then(|v| v.as_bool())
            .unwrap_or(true);

        let entity: Entity = serde_json::from_value(record)?;
        if entity.category() != category {
            return Err(Error::Config(format!(
                "snapshot: {} {} listed under {category}s",
                entity.category(),
                entity.id
            )));
        }

        if is_cached {
            cached.insert(entity);
        } else {
            remote.insert(entity);
        }
    }

    Ok(CachedSource::new(cached, SnapshotFetcher { category, remote }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
      "channels": [
        {"id": "100000000000000001", "kind": "channel", "channel": "text", "name": "general"},
        {"id": "100000000000000002", "kind": "channel", "channel": "voice", "name": "Music", "cached": false}
      ],
      "users": [
        {"id": "200000000000000001", "kind": "user", "name": "alice#0001"}
      ],
      "guilds": [
        {
          "id": "300000000000000001",
          "name": "Home",
          "roles": [{"id": "400000000000000001", "kind": "role", "name": "Moderator"}],
          "members": [{"id": "200000000000000001", "kind": "member", "name": "alice#0001"}]
        }
      ]
    }"#;

    #[tokio::test]
    async fn resolves_cached_and_fetched_entries() {
        let snap = Snapshot::parse(SNAPSHOT).unwrap();
        let resolvers = snap.resolvers();

        let general = resolvers.channel("gen").await.unwrap();
        assert_eq!(general.id, Snowflake(100000000000000001));

        // Not cached, so only the raw ID reaches it.
        assert!(resolvers.channel("music").await.is_none());
        let music = resolvers.channel("100000000000000002").await.unwrap();
        assert_eq!(music.display_name(), Some("Music"));
    }

    #[tokio::test]
    async fn guild_scope_by_id_only() {
        let snap = Snapshot::parse(SNAPSHOT).unwrap();
        assert!(snap.guild(Snowflake(300000000000000002)).is_none());

        let guild = snap.guild(Snowflake(300000000000000001)).unwrap();
        assert_eq!(guild.name(), "Home");

        let scope: &dyn GuildScope = guild;
        let role = snap.resolvers().role("MOD", Some(scope)).await.unwrap();
        assert_eq!(role.id, Snowflake(400000000000000001));
        assert_eq!(
            snap.cached_names(Category::Member, Some(guild)),
            vec!["alice#0001"]
        );
    }

    #[test]
    fn rejects_miscategorised_records() {
        let raw = r#"{"users": [{"id": "1", "kind": "role", "name": "x"}]}"#;
        assert!(matches!(Snapshot::parse(raw), Err(Error::Config(_))));
    }
}
