//! Cache-then-fetch entity resolution.
//!
//! The cache is searched by key, then with the matcher, then by canonical
//! string form. Only a complete miss reaches the fetcher, exactly once, and a
//! failed fetch is a miss. Resolution never errors.

use std::sync::Arc;

use crate::{
    domain::{Category, Entity, Snowflake},
    matcher,
    ports::{EntityCache, EntityFetcher, EntitySource, GuildScope},
};

/// Pairs a cache with the fetcher that backs it.
pub struct CachedSource<C, F> {
    pub cache: C,
    pub fetcher: F,
}

impl<C, F> CachedSource<C, F> {
    pub fn new(cache: C, fetcher: F) -> Self {
        Self { cache, fetcher }
    }
}

impl<C: EntityCache, F: EntityFetcher> EntitySource for CachedSource<C, F> {
    fn cache(&self) -> &dyn EntityCache {
        &self.cache
    }

    fn fetcher(&self) -> &dyn EntityFetcher {
        &self.fetcher
    }
}

/// Search a cache without touching the network.
///
/// The key lookup only takes the canonical decimal form; padded or
/// zero-prefixed IDs fall through to the matcher like any other text.
pub fn find_cached<'c>(cache: &'c dyn EntityCache, id: &str) -> Option<&'c Entity> {
    if let Some(key) = canonical_key(id) {
        if let Some(hit) = cache.get(key) {
            return Some(hit);
        }
    }

    cache
        .values()
        .find(|e| matcher::matches(id, e))
        .or_else(|| cache.values().find(|e| e.to_string() == id))
}

fn canonical_key(id: &str) -> Option<Snowflake> {
    let key = id.parse::<Snowflake>().ok()?;
    (key.to_string() == id).then_some(key)
}

/// Resolve against one source: cache first, then a single fetch.
pub async fn resolve_in(source: &dyn EntitySource, category: Category, id: &str) -> Option<Entity> {
    if let Some(hit) = find_cached(source.cache(), id) {
        tracing::trace!(%category, id, entity = %hit.id, "cache hit");
        return Some(hit.clone());
    }

    match source.fetcher().fetch(id).await {
        Ok(entity) => {
            tracing::debug!(%category, id, entity = %entity.id, "fetched");
            Some(entity)
        }
        Err(e) => {
            tracing::debug!(%category, id, error = %e, "fetch failed; treating as miss");
            None
        }
    }
}

/// Resolver for one entity category.
#[derive(Clone)]
pub struct Resolver {
    category: Category,
    source: Arc<dyn EntitySource>,
}

impl Resolver {
    pub fn new(category: Category, source: Arc<dyn EntitySource>) -> Self {
        Self { category, source }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub async fn resolve(&self, id: &str) -> Option<Entity> {
        resolve_in(&*self.source, self.category, id).await
    }
}

/// Per-category lookups for a bot client.
///
/// Channels and users are global; roles and members need a guild scope and
/// resolve to `None` without any lookup when it is missing.
#[derive(Clone)]
pub struct Resolvers {
    channels: Resolver,
    users: Resolver,
}

impl Resolvers {
    pub fn new(channels: Arc<dyn EntitySource>, users: Arc<dyn EntitySource>) -> Self {
        Self {
            channels: Resolver::new(Category::Channel, channels),
            users: Resolver::new(Category::User, users),
        }
    }

    pub async fn channel(&self, id: &str) -> Option<Entity> {
        self.channels.resolve(id).await
    }

    pub async fn user(&self, id: &str) -> Option<Entity> {
        self.users.resolve(id).await
    }

    pub async fn role(&self, id: &str, guild: Option<&dyn GuildScope>) -> Option<Entity> {
        let guild = guild.or_else(|| missing_scope(Category::Role, id))?;
        resolve_in(guild.roles(), Category::Role, id).await
    }

    pub async fn member(&self, id: &str, guild: Option<&dyn GuildScope>) -> Option<Entity> {
        let guild = guild.or_else(|| missing_scope(Category::Member, id))?;
        resolve_in(guild.members(), Category::Member, id).await
    }

    /// Dispatch on a runtime category.
    pub async fn resolve(
        &self,
        category: Category,
        id: &str,
        guild: Option<&dyn GuildScope>,
    ) -> Option<Entity> {
        match category {
            Category::Channel => self.channel(id).await,
            Category::User => self.user(id).await,
            Category::Role => self.role(id, guild).await,
            Category::Member => self.member(id, guild).await,
            Category::Emoji | Category::Guild => {
                tracing::debug!(%category, id, "no resolver for category");
                None
            }
        }
    }
}

fn missing_scope<'g>(category: Category, id: &str) -> Option<&'g dyn GuildScope> {
    tracing::debug!(%category, id, "lookup requires a guild; none given");
    None
}
