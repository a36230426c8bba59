use async_trait::async_trait;

use crate::{
    domain::{Entity, Snowflake},
    Result,
};

/// Read-only view of a gateway-owned entity cache.
///
/// Implementations must iterate in a stable order; resolution returns the
/// first matching entry.
pub trait EntityCache: Send + Sync {
    fn get(&self, id: Snowflake) -> Option<&Entity>;

    fn values(&self) -> Box<dyn Iterator<Item = &Entity> + '_>;

    fn len(&self) -> usize {
        self.values().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Network lookup of a single entity by raw ID.
///
/// Any error (transport failure, unknown entity, malformed ID) is treated by
/// the resolver as a miss.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Entity>;
}

/// Cache plus fetcher for one category within one scope.
pub trait EntitySource: Send + Sync {
    fn cache(&self) -> &dyn EntityCache;
    fn fetcher(&self) -> &dyn EntityFetcher;
}

/// A guild as seen by the resolver: the scope for role and member lookups.
pub trait GuildScope: Send + Sync {
    fn id(&self) -> Snowflake;
    fn roles(&self) -> &dyn EntitySource;
    fn members(&self) -> &dyn EntitySource;
}
