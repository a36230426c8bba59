//! In-memory entity collection: insertion-ordered, keyed by ID.

use std::collections::HashMap;

use crate::{
    domain::{Entity, Snowflake},
    ports::EntityCache,
};

#[derive(Clone, Debug, Default)]
pub struct Collection {
    entries: Vec<Entity>,
    index: HashMap<Snowflake, usize>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by ID. Replacement keeps the original position.
    pub fn insert(&mut self, entity: Entity) {
        match self.index.get(&entity.id) {
            Some(&pos) => self.entries[pos] = entity,
            None => {
                self.index.insert(entity.id, self.entries.len());
                self.entries.push(entity);
            }
        }
    }
}

impl FromIterator<Entity> for Collection {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut out = Self::new();
        for e in iter {
            out.insert(e);
        }
        out
    }
}

impl EntityCache for Collection {
    fn get(&self, id: Snowflake) -> Option<&Entity> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    fn values(&self) -> Box<dyn Iterator<Item = &Entity> + '_> {
        Box::new(self.entries.iter())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
