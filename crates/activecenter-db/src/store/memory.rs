//! In-memory repository.
//!
//! Not durable: all state is lost on restart. Used for local development,
//! for tests, and whenever `DATABASE_URL` is not configured. Reads share a
//! `tokio::sync::RwLock` read guard; writes are serialised per entity type.
//! The ledger takes the same write guards, so its checks and writes cannot
//! interleave with a plain `save`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockWriteGuard};
use uuid::Uuid;

use super::{Criteria, Entity, Repository, StoreResult, conflict};

/// An entity with the order in which it was first inserted, used to break
/// ties between equal creation timestamps.
#[derive(Debug, Clone)]
struct Slot<E> {
    seq: u64,
    entity: E,
}

#[derive(Debug)]
pub(crate) struct Items<E> {
    next_seq: u64,
    slots: HashMap<Uuid, Slot<E>>,
}

impl<E: Entity> Items<E> {
    pub(crate) fn get(&self, id: &Uuid) -> Option<&E> {
        self.slots.get(id).map(|slot| &slot.entity)
    }

    pub(crate) fn get_mut(&mut self, id: &Uuid) -> Option<&mut E> {
        self.slots.get_mut(id).map(|slot| &mut slot.entity)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &E> {
        self.slots.values().map(|slot| &slot.entity)
    }

    /// Inserts or replaces by id. Key uniqueness is the caller's concern.
    pub(crate) fn put(&mut self, entity: E) {
        let existing_seq = self.slots.get(&entity.id()).map(|slot| slot.seq);
        let seq = match existing_seq {
            Some(seq) => seq,
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };
        self.slots.insert(entity.id(), Slot { seq, entity });
    }
}

#[derive(Debug)]
pub struct InMemoryRepository<E: Entity> {
    items: Arc<RwLock<Items<E>>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Items {
                next_seq: 0,
                slots: HashMap::new(),
            })),
        }
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Items<E>> {
        self.items.write().await
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

fn by_creation<E: Entity>(a: &Slot<E>, b: &Slot<E>) -> std::cmp::Ordering {
    a.entity
        .created_at()
        .cmp(&b.entity.created_at())
        .then_with(|| a.seq.cmp(&b.seq))
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn find(&self, filter: &E::Filter) -> StoreResult<Vec<E>> {
        let items = self.items.read().await;
        let mut found: Vec<&Slot<E>> = items
            .slots
            .values()
            .filter(|slot| slot.entity.matches(filter))
            .collect();
        found.sort_by(|a, b| by_creation(a, b));
        Ok(found.into_iter().map(|slot| slot.entity.clone()).collect())
    }

    async fn find_one(&self, criteria: Criteria<'_>) -> StoreResult<Option<E>> {
        let items = self.items.read().await;
        let found = match criteria {
            Criteria::Id(id) => items.slots.get(&id).map(|slot| slot.entity.clone()),
            Criteria::Key(key) => items
                .slots
                .values()
                .filter(|slot| slot.entity.key() == Some(key))
                .min_by(|a, b| by_creation(a, b))
                .map(|slot| slot.entity.clone()),
        };
        Ok(found)
    }

    async fn save(&self, entity: E) -> StoreResult<E> {
        let mut items = self.items.write().await;
        if E::UNIQUE_KEY {
            if let Some(key) = entity.key() {
                let taken = items.slots.values().any(|other| {
                    other.entity.id() != entity.id() && other.entity.key() == Some(key)
                });
                if taken {
                    return Err(conflict::<E>(key));
                }
            }
        }

        items.put(entity.clone());
        Ok(entity)
    }
}
