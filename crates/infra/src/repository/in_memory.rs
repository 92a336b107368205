use std::collections::HashMap;
use std::sync::RwLock;

use brewery_core::Entity;

use super::{Repository, RepositoryError};

#[derive(Debug)]
struct Slot<E> {
    seq: u64,
    entity: E,
}

#[derive(Debug)]
struct Inner<E: Entity> {
    next_seq: u64,
    records: HashMap<E::Id, Slot<E>>,
}

/// In-memory repository for dev/tests.
///
/// A poisoned lock degrades to "empty" reads. Writes on a poisoned lock fail
/// with [`RepositoryError::Poisoned`].
#[derive(Debug)]
pub struct InMemoryRepository<E: Entity> {
    inner: RwLock<Inner<E>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_seq: 0,
                records: HashMap::new(),
            }),
        }
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Entity + Clone + Send + Sync + 'static,
    E::Id: Send + Sync + 'static,
{
    fn find_by_id(&self, id: &E::Id) -> Option<E> {
        let inner = self.inner.read().ok()?;
        inner.records.get(id).map(|slot| slot.entity.clone())
    }

    fn save(&self, entity: E) -> Result<E, RepositoryError> {
        let mut inner = self.inner.write().map_err(|_| {
            tracing::error!("repository lock poisoned; save rejected");
            RepositoryError::Poisoned
        })?;

        let id = entity.id().clone();
        let existing_seq = inner.records.get(&id).map(|slot| slot.seq);
        let seq = match existing_seq {
            Some(seq) => seq,
            None => {
                inner.next_seq += 1;
                inner.next_seq
            }
        };
        inner.records.insert(
            id,
            Slot {
                seq,
                entity: entity.clone(),
            },
        );
        Ok(entity)
    }

    fn delete(&self, id: &E::Id) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().map_err(|_| {
            tracing::error!("repository lock poisoned; delete rejected");
            RepositoryError::Poisoned
        })?;
        Ok(inner.records.remove(id).is_some())
    }

    fn find_all(&self) -> Vec<E> {
        let inner = match self.inner.read() {
            Ok(i) => i,
            Err(_) => return vec![],
        };

        let mut slots: Vec<&Slot<E>> = inner.records.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| slot.entity.clone()).collect()
    }

    fn count(&self) -> u64 {
        self.inner
            .read()
            .map(|inner| inner.records.len() as u64)
            .unwrap_or(0)
    }
}
