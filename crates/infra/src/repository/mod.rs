//! Entity repositories (the service layer's storage seam).

pub mod in_memory;
#[cfg(test)]
pub(crate) mod testing;

pub use in_memory::InMemoryRepository;

use std::sync::Arc;

use thiserror::Error;

use brewery_core::Entity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("repository lock poisoned")]
    Poisoned,
}

/// Keyed entity storage.
///
/// `find_all` returns records in insertion order so paged listings stay stable
/// between requests.
pub trait Repository<E: Entity>: Send + Sync {
    fn find_by_id(&self, id: &E::Id) -> Option<E>;
    /// Insert or replace by id. Replacing keeps the original insertion position.
    fn save(&self, entity: E) -> Result<E, RepositoryError>;
    /// Returns `true` when a record was removed.
    fn delete(&self, id: &E::Id) -> Result<bool, RepositoryError>;
    fn find_all(&self) -> Vec<E>;
    fn count(&self) -> u64;
}

impl<E, R> Repository<E> for Arc<R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    fn find_by_id(&self, id: &E::Id) -> Option<E> {
        (**self).find_by_id(id)
    }

    fn save(&self, entity: E) -> Result<E, RepositoryError> {
        (**self).save(entity)
    }

    fn delete(&self, id: &E::Id) -> Result<bool, RepositoryError> {
        (**self).delete(id)
    }

    fn find_all(&self) -> Vec<E> {
        (**self).find_all()
    }

    fn count(&self) -> u64 {
        (**self).count()
    }
}
