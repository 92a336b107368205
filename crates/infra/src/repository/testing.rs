//! Repository doubles for service tests.

use std::thread;
use std::time::Duration;

use brewery_core::Entity;

use super::{Repository, RepositoryError};

/// Wraps a repository and sleeps before every read, widening the window
/// between a service's read and its write.
pub(crate) struct SlowReads<R> {
    inner: R,
    delay: Duration,
}

impl<R> SlowReads<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            delay: Duration::from_millis(5),
        }
    }
}

impl<E, R> Repository<E> for SlowReads<R>
where
    E: Entity,
    R: Repository<E>,
{
    fn find_by_id(&self, id: &E::Id) -> Option<E> {
        thread::sleep(self.delay);
        self.inner.find_by_id(id)
    }

    fn save(&self, entity: E) -> Result<E, RepositoryError> {
        self.inner.save(entity)
    }

    fn delete(&self, id: &E::Id) -> Result<bool, RepositoryError> {
        self.inner.delete(id)
    }

    fn find_all(&self) -> Vec<E> {
        thread::sleep(self.delay);
        self.inner.find_all()
    }

    fn count(&self) -> u64 {
        self.inner.count()
    }
}
