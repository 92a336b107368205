use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::info;

use brewery_beers::{Beer, BeerDraft, BeerFilter};
use brewery_core::{BeerId, DomainError, PageRequest, PagedList};

use crate::repository::Repository;
use crate::services::{ServiceError, ServiceResult};

/// Beer catalog operations.
pub trait BeerService: Send + Sync {
    fn list_beers(
        &self,
        filter: &BeerFilter,
        page: PageRequest,
    ) -> ServiceResult<PagedList<Beer>>;

    fn find_beer_by_id(&self, id: BeerId) -> ServiceResult<Beer>;

    fn save_new_beer(&self, draft: BeerDraft) -> ServiceResult<Beer>;

    fn update_beer(&self, id: BeerId, draft: BeerDraft) -> ServiceResult<Beer>;

    fn delete_beer(&self, id: BeerId) -> ServiceResult<()>;
}

/// Repository-backed beer service. UPCs are unique across the catalog.
pub struct BeerServiceImpl {
    beers: Arc<dyn Repository<Beer>>,
    // Held across check, mutate and save so the UPC check and the version
    // bump see every earlier write.
    write_lock: Mutex<()>,
}

impl BeerServiceImpl {
    pub fn new(beers: Arc<dyn Repository<Beer>>) -> Self {
        Self {
            beers,
            write_lock: Mutex::new(()),
        }
    }

    fn lock_writes(&self) -> ServiceResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| DomainError::invariant("beer write lock poisoned").into())
    }

    fn ensure_upc_free(&self, upc: i64, owner: Option<BeerId>) -> ServiceResult<()> {
        let taken = self
            .beers
            .find_all()
            .into_iter()
            .any(|b| b.upc() == upc && Some(b.id_typed()) != owner);
        if taken {
            return Err(DomainError::conflict(format!("upc {upc} is already assigned")).into());
        }
        Ok(())
    }
}

impl BeerService for BeerServiceImpl {
    fn list_beers(
        &self,
        filter: &BeerFilter,
        page: PageRequest,
    ) -> ServiceResult<PagedList<Beer>> {
        let matching: Vec<Beer> = self
            .beers
            .find_all()
            .into_iter()
            .filter(|beer| filter.matches(beer))
            .collect();
        Ok(PagedList::from_all(matching, page))
    }

    fn find_beer_by_id(&self, id: BeerId) -> ServiceResult<Beer> {
        self.beers
            .find_by_id(&id)
            .ok_or_else(|| ServiceError::not_found("beer", id))
    }

    fn save_new_beer(&self, draft: BeerDraft) -> ServiceResult<Beer> {
        let _guard = self.lock_writes()?;
        self.ensure_upc_free(draft.upc, None)?;
        let beer = self.beers.save(Beer::create(draft, Utc::now())?)?;
        info!(beer_id = %beer.id_typed(), name = beer.name(), "beer created");
        Ok(beer)
    }

    fn update_beer(&self, id: BeerId, draft: BeerDraft) -> ServiceResult<Beer> {
        let _guard = self.lock_writes()?;
        let mut beer = self.find_beer_by_id(id)?;
        self.ensure_upc_free(draft.upc, Some(id))?;
        beer.update(draft, Utc::now())?;
        Ok(self.beers.save(beer)?)
    }

    fn delete_beer(&self, id: BeerId) -> ServiceResult<()> {
        let _guard = self.lock_writes()?;
        if !self.beers.delete(&id)? {
            return Err(ServiceError::not_found("beer", id));
        }
        info!(beer_id = %id, "beer deleted");
        Ok(())
    }
}
