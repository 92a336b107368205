use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::info;

use brewery_core::{CustomerId, DomainError, PageRequest, PagedList};
use brewery_customers::Customer;

use crate::repository::Repository;
use crate::services::{ServiceError, ServiceResult};

/// Customer directory operations.
pub trait CustomerService: Send + Sync {
    fn list_customers(&self, page: PageRequest) -> ServiceResult<PagedList<Customer>>;

    fn find_customer_by_id(&self, id: CustomerId) -> ServiceResult<Customer>;

    fn register_customer(&self, name: &str) -> ServiceResult<Customer>;

    fn rename_customer(&self, id: CustomerId, name: &str) -> ServiceResult<Customer>;
}

pub struct CustomerServiceImpl {
    customers: Arc<dyn Repository<Customer>>,
    // Serializes find, rename and save so no accepted rename is lost.
    write_lock: Mutex<()>,
}

impl CustomerServiceImpl {
    pub fn new(customers: Arc<dyn Repository<Customer>>) -> Self {
        Self {
            customers,
            write_lock: Mutex::new(()),
        }
    }
}

impl CustomerService for CustomerServiceImpl {
    fn list_customers(&self, page: PageRequest) -> ServiceResult<PagedList<Customer>> {
        Ok(PagedList::from_all(self.customers.find_all(), page))
    }

    fn find_customer_by_id(&self, id: CustomerId) -> ServiceResult<Customer> {
        self.customers
            .find_by_id(&id)
            .ok_or_else(|| ServiceError::not_found("customer", id))
    }

    fn register_customer(&self, name: &str) -> ServiceResult<Customer> {
        let customer = Customer::register(name, Utc::now())?;
        info!(customer_id = %customer.id_typed(), name = customer.name(), "customer registered");
        Ok(self.customers.save(customer)?)
    }

    fn rename_customer(&self, id: CustomerId, name: &str) -> ServiceResult<Customer> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| DomainError::invariant("customer write lock poisoned"))?;

        let mut customer = self.find_customer_by_id(id)?;
        customer.rename(name, Utc::now())?;
        Ok(self.customers.save(customer)?)
    }
}
