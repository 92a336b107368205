use chrono::{DateTime, Utc};
use uuid::Uuid;

use brewery_core::{CustomerId, DomainError, DomainResult, Entity};

const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 100;

/// Entity: Customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    version: u32,
    name: String,
    api_key: Uuid,
    created_date: DateTime<Utc>,
    last_modified_date: DateTime<Utc>,
}

impl Customer {
    /// Register a new customer and issue its API key.
    pub fn register(name: &str, now: DateTime<Utc>) -> DomainResult<Self> {
        Self::register_with_id(CustomerId::new(), name, now)
    }

    pub fn register_with_id(id: CustomerId, name: &str, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = validate_name(name)?;
        Ok(Self {
            id,
            version: 0,
            name,
            api_key: Uuid::new_v4(),
            created_date: now,
            last_modified_date: now,
        })
    }

    pub fn rename(&mut self, name: &str, now: DateTime<Utc>) -> DomainResult<()> {
        self.name = validate_name(name)?;
        self.last_modified_date = now;
        self.version += 1;
        Ok(())
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_key(&self) -> Uuid {
        self.api_key
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    pub fn last_modified_date(&self) -> DateTime<Utc> {
        self.last_modified_date
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u32 {
        self.version
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(DomainError::validation(format!(
            "name must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
