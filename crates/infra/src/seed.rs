//! Startup data for a fresh in-memory brewery.

use core::str::FromStr;

use bigdecimal::BigDecimal;
use tracing::info;

use brewery_beers::{BeerDraft, BeerFilter, BeerStyle};
use brewery_core::{DomainError, PageRequest};

use crate::services::{BeerService, CustomerService, ServiceResult};

const BEERS: [(&str, BeerStyle, i64, &str, i32); 3] = [
    ("Mango Bobs", BeerStyle::Ipa, 631_234_200_036, "12.95", 500),
    ("Galaxy Cat", BeerStyle::PaleAle, 631_234_300_019, "11.95", 250),
    ("Pinball Porter", BeerStyle::Porter, 83_783_375_213, "12.95", 120),
];

pub const TASTING_ROOM: &str = "Tasting Room";

/// Load the default catalog and the tasting-room customer.
///
/// Only runs when both stores are empty. Returns whether anything was loaded.
pub fn load_default_brewery(
    beers: &dyn BeerService,
    customers: &dyn CustomerService,
) -> ServiceResult<bool> {
    let first = PageRequest::of(0, 1)?;
    let has_beers = beers.list_beers(&BeerFilter::default(), first)?.total_elements() > 0;
    let has_customers = customers.list_customers(first)?.total_elements() > 0;
    if has_beers || has_customers {
        info!("stores already populated, skipping seed data");
        return Ok(false);
    }

    for (name, style, upc, price, quantity_on_hand) in BEERS {
        let price = BigDecimal::from_str(price)
            .map_err(|e| DomainError::validation(format!("seed price {price}: {e}")))?;
        beers.save_new_beer(BeerDraft {
            name: name.to_string(),
            style,
            upc,
            price,
            quantity_on_hand,
        })?;
    }
    let customer = customers.register_customer(TASTING_ROOM)?;

    info!(
        beers = BEERS.len(),
        customer_id = %customer.id_typed(),
        "loaded seed data"
    );
    Ok(true)
}
