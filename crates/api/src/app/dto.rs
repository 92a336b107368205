use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brewery_beers::{Beer, BeerDraft, BeerFilter, BeerStyle};
use brewery_core::{
    BeerId, BeerOrderId, BeerOrderLineId, CustomerId, DomainError, DomainResult, Entity,
    PageRequest,
};
use brewery_customers::Customer;
use brewery_infra::services::{OrderLineRequest, OrderRequest};
use brewery_orders::{BeerOrder, BeerOrderLine, OrderStatus};
use uuid::Uuid;

/// Wire format for timestamps: `yyyy-MM-dd'T'HH:mm:ssZ` (e.g. `2019-05-01T10:15:30+0000`).
pub mod date_format {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub const PATTERN: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub fn format(value: &DateTime<Utc>) -> String {
        value.format(PATTERN).to_string()
    }

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(PATTERN))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerDto {
    pub id: BeerId,
    pub version: u32,
    pub beer_name: String,
    pub beer_style: BeerStyle,
    pub upc: i64,
    /// Serialized as a decimal string.
    pub price: BigDecimal,
    pub quantity_on_hand: i32,
    #[serde(with = "date_format")]
    pub created_date: DateTime<Utc>,
    #[serde(with = "date_format")]
    pub last_modified_date: DateTime<Utc>,
}

impl From<&Beer> for BeerDto {
    fn from(beer: &Beer) -> Self {
        Self {
            id: beer.id_typed(),
            version: beer.version(),
            beer_name: beer.name().to_string(),
            beer_style: beer.style(),
            upc: beer.upc(),
            price: beer.price().clone(),
            quantity_on_hand: beer.quantity_on_hand(),
            created_date: beer.created_date(),
            last_modified_date: beer.last_modified_date(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: CustomerId,
    pub version: u32,
    pub name: String,
    pub api_key: Uuid,
    #[serde(with = "date_format")]
    pub created_date: DateTime<Utc>,
    #[serde(with = "date_format")]
    pub last_modified_date: DateTime<Utc>,
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id_typed(),
            version: customer.version(),
            name: customer.name().to_string(),
            api_key: customer.api_key(),
            created_date: customer.created_date(),
            last_modified_date: customer.last_modified_date(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerOrderLineDto {
    pub id: BeerOrderLineId,
    pub version: u32,
    pub beer_id: BeerId,
    pub upc: i64,
    pub order_quantity: i32,
    #[serde(with = "date_format")]
    pub created_date: DateTime<Utc>,
    #[serde(with = "date_format")]
    pub last_modified_date: DateTime<Utc>,
}

impl From<&BeerOrderLine> for BeerOrderLineDto {
    fn from(line: &BeerOrderLine) -> Self {
        Self {
            id: line.id(),
            version: line.version(),
            beer_id: line.beer_id(),
            upc: line.upc(),
            order_quantity: line.order_quantity(),
            created_date: line.created_date(),
            last_modified_date: line.last_modified_date(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerOrderDto {
    pub id: BeerOrderId,
    pub version: u32,
    pub customer_id: CustomerId,
    pub customer_ref: Option<String>,
    pub beer_order_lines: Vec<BeerOrderLineDto>,
    pub order_status: OrderStatus,
    pub order_status_callback_url: Option<String>,
    #[serde(with = "date_format")]
    pub created_date: DateTime<Utc>,
    #[serde(with = "date_format")]
    pub last_modified_date: DateTime<Utc>,
}

impl From<&BeerOrder> for BeerOrderDto {
    fn from(order: &BeerOrder) -> Self {
        Self {
            id: order.id_typed(),
            version: order.version(),
            customer_id: order.customer_id(),
            customer_ref: order.customer_ref().map(str::to_string),
            beer_order_lines: order.lines().iter().map(BeerOrderLineDto::from).collect(),
            order_status: order.status(),
            order_status_callback_url: order.status_callback_url().map(str::to_string),
            created_date: order.created_date(),
            last_modified_date: order.last_modified_date(),
        }
    }
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self) -> DomainResult<PageRequest> {
        PageRequest::from_params(self.page_number, self.page_size)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBeersQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub beer_name: Option<String>,
    pub beer_style: Option<String>,
}

impl ListBeersQuery {
    pub fn page_request(&self) -> DomainResult<PageRequest> {
        PageRequest::from_params(self.page_number, self.page_size)
    }

    /// Blank parameters are treated as absent; an unknown style is a validation error.
    pub fn filter(&self) -> DomainResult<BeerFilter> {
        let style = match self.beer_style.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse::<BeerStyle>()?),
        };
        Ok(BeerFilter::new(self.beer_name.clone(), style))
    }
}

/// Body of `POST /beer` and `PUT /beer/{id}`.
///
/// Server-managed fields (`id`, `version`, dates) may be sent and are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBeerRequest {
    pub beer_name: Option<String>,
    pub beer_style: Option<BeerStyle>,
    pub upc: Option<i64>,
    pub price: Option<BigDecimal>,
    pub quantity_on_hand: Option<i32>,
}

impl SaveBeerRequest {
    pub fn into_draft(self) -> DomainResult<BeerDraft> {
        let mut missing = Vec::new();
        if self.beer_name.is_none() {
            missing.push("beerName is required".to_string());
        }
        if self.beer_style.is_none() {
            missing.push("beerStyle is required".to_string());
        }
        if self.upc.is_none() {
            missing.push("upc is required".to_string());
        }
        if self.price.is_none() {
            missing.push("price is required".to_string());
        }

        match (self.beer_name, self.beer_style, self.upc, self.price) {
            (Some(name), Some(style), Some(upc), Some(price)) => {
                let draft = BeerDraft {
                    name,
                    style,
                    upc,
                    price,
                    quantity_on_hand: self.quantity_on_hand.unwrap_or(0),
                };
                draft.validate()?;
                Ok(draft)
            }
            _ => Err(DomainError::validation(missing.join("; "))),
        }
    }
}

/// Body of `POST /customers` and `PUT /customers/{id}`.
#[derive(Debug, Deserialize)]
pub struct CustomerNameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderLineRequest {
    pub beer_id: BeerId,
    pub order_quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub customer_ref: Option<String>,
    pub order_status_callback_url: Option<String>,
    #[serde(default)]
    pub beer_order_lines: Vec<PlaceOrderLineRequest>,
}

impl From<PlaceOrderRequest> for OrderRequest {
    fn from(body: PlaceOrderRequest) -> Self {
        Self {
            customer_ref: body.customer_ref,
            status_callback_url: body.order_status_callback_url,
            lines: body
                .beer_order_lines
                .into_iter()
                .map(|l| OrderLineRequest {
                    beer_id: l.beer_id,
                    order_quantity: l.order_quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub order_status: OrderStatus,
}
