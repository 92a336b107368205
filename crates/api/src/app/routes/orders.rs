use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};

use brewery_core::{BeerOrderId, CustomerId};

use crate::app::services::AppServices;
use crate::app::{dto, errors, API_V1};

/// Order routes, nested under `/customers` next to the customer routes.
pub fn router() -> Router {
    Router::new()
        .route("/:customer_id/orders", get(list_orders).post(place_order))
        .route("/:customer_id/orders/:order_id", get(get_order))
        .route("/:customer_id/orders/:order_id/pickup", put(pickup_order))
        .route("/:customer_id/orders/:order_id/status", put(change_order_status))
}

fn parse_ids(customer_id: &str, order_id: &str) -> Result<(CustomerId, BeerOrderId), Response> {
    Ok((errors::parse_id(customer_id)?, errors::parse_id(order_id)?))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer_id): Path<String>,
    query: Result<Query<dto::PageQuery>, QueryRejection>,
) -> Response {
    let customer_id: CustomerId = match errors::parse_id(&customer_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    let page = match query.page_request() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.orders.list_orders(customer_id, page) {
        Ok(orders) => {
            (StatusCode::OK, Json(orders.map(|o| dto::BeerOrderDto::from(&o)))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer_id): Path<String>,
    body: Result<Json<dto::PlaceOrderRequest>, JsonRejection>,
) -> Response {
    let customer_id: CustomerId = match errors::parse_id(&customer_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services.orders.place_order(customer_id, body.into()) {
        Ok(order) => {
            let location = format!("{API_V1}/customers/{customer_id}/orders/{}", order.id_typed());
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(dto::BeerOrderDto::from(&order)),
            )
                .into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path((customer_id, order_id)): Path<(String, String)>,
) -> Response {
    let (customer_id, order_id) = match parse_ids(&customer_id, &order_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };

    match services.orders.get_order_by_id(customer_id, order_id) {
        Ok(order) => (StatusCode::OK, Json(dto::BeerOrderDto::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn pickup_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path((customer_id, order_id)): Path<(String, String)>,
) -> Response {
    let (customer_id, order_id) = match parse_ids(&customer_id, &order_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };

    match services.orders.pickup_order(customer_id, order_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn change_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path((customer_id, order_id)): Path<(String, String)>,
    body: Result<Json<dto::ChangeStatusRequest>, JsonRejection>,
) -> Response {
    let (customer_id, order_id) = match parse_ids(&customer_id, &order_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services
        .orders
        .change_order_status(customer_id, order_id, body.order_status)
    {
        Ok(order) => (StatusCode::OK, Json(dto::BeerOrderDto::from(&order))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
