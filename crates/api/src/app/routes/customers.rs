use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use brewery_core::CustomerId;

use crate::app::services::AppServices;
use crate::app::{dto, errors, API_V1};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(register_customer))
        .route("/:customer_id", get(get_customer).put(rename_customer))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::PageQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    let page = match query.page_request() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.customers.list_customers(page) {
        Ok(customers) => {
            (StatusCode::OK, Json(customers.map(|c| dto::CustomerDto::from(&c)))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer_id): Path<String>,
) -> axum::response::Response {
    let customer_id: CustomerId = match errors::parse_id(&customer_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.customers.find_customer_by_id(customer_id) {
        Ok(customer) => (StatusCode::OK, Json(dto::CustomerDto::from(&customer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn register_customer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CustomerNameRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services.customers.register_customer(&body.name) {
        Ok(customer) => {
            let location = format!("{API_V1}/customers/{}", customer.id_typed());
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(dto::CustomerDto::from(&customer)),
            )
                .into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn rename_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer_id): Path<String>,
    body: Result<Json<dto::CustomerNameRequest>, JsonRejection>,
) -> axum::response::Response {
    let customer_id: CustomerId = match errors::parse_id(&customer_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services.customers.rename_customer(customer_id, &body.name) {
        Ok(customer) => (StatusCode::OK, Json(dto::CustomerDto::from(&customer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
