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

use brewery_core::BeerId;

use crate::app::services::AppServices;
use crate::app::{dto, errors, API_V1};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_beers).post(save_new_beer))
        .route("/:beer_id", get(get_beer_by_id).put(update_beer).delete(delete_beer))
}

pub async fn list_beers(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListBeersQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    let page = match query.page_request() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.beers.list_beers(&filter, page) {
        Ok(beers) => (StatusCode::OK, Json(beers.map(|b| dto::BeerDto::from(&b)))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_beer_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(beer_id): Path<String>,
) -> axum::response::Response {
    let beer_id: BeerId = match errors::parse_id(&beer_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.beers.find_beer_by_id(beer_id) {
        Ok(beer) => (StatusCode::OK, Json(dto::BeerDto::from(&beer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn save_new_beer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SaveBeerRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    let draft = match body.into_draft() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.beers.save_new_beer(draft) {
        Ok(beer) => {
            let location = format!("{API_V1}/beer/{}", beer.id_typed());
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(dto::BeerDto::from(&beer)),
            )
                .into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_beer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(beer_id): Path<String>,
    body: Result<Json<dto::SaveBeerRequest>, JsonRejection>,
) -> axum::response::Response {
    let beer_id: BeerId = match errors::parse_id(&beer_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    let draft = match body.into_draft() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.beers.update_beer(beer_id, draft) {
        Ok(beer) => (StatusCode::OK, Json(dto::BeerDto::from(&beer))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_beer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(beer_id): Path<String>,
) -> axum::response::Response {
    let beer_id: BeerId = match errors::parse_id(&beer_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.beers.delete_beer(beer_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
