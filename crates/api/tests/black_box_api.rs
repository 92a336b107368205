use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;

use brewery_api::app::{build_app, build_services, BreweryServices};
use brewery_events::{EventBus, InMemoryEventBus};
use brewery_infra::services::StatusChangeEnvelope;
use brewery_infra::workers::WorkerHandle;
use brewery_orders::OrderStatus;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    status_listener: Option<WorkerHandle>,
    status_events: Arc<InMemoryEventBus<StatusChangeEnvelope>>,
}

impl TestServer {
    async fn spawn(seed_data: bool) -> Self {
        // Same wiring as prod, bound to an ephemeral port.
        let BreweryServices {
            services,
            status_listener,
            status_events,
        } = build_services(seed_data).unwrap();
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            status_listener: Some(status_listener),
            status_events,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
        if let Some(worker) = self.status_listener.take() {
            worker.shutdown();
        }
    }
}

async fn create_customer(client: &reqwest::Client, srv: &TestServer, name: &str) -> String {
    let res = client
        .post(srv.url("/api/v1/customers"))
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn create_beer(client: &reqwest::Client, srv: &TestServer, name: &str, upc: i64) -> String {
    let res = client
        .post(srv.url("/api/v1/beer"))
        .json(&json!({
            "beerName": name,
            "beerStyle": "IPA",
            "upc": upc,
            "price": "12.95",
            "quantityOnHand": 100
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn place_order(
    client: &reqwest::Client,
    srv: &TestServer,
    customer_id: &str,
    beer_id: &str,
) -> String {
    let res = client
        .post(srv.url(&format!("/api/v1/customers/{customer_id}/orders")))
        .json(&json!({
            "customerRef": "table-4",
            "beerOrderLines": [{ "beerId": beer_id, "orderQuantity": 2 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["orderStatus"], "NEW");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn(false).await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn seed_data_is_listed_in_pages() {
    let srv = TestServer::spawn(true).await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/v1/beer?pageNumber=0&pageSize=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["content"].as_array().unwrap().len(), 2);
    assert_eq!(page["content"][0]["beerName"], "Mango Bobs");
    assert_eq!(page["totalElements"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["first"], true);
    assert_eq!(page["last"], false);

    let res = client
        .get(srv.url("/api/v1/beer?beerStyle=PORTER"))
        .send()
        .await
        .unwrap();
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["content"][0]["beerName"], "Pinball Porter");

    let res = client.get(srv.url("/api/v1/customers")).send().await.unwrap();
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["content"][0]["name"], "Tasting Room");
}

#[tokio::test]
async fn beer_crud_lifecycle() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    let id = create_beer(&client, &srv, "Hop Dreams", 1_000_001).await;
    let beer_url = srv.url(&format!("/api/v1/beer/{id}"));

    let res = client.get(&beer_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["version"], 0);
    assert_eq!(body["price"], "12.95");

    let res = client
        .put(&beer_url)
        .json(&json!({
            "beerName": "Hop Dreams",
            "beerStyle": "IPA",
            "upc": 1_000_001,
            "price": "13.50",
            "quantityOnHand": 90
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["version"], 1);
    assert_eq!(body["quantityOnHand"], 90);

    // UPCs are unique across the catalog.
    let res = client
        .post(srv.url("/api/v1/beer"))
        .json(&json!({ "beerName": "Copy", "beerStyle": "ALE", "upc": 1_000_001, "price": "1.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client.delete(&beer_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(&beer_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn customer_rename() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    let id = create_customer(&client, &srv, "Corner Pub").await;

    let res = client
        .put(srv.url(&format!("/api/v1/customers/{id}")))
        .json(&json!({ "name": "Corner Pub & Grill" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Corner Pub & Grill");
    assert_eq!(body["version"], 1);

    let res = client
        .put(srv.url(&format!("/api/v1/customers/{id}")))
        .json(&json!({ "name": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_pickup_flow() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    let customer_id = create_customer(&client, &srv, "Tap House").await;
    let beer_id = create_beer(&client, &srv, "Galaxy Cat", 2_000_002).await;
    let order_id = place_order(&client, &srv, &customer_id, &beer_id).await;
    let order_url = srv.url(&format!("/api/v1/customers/{customer_id}/orders/{order_id}"));

    let res = client
        .put(format!("{order_url}/status"))
        .json(&json!({ "orderStatus": "READY" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["orderStatus"], "READY");

    let events = srv.status_events.subscribe();
    let res = client.put(format!("{order_url}/pickup")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Published before the response is written.
    let envelope = events.try_recv().unwrap();
    assert_eq!(envelope.payload().order_id.to_string(), order_id);
    assert_eq!(envelope.payload().previous_status, OrderStatus::Ready);
    assert_eq!(envelope.payload().new_status, OrderStatus::PickedUp);
    assert!(events.try_recv().is_err());

    let res = client.get(&order_url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["orderStatus"], "PICKED_UP");
    assert_eq!(body["version"], 2);
    assert_eq!(body["beerOrderLines"][0]["upc"], 2_000_002);

    // Picked up is terminal.
    let res = client.put(format!("{order_url}/pickup")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");

    let res = client
        .get(srv.url(&format!("/api/v1/customers/{customer_id}/orders")))
        .send()
        .await
        .unwrap();
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["totalElements"], 1);
}

#[tokio::test]
async fn orders_are_scoped_to_their_customer() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    let owner = create_customer(&client, &srv, "Owner Bar").await;
    let other = create_customer(&client, &srv, "Other Bar").await;
    let beer_id = create_beer(&client, &srv, "Pinball Porter", 3_000_003).await;
    let order_id = place_order(&client, &srv, &owner, &beer_id).await;

    let res = client
        .get(srv.url(&format!("/api/v1/customers/{other}/orders/{order_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(srv.url(&format!("/api/v1/customers/{other}/orders/{order_id}/pickup")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_validation_errors() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();
    let customer_id = create_customer(&client, &srv, "Brew Pub").await;
    let orders_url = srv.url(&format!("/api/v1/customers/{customer_id}/orders"));

    let res = client
        .post(&orders_url)
        .json(&json!({ "beerOrderLines": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(&orders_url)
        .json(&json!({
            "beerOrderLines": [{
                "beerId": "0190f7a4-0000-7000-8000-000000000000",
                "orderQuantity": 1
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = client
        .get(srv.url("/api/v1/customers/0190f7a4-0000-7000-8000-000000000000/orders"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn server_keeps_serving_after_status_changes() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();
    let customer_id = create_customer(&client, &srv, "Night Owl").await;
    let beer_id = create_beer(&client, &srv, "Midnight Stout", 4_000_004).await;

    for _ in 0..5 {
        let order_id = place_order(&client, &srv, &customer_id, &beer_id).await;
        let res = client
            .put(srv.url(&format!("/api/v1/customers/{customer_id}/orders/{order_id}/pickup")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    // Listener runs off the request path; give it a moment, then check the server is still healthy.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
