#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MockCustomer {
    pub id: u64,
    pub fields: Value,
}

#[derive(Debug, Clone)]
pub struct MockTraining {
    pub id: u64,
    pub date: String,
    pub activity: String,
    pub duration: i64,
    pub customer_id: Option<u64>,
}

#[derive(Debug, Default)]
pub struct MockData {
    pub base_url: String,
    pub customers: Vec<MockCustomer>,
    pub trainings: Vec<MockTraining>,
    pub next_id: u64,
    pub requests: Vec<String>,
    pub fail_customer_lookups: bool,
    pub trainings_delay: Option<Duration>,
}

pub type Shared = Arc<Mutex<MockData>>;

/// In-process stand-in for the remote trainer API.
pub struct MockApi {
    pub base_url: String,
    pub data: Shared,
}

impl MockApi {
    pub fn api_url(&self) -> String {
        format!("{}/api", self.base_url)
    }

    pub fn requests(&self) -> Vec<String> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn customer_href(&self, id: u64) -> String {
        format!("{}/api/customers/{id}", self.base_url)
    }

    pub fn training_href(&self, id: u64) -> String {
        format!("{}/api/trainings/{id}", self.base_url)
    }
}

pub fn customer_fields(first: &str, last: &str, city: &str) -> Value {
    json!({
        "firstname": first,
        "lastname": last,
        "email": format!("{}@example.com", first.to_lowercase()),
        "phone": "040-123",
        "streetaddress": "Main 1",
        "postcode": "00100",
        "city": city,
    })
}

pub fn seeded() -> MockData {
    MockData {
        customers: vec![
            MockCustomer {
                id: 1,
                fields: customer_fields("Ann", "Lee", "Helsinki"),
            },
            MockCustomer {
                id: 2,
                fields: customer_fields("Bo", "Katz", "Helsinki, Finland"),
            },
        ],
        trainings: vec![
            MockTraining {
                id: 10,
                date: "2026-01-05T09:00:00.000+00:00".to_string(),
                activity: "Gym".to_string(),
                duration: 60,
                customer_id: Some(1),
            },
            MockTraining {
                id: 11,
                date: "2026-01-06T09:00:00.000+00:00".to_string(),
                activity: "gym".to_string(),
                duration: 30,
                customer_id: None,
            },
            MockTraining {
                id: 12,
                date: "2026-01-07T09:00:00.000+00:00".to_string(),
                activity: "Spinning".to_string(),
                duration: 45,
                customer_id: Some(2),
            },
        ],
        next_id: 100,
        ..MockData::default()
    }
}

pub async fn spawn_mock_api(data: MockData) -> MockApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let data = Arc::new(Mutex::new(MockData {
        base_url: base_url.clone(),
        ..data
    }));

    let app = Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/:id",
            get(get_customer).put(replace_customer).delete(delete_customer),
        )
        .route("/api/trainings", get(list_trainings).post(create_training))
        .route("/api/trainings/:id", axum::routing::delete(delete_training))
        .route("/api/trainings/:id/customer", get(training_customer))
        .with_state(Arc::clone(&data));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock api");
    });

    MockApi { base_url, data }
}

fn customer_json(base: &str, customer: &MockCustomer) -> Value {
    let mut value = customer.fields.clone();
    value["_links"] = json!({
        "self": { "href": format!("{base}/api/customers/{}", customer.id) },
        "customer": { "href": format!("{base}/api/customers/{}", customer.id) },
    });
    value
}

fn training_json(base: &str, training: &MockTraining) -> Value {
    let mut links = json!({
        "self": { "href": format!("{base}/api/trainings/{}", training.id) },
        "training": { "href": format!("{base}/api/trainings/{}", training.id) },
    });
    if training.customer_id.is_some() {
        links["customer"] = json!({
            "href": format!("{base}/api/trainings/{}/customer", training.id)
        });
    }
    json!({
        "date": training.date,
        "activity": training.activity,
        "duration": training.duration,
        "_links": links,
    })
}

fn record(data: &mut MockData, line: String) {
    data.requests.push(line);
}

async fn list_customers(State(data): State<Shared>) -> Json<Value> {
    let mut data = data.lock().unwrap();
    record(&mut data, "GET /api/customers".to_string());
    let items: Vec<Value> = data
        .customers
        .iter()
        .map(|customer| customer_json(&data.base_url, customer))
        .collect();
    Json(json!({ "_embedded": { "customers": items } }))
}

async fn get_customer(
    State(data): State<Shared>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let mut data = data.lock().unwrap();
    record(&mut data, format!("GET /api/customers/{id}"));
    data.customers
        .iter()
        .find(|customer| customer.id == id)
        .map(|customer| Json(customer_json(&data.base_url, customer)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_customer(State(data): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let mut data = data.lock().unwrap();
    record(&mut data, "POST /api/customers".to_string());
    let id = data.next_id;
    data.next_id += 1;
    data.customers.push(MockCustomer { id, fields: body });
    StatusCode::CREATED
}

async fn replace_customer(
    State(data): State<Shared>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> StatusCode {
    let mut data = data.lock().unwrap();
    record(&mut data, format!("PUT /api/customers/{id}"));
    match data.customers.iter_mut().find(|customer| customer.id == id) {
        Some(customer) => {
            customer.fields = body;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_customer(State(data): State<Shared>, Path(id): Path<u64>) -> StatusCode {
    let mut data = data.lock().unwrap();
    record(&mut data, format!("DELETE /api/customers/{id}"));
    let before = data.customers.len();
    data.customers.retain(|customer| customer.id != id);
    if data.customers.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn list_trainings(State(data): State<Shared>) -> Json<Value> {
    let delay = data.lock().unwrap().trainings_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let mut data = data.lock().unwrap();
    record(&mut data, "GET /api/trainings".to_string());
    let items: Vec<Value> = data
        .trainings
        .iter()
        .map(|training| training_json(&data.base_url, training))
        .collect();
    Json(json!({ "_embedded": { "trainings": items } }))
}

async fn create_training(State(data): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let mut data = data.lock().unwrap();
    record(&mut data, "POST /api/trainings".to_string());
    let customer_id = body["customer"]
        .as_str()
        .and_then(|href| href.rsplit('/').next())
        .and_then(|id| id.parse::<u64>().ok());
    let id = data.next_id;
    data.next_id += 1;
    data.trainings.push(MockTraining {
        id,
        date: body["date"].as_str().unwrap_or_default().to_string(),
        activity: body["activity"].as_str().unwrap_or_default().to_string(),
        duration: body["duration"].as_i64().unwrap_or_default(),
        customer_id,
    });
    StatusCode::CREATED
}

async fn delete_training(State(data): State<Shared>, Path(id): Path<u64>) -> StatusCode {
    let mut data = data.lock().unwrap();
    record(&mut data, format!("DELETE /api/trainings/{id}"));
    let before = data.trainings.len();
    data.trainings.retain(|training| training.id != id);
    if data.trainings.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn training_customer(
    State(data): State<Shared>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let mut data = data.lock().unwrap();
    record(&mut data, format!("GET /api/trainings/{id}/customer"));
    if data.fail_customer_lookups {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let customer_id = data
        .trainings
        .iter()
        .find(|training| training.id == id)
        .and_then(|training| training.customer_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    data.customers
        .iter()
        .find(|customer| customer.id == customer_id)
        .map(|customer| Json(customer_json(&data.base_url, customer)))
        .ok_or(StatusCode::NOT_FOUND)
}
