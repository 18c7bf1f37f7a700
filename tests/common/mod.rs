//! In-process server on an ephemeral port, backed by the in-memory store.

#![allow(dead_code)]

use car_inventory::{transport, CarPolicy, MemoryStore, NoopNotifier};
use serde_json::{json, Value};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Creates a brand and returns its id.
    pub async fn brand(&self, name: &str, country: &str) -> Result<i64, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(self.url("/api/brand"))
            .json(&json!({ "name": name, "country": country }))
            .send()
            .await?;
        assert_eq!(resp.status(), 200, "brand creation failed");
        let body: Value = resp.json().await?;
        Ok(body["id"].as_i64().ok_or("brand id missing")?)
    }

    /// Creates a car and returns its id.
    pub async fn car(
        &self,
        model: &str,
        price: f64,
        brand_id: i64,
    ) -> Result<i64, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(self.url("/api/car"))
            .json(&json!({
                "model": model,
                "year": 2022,
                "color": "Blue",
                "price": price,
                "brandId": brand_id
            }))
            .send()
            .await?;
        assert_eq!(resp.status(), 201, "car creation failed");
        let body: Value = resp.json().await?;
        Ok(body["id"].as_i64().ok_or("car id missing")?)
    }
}

pub async fn spawn_app() -> Result<TestApp, Box<dyn std::error::Error>> {
    spawn_app_with(CarPolicy::default()).await
}

pub async fn spawn_app_with(policy: CarPolicy) -> Result<TestApp, Box<dyn std::error::Error>> {
    let app_state = transport::http::AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(NoopNotifier),
        policy,
    );
    let router = transport::http::create_router(app_state);

    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    })
}
