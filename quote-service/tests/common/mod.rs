#![allow(dead_code)]

use chrono::NaiveDate;
use quote_service::config::QuoteConfig;
use quote_service::services::{FixedClock, MemoryQuoteStore, QuoteService};
use quote_service::startup::Application;
use serde_json::{json, Value};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,quote_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<MemoryQuoteStore>,
    pub quotes: QuoteService,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawns the service on a random port over an in-memory store whose
    /// clock is pinned to `today`.
    pub async fn spawn_on(today: NaiveDate) -> Self {
        init_tracing();

        let store = Arc::new(MemoryQuoteStore::new());
        let app = Application::build_with(
            QuoteConfig::in_memory(0),
            store.clone(),
            Arc::new(FixedClock(today)),
        )
        .await
        .expect("Failed to build test application");

        let port = app.port();
        let quotes = app.quotes().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            store,
            quotes,
            client,
        }
    }

    pub async fn spawn() -> Self {
        Self::spawn_on(date(2024, 1, 1)).await
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    pub async fn post_quote(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.api("/quotes"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Creates a quote through the API and returns its id.
    pub async fn create_quote(&self, text: &str, author: &str) -> String {
        let response = self
            .post_quote(&json!({ "quote": text, "author_primary": author }))
            .await;
        assert!(response.status().is_success(), "create failed: {}", response.status());

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_str().expect("id missing").to_string()
    }
}
