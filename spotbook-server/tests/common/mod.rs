#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use spotbook_core::FixedClock;
use spotbook_server::{auth::MIN_HASH_COST, build_router, cache, state, AppState, SharedState};
use tokio::time::Duration;
use tower::ServiceExt;

pub const TODAY: &str = "2030-01-10";

pub struct TestApp {
    pub router: Router,
    pub state: SharedState,
}

impl TestApp {
    pub fn new() -> Self {
        let today = NaiveDate::parse_from_str(TODAY, "%Y-%m-%d").expect("valid date");
        let state = AppState::new(
            state::Config {
                cache: cache::Config {
                    enabled: true,
                    ttl: Duration::from_secs(60),
                },
                session_ttl: Duration::from_secs(600),
                hash_cost: MIN_HASH_COST,
            },
            Arc::new(FixedClock(today)),
        );

        Self {
            router: build_router(Arc::clone(&state)),
            state,
        }
    }

    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, text) = self.raw(method, uri, token, body).await;
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, token, None).await
    }

    /// Signs up `username` and returns its id and session token.
    pub async fn signup(&self, username: &str) -> (u64, String) {
        let (status, body) = self
            .post(
                "/api/users",
                None,
                json!({
                    "email": format!("{username}@example.com"),
                    "username": username,
                    "password": "password1",
                    "firstName": "Test",
                    "lastName": username,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        (
            body["user"]["id"].as_u64().expect("user id"),
            body["token"].as_str().expect("token").to_string(),
        )
    }

    pub async fn create_spot(&self, token: &str, name: &str, price: f64) -> u64 {
        let (status, body) = self
            .post(
                "/api/spots",
                Some(token),
                json!({
                    "address": "1221 Grove St",
                    "city": "Compton",
                    "state": "CA",
                    "country": "USA",
                    "lat": 34.0194,
                    "lng": -118.4912,
                    "name": name,
                    "description": "A beautiful condo with views.",
                    "price": price,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        body["id"].as_u64().expect("spot id")
    }

    pub async fn book(
        &self,
        token: &str,
        spot_id: u64,
        start: &str,
        end: &str,
    ) -> (StatusCode, Value) {
        self.post(
            &format!("/api/spots/{spot_id}/bookings"),
            Some(token),
            json!({ "startDate": start, "endDate": end }),
        )
        .await
    }
}
