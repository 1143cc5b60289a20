//! Shared fixtures for the integration tests: a scripted [`Transport`] and
//! helpers for signed-in clients.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use tokio::sync::Semaphore;

use buygreen_sdk::prelude::*;
use buygreen_sdk::session::{AUTH_TOKEN_KEY, CUSTOMER_KEY};

pub const BASE_URL: &str = "http://store.test";
pub const TOKEN: &str = "tok-123";

/// Released by the test to let held responses through.
#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    pub fn new() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    pub fn open(&self) {
        self.0.add_permits(1024);
    }
}

enum Reply {
    Respond(HttpResponse),
    Fail(TransportError),
    Held(Gate, HttpResponse),
}

/// Scripted replies per `(method, path)`. The last scripted reply for a
/// route repeats; unscripted routes answer 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Arc<Reply>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Arc::new(reply));
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Reply::Respond(HttpResponse::new(status, body)));
        self
    }

    pub fn json(&self, method: Method, path: &str, body: serde_json::Value) -> &Self {
        self.respond(method, path, 200, &body.to_string())
    }

    pub fn fail(&self, method: Method, path: &str, error: TransportError) -> &Self {
        self.push(method, path, Reply::Fail(error));
        self
    }

    /// Answer only once `gate` opens.
    pub fn hold(&self, method: Method, path: &str, gate: &Gate, status: u16, body: &str) -> &Self {
        self.push(
            method,
            path,
            Reply::Held(gate.clone(), HttpResponse::new(status, body)),
        );
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests that hit `path` with `method`.
    pub fn calls(&self, method: Method, path: &str) -> Vec<HttpRequest> {
        let url = format!("{BASE_URL}{path}");
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url == url)
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls(method, path).len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&(request.method.clone(), path)) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply.as_deref() {
            None => Ok(HttpResponse::new(404, r#"{"message":"no route"}"#)),
            Some(Reply::Respond(resp)) => Ok(resp.clone()),
            Some(Reply::Fail(e)) => Err(e.clone()),
            Some(Reply::Held(gate, resp)) => {
                let permit = gate.0.acquire().await.expect("gate closed");
                permit.forget();
                Ok(resp.clone())
            }
        }
    }
}

// ── Clients ─────────────────────────────────────────────────────────────────

pub fn builder(
    transport: Arc<FakeTransport>,
    store: Arc<MemorySessionStore>,
) -> StoreClientBuilder {
    StoreClient::builder()
        .base_url(BASE_URL)
        .transport(transport)
        .session_store(store)
        .retry(RetryConfig::immediate(2))
        .order_watchdog(Duration::from_secs(5))
        .cache_sweep_interval(None)
}

pub fn client_with(transport: Arc<FakeTransport>, store: Arc<MemorySessionStore>) -> StoreClient {
    builder(transport, store).build().expect("client builds")
}

pub fn signed_out(transport: Arc<FakeTransport>) -> StoreClient {
    client_with(transport, Arc::new(MemorySessionStore::new()))
}

/// A client whose session already holds customer 7 and a bearer token.
pub fn signed_in(transport: Arc<FakeTransport>) -> (StoreClient, Arc<MemorySessionStore>) {
    signed_in_as(transport, "customer")
}

pub fn signed_in_as(
    transport: Arc<FakeTransport>,
    role: &str,
) -> (StoreClient, Arc<MemorySessionStore>) {
    let store = customer_store(role);
    (client_with(transport, store.clone()), store)
}

/// A session store holding customer 7 with `role` and a bearer token.
pub fn customer_store(role: &str) -> Arc<MemorySessionStore> {
    let store = Arc::new(MemorySessionStore::new());
    let profile = serde_json::json!({
        "id": 7,
        "name": "Asha",
        "email": "asha@example.com",
        "role": role,
        "address": "12 Green Lane"
    });
    store.set(CUSTOMER_KEY, &profile.to_string()).unwrap();
    store.set(AUTH_TOKEN_KEY, TOKEN).unwrap();
    store
}

pub fn product(id: i64, name: &str, price: &str) -> Product {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "price": price.parse::<f64>().unwrap(),
        "stockQuantity": 10,
        "category": "Home"
    }))
    .unwrap()
}

pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_str(request.body.as_deref().unwrap_or("null")).unwrap()
}
