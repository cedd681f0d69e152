//! Fake Ollama server and cache doubles shared by the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use redlama::backend::OllamaClient;
use redlama::config::BackendConfig;
use redlama::{CacheError, CacheKey, CacheStore, Dispatcher, MemoryStore};

pub struct FakeOllama {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
}

struct FakeState {
    generate_calls: AtomicUsize,
    root_status: Mutex<StatusCode>,
    reply: Mutex<(StatusCode, String)>,
    last_request: Mutex<Option<serde_json::Value>>,
}

impl FakeOllama {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState {
            generate_calls: AtomicUsize::new(0),
            root_status: Mutex::new(StatusCode::OK),
            reply: Mutex::new((StatusCode::OK, ollama_body("llama3.1", "hello"))),
            last_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/", get(root_handler))
            .route("/api/generate", post(generate_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn generate_calls(&self) -> usize {
        self.state.generate_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    // Next generate calls answer 200 with this response text
    pub fn respond_with(&self, text: &str) {
        *self.state.reply.lock().unwrap() = (StatusCode::OK, ollama_body("llama3.1", text));
    }

    pub fn respond_raw(&self, status: StatusCode, body: &str) {
        *self.state.reply.lock().unwrap() = (status, body.to_string());
    }

    pub fn set_root_status(&self, status: StatusCode) {
        *self.state.root_status.lock().unwrap() = status;
    }

    pub fn client(&self) -> OllamaClient {
        OllamaClient::new(
            reqwest::Client::new(),
            BackendConfig {
                base_url: self.base_url(),
            },
        )
    }

    pub fn dispatcher<S: CacheStore>(&self, store: S) -> Dispatcher<S> {
        Dispatcher::new(store, self.client())
    }
}

async fn root_handler(State(state): State<Arc<FakeState>>) -> impl IntoResponse {
    let status = *state.root_status.lock().unwrap();
    (status, "Ollama is running")
}

async fn generate_handler(
    State(state): State<Arc<FakeState>>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.generate_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().unwrap() = Some(payload);
    let (status, body) = state.reply.lock().unwrap().clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

pub fn ollama_body(model: &str, response: &str) -> String {
    serde_json::json!({
        "model": model,
        "created_at": "2024-08-04T19:22:45.499127Z",
        "response": response,
        "done": true,
        "done_reason": "stop",
        "context": [1, 2, 3],
        "total_duration": 5043500667u64,
        "load_duration": 5025959,
        "prompt_eval_count": 26,
        "prompt_eval_duration": 325953000,
        "eval_count": 290,
        "eval_duration": 4709213000u64
    })
    .to_string()
}

// A port nothing is listening on
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Memory store whose reads or writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_get: bool,
    pub fail_set: bool,
}

#[async_trait]
impl CacheStore for FlakyStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        if self.fail_get {
            return Err(CacheError::Unavailable("connection reset".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &CacheKey, value: &str) -> Result<(), CacheError> {
        if self.fail_set {
            return Err(CacheError::Unavailable("READONLY replica".to_string()));
        }
        self.inner.set(key, value).await
    }
}
