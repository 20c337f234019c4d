//! In-process stand-in for the Ollama HTTP API used by the async tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

struct Shared {
    models: Vec<String>,
    generate_status: StatusCode,
    reply: String,
    tags_hits: AtomicUsize,
    generate_hits: AtomicUsize,
    last_generate_body: Mutex<Option<Value>>,
}

pub struct FakeOllama {
    models: Vec<String>,
    generate_status: StatusCode,
    reply: String,
}

pub struct RunningFake {
    pub base_url: String,
    shared: Arc<Shared>,
}

impl FakeOllama {
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            generate_status: StatusCode::OK,
            reply: "fake reply".to_string(),
        }
    }

    pub fn models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn generate_status(mut self, status: StatusCode) -> Self {
        self.generate_status = status;
        self
    }

    pub fn reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }

    pub async fn spawn(self) -> RunningFake {
        let shared = Arc::new(Shared {
            models: self.models,
            generate_status: self.generate_status,
            reply: self.reply,
            tags_hits: AtomicUsize::new(0),
            generate_hits: AtomicUsize::new(0),
            last_generate_body: Mutex::new(None),
        });

        let router = Router::new()
            .route("/api/tags", get(tags))
            .route("/api/generate", post(generate))
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        RunningFake {
            base_url: format!("http://{}", addr),
            shared,
        }
    }
}

impl RunningFake {
    pub fn tags_hits(&self) -> usize {
        self.shared.tags_hits.load(Ordering::SeqCst)
    }

    pub fn generate_hits(&self) -> usize {
        self.shared.generate_hits.load(Ordering::SeqCst)
    }

    pub fn total_hits(&self) -> usize {
        self.tags_hits() + self.generate_hits()
    }

    pub fn last_generate_body(&self) -> Option<Value> {
        self.shared.last_generate_body.lock().unwrap().clone()
    }
}

async fn tags(State(shared): State<Arc<Shared>>) -> Json<Value> {
    shared.tags_hits.fetch_add(1, Ordering::SeqCst);
    let models: Vec<Value> = shared.models.iter().map(|m| json!({ "name": m })).collect();
    Json(json!({ "models": models }))
}

async fn generate(
    State(shared): State<Arc<Shared>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    shared.generate_hits.fetch_add(1, Ordering::SeqCst);
    *shared.last_generate_body.lock().unwrap() = Some(body);

    if shared.generate_status.is_success() {
        (
            shared.generate_status,
            Json(json!({ "response": shared.reply, "done": true })),
        )
    } else {
        (shared.generate_status, Json(json!({ "error": "model not found" })))
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
