#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Response, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use wordquiz::config::{Config, ProviderKind};
use wordquiz::provider::{ProviderError, WordProvider};
use wordquiz::state::AppState;
use wordquiz::types::{Tier, WordEntry};

pub fn static_app() -> axum::Router {
    let config = Config {
        provider: ProviderKind::Static,
        ..Config::default()
    };
    wordquiz::create_app(AppState::from_config(&config))
}

pub fn word_list(entries: &[WordEntry]) -> Vec<String> {
    entries.iter().map(|e| e.word.clone()).collect()
}

/// Endless provider producing `"{tier}-{n}"`. Optionally fails after `limit`
/// words, and can hold fetches for one tier until a permit is released.
#[derive(Default)]
pub struct SequenceProvider {
    served: AtomicUsize,
    calls: AtomicUsize,
    limit: Option<usize>,
    gate: Option<(Tier, Arc<Semaphore>)>,
}

impl SequenceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn gated(tier: Tier, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some((tier, gate)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WordProvider for SequenceProvider {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn fetch_word(&self, tier: Tier) -> BoxFuture<'_, Result<WordEntry, ProviderError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((gated, gate)) = &self.gate {
                if *gated == tier {
                    gate.acquire().await.expect("gate closed").forget();
                }
            }
            let n = self.served.fetch_add(1, Ordering::SeqCst) + 1;
            if self.limit.is_some_and(|limit| n > limit) {
                return Err(ProviderError::NoWordsForTier(tier));
            }
            Ok(WordEntry::keyed_by_word(
                format!("{tier}-{n}"),
                Some(format!("definition {n}")),
                None,
                tier,
            ))
        })
    }
}

pub struct FailingProvider;

impl WordProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn fetch_word(&self, _tier: Tier) -> BoxFuture<'_, Result<WordEntry, ProviderError>> {
        Box::pin(async { Err(ProviderError::MalformedResponse("stub".to_string())) })
    }
}

/// In-process stand-in for the random word source, the dictionary and the
/// local word service.
#[derive(Clone, Default)]
pub struct Upstream {
    inner: Arc<UpstreamState>,
}

#[derive(Default)]
pub struct UpstreamState {
    words: Mutex<VecDeque<String>>,
    defined: Mutex<Vec<(String, Value)>>,
    random_queries: Mutex<Vec<(u32, u32)>>,
    random_status: Mutex<Option<StatusCode>>,
}

#[derive(serde::Deserialize)]
struct LengthQuery {
    minlength: u32,
    maxlength: u32,
}

impl Upstream {
    pub fn with_words(words: &[&str]) -> Self {
        let upstream = Self::default();
        upstream
            .inner
            .words
            .lock()
            .extend(words.iter().map(|w| w.to_string()));
        upstream
    }

    /// Registers a dictionary entry in the dictionaryapi.dev shape.
    pub fn define(self, word: &str, definition: &str, example: Option<&str>) -> Self {
        let mut first = json!({ "definition": definition });
        if let Some(example) = example {
            first["example"] = json!(example);
        }
        let body = json!([{
            "word": word,
            "meanings": [{ "partOfSpeech": "noun", "definitions": [first] }]
        }]);
        self.inner.defined.lock().push((word.to_string(), body));
        self
    }

    /// Registers a raw dictionary body for a word.
    pub fn define_raw(self, word: &str, body: Value) -> Self {
        self.inner.defined.lock().push((word.to_string(), body));
        self
    }

    pub fn fail_random_with(self, status: StatusCode) -> Self {
        *self.inner.random_status.lock() = Some(status);
        self
    }

    pub fn random_queries(&self) -> Vec<(u32, u32)> {
        self.inner.random_queries.lock().clone()
    }

    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/word/random/", get(random_word))
            .route("/entries/en/:word", get(lookup))
            .route("/word/english", get(local_word))
            .with_state(self.inner);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

fn next_word(state: &UpstreamState) -> Value {
    match state.words.lock().pop_front() {
        Some(word) => json!([word]),
        None => json!([]),
    }
}

async fn random_word(
    State(state): State<Arc<UpstreamState>>,
    Query(query): Query<LengthQuery>,
) -> Response<Body> {
    state
        .random_queries
        .lock()
        .push((query.minlength, query.maxlength));
    if let Some(status) = *state.random_status.lock() {
        return axum::response::IntoResponse::into_response(status);
    }
    axum::response::IntoResponse::into_response(Json(next_word(&state)))
}

async fn lookup(State(state): State<Arc<UpstreamState>>, Path(word): Path<String>) -> Response<Body> {
    let found = state
        .defined
        .lock()
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, body)| body.clone());
    let response = match found {
        Some(body) => (StatusCode::OK, Json(body)),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "title": "No Definitions Found" })),
        ),
    };
    axum::response::IntoResponse::into_response(response)
}

async fn local_word(State(state): State<Arc<UpstreamState>>) -> Json<Value> {
    Json(next_word(&state))
}
