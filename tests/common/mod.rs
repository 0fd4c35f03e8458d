#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Barrier, mpsc};
use tower::Layer;

use shorten::application::services::MappingService;
use shorten::domain::entities::{InsertOutcome, NewMapping, UrlMapping};
use shorten::domain::hit_event::HitEvent;
use shorten::domain::repositories::MappingRepository;
use shorten::error::AppError;
use shorten::state::AppState;
use shorten::utils::code_generator::RandomCodeGenerator;

pub const TEST_HOST: &str = "s.example.com";
pub const TEST_PEER: &str = "127.0.0.1:12345";

/// In-memory [`MappingRepository`] with the same uniqueness rules as the
/// PostgreSQL schema. All mutations happen under one lock, so increments
/// are atomic. Every call yields to the scheduler first so concurrent
/// callers interleave between lookup and write.
#[derive(Default)]
pub struct InMemoryMappingRepository {
    by_code: Mutex<HashMap<String, UrlMapping>>,
    fail_writes: Mutex<bool>,
    lookup_gate: Mutex<Option<Arc<Barrier>>>,
    existing_outcomes: AtomicUsize,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent insert and increment fail with a storage error.
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    /// Holds every `find_by_url` until `callers` lookups have completed,
    /// so all of them miss before any insert runs.
    pub fn gate_lookups(&self, callers: usize) {
        *self.lookup_gate.lock().unwrap() = Some(Arc::new(Barrier::new(callers)));
    }

    /// Number of inserts answered with [`InsertOutcome::Existing`].
    pub fn existing_outcomes(&self) -> usize {
        self.existing_outcomes.load(Ordering::SeqCst)
    }

    pub fn seed(&self, code: &str, url: &str) {
        let mapping = NewMapping::now(code, url, "192.0.2.1").into_mapping();
        self.by_code
            .lock()
            .unwrap()
            .insert(code.to_string(), mapping);
    }

    pub fn hits(&self, code: &str) -> Option<u64> {
        self.by_code.lock().unwrap().get(code).map(|m| m.hits)
    }

    pub fn len(&self) -> usize {
        self.by_code.lock().unwrap().len()
    }

    fn writes_fail(&self) -> bool {
        *self.fail_writes.lock().unwrap()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<String>, AppError> {
        tokio::task::yield_now().await;

        let code = self
            .by_code
            .lock()
            .unwrap()
            .values()
            .find(|m| m.url == url)
            .map(|m| m.code.clone());

        let gate = self.lookup_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }

        Ok(code)
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        tokio::task::yield_now().await;
        Ok(self.by_code.lock().unwrap().contains_key(code))
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<InsertOutcome, AppError> {
        tokio::task::yield_now().await;

        if self.writes_fail() {
            return Err(AppError::storage("Database error", serde_json::json!({})));
        }

        let mut by_code = self.by_code.lock().unwrap();

        if let Some(existing) = by_code.values().find(|m| m.url == new_mapping.url) {
            self.existing_outcomes.fetch_add(1, Ordering::SeqCst);
            return Ok(InsertOutcome::Existing(existing.code.clone()));
        }
        if by_code.contains_key(&new_mapping.code) {
            return Ok(InsertOutcome::CodeTaken);
        }

        let code = new_mapping.code.clone();
        by_code.insert(code.clone(), new_mapping.into_mapping());
        Ok(InsertOutcome::Created(code))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError> {
        tokio::task::yield_now().await;
        Ok(self.by_code.lock().unwrap().get(code).cloned())
    }

    async fn increment_hits(&self, code: &str) -> Result<bool, AppError> {
        tokio::task::yield_now().await;

        if self.writes_fail() {
            return Err(AppError::storage("Database error", serde_json::json!({})));
        }

        Ok(match self.by_code.lock().unwrap().get_mut(code) {
            Some(mapping) => {
                mapping.hits += 1;
                true
            }
            None => false,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn create_test_state(
    repository: Arc<InMemoryMappingRepository>,
) -> (AppState, mpsc::Receiver<HitEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let service = MappingService::new(
        repository,
        Arc::new(RandomCodeGenerator::from_time()),
        tx,
    );

    (AppState::new(Arc::new(service), TEST_HOST), rx)
}

/// Polls until `code` has `expected` hits or the timeout elapses.
pub async fn wait_for_hits(
    repository: &InMemoryMappingRepository,
    code: &str,
    expected: u64,
) -> Option<u64> {
    for _ in 0..200 {
        if repository.hits(code) == Some(expected) {
            return Some(expected);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    repository.hits(code)
}

/// Inserts a fixed peer address so handlers using `ConnectInfo` work
/// without a real socket.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = TEST_PEER.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
