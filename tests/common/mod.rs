#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use certpulse::tls::{CertificateProbe, ProbeOutcome, ProbeTarget};
use chrono::{Duration, Utc};
use reqwest::Url;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::net::TcpListener;

/// Probe answering from a fixed per-domain table
pub struct TableProbe {
    outcomes: HashMap<String, ProbeOutcome>,
    calls: Mutex<Vec<String>>,
}

impl TableProbe {
    pub fn new(outcomes: &[(&str, ProbeOutcome)]) -> Self {
        Self {
            outcomes: outcomes
                .iter()
                .map(|(domain, outcome)| ((*domain).to_string(), outcome.clone()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Virtual hosts probed so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CertificateProbe for TableProbe {
    async fn probe(&self, target: &ProbeTarget) -> ProbeOutcome {
        self.calls
            .lock()
            .unwrap()
            .push(target.virtual_host.clone());
        self.outcomes
            .get(&target.virtual_host)
            .cloned()
            .unwrap_or(ProbeOutcome::ConnectionError {
                message: "unknown domain".to_string(),
            })
    }
}

/// Certificate expiring `days` whole days from now
pub fn expiring_in(days: i64) -> ProbeOutcome {
    ProbeOutcome::CertificateFound {
        not_after: Utc::now() + Duration::days(days) + Duration::hours(6),
    }
}

/// Requests received by the fake webhook
#[derive(Clone)]
pub struct Webhook {
    pub url: Url,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl Webhook {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(content-type, json body)` of every request
    pub fn received(&self) -> Vec<(Option<String>, Value)> {
        self.received.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct HookState {
    status: StatusCode,
    reply: &'static str,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn receive(
    State(state): State<HookState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, &'static str) {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    state.received.lock().unwrap().push((content_type, payload));
    (state.status, state.reply)
}

/// Start a local webhook receiver answering every POST with `status` and `reply`
pub async fn spawn_webhook(status: StatusCode, reply: &'static str) -> Webhook {
    let calls = Arc::new(AtomicUsize::new(0));
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = HookState {
        status,
        reply,
        calls: calls.clone(),
        received: received.clone(),
    };

    let app = Router::new().route("/hook", post(receive)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Webhook {
        url: Url::parse(&format!("http://{addr}/hook")).unwrap(),
        calls,
        received,
    }
}
