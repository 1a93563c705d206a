use axum::{
    debug_handler,
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use loadgen_core::{PredictRequest, PredictResponse, Prediction, DEFAULT_MODEL_NAME};
use metrics::counter;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// How the predict route answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    AlwaysOk,
    /// Requests are numbered in arrival order; even ones succeed, odd ones get a 500.
    Alternate,
    AlwaysStatus(u16),
    /// 200 with one prediction fewer than the request had instances.
    ShortPredictions,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub model: String,
    pub behavior: Behavior,
    pub latency: Duration,
    /// Standard deviation of normally distributed noise added to `latency`.
    pub jitter: Option<Duration>,
    /// Requests beyond this rate get a 503.
    pub max_tps: Option<NonZeroU32>,
    /// Exact `Authorization` header value every predict request must carry.
    pub required_auth: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_NAME.to_string(),
            behavior: Behavior::AlwaysOk,
            latency: Duration::ZERO,
            jitter: None,
            max_tps: None,
            required_auth: None,
        }
    }
}

impl MockConfig {
    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.jitter = Some(jitter);
        self
    }

    pub fn max_tps(mut self, max_tps: NonZeroU32) -> Self {
        self.max_tps = Some(max_tps);
        self
    }

    pub fn required_auth(mut self, header: impl Into<String>) -> Self {
        self.required_auth = Some(header.into());
        self
    }
}

struct MockState {
    config: MockConfig,
    hits: Arc<AtomicU64>,
    limiter: Option<DefaultDirectRateLimiter>,
    jitter: Option<Normal<f64>>,
}

impl MockState {
    fn delay(&self) -> Duration {
        match &self.jitter {
            Some(normal) => {
                let secs = normal.sample(&mut rand::thread_rng()).max(0.);
                Duration::from_secs_f64(secs)
            }
            None => self.config.latency,
        }
    }
}

/// A running mock bound to a local port.
pub struct MockHandle {
    pub addr: SocketAddr,
    hits: Arc<AtomicU64>,
}

impl MockHandle {
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Predict requests received so far, whatever their outcome.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}

pub fn router(config: MockConfig) -> (Router, Arc<AtomicU64>) {
    let hits = Arc::new(AtomicU64::new(0));
    let jitter = config
        .jitter
        .and_then(|std| Normal::new(config.latency.as_secs_f64(), std.as_secs_f64()).ok());
    let state = MockState {
        limiter: config.max_tps.map(rate_limiter),
        jitter,
        hits: hits.clone(),
        config,
    };

    let app = Router::new()
        .route("/v1/models/:target", get(health).post(predict))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http());

    (app, hits)
}

/// Bind an ephemeral port on 127.0.0.1 and serve in the background.
pub async fn spawn(config: MockConfig) -> std::io::Result<MockHandle> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (app, hits) = router(config);

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });

    Ok(MockHandle { addr, hits })
}

#[derive(Serialize)]
struct Ready {
    status: &'static str,
}

async fn health(
    State(state): State<Arc<MockState>>,
    Path(target): Path<String>,
) -> Result<Json<Ready>, StatusCode> {
    if target == state.config.model {
        Ok(Json(Ready { status: "ready" }))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

#[debug_handler]
async fn predict(
    State(state): State<Arc<MockState>>,
    Path(target): Path<String>,
    headers: HeaderMap,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, StatusCode> {
    let seq = state.hits.fetch_add(1, Ordering::Relaxed);
    counter!("mock_service_requests").increment(1);

    if target.strip_suffix(":predict") != Some(state.config.model.as_str()) {
        return Err(StatusCode::NOT_FOUND);
    }

    if let Some(expected) = &state.config.required_auth {
        let given = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        if given != Some(expected.as_str()) {
            debug!("Rejecting predict request {seq}: bad credentials");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    tokio::time::sleep(state.delay()).await;

    if let Some(limiter) = &state.limiter {
        if limiter.check().is_err() {
            debug!("Throttling predict request {seq}");
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    match state.config.behavior {
        Behavior::AlwaysOk => Ok(Json(classify(&request, request.len()))),
        Behavior::Alternate if seq % 2 == 0 => Ok(Json(classify(&request, request.len()))),
        Behavior::Alternate => Err(StatusCode::INTERNAL_SERVER_ERROR),
        Behavior::AlwaysStatus(code) => {
            Err(StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
        }
        Behavior::ShortPredictions => Ok(Json(classify(
            &request,
            request.len().saturating_sub(1),
        ))),
    }
}

/** Utils **/

const NEGATIVE_WORDS: [&str; 6] = [
    "terrible",
    "awful",
    "disappointed",
    "waste",
    "never",
    "doesn't",
];

/// Keyword sentiment: 0 when a negative word appears, 1 otherwise.
fn classify(request: &PredictRequest, count: usize) -> PredictResponse {
    let predictions = request
        .instances
        .iter()
        .take(count)
        .map(|instance| {
            let text = instance.text.to_lowercase();
            if NEGATIVE_WORDS.iter().any(|word| text.contains(word)) {
                Prediction {
                    prediction: 0,
                    confidence: 0.87,
                }
            } else {
                Prediction {
                    prediction: 1,
                    confidence: 0.91,
                }
            }
        })
        .collect();

    PredictResponse { predictions }
}

pub fn rate_limiter(tps: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps))
}

/** TPS Printer **/

pub async fn tps_measure_task(hits: Arc<AtomicU64>) {
    let mut last = 0;
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let total = hits.load(Ordering::Relaxed);
        println!("{} TPS", total - last);
        last = total;
    }
}
