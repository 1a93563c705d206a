use crate::error::LoadError;
use loadgen_core::{BasicAuth, PredictRequest, PredictResponse, RunConfig};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use std::time::{Duration, Instant};
use thiserror::Error;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Result of a single predict call.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestOutcome {
    /// 2xx response; `elapsed` runs from send until the full body was read.
    Success { status: StatusCode, elapsed: Duration },
    Failure(FailureReason),
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success { .. })
    }
}

/// Why a request counted as a failure. None of these stop the worker.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FailureReason {
    #[error("status code {0}")]
    Status(StatusCode),

    #[error("{0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Issues timed predict calls against one endpoint.
///
/// Holds a single `reqwest::Client` so connections are pooled across every worker sharing it.
pub struct Executor {
    client: Client,
    url: Url,
    health_url: Url,
    auth: Option<BasicAuth>,
    verify_predictions: bool,
}

impl Executor {
    pub fn new(config: &RunConfig) -> Result<Self, LoadError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
            health_url: config.health_url(),
            auth: config.auth.clone(),
            verify_predictions: config.verify_predictions,
        })
    }

    /// Check that the target answers at all before the run starts.
    ///
    /// Any HTTP response counts as reachable; only a transport error is fatal.
    pub async fn preflight(&self) -> Result<(), LoadError> {
        let request = self.authorize(self.client.get(self.health_url.clone()));
        match request.send().await {
            Ok(res) if res.status().is_success() => {
                debug!("Health check at {} succeeded", self.health_url);
                Ok(())
            }
            Ok(res) => {
                warn!(
                    "Health check at {} returned {}; starting anyway",
                    self.health_url,
                    res.status()
                );
                Ok(())
            }
            Err(source) => Err(LoadError::Unreachable {
                url: self.health_url.to_string(),
                source,
            }),
        }
    }

    pub async fn execute(&self, payload: &PredictRequest) -> RequestOutcome {
        let request = self.authorize(self.client.post(self.url.clone()).json(payload));

        let start = Instant::now();
        let outcome = match request.send().await {
            Ok(res) if res.status().is_success() => {
                let status = res.status();
                if self.verify_predictions {
                    match res.json::<PredictResponse>().await {
                        Ok(body) if body.predictions.len() == payload.len() => {
                            RequestOutcome::Success {
                                status,
                                elapsed: start.elapsed(),
                            }
                        }
                        Ok(body) => RequestOutcome::Failure(FailureReason::Malformed(format!(
                            "expected {} predictions, got {}",
                            payload.len(),
                            body.predictions.len()
                        ))),
                        Err(err) if err.is_decode() => {
                            RequestOutcome::Failure(FailureReason::Malformed(err.to_string()))
                        }
                        Err(err) => RequestOutcome::Failure(transport(&err)),
                    }
                } else {
                    match res.bytes().await {
                        Ok(_) => RequestOutcome::Success {
                            status,
                            elapsed: start.elapsed(),
                        },
                        Err(err) => RequestOutcome::Failure(transport(&err)),
                    }
                }
            }
            Ok(res) => RequestOutcome::Failure(FailureReason::Status(res.status())),
            Err(err) => RequestOutcome::Failure(transport(&err)),
        };

        #[cfg(feature = "metrics")]
        emit_metrics(&outcome);

        outcome
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(auth) => request.basic_auth(&auth.username, Some(&auth.password)),
            None => request,
        }
    }
}

fn transport(err: &reqwest::Error) -> FailureReason {
    if err.is_timeout() {
        FailureReason::Transport(format!("timed out: {err}"))
    } else {
        FailureReason::Transport(err.to_string())
    }
}

#[cfg(feature = "metrics")]
fn emit_metrics(outcome: &RequestOutcome) {
    match outcome {
        RequestOutcome::Success { elapsed, .. } => {
            metrics::counter!("loadgen_requests_success").increment(1);
            metrics::histogram!("loadgen_request_latency").record(elapsed.as_secs_f64());
        }
        RequestOutcome::Failure(_) => {
            metrics::counter!("loadgen_requests_error").increment(1);
        }
    }
}
