use serde::{Deserialize, Serialize};

/// A single text to classify.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub text: String,
}

/// Body of `POST /v1/models/<model>:predict`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub instances: Vec<Instance>,
}

impl PredictRequest {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: i64,
    pub confidence: f64,
}

/// Successful predict response; one prediction per request instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
}
