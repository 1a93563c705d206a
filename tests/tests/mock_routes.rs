mod utils;
#[allow(unused)]
use utils::*;

use mock_service::MockConfig;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn predict_route_classifies_each_instance() {
    init();
    let handle = mock_service::spawn(MockConfig::default()).await.unwrap();
    let url = format!(
        "http://{}/v1/models/sentiment-classifier:predict",
        handle.addr
    );

    let res = Client::new()
        .post(url)
        .json(&json!({"instances": [
            {"text": "Fantastic customer support"},
            {"text": "Terrible experience, would not recommend"},
        ]}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0]["prediction"], 1);
    assert_eq!(predictions[1]["prediction"], 0);
    assert_eq!(handle.hits(), 1);
}

#[tokio::test]
async fn health_route_knows_its_model() {
    init();
    let handle = mock_service::spawn(MockConfig::default()).await.unwrap();
    let client = Client::new();

    let ok = client
        .get(format!("http://{}/v1/models/sentiment-classifier", handle.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let missing = client
        .get(format!("http://{}/v1/models/nope", handle.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
