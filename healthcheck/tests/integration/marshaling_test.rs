//! Integration Test: JSONシリアライズ

use healthcheck::aggregate;
use serde_json::Value;

use crate::support::{refused_url, transport, Endpoints};

#[tokio::test]
async fn test_marshaling() {
    let endpoints = Endpoints::start().await;
    let not_found = endpoints.not_found();
    let refused = refused_url();

    let result = aggregate(
        transport(),
        [not_found.clone()],
        [endpoints.success(), refused.clone()],
    )
    .await;

    let json: Value = serde_json::to_value(&result).expect("serialize result");
    assert_eq!(json["status"], "fail");

    let checks = json["checks"].as_object().expect("checks object");
    assert_eq!(checks.len(), 5);

    let status = &checks[&format!("{}:status", not_found)][0];
    assert_eq!(status["componentType"], "http");
    assert_eq!(status["observedValue"], 404);
    assert_eq!(status["status"], "fail");
    assert_eq!(status["output"], "HTTP 404 Not Found");
    assert!(status["time"].is_string());

    let duration = &checks[&format!("{}:duration", not_found)][0];
    assert_eq!(duration["observedUnit"], "ms");
    assert!(duration["observedValue"].is_f64());
    assert_eq!(duration["status"], "pass");

    let refused_status = &checks[&format!("{}:status", refused)][0];
    assert!(refused_status["observedValue"].is_null());
    assert_eq!(refused_status["status"], "fail");
    assert!(!checks.contains_key(&format!("{}:duration", refused)));
}
