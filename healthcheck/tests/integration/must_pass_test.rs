//! Integration Test: must-pass層
//!
//! must-pass層のURLが失敗した場合は全体が`fail`になる。

use healthcheck::types::health::ObservedValue;
use healthcheck::{aggregate, MeasurementKind, Status};

use crate::support::{refused_url, transport, Endpoints};

const NONE: [&str; 0] = [];

#[tokio::test]
async fn test_successful_must_pass() {
    let endpoints = Endpoints::start().await;

    let result = aggregate(transport(), [endpoints.success()], NONE).await;

    assert_eq!(result.status(), Status::Pass);
    assert_eq!(result.measurements().len(), 2);
    for measurement in result.measurements() {
        assert_eq!(measurement.status(), Status::Pass);
    }
}

#[tokio::test]
async fn test_failed_must_pass() {
    let endpoints = Endpoints::start().await;

    let result = aggregate(transport(), [endpoints.internal_error()], NONE).await;

    assert_eq!(result.status(), Status::Fail);
    assert_eq!(result.measurements().len(), 2);
    for measurement in result.measurements() {
        match measurement.kind() {
            MeasurementKind::Status => {
                assert_eq!(measurement.status(), Status::Fail);
                assert_eq!(measurement.observed_value(), ObservedValue::StatusCode(500));
            }
            MeasurementKind::Duration => assert_eq!(measurement.status(), Status::Pass),
        }
    }
}

#[tokio::test]
async fn test_timeout_must_pass() {
    let endpoints = Endpoints::start().await;

    let result = aggregate(transport(), [endpoints.long_delay()], NONE).await;

    assert_eq!(result.status(), Status::Fail);
    assert_eq!(result.measurements().len(), 1);
    let status = &result.measurements()[0];
    assert_eq!(status.kind(), MeasurementKind::Status);
    assert_eq!(status.status(), Status::Fail);
    assert_eq!(status.observed_value(), ObservedValue::NoResponse);
}

#[tokio::test]
async fn test_refused_must_pass() {
    let result = aggregate(transport(), [refused_url()], NONE).await;

    assert_eq!(result.status(), Status::Fail);
    assert_eq!(result.measurements().len(), 1);
    assert!(result.measurements()[0].output().is_some());
}

#[tokio::test]
async fn test_mixed_must_pass() {
    let endpoints = Endpoints::start().await;

    let result = aggregate(
        transport(),
        [endpoints.success(), endpoints.internal_error()],
        NONE,
    )
    .await;

    assert_eq!(result.status(), Status::Fail);
    assert_eq!(result.measurements().len(), 4);

    let (mut passes, mut failures) = (0, 0);
    for measurement in result.measurements() {
        match measurement.kind() {
            MeasurementKind::Status if measurement.status() == Status::Pass => {
                passes += 1;
                assert_eq!(measurement.observed_value(), ObservedValue::StatusCode(200));
            }
            MeasurementKind::Status => {
                failures += 1;
                assert_eq!(measurement.observed_value(), ObservedValue::StatusCode(500));
            }
            MeasurementKind::Duration => assert_eq!(measurement.status(), Status::Pass),
        }
    }
    assert_eq!(passes, 1);
    assert_eq!(failures, 1);
}
