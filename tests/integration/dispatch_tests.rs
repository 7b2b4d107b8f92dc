//! Submission dispatch against a mock form endpoint

use crate::test_user_agent;
use formcast::answers::OverrideMap;
use formcast::dispatch::{DispatchConfig, Dispatcher, Outcome, RetryPolicy, StatsRecorder};
use formcast::schema::{FormSchema, Question, QuestionKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUBMIT_PATH: &str = "/forms/d/e/abc/formResponse";

/// Schema with one single-choice question and two hidden fields
fn side_schema(base_url: &str) -> Arc<FormSchema> {
    let mut schema = FormSchema::new(
        format!("{}/forms/d/e/abc/viewform", base_url),
        format!("{}{}", base_url, SUBMIT_PATH),
    );
    schema.insert_question(Question {
        id: "entry.1002".to_string(),
        text: "Pick a side".to_string(),
        kind: QuestionKind::SingleChoice,
        options: vec!["Left".to_string(), "Right".to_string()],
        required: true,
    });
    schema
        .hidden_fields
        .insert("fbzx".to_string(), "-7331".to_string());
    schema.hidden_fields.insert("fvv".to_string(), "1".to_string());
    Arc::new(schema)
}

/// Millisecond backoff without jitter so retry paths finish quickly
fn fast_config(workers: usize, max_retries: u32) -> DispatchConfig {
    DispatchConfig {
        workers,
        retry: RetryPolicy {
            max_retries,
            unit: Duration::from_millis(1),
            cap_units: 60,
            max_jitter: Duration::ZERO,
        },
        request_timeout: Duration::from_secs(5),
        request_delay: Duration::ZERO,
        user_agent: test_user_agent(),
    }
}

async fn mount_status(mock_server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_all_submissions_succeed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(10)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(3, 20)).unwrap();
    let stats = dispatcher.run(10).await;

    assert_eq!(stats.success, 10);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.retries, 0);
    assert!(stats.reasons.is_empty());
}

#[tokio::test]
async fn test_zero_count_sends_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(4, 20)).unwrap();
    let stats = dispatcher.run(0).await;

    assert_eq!(stats.completed(), 0);
    assert_eq!(stats.retries, 0);
}

#[tokio::test]
async fn test_more_workers_than_submissions() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 200).await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(8, 20)).unwrap();
    let stats = dispatcher.run(3).await;

    assert_eq!(stats.success, 3);
    assert_eq!(stats.completed(), 3);
}

#[tokio::test]
async fn test_repeated_rate_limit_exhausts_retries() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(21)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(1, 20)).unwrap();
    let stats = dispatcher.run(1).await;

    assert_eq!(stats.success, 0);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.retries, 20);
    assert_eq!(stats.reasons.get("status 429 (max retries)"), Some(&1));
}

#[tokio::test]
async fn test_not_found_fails_without_retry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(1, 20)).unwrap();
    let stats = dispatcher.run(1).await;

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.retries, 0);
    assert_eq!(stats.reasons.get("status 404"), Some(&1));
}

#[tokio::test]
async fn test_forbidden_is_terminal() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 403).await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(2, 20)).unwrap();
    let stats = dispatcher.run(4).await;

    assert_eq!(stats.failed, 4);
    assert_eq!(stats.retries, 0);
    assert_eq!(stats.reasons.get("status 403"), Some(&4));
}

#[tokio::test]
async fn test_transient_errors_then_success() {
    let mock_server = MockServer::start().await;

    // Registered first, so it answers until exhausted
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    mount_status(&mock_server, 200).await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(1, 20)).unwrap();
    let stats = dispatcher.run(1).await;

    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.retries, 2);
}

#[tokio::test]
async fn test_connection_refused_retries_then_fails() {
    // Nothing listens on the discard port
    let dispatcher = Dispatcher::new(side_schema("http://127.0.0.1:9"), fast_config(1, 2)).unwrap();
    let stats = dispatcher.run(1).await;

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.reasons.values().sum::<u64>(), 1);
}

#[tokio::test]
async fn test_observer_sees_every_outcome() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 200).await;

    let seen = Arc::new(AtomicU64::new(0));
    let counter = seen.clone();
    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(3, 20))
        .unwrap()
        .with_observer(Arc::new(move |outcome: Outcome| {
            assert!(outcome.is_success());
            counter.fetch_add(1, Ordering::SeqCst);
        }));

    dispatcher.run(7).await;

    assert_eq!(seen.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn test_body_carries_hidden_fields_and_overrides() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut overrides = OverrideMap::new();
    overrides.insert("entry.1002", "Left");

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(2, 20))
        .unwrap()
        .with_overrides(overrides)
        .with_seed(Some(7));
    let stats = dispatcher.run(5).await;
    assert_eq!(stats.success, 5);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
    for request in requests {
        let body = String::from_utf8(request.body).unwrap();
        let fields: Vec<&str> = body.split('&').collect();
        assert!(fields.contains(&"entry.1002=Left"), "{}", body);
        assert!(fields.contains(&"fbzx=-7331"), "{}", body);
        assert!(fields.contains(&"fvv=1"), "{}", body);
    }
}

#[tokio::test]
async fn test_caller_held_stats_match_result() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 200).await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(2, 20)).unwrap();
    let recorder = StatsRecorder::new();
    let stats = dispatcher.run_with_stats(6, recorder.clone()).await;

    assert_eq!(recorder.snapshot(), stats);
    assert_eq!(stats.success, 6);
}

#[tokio::test]
async fn test_panicking_observer_does_not_strand_submissions() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 200).await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(1, 20))
        .unwrap()
        .with_observer(Arc::new(|_: Outcome| panic!("observer bug")));
    let stats = dispatcher.run(5).await;

    assert_eq!(stats.completed(), 5);
    assert_eq!(stats.success, 5);
}

#[tokio::test]
async fn test_dropping_run_keeps_partial_stats_and_stops_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::new(side_schema(&mock_server.uri()), fast_config(2, 20)).unwrap();
    let recorder = StatsRecorder::new();

    let result = tokio::time::timeout(
        Duration::from_millis(350),
        dispatcher.run_with_stats(100, recorder.clone()),
    )
    .await;
    assert!(result.is_err());

    let partial = recorder.snapshot();
    assert!(partial.completed() > 0, "{:?}", partial);
    assert!(partial.completed() < 100, "{:?}", partial);

    let at_cancel = mock_server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(400)).await;
    let later = mock_server.received_requests().await.unwrap().len();
    assert_eq!(at_cancel, later);
    assert_eq!(recorder.snapshot(), partial);
}
