mod harness;

use std::time::Duration;

use crossbar_config::RoutingStrategy;
use harness::config::{ConfigBuilder, openai_model, openai_model_with_budget, router};
use harness::mock_llm::MockLlm;
use harness::server::TestServer;

fn chat_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "message": { "role": "user", "content": text }
    })
}

#[tokio::test]
async fn primary_serves_and_response_is_stamped() {
    let primary = MockLlm::start().await.unwrap();
    let backup = MockLlm::start_with_response("backup response").await.unwrap();

    let config = ConfigBuilder::new()
        .with_router(router(
            "default",
            RoutingStrategy::Priority,
            vec![
                openai_model("primary", &primary.base_url(), 1),
                openai_model("backup", &backup.base_url(), 1),
            ],
        ))
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/language/default/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["model_response"]["message"]["content"], "Hello from mock LLM");
    assert_eq!(json["router_id"], "default");
    assert_eq!(json["model_id"], "primary");
    assert_eq!(json["provider"], "openai");

    assert_eq!(primary.completion_count(), 1);
    assert_eq!(backup.completion_count(), 0);
}

#[tokio::test]
async fn failover_to_backup_on_upstream_error() {
    let primary = MockLlm::start_failing(1).await.unwrap();
    let backup = MockLlm::start_with_response("backup response").await.unwrap();

    let config = ConfigBuilder::new()
        .with_router(router(
            "default",
            RoutingStrategy::Priority,
            vec![
                openai_model("primary", &primary.base_url(), 1),
                openai_model("backup", &backup.base_url(), 1),
            ],
        ))
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/language/default/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["model_response"]["message"]["content"], "backup response");
    assert_eq!(json["model_id"], "backup");

    assert_eq!(primary.completion_count(), 1);
    assert_eq!(backup.completion_count(), 1);
}

#[tokio::test]
async fn failover_on_rate_limit_and_recovery_after_cooldown() {
    let primary = MockLlm::start_rate_limited(1, 1).await.unwrap();
    let backup = MockLlm::start_with_response("backup response").await.unwrap();

    let config = ConfigBuilder::new()
        .with_router(router(
            "default",
            RoutingStrategy::Priority,
            vec![
                openai_model("primary", &primary.base_url(), 1),
                openai_model("backup", &backup.base_url(), 1),
            ],
        ))
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/language/default/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["model_id"], "backup");

    // While the cooldown runs, the primary stays out of rotation
    let resp = server
        .client()
        .post(server.url("/v1/language/default/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["model_id"], "backup");
    assert_eq!(primary.completion_count(), 1);

    // After the Retry-After window the primary serves again
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let resp = server
        .client()
        .post(server.url("/v1/language/default/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["model_id"], "primary");
    assert_eq!(primary.completion_count(), 2);
}

#[tokio::test]
async fn all_models_failing_returns_service_unavailable() {
    let primary = MockLlm::start_failing(10).await.unwrap();
    let backup = MockLlm::start_failing(10).await.unwrap();

    let config = ConfigBuilder::new()
        .with_router(router(
            "default",
            RoutingStrategy::Priority,
            vec![
                openai_model("primary", &primary.base_url(), 1),
                openai_model("backup", &backup.base_url(), 1),
            ],
        ))
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/language/default/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 503);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["type"], "all_models_unavailable");
}

#[tokio::test]
async fn drained_budgets_fail_fast_without_provider_calls() {
    let upstream = MockLlm::start_failing(10).await.unwrap();

    let config = ConfigBuilder::new()
        .with_router(router(
            "default",
            RoutingStrategy::Priority,
            vec![openai_model_with_budget("only", &upstream.base_url(), 1, "60s")],
        ))
        .build();

    let server = TestServer::start(config).await.unwrap();

    // Burns the single budget token
    let resp = server
        .client()
        .post(server.url("/v1/language/default/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    assert_eq!(upstream.completion_count(), 1);

    // Now the model is out of rotation entirely
    let resp = server
        .client()
        .post(server.url("/v1/language/default/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["type"], "no_models_available");
    assert_eq!(upstream.completion_count(), 1);
}

#[tokio::test]
async fn weighted_round_robin_follows_configured_weights() {
    let heavy = MockLlm::start().await.unwrap();
    let light_one = MockLlm::start().await.unwrap();
    let light_two = MockLlm::start().await.unwrap();

    let config = ConfigBuilder::new()
        .with_router(router(
            "default",
            RoutingStrategy::WeightedRoundRobin,
            vec![
                openai_model("heavy", &heavy.base_url(), 3),
                openai_model("light-one", &light_one.base_url(), 1),
                openai_model("light-two", &light_two.base_url(), 1),
            ],
        ))
        .build();

    let server = TestServer::start(config).await.unwrap();

    for _ in 0..50 {
        let resp = server
            .client()
            .post(server.url("/v1/language/default/chat"))
            .json(&chat_body("Hello"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    assert_eq!(heavy.completion_count(), 30);
    assert_eq!(light_one.completion_count(), 10);
    assert_eq!(light_two.completion_count(), 10);
}

#[tokio::test]
async fn unknown_router_is_not_found() {
    let upstream = MockLlm::start().await.unwrap();

    let config = ConfigBuilder::new()
        .with_router(router(
            "default",
            RoutingStrategy::Priority,
            vec![openai_model("only", &upstream.base_url(), 1)],
        ))
        .build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/language/nonexistent/chat"))
        .json(&chat_body("Hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["type"], "router_not_found");
    assert_eq!(upstream.completion_count(), 0);
}

#[tokio::test]
async fn round_robin_alternates_between_models() {
    let first = MockLlm::start().await.unwrap();
    let second = MockLlm::start().await.unwrap();

    let config = ConfigBuilder::new()
        .with_router(router(
            "default",
            RoutingStrategy::RoundRobin,
            vec![
                openai_model("first", &first.base_url(), 1),
                openai_model("second", &second.base_url(), 1),
            ],
        ))
        .build();

    let server = TestServer::start(config).await.unwrap();

    for _ in 0..6 {
        let resp = server
            .client()
            .post(server.url("/v1/language/default/chat"))
            .json(&chat_body("Hello"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    assert_eq!(first.completion_count(), 3);
    assert_eq!(second.completion_count(), 3);
}
