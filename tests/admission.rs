//! Admission control in front of the list endpoints.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::get_from;

const CLIENT_A: [u8; 4] = [10, 0, 0, 1];
const CLIENT_B: [u8; 4] = [10, 0, 0, 2];

#[tokio::test]
async fn test_burst_then_throttle() {
    let router = common::server(&common::limited_config(2.0, 4)).router();

    for i in 0..4 {
        let (status, _) = get_from(&router, "/v1/movies", CLIENT_A).await;
        assert_eq!(status, StatusCode::OK, "request {i}");
    }

    let (status, body) = get_from(&router, "/v1/movies", CLIENT_A).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({ "error": "rate limit exceeded" }));

    // Another client has its own bucket.
    let (status, _) = get_from(&router, "/v1/movies", CLIENT_B).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rejection_comes_before_validation() {
    let router = common::server(&common::limited_config(2.0, 1)).router();

    let (status, _) = get_from(&router, "/v1/movies?sort=bogus", CLIENT_A).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = get_from(&router, "/v1/movies?sort=bogus", CLIENT_A).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_disabled_limiter_admits_everything() {
    let server = common::server(&common::config());
    let router = server.router();

    for _ in 0..500 {
        let (status, _) = get_from(&router, "/v1/healthcheck", CLIENT_A).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(server.limiter().tracked_clients(), 0);
}

#[tokio::test]
async fn test_forwarded_for_is_used_when_trusted() {
    let mut config = common::limited_config(2.0, 1);
    config.limiter.trust_forwarded_for = true;
    let server = common::server(&config);
    let router = server.router();

    for forwarded in ["203.0.113.1", "203.0.113.2"] {
        let request = axum::http::Request::builder()
            .uri("/v1/healthcheck")
            .header("x-forwarded-for", forwarded)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(router.clone(), request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{forwarded}");
    }
    assert_eq!(server.limiter().tracked_clients(), 2);
}

#[tokio::test]
async fn test_refill_over_real_time() {
    let server = common::server(&common::limited_config(2.0, 4));
    let (addr, shutdown) = common::spawn_server(server).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let url = format!("http://{addr}/v1/directors");

    for i in 0..4 {
        let res = client.get(&url).send().await.expect("server unreachable");
        assert_eq!(res.status(), 200, "request {i}");
    }
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 429);

    tokio::time::sleep(Duration::from_millis(600)).await;

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200, "one token should have refilled");
    assert!(res.headers().contains_key("x-request-id"));

    shutdown.trigger();
}
