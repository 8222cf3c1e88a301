use axum::http::StatusCode;
use tokio::task::JoinSet;

use crate::build_router;
use crate::tests::common::{
    get, greeter_endpoint, spawn_greeter, test_router, test_state_with_upstream,
};

fn lines(body: &str) -> Vec<&str> {
    body.lines().collect()
}

#[tokio::test]
async fn test_hello_in_english() {
    let (status, body) =
        get(test_router(), "/hello/Nick/", Some("en-US,en;q=0.9"), Some("UTC")).await;
    assert_eq!(status, StatusCode::OK);

    let lines = lines(&body);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Current language: en-US");
    assert_eq!(lines[1], "Nick has 1 cat.");
    assert_eq!(lines[2], "Nick has 2 cats.");
    assert!(lines[3].starts_with("(UTC) "), "{}", lines[3]);
    assert!(lines[3].ends_with('Z'), "{}", lines[3]);
}

#[tokio::test]
async fn test_hello_in_chinese() {
    let (status, body) =
        get(test_router(), "/hello/Nick/", Some("zh-CN,zh;q=0.9"), Some("America/New_York")).await;
    assert_eq!(status, StatusCode::OK);

    let lines = lines(&body);
    assert_eq!(lines[0], "当前语言：zh-CN");
    assert_eq!(lines[1], "Nick 有 1 只猫。");
    assert_eq!(lines[2], "Nick 有 2 只猫。");
    assert!(lines[3].starts_with("(America/New_York) "), "{}", lines[3]);
}

#[tokio::test]
async fn test_hello_without_headers_uses_defaults() {
    let (status, body) = get(test_router(), "/hello/Nick/", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let lines = lines(&body);
    assert_eq!(lines[0], "Current language: en-US");
    assert!(lines[3].starts_with("(Asia/Shanghai) "), "{}", lines[3]);
    assert!(lines[3].ends_with("+08:00"), "{}", lines[3]);
}

#[tokio::test]
async fn test_unusable_headers_fall_back() {
    let (status, body) =
        get(test_router(), "/hello/Nick/", Some("fr-FR,de;q=0.5"), Some("Moon/Base")).await;
    assert_eq!(status, StatusCode::OK);

    let lines = lines(&body);
    assert_eq!(lines[0], "Current language: en-US");
    assert!(lines[3].starts_with("(Asia/Shanghai) "), "{}", lines[3]);
}

#[tokio::test]
async fn test_hello_with_task_matches_direct_route() {
    let (status, body) =
        get(test_router(), "/hello-with-task/Nick/", Some("zh-CN"), Some("Europe/Berlin")).await;
    assert_eq!(status, StatusCode::OK);

    let lines = lines(&body);
    assert_eq!(lines[0], "当前语言：zh-CN");
    assert_eq!(lines[2], "Nick 有 2 只猫。");
    assert!(lines[3].starts_with("(Europe/Berlin) "), "{}", lines[3]);
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_own_context() {
    let router = test_router();
    let mut requests = JoinSet::new();

    for i in 0..50 {
        let router = router.clone();
        requests.spawn(async move {
            let (language, timezone, expected_first, expected_tz) = if i % 2 == 0 {
                ("zh-CN", "UTC", "当前语言：zh-CN", "(UTC) ")
            } else {
                ("en-US", "Asia/Tokyo", "Current language: en-US", "(Asia/Tokyo) ")
            };
            let (status, body) =
                get(router, "/hello/Nick/", Some(language), Some(timezone)).await;
            assert_eq!(status, StatusCode::OK);

            let lines: Vec<&str> = body.lines().collect();
            assert_eq!(lines[0], expected_first);
            assert!(lines[3].starts_with(expected_tz), "{}", lines[3]);
        });
    }

    while let Some(result) = requests.join_next().await {
        result.unwrap();
    }
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let (status, body) = get(test_router(), "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(doc["paths"].get("/hello/{username}/").is_some());
    assert!(doc["paths"].get("/hello-with-task/{username}/").is_some());
    assert!(doc["paths"].get("/hello-with-grpc/{username}/").is_some());
}

#[tokio::test]
async fn test_hello_with_grpc_forwards_language_and_timezone() {
    let addr = spawn_greeter().await;
    let router = build_router(test_state_with_upstream(greeter_endpoint(addr)));

    let (status, body) =
        get(router.clone(), "/hello-with-grpc/Nick/", Some("zh-CN,zh;q=0.9"), Some("UTC")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "你好，Nick。");

    let (status, body) = get(router, "/hello-with-grpc/Nick/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello Nick.");
}

#[tokio::test]
async fn test_hello_with_grpc_unreachable_upstream() {
    // Bind then drop so nothing is listening on the port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let router = build_router(test_state_with_upstream(greeter_endpoint(addr)));
    let (status, body) = get(router, "/hello-with-grpc/Nick/", Some("en-US"), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], 5003);
}
