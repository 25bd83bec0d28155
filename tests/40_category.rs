mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::{send, TestServer};

#[tokio::test]
async fn upsert_inserts_then_updates() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.login().await?;

    let (status, body) = send(
        server
            .authed(Method::POST, "/manage/category/add", &token)
            .json(&json!({ "name": "fruit" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let uuid = body["uuid"].as_str().unwrap_or_default().to_string();
    assert_eq!(uuid.len(), 32);

    let (_, body) = send(
        server
            .authed(Method::POST, "/manage/category/add", &token)
            .json(&json!({ "id": 1, "uuid": uuid, "name": "fruits" })),
    )
    .await?;
    assert_eq!(body["code"], 0);

    let (_, body) = send(server.authed(Method::GET, "/manage/category/list", &token)).await?;
    assert_eq!(body["total"], 1);
    assert_eq!(body["result"][0]["name"], "fruits");
    assert_eq!(body["result"][0]["uuid"], uuid.as_str());
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_category_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.login().await?;

    let (status, body) = send(
        server
            .authed(Method::POST, "/manage/category/add", &token)
            .json(&json!({ "id": 9, "name": "ghost" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], -3);
    Ok(())
}

#[tokio::test]
async fn list_pages_and_delete() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.login().await?;
    for name in ["a", "b", "c"] {
        send(
            server
                .authed(Method::POST, "/manage/category/add", &token)
                .json(&json!({ "name": name })),
        )
        .await?;
    }

    let (_, body) = send(server.authed(Method::GET, "/manage/category/list?page=2&size=2", &token)).await?;
    assert_eq!(body["total"], 3);
    assert_eq!(body["result"].as_array().map(Vec::len), Some(1));

    let (_, body) = send(server.authed(Method::DELETE, "/manage/category/2", &token)).await?;
    assert_eq!(body["code"], 0);
    let (_, body) = send(server.authed(Method::GET, "/manage/category/list", &token)).await?;
    assert_eq!(body["total"], 2);

    let (status, _) = send(server.client.get(server.url("/manage/category/list"))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
