mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

const CATHEDRAL: &str = "/api/cities/2/pointsofinterest/3";

async fn patch(server: &common::TestServer, document: Value) -> Result<reqwest::Response> {
    Ok(server
        .as_city(Method::PATCH, CATHEDRAL, "Antwerp")?
        .json(&document)
        .send()
        .await?)
}

async fn cathedral(server: &common::TestServer) -> Result<Value> {
    let res = server.as_city(Method::GET, CATHEDRAL, "Antwerp")?.send().await?;
    let body = res.json::<Value>().await?;
    Ok(body["data"].clone())
}

#[tokio::test]
async fn replace_updates_only_the_named_field() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let before = cathedral(&server).await?;

    let res = patch(
        &server,
        json!([{ "op": "replace", "path": "/name", "value": "Updated - Cathedral" }]),
    )
    .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let after = cathedral(&server).await?;
    assert_eq!(after["name"], "Updated - Cathedral");
    assert_eq!(after["description"], before["description"]);
    assert_eq!(after["id"], 3);
    Ok(())
}

#[tokio::test]
async fn remove_description_sets_it_to_null() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = patch(&server, json!([{ "op": "remove", "path": "/description" }])).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let after = cathedral(&server).await?;
    assert_eq!(after["description"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn unknown_path_is_a_bad_request_and_changes_nothing() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let before = cathedral(&server).await?;

    let res = patch(
        &server,
        json!([
            { "op": "replace", "path": "/name", "value": "Applied first" },
            { "op": "replace", "path": "/nonexistent", "value": "x" }
        ]),
    )
    .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "BAD_REQUEST");

    assert_eq!(cathedral(&server).await?, before);
    Ok(())
}

#[tokio::test]
async fn whitespace_name_fails_validation_and_changes_nothing() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let before = cathedral(&server).await?;

    let res = patch(&server, json!([{ "op": "replace", "path": "/name", "value": "   " }])).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["name"], "The name can't be blank.");

    assert_eq!(cathedral(&server).await?, before);
    Ok(())
}

#[tokio::test]
async fn removing_name_fails_validation() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let before = cathedral(&server).await?;

    let res = patch(&server, json!([{ "op": "remove", "path": "/name" }])).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["name"].is_string());

    assert_eq!(cathedral(&server).await?, before);
    Ok(())
}

#[tokio::test]
async fn overlong_description_fails_validation() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = patch(
        &server,
        json!([{ "op": "replace", "path": "/description", "value": "d".repeat(201) }]),
    )
    .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn failed_test_operation_aborts_patch() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let before = cathedral(&server).await?;

    let res = patch(
        &server,
        json!([
            { "op": "test", "path": "/name", "value": "Not the cathedral" },
            { "op": "replace", "path": "/name", "value": "Should not apply" }
        ]),
    )
    .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(cathedral(&server).await?, before);
    Ok(())
}

#[tokio::test]
async fn malformed_document_is_rejected() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = patch(&server, json!({ "op": "replace", "path": "/name", "value": "x" })).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = patch(&server, json!([{ "op": "explode", "path": "/name" }])).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn patching_another_citys_point_is_forbidden() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .as_city(Method::PATCH, "/api/cities/3/pointsofinterest/5", "Antwerp")?
        .json(&json!([{ "op": "replace", "path": "/name", "value": "Mine now" }]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn patching_a_missing_point_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .as_city(Method::PATCH, "/api/cities/2/pointsofinterest/99", "Antwerp")?
        .json(&json!([{ "op": "replace", "path": "/name", "value": "Ghost" }]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
