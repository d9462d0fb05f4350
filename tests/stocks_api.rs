//! End-to-end tests against a running server.

use std::collections::BTreeMap;
use std::io::Write;

use reqwest::StatusCode;
use serde_json::Value;
use stocks_api::catalog::seed;
use stocks_api::RecordStore;

mod common;

#[tokio::test]
async fn lists_builtin_catalog() {
    let server = common::start_server(RecordStore::builtin()).await;

    let res = common::client()
        .get(server.url("/stocks"))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), StatusCode::OK);

    let body: BTreeMap<String, Value> = res.json().await.unwrap();
    for id in ["9537", "221", "66", "149"] {
        assert!(body.contains_key(id), "missing {id}");
    }
    assert_eq!(body.len(), seed::BUILTIN.len());
}

#[tokio::test]
async fn every_id_resolves_to_its_record() {
    let server = common::start_server(RecordStore::builtin()).await;
    let client = common::client();

    for (oid, display_name) in seed::BUILTIN {
        let res = client
            .post(server.url("/stocks"))
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&[("oid", oid.to_string()), ("range", "1d".to_string())])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "oid {oid}");

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["data"][0]["symbol"]["oid"], *oid);
        assert_eq!(body["data"][0]["symbol"]["displayName"], *display_name);
    }
}

#[tokio::test]
async fn absent_id_is_not_found() {
    let server = common::start_server(RecordStore::builtin()).await;

    let res = common::client()
        .post(server.url("/stocks"))
        .body("oid=00000")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["httpStatus"], 404);
    assert!(body["error"].as_str().unwrap().contains("00000"));
}

#[tokio::test]
async fn body_without_oid_is_not_found() {
    let server = common::start_server(RecordStore::builtin()).await;

    let res = common::client()
        .post(server.url("/stocks"))
        .body("range=1d")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "can't find stock with oid: ");
}

#[tokio::test]
async fn preflight_succeeds_on_stocks() {
    let server = common::start_server(RecordStore::builtin()).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, server.url("/stocks"))
        .header("Origin", "http://widget.local")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type,x-requested-with")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn serves_catalog_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let catalog = serde_json::json!({
        "1": seed::fixture(1, "One"),
        "2": seed::fixture(2, "Two"),
    });
    write!(file, "{catalog}").unwrap();

    let store = RecordStore::load(file.path()).unwrap();
    let server = common::start_server(store).await;

    let body: BTreeMap<String, Value> = common::client()
        .get(server.url("/stocks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.keys().collect::<Vec<_>>(), vec!["1", "2"]);
}

#[tokio::test]
async fn health_endpoint_reports_catalog_size() {
    let server = common::start_server(RecordStore::builtin()).await;

    let res = common::client()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["records"], seed::BUILTIN.len());
}
