//! HTTP-level tests for the content schema endpoints.
//!
//! Drives the router in-process with `oneshot`; the host is a snapshot
//! built from inline YAML.

use std::sync::Arc;

use axum::body::Body;
use content_schema_core::{SchemaService, SchemaServiceImpl, SnapshotHost};
use content_schema_server::router::{build_router, normalize_prefix};
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

const SNAPSHOT: &str = r#"
sites:
  - { id: 1, handle: en, name: English, language: en-US, primary: true, hasUrls: true }
sections:
  - { id: 1, handle: blog, name: Blog, type: channel, entryTypes: [post] }
  - { id: 2, handle: pages, name: Pages, type: structure, entryTypes: [landing] }
entryTypes:
  - { id: 1, handle: post, name: Post, hasTitleField: true, fields: [title, body, sections] }
  - { id: 2, handle: landing, name: Landing, hasTitleField: true, fields: [title, blocks] }
  - { id: 3, handle: text, name: Text, fields: [body] }
  - { id: 4, handle: gallery, name: Gallery, fields: [images] }
fields:
  - { id: 1, handle: body, name: Body, kind: craft\ckeditor\Field, translationMethod: site }
  - { id: 2, handle: images, name: Images, kind: craft\fields\Assets, translationMethod: none }
  - { id: 3, handle: sections, name: Sections, kind: craft\fields\Matrix, translationMethod: site, entryTypes: [text, gallery] }
  - { id: 4, handle: heading, name: Heading, kind: craft\fields\PlainText, translationMethod: language }
  - id: 5
    handle: blocks
    name: Blocks
    kind: benf\neo\Field
    translationMethod: site
    blockTypes:
      - { id: 1, handle: card, name: Card, childBlocks: [card], fields: [heading, blocks] }
"#;

// ── Test app builder ───────────────────────────────────────────

fn build_test_app(prefix: &str) -> axum::Router {
    let host = SnapshotHost::from_yaml(SNAPSHOT).expect("fixture snapshot");
    let service: Arc<dyn SchemaService> = Arc::new(SchemaServiceImpl::new(Arc::new(host)));
    build_router(service, prefix, true)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ── /fields ────────────────────────────────────────────────────

#[tokio::test]
async fn fields_flattens_blog_post() {
    let (status, body) = get(
        build_test_app("/api/smartcat"),
        "/api/smartcat/fields?sectionHandle=blog&typeHandle=post",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<_> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["fieldName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["title", "body", "sections"]);

    assert_eq!(
        body["fields"][2],
        json!({
            "id": 3,
            "fieldName": "sections",
            "displayName": "Sections",
            "type": "matrix",
            "isLocalizable": true,
            "required": false,
            "typeIds": ["entryType:text", "entryType:gallery"],
        })
    );
    assert_eq!(body["nestedTypes"].as_array().unwrap().len(), 2);
    assert_eq!(body["entryType"]["fieldCount"], 2);
    assert_eq!(body["section"]["type"], "channel");
}

#[tokio::test]
async fn self_nesting_block_type_registers_once() {
    let (status, body) = get(
        build_test_app("/api/smartcat"),
        "/api/smartcat/fields?sectionHandle=pages&typeHandle=landing",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let nested = body["nestedTypes"].as_array().unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0]["typeId"], "blockType:blocks.card");
    assert_eq!(nested[0]["handle"], "card");
    assert_eq!(nested[0]["kind"], "blockType");
    assert_eq!(nested[0]["childFields"]["typeIds"], json!(["blockType:blocks.card"]));
    assert_eq!(nested[0]["fields"][1]["typeIds"], json!(["blockType:blocks.card"]));
}

#[tokio::test]
async fn fields_without_type_handle_is_400() {
    let (status, body) = get(
        build_test_app("/api/smartcat"),
        "/api/smartcat/fields?sectionHandle=blog",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("\"typeHandle\" parameter is required"));
    assert!(body.get("fields").is_none());
}

#[tokio::test]
async fn fields_with_mismatched_section_id_is_400() {
    let (status, body) = get(
        build_test_app("/api/smartcat"),
        "/api/smartcat/fields?sectionHandle=blog&typeHandle=post&sectionId=2",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "section id 2 resolves to 'pages', not 'blog'");
}

#[tokio::test]
async fn fields_for_unknown_section_is_404() {
    let (status, body) = get(
        build_test_app("/api/smartcat"),
        "/api/smartcat/fields?sectionHandle=news&typeHandle=post",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Section not found: news"));
}

// ── Listings ───────────────────────────────────────────────────

#[tokio::test]
async fn sections_and_types() {
    let (status, body) = get(build_test_app("/api/smartcat"), "/api/smartcat/sections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 1, "handle": "blog", "name": "Blog", "type": "channel" },
            { "id": 2, "handle": "pages", "name": "Pages", "type": "structure" },
        ])
    );

    let (status, body) = get(
        build_test_app("/api/smartcat"),
        "/api/smartcat/types?sectionId=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "id": 2, "handle": "landing", "name": "Landing", "hasTitleField": true, "fieldCount": 1 }])
    );
}

#[tokio::test]
async fn locales_is_an_alias_of_sites() {
    let (_, sites) = get(build_test_app("/api/smartcat"), "/api/smartcat/sites").await;
    let (status, locales) = get(build_test_app("/api/smartcat"), "/api/smartcat/locales").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sites, locales);
    assert_eq!(sites[0]["language"], "en-US");
    assert_eq!(sites[0]["baseUrl"], Value::Null);
}

#[tokio::test]
async fn entity_fields_for_entries() {
    let (status, body) = get(
        build_test_app("/api/smartcat"),
        "/api/smartcat/entities/Entries/fields",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entityType"], "entries");
    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields[0]["section"], "Blog");
    assert_eq!(fields[0]["entryType"], "Post");
    assert_eq!(fields.last().unwrap()["fieldName"], "expiryDate");
}

#[tokio::test]
async fn unsupported_entity_kind_is_400() {
    let (status, body) = get(
        build_test_app("/api/smartcat"),
        "/api/smartcat/entities/tags/fields",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported entity type: tags"));
}

// ── Routing ────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_outside_the_prefix() {
    let (status, body) = get(build_test_app("/api/smartcat"), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn custom_prefix() {
    let (status, _) = get(build_test_app("/schema/"), "/schema/sections").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(build_test_app("/schema"), "/api/smartcat/sections").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn prefix_without_leading_slash() {
    let (status, body) = get(build_test_app("api/smartcat"), "/api/smartcat/sections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = get(build_test_app(" schema/ "), "/schema/sections").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn root_prefix_mounts_at_root() {
    let (status, _) = get(build_test_app("/"), "/sections").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(build_test_app(""), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[test]
fn prefix_normalization() {
    assert_eq!(normalize_prefix("api/smartcat"), "/api/smartcat");
    assert_eq!(normalize_prefix("/api/smartcat/"), "/api/smartcat");
    assert_eq!(normalize_prefix("/"), "");
    assert_eq!(normalize_prefix("  "), "");
}
