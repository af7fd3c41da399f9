use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDateTime;
use dev_tracker::{router, ActivityLogEntry, AppState, BacklogItem, ChatMessage, Developer, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const LIMIT: usize = 1024 * 1024;

fn app_with_limit(limit: usize) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = router(AppState::from_arc(store.clone()), limit);
    (app, store)
}

fn app() -> (Router, Arc<MemoryStore>) {
    app_with_limit(LIMIT)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(b) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(b.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn stamp(value: &Value, field: &str) -> NaiveDateTime {
    serde_json::from_value(value[field].clone()).unwrap()
}

#[tokio::test]
async fn health_needs_no_store() {
    let (app, store) = app();
    store.set_offline(true);
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["message"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn ready_reflects_store_state() {
    let (app, store) = app();
    let (status, body) = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "database": "ok"}));

    store.set_offline(true);
    let (status, body) = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unavailable");
}

#[tokio::test]
async fn empty_collections_list_as_empty_arrays() {
    let (app, _) = app();
    for uri in ["/api/developers", "/api/backlog", "/api/activity-log", "/api/chat-threads/none"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body, json!([]), "{}", uri);
    }
}

#[tokio::test]
async fn created_developer_is_listed_once() {
    let (app, _) = app();
    let payload = json!({
        "name": "Ann",
        "avatar": "",
        "done": 0,
        "quickFix": "",
        "primary": "",
        "secondary": "",
        "status": "active"
    });
    let (status, created) = send(&app, Method::POST, "/api/developers", Some(&payload.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_i64().unwrap() >= 1);
    for (key, value) in payload.as_object().unwrap() {
        assert_eq!(&created[key], value, "{}", key);
    }
    assert!(created["createdAt"].is_string());

    let (status, listed) = send(&app, Method::GET, "/api/developers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn caller_cannot_choose_id_or_stamp() {
    let (app, _) = app();
    let body = r#"{"id":77,"createdAt":"1999-01-01T00:00:00","name":"Ann","extra":true}"#;
    let (status, created) = send(&app, Method::POST, "/api/developers", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_ne!(created["createdAt"], "1999-01-01T00:00:00");
    assert!(created.get("extra").is_none());
}

#[tokio::test]
async fn developers_list_in_id_order() {
    let (app, _) = app();
    for name in ["Jane", "Mike", "Sara"] {
        let body = json!({ "name": name }).to_string();
        send(&app, Method::POST, "/api/developers", Some(&body)).await;
    }
    let (_, listed) = send(&app, Method::GET, "/api/developers", None).await;
    let ids: Vec<i64> = listed.as_array().unwrap().iter().map(|d| d["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[tokio::test]
async fn update_replaces_row_and_echoes_path_id() {
    let (app, store) = app();
    let (_, created) = send(&app, Method::POST, "/api/developers", Some(r#"{"name":"Ann","done":1}"#)).await;
    let id = created["id"].as_i64().unwrap();

    let body = r#"{"id":999,"name":"Ann","done":2,"status":"busy"}"#;
    let (status, updated) = send(&app, Method::PUT, &format!("/api/developers/{}", id), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["done"], 2);
    assert_eq!(updated["status"], "busy");

    let rows = store.rows::<Developer>();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].done, 2);
    assert_eq!(rows[0].quick_fix, "");
    assert_eq!(
        serde_json::to_value(rows[0].created_at).unwrap(),
        created["createdAt"]
    );
}

#[tokio::test]
async fn update_of_missing_developer_succeeds_without_change() {
    let (app, store) = app();
    send(&app, Method::POST, "/api/developers", Some(r#"{"name":"Jane"}"#)).await;
    let before = store.rows::<Developer>();

    let (status, body) = send(&app, Method::PUT, "/api/developers/42", Some(r#"{"name":"Ghost"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 42);
    assert_eq!(body["name"], "Ghost");
    assert_eq!(store.rows::<Developer>(), before);
}

#[tokio::test]
async fn non_numeric_ids_are_rejected() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::PUT, "/api/developers/abc", Some(r#"{"name":"x"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["message"], "invalid id 'abc'");

    let (status, _) = send(&app, Method::DELETE, "/api/backlog/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_field_types_are_rejected() {
    let (app, store) = app();
    let (status, _) = send(&app, Method::POST, "/api/backlog", Some(r#"{"task":"x","estimatedHours":"two"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::POST, "/api/developers", Some(r#"{"name":"x","done":"seven"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.rows::<BacklogItem>().is_empty());
    assert!(store.rows::<Developer>().is_empty());
}

#[tokio::test]
async fn null_fields_are_stored_as_defaults() {
    let (app, store) = app();
    let body = r#"{"name":"Ann","avatar":null,"done":null,"status":"active"}"#;
    let (status, created) = send(&app, Method::POST, "/api/developers", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["avatar"], "");
    assert_eq!(created["done"], 0);
    assert_eq!(store.rows::<Developer>()[0].avatar, "");

    let body = r#"{"task":"Write docs","priority":null,"estimatedHours":2}"#;
    let (status, created) = send(&app, Method::POST, "/api/backlog", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["priority"], "");
    assert_eq!(created["estimatedHours"], 2);
}

#[tokio::test]
async fn backlog_create_then_delete() {
    let (app, store) = app();
    let body = r#"{"task":"Write docs","priority":"low","estimatedHours":2}"#;
    let (status, created) = send(&app, Method::POST, "/api/backlog", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["task"], "Write docs");
    assert_eq!(created["priority"], "low");
    assert_eq!(created["estimatedHours"], 2);
    let id = created["id"].as_i64().unwrap();
    assert!(id >= 1);

    let uri = format!("/api/backlog/{}", id);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, Method::GET, "/api/backlog", None).await;
    assert_eq!(listed, json!([]));
    assert!(store.rows::<BacklogItem>().is_empty());
}

#[tokio::test]
async fn activity_log_is_newest_first_with_server_dates() {
    let (app, _) = app();
    for name in ["Jane", "Mike", "Sara", "Liam"] {
        let body = json!({
            "date": "2000-01-01T00:00:00",
            "name": name,
            "taskType": "completion",
            "taskName": "Login bug",
            "type": "completion"
        })
        .to_string();
        let (status, created) = send(&app, Method::POST, "/api/activity-log", Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["id"].as_i64().unwrap() >= 1);
        assert_ne!(created["date"], "2000-01-01T00:00:00");
        assert_eq!(created["type"], "completion");
    }

    let (_, listed) = send(&app, Method::GET, "/api/activity-log", None).await;
    let entries = listed.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    for pair in entries.windows(2) {
        assert!(stamp(&pair[0], "date") >= stamp(&pair[1], "date"));
    }
    assert_eq!(entries[0]["name"], "Liam");
}

#[tokio::test]
async fn chat_thread_filters_by_exact_key() {
    let (app, store) = app();
    let messages = [
        ("Jane-Acme", "hello"),
        ("Jane-Acme2", "other thread"),
        ("Jane-Acme", "how can I help"),
        ("jane-acme", "different case"),
        ("Jane-Acme", "thanks"),
    ];
    for (key, msg) in messages {
        let body = json!({ "chatKey": key, "who": "Jane", "msg": msg, "customer": "Acme" }).to_string();
        let (status, created) = send(&app, Method::POST, "/api/chat-threads", Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["timestamp"].is_string());
    }
    assert_eq!(store.rows::<ChatMessage>().len(), 5);

    let (status, listed) = send(&app, Method::GET, "/api/chat-threads/Jane-Acme", None).await;
    assert_eq!(status, StatusCode::OK);
    let thread = listed.as_array().unwrap();
    let texts: Vec<&str> = thread.iter().map(|m| m["msg"].as_str().unwrap()).collect();
    assert_eq!(texts, ["hello", "how can I help", "thanks"]);
    assert!(thread.iter().all(|m| m["chatKey"] == "Jane-Acme"));
    for pair in thread.windows(2) {
        assert!(stamp(&pair[0], "timestamp") <= stamp(&pair[1], "timestamp"));
    }
}

#[tokio::test]
async fn malformed_bodies_are_rejected_without_mutation() {
    let (app, store) = app();
    send(&app, Method::POST, "/api/developers", Some(r#"{"name":"Jane"}"#)).await;
    let before = store.rows::<Developer>();

    let cases = [
        (Method::POST, "/api/developers"),
        (Method::PUT, "/api/developers/1"),
        (Method::POST, "/api/backlog"),
        (Method::POST, "/api/activity-log"),
        (Method::POST, "/api/chat-threads"),
    ];
    for (method, uri) in cases {
        for body in [r#"{"name":"#, "[1,2]", "null", ""] {
            let (status, err) = send(&app, method.clone(), uri, Some(body)).await;
            assert!(status.is_client_error(), "{} {} {}", method, uri, body);
            assert_eq!(err["error"]["code"], "bad_request");
        }
    }

    assert_eq!(store.rows::<Developer>(), before);
    assert!(store.rows::<BacklogItem>().is_empty());
    assert!(store.rows::<ActivityLogEntry>().is_empty());
    assert!(store.rows::<ChatMessage>().is_empty());
}

#[tokio::test]
async fn store_errors_are_categorized_not_leaked() {
    let (app, store) = app();
    store.set_offline(true);

    let (status, body) = send(&app, Method::GET, "/api/backlog", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "store_unavailable");
    assert!(!body.to_string().contains("offline"));

    let (status, _) = send(&app, Method::POST, "/api/backlog", Some(r#"{"task":"x"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let (app, store) = app_with_limit(64);
    let body = json!({ "task": "x".repeat(200) }).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/backlog")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(store.rows::<BacklogItem>().is_empty());
}

#[tokio::test]
async fn oversized_bodies_without_length_are_refused_as_json() {
    let (app, store) = app_with_limit(64);
    let body = json!({ "task": "x".repeat(200) }).to_string();
    let (status, err) = send(&app, Method::POST, "/api/backlog", Some(&body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(err["error"]["code"], "payload_too_large");
    assert!(store.rows::<BacklogItem>().is_empty());
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/developers/3")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let (status, body) = send(&app, Method::OPTIONS, "/api/backlog", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn json_responses_allow_any_origin() {
    let (app, _) = app();
    let request = Request::builder()
        .uri("/api/developers")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}
