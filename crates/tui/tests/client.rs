use std::sync::{Arc, Mutex};

use api_types::{
    auth::Login,
    record::{Record, RecordNew},
    section::{SectionQuery, SectionType},
};
use axum::{
    Form, Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::DateTime;
use duckvault_tui::client::{Client, ClientError};
use ledger::SyncError;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::net::TcpListener;

const TOKEN: &str = "t0k3n";

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<String>>>,
}

impl Seen {
    fn push(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }

    fn all(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(TOKEN)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "invalid token" })),
    )
        .into_response()
}

async fn sections(
    State(seen): State<Seen>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    seen.push(format!("GET section?{}", query.unwrap_or_default()));
    Json(json!({
        "accounts": [{
            "title": "2024-03",
            "total": 12.5,
            "data": [{
                "id": 1,
                "type": "吃吃吃",
                "sub_type": "午餐",
                "change": 12.5,
                "merchant": "duck shop",
                "datetime": "2024-03-15T12:30:00+08:00",
                "comments": null,
                "username": "duck"
            }]
        }],
        "anchor": "2024-02",
        "end_reached": false
    }))
    .into_response()
}

async fn create(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(payload): Json<RecordNew>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if payload.change <= Decimal::ZERO {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "change must be positive" })),
        )
            .into_response();
    }
    seen.push(format!("POST accounts {}", payload.change));
    Json(Record {
        id: 7,
        kind: payload.kind,
        sub_type: payload.sub_type,
        change: payload.change,
        merchant: payload.merchant,
        datetime: payload.datetime,
        comments: payload.comments,
        username: "duck".to_string(),
    })
    .into_response()
}

async fn inactive(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "no record" }))).into_response();
    }
    seen.push(format!("POST inactive {id}"));
    (StatusCode::OK, "done").into_response()
}

async fn login(Form(login): Form<Login>) -> Response {
    if login.password == "quack" {
        Json(json!({ "token": TOKEN, "username": "duck" })).into_response()
    } else {
        unauthorized()
    }
}

async fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn spawn_backend() -> (Client, Seen) {
    let seen = Seen::default();
    let router = Router::new()
        .route("/accounts/section", get(sections))
        .route("/accounts", post(create))
        .route("/accounts/{id}/inactive", post(inactive))
        .route("/authentication/login", post(login))
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (Client::new(&format!("http://{addr}")).unwrap(), seen)
}

#[tokio::test]
async fn sections_send_token_and_filters() {
    let (client, seen) = spawn_backend().await;

    let page = client
        .sections(
            TOKEN,
            &SectionQuery {
                section_type: SectionType::Month,
                keyword: Some("duck".to_string()),
                anchor: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(page.anchor.as_deref(), Some("2024-02"));
    assert!(!page.end_reached);
    assert_eq!(page.accounts[0].total, Decimal::new(125, 1));
    assert_eq!(page.accounts[0].data[0].merchant.as_deref(), Some("duck shop"));

    client
        .sections(
            TOKEN,
            &SectionQuery {
                section_type: SectionType::Day,
                keyword: None,
                anchor: Some("2024-02".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(
        seen.all(),
        vec![
            "GET section?type=month&keyword=duck".to_string(),
            "GET section?type=day&anchor=2024-02".to_string(),
        ]
    );
}

#[tokio::test]
async fn rejected_token_means_login_required() {
    let (client, seen) = spawn_backend().await;

    let err = client
        .sections(
            "stale",
            &SectionQuery {
                section_type: SectionType::Month,
                keyword: None,
                anchor: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(SyncError::from(err), SyncError::LoginRequired);
    assert!(seen.all().is_empty());
}

#[tokio::test]
async fn create_returns_the_stored_record() {
    let (client, seen) = spawn_backend().await;
    let payload = RecordNew {
        kind: "出行".to_string(),
        sub_type: "地铁".to_string(),
        change: Decimal::new(350, 2),
        merchant: None,
        datetime: DateTime::parse_from_rfc3339("2024-03-15T08:05:00+08:00").unwrap(),
        comments: Some("commute".to_string()),
    };

    let record = client.record_create(TOKEN, &payload).await.unwrap();

    assert_eq!(record.id, 7);
    assert_eq!(record.change, Decimal::new(35, 1));
    assert_eq!(record.datetime, payload.datetime);
    assert_eq!(seen.all(), vec!["POST accounts 3.5".to_string()]);
}

#[tokio::test]
async fn validation_errors_carry_the_server_message() {
    let (client, _) = spawn_backend().await;
    let payload = RecordNew {
        kind: "出行".to_string(),
        sub_type: "无".to_string(),
        change: Decimal::ZERO,
        merchant: None,
        datetime: DateTime::parse_from_rfc3339("2024-03-15T08:05:00+08:00").unwrap(),
        comments: None,
    };

    let err = client.record_create(TOKEN, &payload).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(ref msg) if msg == "change must be positive"));
}

#[tokio::test]
async fn inactive_ignores_the_body() {
    let (client, seen) = spawn_backend().await;

    client.record_inactive(TOKEN, 42).await.unwrap();
    let err = client.record_inactive(TOKEN, 404).await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound));
    assert_eq!(seen.all(), vec!["POST inactive 42".to_string()]);
}

#[tokio::test]
async fn login_posts_the_password_form() {
    let (client, _) = spawn_backend().await;

    let response = client.login("quack").await.unwrap();
    assert_eq!(response.token, TOKEN);
    assert_eq!(response.username, "duck");

    let err = client.login("moo").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn unreadable_error_bodies_still_map_by_status() {
    let router = Router::new().route("/accounts/section", get(broken));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    let client = Client::new(&format!("http://{addr}/")).unwrap();

    let err = client
        .sections(
            TOKEN,
            &SectionQuery {
                section_type: SectionType::Month,
                keyword: None,
                anchor: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Server(ref msg) if msg == "unknown error"));
}
