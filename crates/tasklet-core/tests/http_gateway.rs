use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tasklet_core::error::GatewayError;
use tasklet_core::gateway::{HttpGateway, REQUEST_ID_HEADER, TaskGateway};
use tasklet_shared::{LoginRequest, SignupRequest, TaskCreate, TaskListQuery};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: Option<String>,
    auth: Option<String>,
    request_id: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

fn stored_task() -> Value {
    json!({
        "_id": "66f0c1",
        "name": "Buy milk",
        "description": "2 litres",
        "status": false,
        "createdAt": "2026-01-02T03:04:05.000Z",
        "updatedAt": "2026-01-02T03:04:05.000Z",
        "user": "u-17"
    })
}

async fn handle(State(log): State<Log>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, 1 << 20).await.unwrap_or_default();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let body = String::from_utf8_lossy(&bytes).to_string();
    let query = parts.uri.query().map(str::to_string);
    log.lock().push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: query.clone(),
        auth: header("authorization"),
        request_id: header(REQUEST_ID_HEADER),
        body: body.clone(),
    });

    let query = query.unwrap_or_default();
    match (parts.method.as_str(), parts.uri.path()) {
        ("GET", "/api/todo/getAll") => Json(json!([stored_task()])).into_response(),
        ("GET", "/api/todo/getById") if query == "id=missing" => {
            (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response()
        }
        ("GET", "/api/todo/getById") if query == "id=gone" => Json(Value::Null).into_response(),
        ("GET", "/api/todo/getById") => Json(stored_task()).into_response(),
        ("POST", "/api/todo/create") if body.contains("\"dup\"") => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Task already exists" })),
        )
            .into_response(),
        ("POST", "/api/todo/create") => {
            (StatusCode::CREATED, Json(json!({ "message": "created" }))).into_response()
        }
        ("PUT", "/api/todo/update") => Json(json!({ "message": "updated" })).into_response(),
        ("DELETE", "/api/todo/delete") => StatusCode::OK.into_response(),
        ("POST", "/api/auth/login") if body.contains("Secret1") => Json(json!({
            "data": { "email": "ada@example.com", "name": "Ada", "token": "tok-9" }
        }))
        .into_response(),
        ("POST", "/api/auth/login") => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response(),
        ("POST", "/api/auth/register") => (
            StatusCode::CREATED,
            Json(json!({ "message": "User registered successfully" })),
        )
            .into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn start_test_server() -> (SocketAddr, Log) {
    let log: Log = Arc::default();
    let app = Router::new().fallback(handle).with_state(Arc::clone(&log));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, log)
}

fn gateway(addr: SocketAddr) -> HttpGateway {
    HttpGateway::new(&format!("http://{addr}/api"), Duration::from_secs(5)).expect("gateway")
}

#[tokio::test]
async fn list_sends_query_and_bearer() {
    let (addr, log) = start_test_server().await;
    let gateway = gateway(addr);

    let tasks = gateway
        .list(
            "tok-1",
            Some(&TaskListQuery {
                search: "buy milk".to_string(),
                page: 2,
                limit: 10,
            }),
        )
        .await
        .expect("list");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "66f0c1");
    assert_eq!(tasks[0].extra.get("user"), Some(&json!("u-17")));

    gateway.list("tok-1", None).await.expect("unpaginated list");

    let log = log.lock().clone();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].method, "GET");
    assert_eq!(log[0].path, "/api/todo/getAll");
    assert_eq!(
        log[0].query.as_deref(),
        Some("search=buy+milk&page=2&limit=10")
    );
    assert_eq!(log[0].auth.as_deref(), Some("Bearer tok-1"));
    assert!(log[0].request_id.is_some());
    assert_ne!(log[0].request_id, log[1].request_id);
    assert_eq!(log[1].query, None);
}

#[tokio::test]
async fn update_sends_full_record_with_id_query() {
    let (addr, log) = start_test_server().await;
    let gateway = gateway(addr);

    let task = gateway.get("tok-1", "66f0c1").await.expect("get");
    gateway
        .update("tok-1", &task.toggled())
        .await
        .expect("update");

    let log = log.lock().clone();
    assert_eq!(log[0].query.as_deref(), Some("id=66f0c1"));
    assert_eq!(log[1].method, "PUT");
    assert_eq!(log[1].path, "/api/todo/update");
    assert_eq!(log[1].query.as_deref(), Some("id=66f0c1"));

    let sent: Value = serde_json::from_str(&log[1].body).expect("json body");
    let mut expected = stored_task();
    expected["status"] = json!(true);
    assert_eq!(sent, expected);
}

#[tokio::test]
async fn create_and_delete_paths() {
    let (addr, log) = start_test_server().await;
    let gateway = gateway(addr);

    gateway
        .create(
            "tok-1",
            &TaskCreate {
                name: "Write report".to_string(),
                description: String::new(),
                status: false,
            },
        )
        .await
        .expect("create");
    gateway.delete("tok-1", "66f0c1").await.expect("delete");

    let log = log.lock().clone();
    assert_eq!(log[0].method, "POST");
    assert_eq!(log[0].path, "/api/todo/create");
    let sent: Value = serde_json::from_str(&log[0].body).expect("json body");
    assert_eq!(
        sent,
        json!({ "name": "Write report", "description": "", "status": false })
    );
    assert_eq!(log[1].method, "DELETE");
    assert_eq!(log[1].path, "/api/todo/delete");
    assert_eq!(log[1].query.as_deref(), Some("id=66f0c1"));
}

#[tokio::test]
async fn error_bodies_and_missing_tasks() {
    let (addr, _log) = start_test_server().await;
    let gateway = gateway(addr);

    let err = gateway
        .create(
            "tok-1",
            &TaskCreate {
                name: "dup".to_string(),
                description: String::new(),
                status: false,
            },
        )
        .await
        .expect_err("duplicate");
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.gateway_message(), Some("Task already exists"));

    assert!(matches!(
        gateway.get("tok-1", "missing").await,
        Err(GatewayError::NotFound)
    ));
    assert!(matches!(
        gateway.get("tok-1", "gone").await,
        Err(GatewayError::NotFound)
    ));
}

#[tokio::test]
async fn task_calls_without_token_are_never_sent() {
    let (addr, log) = start_test_server().await;
    let gateway = gateway(addr);

    assert!(matches!(
        gateway.list("", None).await,
        Err(GatewayError::Unauthenticated)
    ));
    assert!(matches!(
        gateway.delete(" ", "66f0c1").await,
        Err(GatewayError::Unauthenticated)
    ));
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn login_and_register() {
    let (addr, log) = start_test_server().await;
    let gateway = gateway(addr);

    let user = gateway
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "Secret1".to_string(),
        })
        .await
        .expect("login");
    assert_eq!(user.bearer(), Some("tok-9"));
    assert_eq!(user.name, "Ada");

    let err = gateway
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect_err("bad password");
    assert_eq!(err.status(), Some(401));

    let message = gateway
        .register(&SignupRequest {
            email: "ada@example.com".to_string(),
            password: "Secret1".to_string(),
            name: "Ada".to_string(),
        })
        .await
        .expect("register");
    assert_eq!(message.as_deref(), Some("User registered successfully"));

    let log = log.lock().clone();
    assert_eq!(log[0].path, "/api/auth/login");
    assert_eq!(log[0].auth, None);
    assert_eq!(log[2].path, "/api/auth/register");
    let sent: Value = serde_json::from_str(&log[2].body).expect("json body");
    assert_eq!(
        sent,
        json!({ "email": "ada@example.com", "password": "Secret1", "name": "Ada" })
    );
}
