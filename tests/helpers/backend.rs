// ABOUTME: In-process fake of the REST backend served on an ephemeral port
// ABOUTME: Answers in both envelope shapes with Mongo-style _id fields and records exchanges

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Authorization endpoint of the fake provider
pub const PROVIDER_AUTH_URL: &str = "https://provider.test/oauth/authorize";

/// Serve `router` on 127.0.0.1 and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A code exchange the backend received
#[derive(Debug, Clone)]
pub struct RecordedExchange {
    /// Path tenant
    pub tenant_id: String,
    /// Path integration
    pub integration_id: String,
    /// Bearer token forwarded by the console
    pub authorization: Option<String>,
    /// Request body
    pub body: Value,
}

/// Fake backend state
#[derive(Clone, Default)]
pub struct FakeBackend {
    exchanges: Arc<Mutex<Vec<RecordedExchange>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start serving and return the base URL
    pub async fn spawn(&self) -> String {
        spawn_server(self.router()).await
    }

    /// Exchanges received so far
    pub fn exchanges(&self) -> Vec<RecordedExchange> {
        self.exchanges.lock().unwrap().clone()
    }

    /// Paths deleted so far
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/tenants", get(list_tenants).post(create_tenant))
            .route("/tenants/:tenant_id", get(get_tenant))
            .route("/tenants/:tenant_id/projects", get(list_tenant_projects))
            .route("/tenants/:tenant_id/integrations", get(list_integrations))
            .route(
                "/tenants/:tenant_id/integrations/:integration_id",
                get(get_integration).delete(delete_integration),
            )
            .route(
                "/tenants/:tenant_id/integrations/:integration_id/oauth/exchange",
                post(exchange_code),
            )
            .route("/cloud-providers/:id", get(get_provider))
            .route("/projects/:project_id", get(get_project).delete(delete_project))
            .route("/project-types", get(list_project_types))
            .with_state(self.clone())
    }
}

fn tenant(id: &str) -> Value {
    json!({ "_id": id, "name": format!("Tenant {id}"), "ownerEmail": "owner@example.com" })
}

fn project(id: &str, tenant_id: &str) -> Value {
    json!({
        "_id": { "$oid": id },
        "name": format!("Project {id}"),
        "tenantId": tenant_id,
        "members": [{ "userId": "u-member", "role": "MEMBER" }]
    })
}

fn integration(id: &str, tenant_id: &str, provider_id: &str) -> Value {
    json!({
        "_id": id,
        "tenantId": tenant_id,
        "cloudProviderId": provider_id,
        "name": "Team Drive",
        "status": "pending"
    })
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": format!("{what} not found") })),
    )
        .into_response()
}

async fn list_tenants() -> Json<Value> {
    Json(json!({ "success": true, "data": [tenant("t-1"), tenant("t-2")] }))
}

async fn create_tenant(Json(body): Json<Value>) -> Response {
    let mut created = tenant("t-new");
    created["name"] = body["name"].clone();
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn get_tenant(Path(tenant_id): Path<String>) -> Response {
    match tenant_id.as_str() {
        "t-1" | "t-2" => Json(tenant(&tenant_id)).into_response(),
        _ => not_found("Tenant"),
    }
}

async fn list_tenant_projects(Path(tenant_id): Path<String>) -> Json<Value> {
    let projects: Vec<Value> = [("p-1", "t-1"), ("p-2", "t-2"), ("p-3", "t-1")]
        .into_iter()
        .filter(|(_, owner)| *owner == tenant_id)
        .map(|(id, owner)| project(id, owner))
        .collect();
    Json(json!({ "success": true, "data": projects }))
}

async fn list_integrations(Path(tenant_id): Path<String>) -> Json<Value> {
    Json(json!([integration("int-1", &tenant_id, "cp-1")]))
}

async fn get_integration(Path((tenant_id, integration_id)): Path<(String, String)>) -> Response {
    match (tenant_id.as_str(), integration_id.as_str()) {
        ("t-1", "int-1") => Json(json!({
            "success": true,
            "data": integration("int-1", "t-1", "cp-1")
        }))
        .into_response(),
        ("t-1", "int-inactive") => {
            Json(integration("int-inactive", "t-1", "cp-off")).into_response()
        }
        // Backend bug: answers with another tenant's integration
        ("t-2", "int-1") => Json(integration("int-1", "t-1", "cp-1")).into_response(),
        _ => not_found("Integration"),
    }
}

async fn delete_integration(
    State(backend): State<FakeBackend>,
    Path((tenant_id, integration_id)): Path<(String, String)>,
) -> StatusCode {
    backend
        .deleted
        .lock()
        .unwrap()
        .push(format!("tenants/{tenant_id}/integrations/{integration_id}"));
    StatusCode::NO_CONTENT
}

async fn exchange_code(
    State(backend): State<FakeBackend>,
    Path((tenant_id, integration_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.exchanges.lock().unwrap().push(RecordedExchange {
        tenant_id: tenant_id.clone(),
        integration_id: integration_id.clone(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned),
        body: body.clone(),
    });

    match body["code"].as_str() {
        Some("redeemed-code") => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "invalid_grant",
                "message": "Authorization code was already redeemed"
            })),
        )
            .into_response(),
        Some("provider-down") => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "success": false, "message": "Provider unreachable" })),
        )
            .into_response(),
        _ => {
            let mut activated = integration(&integration_id, &tenant_id, "cp-1");
            activated["status"] = json!("active");
            activated["scopes"] = json!(["files.read", "files.write"]);
            Json(json!({ "success": true, "data": activated })).into_response()
        }
    }
}

async fn get_provider(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "cp-1" => Json(json!({
            "_id": "cp-1",
            "name": "Drive",
            "type": "google_drive",
            "isActive": true,
            "oauth": {
                "clientId": "drive-client",
                "authUrl": PROVIDER_AUTH_URL,
                "scopes": ["files.read", "files.write"]
            }
        }))
        .into_response(),
        "cp-off" => Json(json!({ "_id": "cp-off", "name": "Retired", "isActive": false }))
            .into_response(),
        _ => not_found("Cloud provider"),
    }
}

async fn get_project(Path(project_id): Path<String>) -> Response {
    match project_id.as_str() {
        "p-1" | "p-3" => Json(project(&project_id, "t-1")).into_response(),
        "p-2" => Json(json!({ "success": true, "data": project("p-2", "t-2") })).into_response(),
        _ => not_found("Project"),
    }
}

async fn delete_project(
    State(backend): State<FakeBackend>,
    Path(project_id): Path<String>,
) -> StatusCode {
    backend
        .deleted
        .lock()
        .unwrap()
        .push(format!("projects/{project_id}"));
    StatusCode::NO_CONTENT
}

async fn list_project_types() -> Json<Value> {
    Json(json!([{ "_id": "pt-1", "name": "Research" }]))
}
