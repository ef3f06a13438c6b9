use std::sync::Arc;

use hoops::auth::{TokenGenerator, issue_admin_token};
use hoops::config::GameRules;
use hoops::server::{AppState, create_router};
use hoops::store::{SqliteStore, Store};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// An in-process server on an ephemeral port backed by a temp database.
pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub admin_token: String,
    pub store: Arc<SqliteStore>,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_rules(GameRules::default()).await
    }

    pub async fn start_with_rules(rules: GameRules) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(
            SqliteStore::new(temp_dir.path().join("hoops.db")).expect("open database"),
        );
        store.initialize().expect("initialize schema");

        let (_, admin_token) = issue_admin_token(store.as_ref(), &TokenGenerator::new(), None)
            .expect("issue admin token");

        let state = Arc::new(AppState::new(store.clone(), rules));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, create_router(state))
                .await
                .expect("serve");
        });

        Self {
            temp_dir,
            base_url: format!("http://{addr}"),
            admin_token,
            store,
            client: reqwest::Client::new(),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("send request")
    }

    /// GETs a path that must succeed and returns its JSON body.
    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        response.json().await.expect("json body")
    }

    /// POSTs as admin, with an optional JSON body.
    pub async fn post(&self, path: &str, body: Option<Value>) -> Response {
        self.post_with_token(path, body, Some(&self.admin_token))
            .await
    }

    pub async fn post_with_token(
        &self,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut request = self.client.post(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        request.send().await.expect("send request")
    }

    /// Creates a game and returns its id.
    pub async fn create_game(&self, body: Value) -> i64 {
        let response = self.post("/api/games", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("json body");
        body["data"]["gameId"].as_i64().expect("gameId")
    }

    /// Creates and starts a game with default settings.
    pub async fn started_game(&self) -> i64 {
        let id = self.create_game(serde_json::json!({})).await;
        let response = self.post(&format!("/api/games/{id}/start"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        id
    }

    pub async fn game(&self, id: i64) -> Value {
        self.get_json(&format!("/api/games/{id}")).await["data"].clone()
    }

    pub async fn clock(&self, id: i64) -> Value {
        self.get_json(&format!("/api/games/{id}/clock")).await["data"].clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
