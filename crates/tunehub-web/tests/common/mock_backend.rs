#![allow(dead_code)]

//! Mock music backend speaking the `{code, message, data}` envelope.
//!
//! Serves canned data on `127.0.0.1:0` and records every request so tests
//! can assert on query parameters.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub type Params = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub params: Params,
}

#[derive(Default)]
struct Inner {
    requests: Mutex<Vec<Recorded>>,
    failing_downloads: Mutex<HashSet<String>>,
    saved_settings: Mutex<Option<Value>>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Inner>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloads of these ids answer `code: 500`.
    pub fn fail_downloads(&self, ids: &[&str]) {
        let mut failing = self.inner.failing_downloads.lock().unwrap();
        failing.extend(ids.iter().map(|s| s.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Params> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .map(|r| r.params)
            .collect()
    }

    pub fn saved_settings(&self) -> Option<Value> {
        self.inner.saved_settings.lock().unwrap().clone()
    }

    fn record(&self, uri: &Uri, params: &Params) {
        self.inner.requests.lock().unwrap().push(Recorded {
            path: uri.path().to_string(),
            params: params.clone(),
        });
    }

    /// Bind to an ephemeral port and serve in the background.
    pub async fn spawn(&self) -> SocketAddr {
        let routes = Router::new()
            .route("/api/v1/search", get(search))
            .route("/api/v1/toplists", get(toplists))
            .route("/api/v1/toplist", get(toplist))
            .route("/api/v1/downloaded", get(downloaded))
            .route("/api/v1/download", get(download))
            .route("/api/v1/downloads", get(downloads))
            .route("/api/v1/library", get(library))
            .route("/api/v1/library/refresh", post(refresh_library))
            .route("/api/v1/playlists", get(playlists))
            .route("/api/v1/playlist/import", get(import_playlist))
            .route("/api/v1/playlist", delete(delete_playlist))
            .route("/api/v1/settings", get(settings).post(save_settings))
            .fallback(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") })
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, routes).await.unwrap();
        });
        addr
    }
}

/// Address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "code": 200, "message": "ok", "data": data }))
}

async fn search(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    if q.get("keyword").map(String::as_str) == Some("nothing") {
        return Json(json!({ "code": 404, "message": "无结果" }));
    }
    ok(json!({
        "results": [
            { "id": 101, "name": "Numeric", "artist": "A", "album": "X" },
            { "id": "102", "name": "It's \"quoted\"", "artist": "B" },
            { "id": "103", "name": "Third", "types": ["flac", "320k"] }
        ]
    }))
}

async fn toplists(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    ok(json!({
        "list": [
            { "id": 3778678, "name": "热歌榜", "updateFrequency": "每天更新" },
            { "id": "19723756", "name": "飙升榜" }
        ]
    }))
}

async fn toplist(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    ok(json!({
        "list": [
            { "id": "t1", "name": "Chart one" },
            { "id": "t2", "name": "Chart two" }
        ],
        "source": "kuwo"
    }))
}

async fn downloaded(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    let ids = q.get("ids").cloned().unwrap_or_default();
    let map: serde_json::Map<String, Value> = ids
        .split(',')
        .filter(|id| !id.is_empty())
        .map(|id| (id.to_string(), Value::Bool(id == "102" || id == "t2")))
        .collect();
    ok(Value::Object(map))
}

async fn download(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    let id = q.get("id").cloned().unwrap_or_default();
    if mock.inner.failing_downloads.lock().unwrap().contains(&id) {
        return Json(json!({ "code": 500, "message": "下载失败" }));
    }
    Json(json!({ "code": 200, "message": "已加入下载队列" }))
}

async fn downloads(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    ok(json!([
        { "id": "d1", "name": "Numeric", "artist": "A", "source": "netease", "status": "downloading", "progress": 42 },
        { "id": "d2", "name": "Gone", "artist": "B", "source": "qq", "status": "failed", "progress": 0, "error": "timeout" }
    ]))
}

async fn library(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    ok(json!([
        { "id": "l1", "name": "Kept", "artist": "C", "source": "qq", "filename": "Kept.mp3", "path": "/music/Kept.mp3", "time": 1700000000 }
    ]))
}

async fn refresh_library(State(mock): State<MockBackend>, uri: Uri) -> Json<Value> {
    mock.record(&uri, &Params::new());
    Json(json!({
        "code": 200,
        "data": [ { "id": "l1", "name": "Kept", "source": "qq" } ],
        "removed": 2
    }))
}

async fn playlists(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    ok(json!([
        {
            "id": "pl1",
            "source": "netease",
            "name": "Road trip",
            "author": "me",
            "songs": [ { "id": "s1", "name": "Drive" }, { "id": "102", "name": "Also listed" } ]
        }
    ]))
}

async fn import_playlist(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    if q.get("id").map(String::as_str) == Some("missing") {
        return Json(json!({ "code": 400, "message": "歌单不存在" }));
    }
    Json(json!({ "code": 200, "message": "ok" }))
}

async fn delete_playlist(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    Json(json!({ "code": 200 }))
}

async fn settings(State(mock): State<MockBackend>, uri: Uri, Query(q): Query<Params>) -> Json<Value> {
    mock.record(&uri, &q);
    ok(json!({ "downloadDir": "/music", "quality": "flac" }))
}

async fn save_settings(State(mock): State<MockBackend>, uri: Uri, Json(body): Json<Value>) -> impl IntoResponse {
    mock.record(&uri, &Params::new());
    *mock.inner.saved_settings.lock().unwrap() = Some(body);
    Json(json!({ "code": 200, "message": "设置已保存" }))
}
