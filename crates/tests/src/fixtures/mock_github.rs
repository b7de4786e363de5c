use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, OnceLock};

use axum::{
    Json, Router,
    extract::{Path as UrlPath, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

/// In-process stand-in for the GitHub contents API.
///
/// Serves directory listings derived from a flat `path -> body` map, raw
/// file bodies under `/raw/{path}`, and records the `ref` query parameter
/// of every listing call so tests can assert the branch-propagation quirk.
pub struct MockGithub {
    files: BTreeMap<String, Vec<u8>>,
    fail_downloads: HashSet<String>,
    fail_listing: bool,
    base_url: OnceLock<String>,
    pub seen_refs: Mutex<Vec<Option<String>>>,
}

impl MockGithub {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, body)| (path.to_string(), body.as_bytes().to_vec()))
                .collect(),
            fail_downloads: HashSet::new(),
            fail_listing: false,
            base_url: OnceLock::new(),
            seen_refs: Mutex::new(Vec::new()),
        }
    }

    /// Raw fetches for these repo-relative paths answer 404.
    pub fn failing_downloads(mut self, paths: &[&str]) -> Self {
        self.fail_downloads = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Every listing call answers 500.
    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Binds an ephemeral port and starts serving. Returns the handle and
    /// the base URL to hand to `GithubClient::new`.
    pub async fn spawn(self) -> (Arc<Self>, String) {
        let gh = Arc::new(self);
        let app = Router::new()
            .route("/repos/{owner}/{repo}/contents/", get(list_root))
            .route("/repos/{owner}/{repo}/contents/{*path}", get(list_dir))
            .route("/raw/{*path}", get(raw))
            .with_state(Arc::clone(&gh));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock github");
        let base = format!("http://{}", listener.local_addr().unwrap());
        gh.base_url.set(base.clone()).expect("base url set once");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock github");
        });

        (gh, base)
    }

    fn list(&self, owner: &str, repo: &str, dir: &str, branch_ref: Option<String>) -> Response {
        self.seen_refs.lock().unwrap().push(branch_ref);

        if self.fail_listing {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }

        let base = self.base_url.get().expect("spawned");
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut entries: Vec<Value> = Vec::new();
        let mut subdirs: BTreeSet<String> = BTreeSet::new();

        for path in self.files.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                None => entries.push(json!({
                    "name": rest,
                    "path": path,
                    "type": "file",
                    "download_url": format!("{base}/raw/{path}"),
                    "url": format!("{base}/repos/{owner}/{repo}/contents/{path}"),
                })),
                Some((child, _)) => {
                    subdirs.insert(child.to_string());
                }
            }
        }

        for name in subdirs {
            let full = format!("{prefix}{name}");
            entries.push(json!({
                "name": name,
                "path": full,
                "type": "dir",
                "download_url": null,
                "url": format!("{base}/repos/{owner}/{repo}/contents/{full}"),
            }));
        }

        Json(Value::Array(entries)).into_response()
    }
}

fn ref_param(query: Option<String>) -> Option<String> {
    query.and_then(|q| {
        q.split('&')
            .find_map(|kv| kv.strip_prefix("ref=").map(String::from))
    })
}

async fn list_root(
    State(gh): State<Arc<MockGithub>>,
    UrlPath((owner, repo)): UrlPath<(String, String)>,
    RawQuery(query): RawQuery,
) -> Response {
    gh.list(&owner, &repo, "", ref_param(query))
}

async fn list_dir(
    State(gh): State<Arc<MockGithub>>,
    UrlPath((owner, repo, path)): UrlPath<(String, String, String)>,
    RawQuery(query): RawQuery,
) -> Response {
    gh.list(&owner, &repo, &path, ref_param(query))
}

async fn raw(State(gh): State<Arc<MockGithub>>, UrlPath(path): UrlPath<String>) -> Response {
    if gh.fail_downloads.contains(&path) {
        return StatusCode::NOT_FOUND.into_response();
    }
    match gh.files.get(&path) {
        Some(body) => body.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
