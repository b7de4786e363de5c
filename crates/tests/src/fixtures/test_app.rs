use std::sync::Arc;

use voxsplit_api::{build_router, state::AppState};
use voxsplit_diarization::DiarizationBackend;

/// A running API instance on an ephemeral port.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawns the real router with the given backend.
    pub async fn spawn(backend: Arc<dyn DiarizationBackend>) -> Self {
        let state = AppState::new(backend);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, build_router(state))
                .await
                .expect("serve test app");
        });

        Self {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.address, path))
    }
}
