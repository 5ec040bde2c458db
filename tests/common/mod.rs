#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use cityinfo_api::auth::{generate_jwt, Claims, CityInfoUser};
use cityinfo_api::config::AppConfig;
use cityinfo_api::database::{EntityStore, MemoryStore};
use cityinfo_api::services::MailService;
use cityinfo_api::{app, AppState};
use reqwest::{Client, RequestBuilder};
use tokio::task::JoinHandle;

/// Mail service that remembers what it was asked to send.
#[derive(Default)]
pub struct RecordingMail {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMail {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl MailService for RecordingMail {
    fn send(&self, subject: &str, message: &str) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((subject.to_string(), message.to_string()));
        }
    }
}

/// One API instance per test, backed by its own seeded in-memory store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub config: AppConfig,
    pub mail: Arc<RecordingMail>,
    client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_store(Arc::new(MemoryStore::seeded())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn EntityStore>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::development();
        let mail = Arc::new(RecordingMail::default());
        let state = AppState::new(config.clone(), store).with_mail_service(mail.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        Ok(Self {
            port,
            base_url,
            config,
            mail,
            client: Client::new(),
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Bearer token whose `city` claim is `city`.
    pub fn token_for(&self, city: &str) -> Result<String> {
        let user = CityInfoUser::new(1, "kevin", "Kevin", "Dockx", city);
        Ok(generate_jwt(&Claims::new(&user, &self.config.security), &self.config.security)?)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Request authorized as a user living in `city`.
    pub fn as_city(&self, method: reqwest::Method, path: &str, city: &str) -> Result<RequestBuilder> {
        let token = self.token_for(city)?;
        Ok(self.client.request(method, self.url(path)).bearer_auth(token))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
