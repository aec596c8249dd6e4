//! HTTP client for the PBX management API.

use std::time::Duration;

use pbx_common::snapshot::{Service, SystemStatus, Trunk};
use pbx_common::source::{FetchError, PbxSource};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::PbxConfig;

/// Body returned by the login endpoint when credentials are rejected.
const AUTHENTICATION_FAILED: &str = "AuthenticationFailed";

#[derive(Deserialize)]
struct TrunkList {
    list: Vec<Trunk>,
}

/// Session-based client for the PBX JSON API.
///
/// Logs in lazily on the first request and again whenever the session
/// cookie is rejected.
pub struct PbxClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    logged_in: Mutex<bool>,
}

impl PbxClient {
    /// Create a new client from the PBX configuration.
    pub fn new(config: &PbxConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.fetch_timeout())
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| FetchError::unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            logged_in: Mutex::new(false),
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}", self.base_url, name)
    }

    /// Authenticate and store the session cookie.
    async fn login(&self) -> Result<(), FetchError> {
        let response = self
            .http
            .post(self.endpoint("login"))
            .json(&json!({
                "Username": self.username,
                "Password": self.password,
            }))
            .send()
            .await
            .map_err(|e| FetchError::unavailable(format!("login request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::authentication(format!("login rejected with {}", status)));
        }
        if !status.is_success() {
            return Err(FetchError::unavailable(format!("login returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::unavailable(format!("failed to read login response: {}", e)))?;
        if body.trim().trim_matches('"') == AUTHENTICATION_FAILED {
            return Err(FetchError::authentication(AUTHENTICATION_FAILED));
        }

        info!(url = %self.base_url, user = %self.username, "Logged in to PBX");
        Ok(())
    }

    /// Log in unless a session is already established.
    ///
    /// With `force`, a new session is created regardless.
    async fn ensure_session(&self, force: bool) -> Result<(), FetchError> {
        let mut logged_in = self.logged_in.lock().await;
        if *logged_in && !force {
            return Ok(());
        }

        *logged_in = false;
        self.login().await?;
        *logged_in = true;
        Ok(())
    }

    async fn send_get(&self, name: &str) -> Result<Response, FetchError> {
        self.http
            .get(self.endpoint(name))
            .send()
            .await
            .map_err(|e| FetchError::unavailable(format!("request to {} failed: {}", name, e)))
    }

    /// GET an API resource and decode its JSON body.
    async fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, FetchError> {
        self.ensure_session(false).await?;

        let mut response = self.send_get(name).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!(endpoint = name, "Session rejected, logging in again");
            self.ensure_session(true).await?;
            response = self.send_get(name).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(FetchError::authentication(format!(
                    "{} rejected the new session",
                    name
                )));
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::unavailable(format!("{} returned {}", name, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::unavailable(format!("failed to read {}: {}", name, e)))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::malformed(format!("{}: {}", name, e)))
    }
}

impl PbxSource for PbxClient {
    async fn system_status(&self) -> Result<SystemStatus, FetchError> {
        self.get("SystemStatus").await
    }

    async fn services(&self) -> Result<Vec<Service>, FetchError> {
        self.get("ServiceList").await
    }

    async fn trunks(&self) -> Result<Vec<Trunk>, FetchError> {
        self.get::<TrunkList>("TrunkList").await.map(|t| t.list)
    }
}
