use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::BridgeConfig;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Authentication failed: {0}")]
  Authentication(String),

  #[error("Provider returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("Failed to parse provider response: {0}")]
  Parse(String),

  #[error("Not authenticated with the activity provider")]
  NotAuthenticated,
}

impl Serialize for ProviderError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Provider Contract
/// ---------------------------------------------------------------------------

/// What to ask the provider for: a window of days and a record cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityQuery {
  pub window_days: u32,
  pub limit: u32,
}

/// External source of recorded activities.
///
/// Payloads are returned loosely typed; the normalizer owns their shape.
#[async_trait]
pub trait FitnessActivityProvider: Send + Sync {
  async fn authenticate(&mut self) -> Result<(), ProviderError>;

  async fn fetch_activities(&self, query: ActivityQuery) -> Result<Vec<Value>, ProviderError>;

  async fn fetch_activity_detail(&self, activity_id: i64) -> Result<Value, ProviderError>;
}

/// ---------------------------------------------------------------------------
/// Garmin Bridge (HTTP)
/// ---------------------------------------------------------------------------

const AUTH_PATH: &str = "api/garmin/auth";
const ACTIVITIES_PATH: &str = "api/garmin/activities";

#[derive(Debug, Deserialize)]
struct AuthResponse {
  #[serde(default)]
  success: bool,
  token: Option<String>,
  error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ActivitiesResponse {
  activities: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
  details: Option<Value>,
}

/// Client for the local Garmin Connect bridge service
pub struct GarminBridgeProvider {
  config: BridgeConfig,
  client: OnceCell<Client>,
  token: Option<String>,
}

impl GarminBridgeProvider {
  pub fn new(config: BridgeConfig) -> Self {
    Self {
      config,
      client: OnceCell::new(),
      token: None,
    }
  }

  /// Reuse a bearer token from an earlier session
  pub fn with_token(mut self, token: impl Into<String>) -> Self {
    self.token = Some(token.into());
    self
  }

  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  /// HTTP client, built on first use and reused afterwards
  async fn client(&self) -> Result<&Client, ProviderError> {
    let timeout = Duration::from_secs(self.config.timeout_secs);
    let client = self
      .client
      .get_or_try_init(|| async move { Client::builder().timeout(timeout).build() })
      .await?;
    Ok(client)
  }

  fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
    let base = format!("{}/", self.config.base_url.trim_end_matches('/'));
    Url::parse(&base)
      .and_then(|url| url.join(path))
      .map_err(|e| ProviderError::MissingConfig(format!("invalid bridge URL {}: {}", base, e)))
  }

  fn bearer(&self) -> Result<String, ProviderError> {
    self
      .token
      .as_ref()
      .map(|t| format!("Bearer {}", t))
      .ok_or(ProviderError::NotAuthenticated)
  }

  /// GET an authorized endpoint and parse its JSON body
  async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T, ProviderError> {
    let auth = self.bearer()?;
    debug!(url = %url, "Garmin bridge request");

    let response = self
      .client()
      .await?
      .get(url)
      .header("Authorization", auth)
      .send()
      .await?;

    if response.status() == StatusCode::UNAUTHORIZED {
      return Err(ProviderError::NotAuthenticated);
    }

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(ProviderError::Api { status, body });
    }

    let response_text = response.text().await?;
    serde_json::from_str(&response_text).map_err(|e| {
      warn!(
        error = %e,
        body = %response_text.chars().take(500).collect::<String>(),
        "Failed to parse Garmin bridge response"
      );
      ProviderError::Parse(e.to_string())
    })
  }
}

#[async_trait]
impl FitnessActivityProvider for GarminBridgeProvider {
  async fn authenticate(&mut self) -> Result<(), ProviderError> {
    let url = self.endpoint(AUTH_PATH)?;

    let response = self
      .client()
      .await?
      .post(url)
      .json(&json!({
        "email": self.config.email,
        "password": self.config.password,
      }))
      .send()
      .await?;

    if !response.status().is_success() {
      let error_text = response.text().await.unwrap_or_default();
      return Err(ProviderError::Authentication(error_text));
    }

    let auth: AuthResponse = response
      .json()
      .await
      .map_err(|e| ProviderError::Parse(e.to_string()))?;

    match (auth.success, auth.token) {
      (true, Some(token)) => {
        self.token = Some(token);
        info!("Authenticated with Garmin bridge");
        Ok(())
      }
      _ => Err(ProviderError::Authentication(
        auth.error.unwrap_or_else(|| "credentials rejected".to_string()),
      )),
    }
  }

  async fn fetch_activities(&self, query: ActivityQuery) -> Result<Vec<Value>, ProviderError> {
    let mut url = self.endpoint(ACTIVITIES_PATH)?;
    url
      .query_pairs_mut()
      .append_pair("days", &query.window_days.to_string())
      .append_pair("limit", &query.limit.to_string());

    let body: ActivitiesResponse = self.get_json(url).await?;
    Ok(body.activities.unwrap_or_default())
  }

  async fn fetch_activity_detail(&self, activity_id: i64) -> Result<Value, ProviderError> {
    let url = self.endpoint(&format!("{}/{}", ACTIVITIES_PATH, activity_id))?;

    let body: DetailResponse = self.get_json(url).await?;
    Ok(body.details.unwrap_or_else(|| json!({})))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
