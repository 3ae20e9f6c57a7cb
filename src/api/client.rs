use crate::api::api_types::{decode_user_list, response_id};
use crate::api::types::{Part, User, UserBody};
use crate::config::Config;
use crate::sync::{SyncError, UserBackend};
use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::RequestBuilder;
use std::time::Duration;
use tracing::debug;
use url::Url;

impl From<reqwest::Error> for SyncError {
  fn from(e: reqwest::Error) -> Self {
    match e.status() {
      Some(status) => SyncError::Status(status.as_u16()),
      None if e.is_decode() => SyncError::BadResponseShape(e.to_string()),
      None => SyncError::Network(e.to_string()),
    }
  }
}

/// HTTP client for the users collection
#[derive(Clone)]
pub struct UsersClient {
  http: reqwest::Client,
  base: Url,
}

impl UsersClient {
  pub fn new(config: &Config) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.api.timeout_secs))
      .user_agent(concat!("roster/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self::with_client(http, config.api.base_url.clone()))
  }

  pub fn with_client(http: reqwest::Client, base: Url) -> Self {
    Self { http, base }
  }

  /// `{base}/{id}`, tolerating a trailing slash on the base
  fn item_url(&self, id: u64) -> Result<Url, SyncError> {
    let mut url = self.base.clone();
    url
      .path_segments_mut()
      .map_err(|_| SyncError::Network(format!("{} cannot take a path", self.base)))?
      .pop_if_empty()
      .push(&id.to_string());
    Ok(url)
  }

  /// Send a request and return the body of a success response
  async fn send(&self, request: RequestBuilder) -> Result<String, SyncError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(SyncError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
  }
}

#[async_trait]
impl UserBackend for UsersClient {
  async fn list_users(&self, part: Part) -> Result<Vec<User>, SyncError> {
    let request = self
      .http
      .get(self.base.clone())
      .query(&[("part", part.as_str())]);
    let body = self.send(request).await?;
    decode_user_list(&body)
  }

  async fn create_user(&self, body: &UserBody) -> Result<(), SyncError> {
    let request = self.http.post(self.base.clone()).json(body);
    let response = self.send(request).await?;
    debug!(id = ?response_id(&response), "backend created user");
    Ok(())
  }

  async fn update_user(&self, id: u64, body: &UserBody) -> Result<(), SyncError> {
    let request = self.http.patch(self.item_url(id)?).json(body);
    let response = self.send(request).await?;
    debug!(id, echoed = ?response_id(&response), "backend updated user");
    Ok(())
  }

  async fn delete_user(&self, id: u64) -> Result<(), SyncError> {
    let request = self.http.delete(self.item_url(id)?);
    self.send(request).await?;
    Ok(())
  }
}
