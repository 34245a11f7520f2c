// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{classify, constants::USER_AGENT};
use async_trait::async_trait;
use error::ClassifiedError;
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, instrument};
use url::Url;

/// Wire format an upstream answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
  Xml,
  Json,
}

impl fmt::Display for ContentFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ContentFormat::Xml => write!(f, "XML"),
      ContentFormat::Json => write!(f, "JSON"),
    }
  }
}

/// A fully parameterized outbound GET.
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
  pub url: Url,
  pub timeout: Duration,
  pub format: ContentFormat,
}

impl Request {
  pub fn new(url: Url, timeout: Duration, format: ContentFormat) -> Self {
    Self {
      url,
      timeout,
      format,
    }
  }

  /// The request target without its query string, safe to log.
  pub fn endpoint(&self) -> String {
    format!(
      "{}{}",
      self.url.origin().ascii_serialization(),
      self.url.path()
    )
  }
}

// The query string may carry an API key, so Debug shows the endpoint only.
impl fmt::Debug for Request {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Request")
      .field("endpoint", &self.endpoint())
      .field("timeout", &self.timeout)
      .field("format", &self.format)
      .finish()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
  pub status: u16,
  pub body: String,
  pub format: ContentFormat,
}

impl RawResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

#[async_trait]
pub trait Transport: Send + Sync {
  /// Issues exactly one GET for `request`.
  ///
  /// Any status code is a successful send; only network failures are errors.
  async fn send(&self, request: &Request) -> Result<RawResponse, ClassifiedError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
  async fn send(&self, request: &Request) -> Result<RawResponse, ClassifiedError> {
    (**self).send(request).await
  }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
  client: Arc<reqwest::Client>,
}

impl ReqwestTransport {
  pub fn new() -> Result<Self, error::Error> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    Ok(Self::with_client(client))
  }

  pub fn with_client(client: reqwest::Client) -> Self {
    Self {
      client: Arc::new(client),
    }
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  #[instrument(skip(self, request), fields(endpoint = %request.endpoint()))]
  async fn send(&self, request: &Request) -> Result<RawResponse, ClassifiedError> {
    let response = self
      .client
      .get(request.url.clone())
      .timeout(request.timeout)
      .send()
      .await
      .map_err(classify::transport_error)?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(classify::transport_error)?;
    debug!(status, bytes = body.len(), "Upstream responded");

    Ok(RawResponse {
      status,
      body,
      format: request.format,
    })
  }
}
