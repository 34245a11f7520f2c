// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  classify,
  decode::{decode, DecodedRecord},
  transport::{RawResponse, Request, Transport},
};
use error::ClassifiedError;
use tracing::{debug, instrument, warn};

/// One upstream API plugged into the shared fetch/decode/extract/normalize flow.
///
/// Implementations carry their own endpoint, secrets and field mapping; the
/// transport and the decoder are shared.
pub trait Integration: Send + Sync {
  type Params: Send + Sync;
  type Extracted;
  type Output;

  /// Short name used in logs.
  fn name(&self) -> &'static str;

  fn build(&self, params: &Self::Params) -> Result<Request, ClassifiedError>;

  fn extract(&self, record: &DecodedRecord, status: u16) -> Result<Self::Extracted, ClassifiedError>;

  fn normalize(&self, extracted: Self::Extracted) -> Result<Self::Output, ClassifiedError>;
}

#[derive(Debug, Clone)]
pub struct Pipeline<T> {
  transport: T,
}

impl<T: Transport> Pipeline<T> {
  pub fn new(transport: T) -> Self {
    Self { transport }
  }

  pub fn transport(&self) -> &T {
    &self.transport
  }

  #[instrument(skip_all, fields(integration = integration.name()))]
  pub async fn run<I: Integration>(
    &self,
    integration: &I,
    params: &I::Params,
  ) -> Result<I::Output, ClassifiedError> {
    let request = integration.build(params)?;
    debug!(?request, "Built upstream request");

    let raw = self.send(&request).await?;
    let record = decode(&raw.body, raw.format)?;
    let extracted = integration.extract(&record, raw.status)?;
    integration.normalize(extracted)
  }

  /// Sends `request`, giving up once its timeout has elapsed even if the
  /// transport itself never returns.
  pub async fn send(&self, request: &Request) -> Result<RawResponse, ClassifiedError> {
    match tokio::time::timeout(request.timeout, self.transport.send(request)).await {
      Ok(result) => result,
      Err(_) => {
        warn!(timeout = ?request.timeout, "Upstream request exceeded its deadline");
        Err(ClassifiedError::timeout(classify::TIMED_OUT))
      }
    }
  }
}
