//! REST client for the service package collection.
//!
//! Defines the `ServiceApi` seam used by the request worker, its error types,
//! and the HTTP implementation backed by a blocking `reqwest` client.
//!
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use crate::model::{Draft, ServiceId, ServicePackage};

/// Listing the collection failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// A create, update or delete failed.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("service {0} not found")]
    NotFound(ServiceId),
}

/// The four operations available on the remote collection.
///
/// Calls are fire-and-wait: no retries and no cancellation.
pub trait ServiceApi: Send {
    fn list_all(&self) -> Result<Vec<ServicePackage>, FetchError>;
    fn create(&self, draft: &Draft) -> Result<(), WriteError>;
    fn update(&self, id: &ServiceId, draft: &Draft) -> Result<(), WriteError>;
    fn delete(&self, id: &ServiceId) -> Result<(), WriteError>;
}

impl<T: ServiceApi + Sync> ServiceApi for std::sync::Arc<T> {
    fn list_all(&self) -> Result<Vec<ServicePackage>, FetchError> {
        (**self).list_all()
    }
    fn create(&self, draft: &Draft) -> Result<(), WriteError> {
        (**self).create(draft)
    }
    fn update(&self, id: &ServiceId, draft: &Draft) -> Result<(), WriteError> {
        (**self).update(id, draft)
    }
    fn delete(&self, id: &ServiceId) -> Result<(), WriteError> {
        (**self).delete(id)
    }
}

pub struct HttpServiceClient {
    client: Client,
    collection: Url,
}

impl HttpServiceClient {
    /// Build a client for `base_url` joined with `collection_path` (e.g. `/api/services`).
    ///
    /// A zero `timeout` keeps the transport default.
    pub fn new(base_url: &str, collection_path: &str, timeout: Duration) -> anyhow::Result<Self> {
        let collection = collection_url(base_url, collection_path)?;
        let mut builder = Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, collection })
    }

    pub fn item_url(&self, id: &ServiceId) -> Url {
        item_url(&self.collection, id)
    }
}

/// Resolve the collection endpoint against the base URL.
pub fn collection_url(base_url: &str, collection_path: &str) -> anyhow::Result<Url> {
    let base = Url::parse(base_url)?;
    let mut url = base.join(collection_path)?;
    // keep `/api/services` and `/api/services/` equivalent
    let trimmed = url.path().trim_end_matches('/').to_string();
    url.set_path(&trimmed);
    Ok(url)
}

/// Append `id` to the collection URL as one percent-encoded path segment.
pub fn item_url(collection: &Url, id: &ServiceId) -> Url {
    let mut url = collection.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(id.as_str());
    }
    url
}

fn check_write(res: reqwest::Result<Response>, id: Option<&ServiceId>) -> Result<(), WriteError> {
    let res = res.map_err(|e| WriteError::Transport(e.to_string()))?;
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(WriteError::NotFound(id.clone())),
        _ => Err(WriteError::Status(status.as_u16())),
    }
}

impl ServiceApi for HttpServiceClient {
    fn list_all(&self) -> Result<Vec<ServicePackage>, FetchError> {
        debug!(url = %self.collection, "GET");
        let res = self
            .client
            .get(self.collection.clone())
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        res.json::<Vec<ServicePackage>>()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn create(&self, draft: &Draft) -> Result<(), WriteError> {
        debug!(url = %self.collection, "POST");
        let res = self.client.post(self.collection.clone()).json(draft).send();
        check_write(res, None)
    }

    fn update(&self, id: &ServiceId, draft: &Draft) -> Result<(), WriteError> {
        let url = self.item_url(id);
        debug!(%url, "PUT");
        let res = self.client.put(url).json(draft).send();
        check_write(res, Some(id))
    }

    fn delete(&self, id: &ServiceId) -> Result<(), WriteError> {
        let url = self.item_url(id);
        debug!(%url, "DELETE");
        let res = self.client.delete(url).send();
        check_write(res, Some(id))
    }
}
