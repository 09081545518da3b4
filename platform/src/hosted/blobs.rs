//! Hosted blob store over the storage REST API.

#[cfg(test)]
#[path = "blobs_test.rs"]
mod blobs_test;

use std::rc::Rc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Shared, status_error};
use crate::config::PlatformConfig;
use crate::error::StoreError;
use crate::store::BlobStore;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    #[serde(default)]
    download_tokens: Option<String>,
}

/// [`BlobStore`] backed by the hosted storage bucket.
pub struct HostedBlobs {
    shared: Rc<Shared>,
}

impl HostedBlobs {
    pub(crate) fn new(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    async fn authorized(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        // Storage expects the id token under its own auth scheme.
        let request = match self.shared.bearer().await? {
            Some(token) => request.header("Authorization", format!("Firebase {token}")),
            None => request,
        };
        Ok(request.send().await?)
    }
}

#[async_trait(?Send)]
impl BlobStore for HostedBlobs {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StoreError> {
        let url = upload_url(&self.shared.config, path);
        let size = bytes.len();
        let request = self.shared.http.post(&url).header("Content-Type", content_type).body(bytes);
        let resp = self.authorized(request).await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let err = status_error(status, &body, path);
            log::error!("hosted blobs: upload of {path} failed: {err}");
            return Err(err);
        }
        log::debug!("hosted blobs: uploaded {size} bytes to {path}");
        Ok(())
    }

    async fn public_url(&self, path: &str) -> Result<String, StoreError> {
        let url = object_url(&self.shared.config, path);
        let resp = self.authorized(self.shared.http.get(&url)).await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body, path));
        }
        let meta: ObjectMetadata = resp.json().await.map_err(|e| StoreError::Decode(e.to_string()))?;
        let token = first_download_token(&meta)
            .ok_or_else(|| StoreError::Decode(format!("{path} has no download token")))?;
        Ok(download_url(&self.shared.config, path, token))
    }
}

fn object_url(config: &PlatformConfig, path: &str) -> String {
    format!(
        "{}/v0/b/{}/o/{}",
        config.endpoints.blobs,
        urlencoding::encode(&config.storage_bucket),
        urlencoding::encode(path),
    )
}

fn upload_url(config: &PlatformConfig, path: &str) -> String {
    format!(
        "{}/v0/b/{}/o?uploadType=media&name={}",
        config.endpoints.blobs,
        urlencoding::encode(&config.storage_bucket),
        urlencoding::encode(path),
    )
}

fn download_url(config: &PlatformConfig, path: &str, token: &str) -> String {
    format!("{}?alt=media&token={}", object_url(config, path), urlencoding::encode(token))
}

fn first_download_token(meta: &ObjectMetadata) -> Option<&str> {
    meta.download_tokens
        .as_deref()
        .and_then(|tokens| tokens.split(',').map(str::trim).find(|t| !t.is_empty()))
}
