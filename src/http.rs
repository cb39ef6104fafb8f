//! HTTP request pipeline
//!
//! One shared [`RequestPipeline`] performs every call the crate makes. It
//! owns the process-wide `reqwest` client, the base API address, and the
//! per-call timeout. Each operation races the in-flight I/O against a fresh
//! timeout and the caller's cancellation token — either firing aborts the
//! call as [`Error::Canceled`]. All operations are total: they return a
//! result-or-error and never let a transport fault escape as a panic.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Constructs a properly formatted URI by combining the API address and
/// query path, trimming exactly one trailing slash from the address and one
/// leading slash from the query.
fn build_request_uri(api_address: &str, query: &str) -> String {
    let api_address = api_address.strip_suffix('/').unwrap_or(api_address);
    let query = query.strip_prefix('/').unwrap_or(query);
    format!("{api_address}/{query}")
}

/// Shared request/response pipeline for the explorer API
///
/// Cheap to clone; the underlying `reqwest::Client` is reference-counted and
/// safe to share across concurrent jobs without locking.
#[derive(Clone, Debug)]
pub struct RequestPipeline {
    client: reqwest::Client,
    api_address: String,
    timeout: Duration,
}

impl RequestPipeline {
    /// Creates a pipeline from client configuration
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_address: config.api_address.clone(),
            timeout: config.timeout,
        }
    }

    /// Base API address this pipeline targets
    pub fn api_address(&self) -> &str {
        &self.api_address
    }

    /// Sends one HTTP request to the given relative query path
    ///
    /// If `body` is present it is serialized as UTF-8 JSON with content-type
    /// `application/json`. The request is aborted with [`Error::Canceled`]
    /// when the per-call timeout elapses or `cancel` fires, whichever comes
    /// first.
    pub async fn send<B>(
        &self,
        query: &str,
        method: Method,
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let uri = build_request_uri(&self.api_address, query);
        let url = Url::parse(&uri)?;
        tracing::debug!(%url, %method, "sending API request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => Err(Error::Canceled),
            outcome = tokio::time::timeout(self.timeout, request.send()) => match outcome {
                Ok(result) => result.map_err(Error::from),
                Err(_) => Err(Error::Canceled),
            },
        }?;

        Ok(response)
    }

    /// Convenience wrapper for body-less GET requests
    pub async fn get(&self, query: &str, cancel: &CancellationToken) -> Result<Response> {
        self.send::<()>(query, Method::GET, None, cancel).await
    }

    /// Convenience wrapper for POST requests with a JSON body
    pub async fn post<B>(
        &self,
        query: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.send(query, Method::POST, Some(body), cancel).await
    }

    /// Reads the raw text body of a successful response
    ///
    /// A non-success status code is converted into
    /// [`Error::RequestFailed`] carrying the status; the body read itself is
    /// bounded by the per-call timeout and the cancellation token.
    pub async fn read_raw(&self, response: Response, cancel: &CancellationToken) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "API request failed");
            return Err(Error::RequestFailed { status });
        }

        let text = tokio::select! {
            _ = cancel.cancelled() => Err(Error::Canceled),
            outcome = tokio::time::timeout(self.timeout, response.text()) => match outcome {
                Ok(result) => result.map_err(Error::from),
                Err(_) => Err(Error::Canceled),
            },
        }?;

        Ok(text)
    }

    /// Reads and decodes the JSON body of a successful response
    ///
    /// Decode failures surface as [`Error::Decode`]; an empty body where one
    /// was required surfaces as [`Error::InvalidResponse`].
    pub async fn read_json<T>(&self, response: Response, cancel: &CancellationToken) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let text = self.read_raw(response, cancel).await?;
        if text.trim().is_empty() {
            return Err(Error::InvalidResponse(
                "response body was empty".to_string(),
            ));
        }

        Ok(serde_json::from_str(&text)?)
    }
}
