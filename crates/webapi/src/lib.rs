// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! ludoteka - JSON/HTTP client for the remote backend
//!
//! All payloads are plain JSON over HTTP(S). Mutating endpoints require
//! a bearer credential that callers obtain from their session store.

use std::{fmt, time::Duration};

use bytes::Bytes;
use reqwest::{Client, Response, Url};

pub use reqwest::StatusCode;

/// Chat proxy
pub mod chat;

/// Collection CRUD
pub mod collection;

/// Game lookup
pub mod game;

/// Registration and login
pub mod user;

/// Opaque bearer credential issued by the backend on login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    // Credentials must never leak into logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&"<redacted>").finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure, including connectivity loss, TLS
    /// errors, and the bounded request timeout.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with {status}")]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Indicates that the bearer credential was missing or rejected.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::Server {
                status: StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN,
                ..
            }
        )
    }
}

/// Bounded wait for each request.
///
/// Prevents a permanently pending round trip from blocking the
/// client-side sync state forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Asynchronous client for the remote backend.
///
/// Cheaply cloneable. Stateless apart from the shared connection pool
/// of the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self, Error> {
        Self::with_request_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_request_timeout(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn api_url(&self, path_suffix: &str) -> Result<Url, Error> {
        let api_url = self.base_url.join(path_suffix)?;
        log::debug!("API URL: {api_url}");
        Ok(api_url)
    }
}

pub(crate) async fn receive_response_body(response: Response) -> Result<Bytes, Error> {
    let response_status = response.status();
    let bytes = response.bytes().await?;
    if !response_status.is_success() {
        let json = serde_json::from_slice::<serde_json::Value>(&bytes).unwrap_or_default();
        let message = json
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned);
        return Err(Error::Server {
            status: response_status,
            message,
        });
    }
    Ok(bytes)
}

/// Awaits the response status and discards any body.
pub(crate) async fn expect_success(response: Response) -> Result<(), Error> {
    receive_response_body(response).await.map(drop)
}
