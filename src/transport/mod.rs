// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod http;
#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::error::Result;

pub(crate) use http::Http;

#[derive(Clone, Debug)]
pub(crate) struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Value>,
}

/// A response as received, whatever its status.
///
/// Bodies that are not JSON are carried as a JSON string and empty bodies as
/// `null`.
#[derive(Clone, Debug)]
pub(crate) struct Response {
    pub(crate) status: StatusCode,
    pub(crate) body: Value,
}

/// Moves requests to the API and brings back responses.
///
/// Implementations only fail when no response was received at all.
#[async_trait]
pub(crate) trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}
