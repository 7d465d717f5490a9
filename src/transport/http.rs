// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use url::Url;

use crate::{
    error::{Error, Result},
    metadata,
};

use super::{Request, Response, Transport};

pub(crate) struct Http {
    client: reqwest::Client,
    base_url: Url,
}

impl Http {
    pub(crate) fn new(base_url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(metadata::CLIENT_USER_AGENT.as_str())
            .build()
            .map_err(|e| Error::Network(Box::new(e)))?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for Http {
    async fn send(&self, request: Request) -> Result<Response> {
        let url = self.url(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(Box::new(e)))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(Box::new(e)))?;
        debug!("received {} ({} bytes)", status, bytes.len());

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(Response { status, body })
    }
}
