// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! A transport that replies from a queue and remembers what it was sent.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde_json::Value;

use crate::error::{Error, Result};

use super::{Request, Response, Transport};

enum Reply {
    Respond(StatusCode, Value),
    Fail,
}

struct Expectation {
    method: Method,
    path: String,
    reply: Reply,
}

#[derive(Default)]
pub(crate) struct Scripted {
    expectations: Mutex<VecDeque<Expectation>>,
    sent: Mutex<Vec<Request>>,
}

impl Scripted {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn expect(&self, method: Method, path: &str, status: u16, body: Value) {
        self.expectations.lock().unwrap().push_back(Expectation {
            method,
            path: path.to_owned(),
            reply: Reply::Respond(StatusCode::from_u16(status).unwrap(), body),
        });
    }

    pub(crate) fn expect_network_failure(&self, method: Method, path: &str) {
        self.expectations.lock().unwrap().push_back(Expectation {
            method,
            path: path.to_owned(),
            reply: Reply::Fail,
        });
    }

    pub(crate) fn sent(&self) -> Vec<Request> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub(crate) fn bearer(request: &Request) -> Option<String> {
        request
            .headers
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap().to_owned())
    }

    pub(crate) fn assert_exhausted(&self) {
        let remaining = self.expectations.lock().unwrap();
        assert!(
            remaining.is_empty(),
            "{} scripted replies were never requested, next is {} {}",
            remaining.len(),
            remaining[0].method,
            remaining[0].path
        );
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn send(&self, request: Request) -> Result<Response> {
        let expectation = self
            .expectations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request {} {}", request.method, request.path));
        assert_eq!(
            (&expectation.method, expectation.path.as_str()),
            (&request.method, request.path.as_str()),
            "request did not match the script"
        );
        self.sent.lock().unwrap().push(request);

        match expectation.reply {
            Reply::Respond(status, body) => Ok(Response { status, body }),
            Reply::Fail => Err(Error::Network(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))),
        }
    }
}
