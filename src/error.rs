// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use reqwest::StatusCode;
use thiserror::Error;

use crate::model;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

pub(crate) const NETWORK_MESSAGE: &str =
    "We could not reach the server. Check your connection and try again.";

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("no response from the server: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("the server did not accept our credentials{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized { message: Option<String> },
    #[error("the server rejected the submitted data: {}", .messages.join("; "))]
    Validation {
        message: Option<String>,
        messages: Vec<String>,
    },
    #[error("signed in as a {0} account, but an admin account is required")]
    Forbidden(model::Role),
    #[error("not logged in")]
    NotAuthenticated,
    #[error("API error: {0}")]
    Api(#[from] Api),
    #[error("storage error: {0}")]
    Storage(#[from] Storage),
    #[error("the cart has no line with ID {0}")]
    CartLineNotFound(model::LineId),
    #[error("the quantity on cart line {0} cannot grow any further")]
    QuantityOverflow(model::LineId),
    #[error("the menu has no product with ID {0}")]
    ProductNotFound(model::ProductId),
    #[error("command execution failed")]
    Command,
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Renders the error the way a store reports it in its `error` field.
    ///
    /// The server's own `message` wins when there is one; otherwise the
    /// caller's fallback describes what went wrong.
    pub(crate) fn user_message(&self, fallback: &str) -> String {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match self {
            Self::Network(_) => NETWORK_MESSAGE.to_owned(),
            Self::Unauthorized { message: Some(m) }
            | Self::Api(Api::Status {
                message: Some(m), ..
            }) => m.clone(),
            Self::Validation { message, messages } => {
                if messages.is_empty() {
                    message.clone().unwrap_or_else(|| fallback.to_owned())
                } else {
                    messages.join("; ")
                }
            }
            Self::NotAuthenticated
            | Self::Forbidden(_)
            | Self::CartLineNotFound(_)
            | Self::QuantityOverflow(_) => self.to_string(),
            _ => fallback.to_owned(),
        }
    }

    pub(crate) const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<pinentry::Error> for Error {
    fn from(value: pinentry::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(
            clippy::wildcard_enum_match_arm,
            clippy::match_wildcard_for_single_variants
        )]
        match value {
            pinentry::Error::Cancelled | pinentry::Error::Timeout => Self::Cancelled,
            pinentry::Error::Io(e) => Self::Io(e),
            _ => Self::Io(io::Error::new(io::ErrorKind::Other, value.to_string())),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

#[derive(Error, Debug)]
pub(crate) enum Api {
    #[error("server responded with {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("server response could not be understood: {0}")]
    MalformedBody(serde_json::Error),
    #[error("could not build a request for {0}: {1}")]
    InvalidRequest(String, String),
}

#[derive(Error, Debug)]
pub(crate) enum Storage {
    #[error("no data directory is available on this system")]
    NoProjectDirs,
    #[cfg(feature = "secret-service")]
    #[error("secret service error: {0}")]
    SecretService(#[from] oo7::Error),
    #[cfg(feature = "keychain")]
    #[error("keychain error: {0}")]
    Keychain(#[from] security_framework::base::Error),
}
