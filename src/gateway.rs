// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use log::{debug, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::{Api, Error, Result},
    nav::{routes, Navigator},
    session::Session,
    storage,
    transport::{Request, Transport},
};

/// Endpoints whose 401 means "wrong credentials" rather than "session over".
const CREDENTIAL_PATHS: [&str; 2] = ["/login", "/admin-login"];

/// The one way every store talks to the API.
///
/// Attaches the bearer token, maps failures onto [`Error`], and ends the
/// session when the server stops accepting its token.
#[derive(Clone)]
pub(crate) struct Gateway {
    transport: Arc<dyn Transport>,
    session: Session,
    storage: storage::Shared,
    navigator: Navigator,
}

impl Gateway {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        session: Session,
        storage: storage::Shared,
        navigator: Navigator,
    ) -> Self {
        Self {
            transport,
            session,
            storage,
            navigator,
        }
    }

    pub(crate) const fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) const fn storage(&self) -> &storage::Shared {
        &self.storage
    }

    pub(crate) const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call(Method::GET, path, None).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.call(Method::POST, path, Some(serde_json::to_value(body)?))
            .await
    }

    /// A POST without a request body.
    pub(crate) async fn trigger<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call(Method::POST, path, None).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.call(Method::PUT, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub(crate) async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.call(Method::PATCH, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call(Method::DELETE, path, None).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let value = self.exchange(method, path, body).await?;
        serde_json::from_value(value).map_err(|e| Api::MalformedBody(e).into())
    }

    async fn exchange(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut headers = HeaderMap::new();
        _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(bearer) = self.session.bearer().await {
            let mut value = HeaderValue::from_str(&bearer)
                .map_err(|e| Api::InvalidRequest(path.to_owned(), e.to_string()))?;
            value.set_sensitive(true);
            _ = headers.insert(AUTHORIZATION, value);
        }

        let response = self
            .transport
            .send(Request {
                method: method.clone(),
                path: path.to_owned(),
                headers,
                body,
            })
            .await?;
        debug!("{} {} answered {}", method, path, response.status);

        if response.status.is_success() {
            return Ok(response.body);
        }

        let message = server_message(&response.body);
        match response.status {
            StatusCode::UNAUTHORIZED => {
                if !is_credential_path(path) {
                    self.end_session().await;
                }
                Err(Error::Unauthorized { message })
            }
            StatusCode::UNPROCESSABLE_ENTITY => Err(Error::Validation {
                message,
                messages: validation_messages(&response.body),
            }),
            status => Err(Api::Status { status, message }.into()),
        }
    }

    async fn end_session(&self) {
        warn!("The server no longer accepts our token; signing out");
        if let Err(e) = self.session.clear(&self.storage).await {
            warn!("We could not remove the saved session: {}", e);
        }
        _ = self.navigator.navigate(routes::LOGIN).await;
    }
}

fn is_credential_path(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or_default();
    CREDENTIAL_PATHS.contains(&path)
}

fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

fn validation_messages(body: &Value) -> Vec<String> {
    let Some(errors) = body.get("errors").and_then(Value::as_object) else {
        return Vec::new();
    };

    errors
        .values()
        .flat_map(|field| match field {
            Value::Array(messages) => messages
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect(),
            Value::String(message) => vec![message.clone()],
            _ => Vec::new(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::{
        model::Role,
        session::tests::grant,
        storage::{keys, Memory, Storage as _},
        transport::scripted::Scripted,
    };

    use super::*;

    /// A gateway over a scripted transport and in-memory storage.
    pub(crate) fn gateway() -> (Gateway, Arc<Scripted>, Memory) {
        let transport = Scripted::new();
        let memory = Memory::new();
        let session = Session::default();
        let gateway = Gateway::new(
            Arc::<Scripted>::clone(&transport),
            session.clone(),
            storage::shared(memory.clone()),
            Navigator::new(session),
        );
        (gateway, transport, memory)
    }

    pub(crate) async fn signed_in(role: Role) -> (Gateway, Arc<Scripted>, Memory) {
        let (gateway, transport, memory) = gateway();
        gateway
            .session()
            .establish(gateway.storage(), grant(role))
            .await
            .unwrap();
        (gateway, transport, memory)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pong {
        ok: bool,
    }

    #[tokio::test]
    async fn attaches_bearer_only_when_signed_in() -> Result<()> {
        let (gateway, transport, _) = gateway();
        transport.expect(Method::GET, "/products", 200, json!({ "ok": true }));
        let _: Pong = gateway.get("/products").await?;

        gateway
            .session()
            .establish(gateway.storage(), grant(Role::User))
            .await?;
        transport.expect(Method::GET, "/products", 200, json!({ "ok": true }));
        let _: Pong = gateway.get("/products").await?;

        let sent = transport.sent();
        assert_eq!(Scripted::bearer(&sent[0]), None);
        assert_eq!(
            Scripted::bearer(&sent[1]).as_deref(),
            Some("Bearer token-1")
        );
        assert_eq!(
            sent[1].headers.get(ACCEPT).map(HeaderValue::as_bytes),
            Some(&b"application/json"[..])
        );
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_elsewhere_ends_the_session() -> Result<()> {
        let (gateway, transport, mut memory) = signed_in(Role::User).await;
        transport.expect(
            Method::GET,
            "/cart",
            401,
            json!({ "message": "Unauthenticated." }),
        );

        let err = gateway.get::<Value>("/cart").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Unauthorized { message: Some(ref m) } if m == "Unauthenticated."
        ));
        assert!(!gateway.session().is_authenticated().await);
        assert_eq!(memory.get(keys::TOKEN).await?, None);
        assert_eq!(memory.get(keys::USER).await?, None);
        assert_eq!(memory.get(keys::IS_ADMIN).await?, None);
        assert_eq!(gateway.navigator().location().await, routes::LOGIN);
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_at_login_keeps_the_session() -> Result<()> {
        for path in CREDENTIAL_PATHS {
            let (gateway, transport, mut memory) = signed_in(Role::User).await;
            transport.expect(
                Method::POST,
                path,
                401,
                json!({ "message": "Invalid credentials" }),
            );

            let err = gateway
                .post::<_, Value>(path, &json!({}))
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());
            assert!(gateway.session().is_authenticated().await, "{path}");
            assert_eq!(memory.get(keys::TOKEN).await?.as_deref(), Some("token-1"));
            assert_eq!(gateway.navigator().location().await, routes::HOME);
        }
        Ok(())
    }

    #[tokio::test]
    async fn validation_errors_are_flattened() {
        let (gateway, transport, _) = gateway();
        transport.expect(
            Method::POST,
            "/register",
            422,
            json!({
                "message": "The given data was invalid.",
                "errors": {
                    "email": ["The email has already been taken."],
                    "password": ["The password must be at least 8 characters."],
                },
            }),
        );

        let err = gateway
            .post::<_, Value>("/register", &json!({}))
            .await
            .unwrap_err();
        let Error::Validation { message, messages } = err else {
            panic!("expected a validation error");
        };
        assert_eq!(message.as_deref(), Some("The given data was invalid."));
        assert_eq!(
            messages,
            vec![
                "The email has already been taken.".to_owned(),
                "The password must be at least 8 characters.".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn other_statuses_carry_the_server_message() {
        let (gateway, transport, _) = gateway();
        transport.expect(
            Method::POST,
            "/orders",
            500,
            json!({ "message": "Stok habis" }),
        );

        let err = gateway
            .post::<_, Value>("/orders", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Api(Api::Status { status, message: Some(ref m) })
                if status == StatusCode::INTERNAL_SERVER_ERROR && m == "Stok habis"
        ));
    }

    #[tokio::test]
    async fn network_failures_pass_through() {
        let (gateway, transport, _) = gateway();
        transport.expect_network_failure(Method::GET, "/products");

        let err = gateway.get::<Value>("/products").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn malformed_bodies_are_reported() {
        let (gateway, transport, _) = gateway();
        transport.expect(Method::GET, "/me", 200, json!("<html>"));

        let err = gateway.get::<Pong>("/me").await.unwrap_err();
        assert!(matches!(err, Error::Api(Api::MalformedBody(_))));
    }
}
