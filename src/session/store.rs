// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{info, warn};
use secrecy::SecretString;
use serde::de::IgnoredAny;

use crate::{
    error::{Error, Result},
    gateway::Gateway,
    model::{
        user::{Credentials, Grant, Registration},
        Data, Envelope, Role, User,
    },
    nav::routes,
};

const LOGIN_FAILED: &str = "Login failed. Please check your email and password.";
const ADMIN_LOGIN_FAILED: &str = "Admin login failed. Please check your credentials.";
const REGISTER_FAILED: &str = "Registration failed. Please check the form and try again.";
const LOGOUT_FAILED: &str = "The server did not confirm the logout.";
const FETCH_USER_FAILED: &str = "Failed to fetch user data.";

/// Signs users in and out.
pub(crate) struct Store {
    gateway: Gateway,
    pub(crate) error: Option<String>,
    pub(crate) loading: bool,
}

impl Store {
    pub(crate) const fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            error: None,
            loading: false,
        }
    }

    pub(crate) async fn login(
        &mut self,
        email: &str,
        password: SecretString,
        as_admin: bool,
    ) -> Result<User> {
        let (path, fallback) = if as_admin {
            ("/admin-login", ADMIN_LOGIN_FAILED)
        } else {
            ("/login", LOGIN_FAILED)
        };
        let credentials = Credentials {
            email: email.to_owned(),
            password,
        };

        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .post::<_, Data<Grant>>(path, &credentials)
            .await;
        self.loading = false;

        let grant = self.record(result, fallback)?.data;
        if as_admin && grant.user.role != Role::Admin {
            let err = Error::Forbidden(grant.user.role);
            warn!("{} signed in through the admin login without the admin role", grant.user.email);
            self.error = Some(err.user_message(ADMIN_LOGIN_FAILED));
            self.forget().await?;
            return Err(err);
        }

        self.establish(grant).await
    }

    pub(crate) async fn admin_login(&mut self, email: &str, password: SecretString) -> Result<User> {
        self.login(email, password, true).await
    }

    /// Creates an account and signs in with it.
    pub(crate) async fn register(&mut self, registration: &Registration) -> Result<User> {
        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .post::<_, Data<Grant>>("/register", registration)
            .await;
        self.loading = false;

        let grant = self.record(result, REGISTER_FAILED)?.data;
        self.establish(grant).await
    }

    /// Signs out. Whatever the server says, the local session is gone
    /// afterwards.
    pub(crate) async fn logout(&mut self) -> Result<()> {
        self.loading = true;
        self.error = None;
        if self.gateway.session().is_authenticated().await {
            if let Err(e) = self.gateway.trigger::<IgnoredAny>("/logout").await {
                warn!("The server did not accept our logout: {}", e);
                self.error = Some(e.user_message(LOGOUT_FAILED));
            }
        }
        let result = self.forget().await;
        self.loading = false;
        result
    }

    /// Refreshes the signed-in user from `/me`.
    pub(crate) async fn fetch_user(&mut self) -> Result<()> {
        if !self.gateway.session().is_authenticated().await {
            return Ok(());
        }

        self.loading = true;
        let result = self.gateway.get::<Envelope<User>>("/me").await;
        self.loading = false;

        match result {
            Ok(user) => {
                self.error = None;
                let session = self.gateway.session();
                session
                    .replace_user(self.gateway.storage(), user.into_inner())
                    .await
            }
            Err(e) if e.is_unauthorized() => {
                self.logout().await?;
                self.error = Some(FETCH_USER_FAILED.to_owned());
                Err(e)
            }
            Err(e) => {
                warn!("We kept the current session although /me failed: {}", e);
                self.error = Some(e.user_message(FETCH_USER_FAILED));
                Err(e)
            }
        }
    }

    fn record<T>(&mut self, result: Result<T>, fallback: &str) -> Result<T> {
        result.map_err(|e| {
            self.error = Some(e.user_message(fallback));
            e
        })
    }

    async fn establish(&mut self, grant: Grant) -> Result<User> {
        let user = grant.user.clone();
        self.gateway
            .session()
            .establish(self.gateway.storage(), grant)
            .await?;
        info!("Signed in as {} ({})", user.email, user.role);

        let landing = match user.role {
            Role::Admin => routes::ADMIN_DASHBOARD,
            Role::User => routes::HOME,
        };
        _ = self.gateway.navigator().navigate(landing).await;
        Ok(user)
    }

    async fn forget(&self) -> Result<()> {
        self.gateway
            .session()
            .clear(self.gateway.storage())
            .await?;
        _ = self.gateway.navigator().navigate(routes::LOGIN).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use crate::{
        gateway::tests::{gateway, signed_in},
        storage::{keys, Storage as _},
        transport::scripted::Scripted,
    };

    use super::*;

    fn grant_body(role: &str) -> serde_json::Value {
        json!({
            "data": {
                "user": {"id": 9, "name": "Sari", "email": "sari@example.com", "role": role},
                "token": "fresh-token",
            }
        })
    }

    fn password() -> SecretString {
        SecretString::new("rahasia".to_owned())
    }

    #[tokio::test]
    async fn login_then_logout_leaves_nothing_behind() -> Result<()> {
        let (gateway, transport, mut memory) = gateway();
        let mut store = Store::new(gateway.clone());

        transport.expect(Method::POST, "/login", 200, grant_body("user"));
        let user = store.login("sari@example.com", password(), false).await?;
        assert_eq!(user.role, Role::User);
        assert!(gateway.session().is_authenticated().await);
        assert_eq!(gateway.navigator().location().await, routes::HOME);
        assert_eq!(memory.get(keys::TOKEN).await?.as_deref(), Some("fresh-token"));

        transport.expect(Method::POST, "/logout", 200, json!({"message": "ok"}));
        store.logout().await?;

        assert!(!gateway.session().is_authenticated().await);
        assert_eq!(memory.get(keys::TOKEN).await?, None);
        assert_eq!(memory.get(keys::USER).await?, None);
        assert_eq!(gateway.navigator().location().await, routes::LOGIN);

        let sent = transport.sent();
        assert_eq!(
            sent[0].body,
            Some(json!({"email": "sari@example.com", "password": "rahasia"}))
        );
        assert_eq!(
            Scripted::bearer(&sent[1]).as_deref(),
            Some("Bearer fresh-token")
        );
        transport.assert_exhausted();
        Ok(())
    }

    #[tokio::test]
    async fn admin_login_lands_on_the_dashboard() -> Result<()> {
        let (gateway, transport, mut memory) = gateway();
        let mut store = Store::new(gateway.clone());

        transport.expect(
            Method::POST,
            "/admin-login",
            200,
            grant_body("admin"),
        );
        _ = store.admin_login("sari@example.com", password()).await?;

        assert!(gateway.session().is_admin().await);
        assert_eq!(gateway.navigator().location().await, routes::ADMIN_DASHBOARD);
        assert_eq!(memory.get(keys::IS_ADMIN).await?.as_deref(), Some("true"));
        Ok(())
    }

    #[tokio::test]
    async fn admin_login_without_admin_role_logs_out() -> Result<()> {
        let (gateway, transport, mut memory) = signed_in(Role::User).await;
        let mut store = Store::new(gateway.clone());

        transport.expect(Method::POST, "/admin-login", 200, grant_body("user"));
        let err = store
            .login("sari@example.com", password(), true)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Forbidden(Role::User)));
        assert!(store.error.is_some());
        assert!(!gateway.session().is_authenticated().await);
        assert_eq!(memory.get(keys::TOKEN).await?, None);
        assert_eq!(gateway.navigator().location().await, routes::LOGIN);
        Ok(())
    }

    #[tokio::test]
    async fn failed_login_leaves_prior_state_alone() -> Result<()> {
        let (gateway, transport, mut memory) = signed_in(Role::User).await;
        let mut store = Store::new(gateway.clone());

        transport.expect(
            Method::POST,
            "/login",
            401,
            json!({"message": "Email atau password salah"}),
        );
        let err = store
            .login("sari@example.com", password(), false)
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(store.error.as_deref(), Some("Email atau password salah"));
        assert!(!store.loading);
        assert!(gateway.session().is_authenticated().await);
        assert_eq!(memory.get(keys::TOKEN).await?.as_deref(), Some("token-1"));
        assert_eq!(gateway.navigator().location().await, routes::HOME);
        Ok(())
    }

    #[tokio::test]
    async fn login_network_failure_uses_the_generic_message() {
        let (gateway, transport, _) = gateway();
        let mut store = Store::new(gateway);

        transport.expect_network_failure(Method::POST, "/login");
        _ = store
            .login("sari@example.com", password(), false)
            .await
            .unwrap_err();

        assert_eq!(store.error.as_deref(), Some(crate::error::NETWORK_MESSAGE));
    }

    #[tokio::test]
    async fn register_signs_in_and_joins_validation_messages() -> Result<()> {
        let (gateway, transport, _) = gateway();
        let mut store = Store::new(gateway.clone());
        let registration = Registration {
            name: "Sari".to_owned(),
            email: "sari@example.com".to_owned(),
            phone: None,
            password: password(),
            password_confirmation: password(),
        };

        transport.expect(
            Method::POST,
            "/register",
            422,
            json!({
                "message": "invalid",
                "errors": {
                    "email": ["The email has already been taken."],
                    "password": ["The password is too short.", "The password is too common."],
                },
            }),
        );
        _ = store.register(&registration).await.unwrap_err();
        assert_eq!(
            store.error.as_deref(),
            Some("The email has already been taken.; The password is too short.; The password is too common.")
        );
        assert!(!gateway.session().is_authenticated().await);

        transport.expect(Method::POST, "/register", 201, grant_body("user"));
        _ = store.register(&registration).await?;
        assert!(gateway.session().is_authenticated().await);
        assert_eq!(store.error, None);
        Ok(())
    }

    #[tokio::test]
    async fn logout_survives_a_failing_server() -> Result<()> {
        let (gateway, transport, mut memory) = signed_in(Role::User).await;
        let mut store = Store::new(gateway.clone());

        transport.expect_network_failure(Method::POST, "/logout");
        store.logout().await?;

        assert!(!gateway.session().is_authenticated().await);
        assert_eq!(memory.get(keys::TOKEN).await?, None);
        assert_eq!(gateway.navigator().location().await, routes::LOGIN);
        Ok(())
    }

    #[tokio::test]
    async fn logout_without_a_session_sends_nothing() -> Result<()> {
        let (gateway, transport, _) = gateway();
        let mut store = Store::new(gateway.clone());

        store.logout().await?;

        assert_eq!(transport.sent_count(), 0);
        assert_eq!(gateway.navigator().location().await, routes::LOGIN);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_user_is_a_no_op_without_a_token() -> Result<()> {
        let (gateway, transport, _) = gateway();
        let mut store = Store::new(gateway);

        store.fetch_user().await?;
        assert_eq!(transport.sent_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_user_rederives_the_role() -> Result<()> {
        let (gateway, transport, _) = signed_in(Role::User).await;
        let mut store = Store::new(gateway.clone());

        transport.expect(
            Method::GET,
            "/me",
            200,
            json!({"id": 1, "name": "Budi", "email": "budi@example.com", "role": {"value": "admin"}}),
        );
        store.fetch_user().await?;

        assert!(gateway.session().is_admin().await);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_user_keeps_the_session_on_transient_errors() {
        let (gateway, transport, _) = signed_in(Role::User).await;
        let mut store = Store::new(gateway.clone());

        transport.expect(Method::GET, "/me", 503, json!({}));
        _ = store.fetch_user().await.unwrap_err();

        assert!(gateway.session().is_authenticated().await);
        assert_eq!(store.error.as_deref(), Some(FETCH_USER_FAILED));
    }

    #[tokio::test]
    async fn fetch_user_logs_out_on_unauthorized() {
        let (gateway, transport, _) = signed_in(Role::User).await;
        let mut store = Store::new(gateway.clone());

        transport.expect(Method::GET, "/me", 401, json!({}));
        let err = store.fetch_user().await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!gateway.session().is_authenticated().await);
        assert_eq!(gateway.navigator().location().await, routes::LOGIN);
        assert_eq!(transport.sent_count(), 1);
    }
}
