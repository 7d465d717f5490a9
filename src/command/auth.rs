// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::{info, warn};

use crate::{
    context::Context,
    error::{Error, Result},
    model::user::Registration,
    nav::routes,
    password::RequestBuilder,
};

use super::{print_table, reported};

const MAX_ATTEMPTS: usize = 3;

/// Sign in with an email address and password.
#[derive(Debug, Parser)]
pub(crate) struct Login {
    /// Sign in through the admin login. Accounts without the admin role are
    /// refused.
    #[arg(long)]
    admin: bool,

    #[clap()]
    email: String,
}

#[async_trait]
impl super::Command for Login {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.enter(if self.admin {
            routes::ADMIN_LOGIN
        } else {
            routes::LOGIN
        })
        .await?;

        let description = format!("Enter the password for {}.", self.email);
        let mut last_error: Option<String> = None;
        for attempt in 1..=MAX_ATTEMPTS {
            let mut builder = RequestBuilder::new(&description);
            if let Some(e) = &last_error {
                builder = builder.with_error(e);
            }
            let password = ctx
                .prompt
                .prompt(builder.into_request())
                .await?
                .ok_or(Error::Cancelled)?;

            let result = if self.admin {
                ctx.session.admin_login(&self.email, password).await
            } else {
                ctx.session.login(&self.email, password, false).await
            };
            match result {
                Ok(user) => {
                    println!("Signed in as {} ({}).", user.name, user.role);
                    info!("Landed on {}", ctx.gateway.navigator().location().await);
                    return Ok(());
                }
                Err(e @ (Error::Unauthorized { .. } | Error::Validation { .. }))
                    if attempt < MAX_ATTEMPTS =>
                {
                    warn!("Sign-in attempt {} failed: {}", attempt, e);
                    last_error = ctx.session.error.clone();
                }
                Err(e) => return Err(reported(e, ctx.session.error.as_deref())),
            }
        }

        Err(Error::Command)
    }
}

/// Create an account and sign in with it.
#[derive(Debug, Parser)]
pub(crate) struct Register {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: Option<String>,
}

#[async_trait]
impl super::Command for Register {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.enter(routes::REGISTER).await?;

        let description = format!("Choose a password for {}.", self.email);
        let password = ctx
            .prompt
            .prompt(RequestBuilder::new(&description).into_request())
            .await?
            .ok_or(Error::Cancelled)?;
        let password_confirmation = ctx
            .prompt
            .prompt(
                RequestBuilder::new(&description)
                    .with_label("Confirm password")
                    .into_request(),
            )
            .await?
            .ok_or(Error::Cancelled)?;

        let registration = Registration {
            name: self.name,
            email: self.email,
            phone: self.phone,
            password,
            password_confirmation,
        };
        let user = ctx
            .session
            .register(&registration)
            .await
            .map_err(|e| reported(e, ctx.session.error.as_deref()))?;
        println!("Welcome, {}! You are signed in.", user.name);
        Ok(())
    }
}

/// Sign out, forgetting the saved session.
#[derive(Debug, Parser)]
pub(crate) struct Logout {}

#[async_trait]
impl super::Command for Logout {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.session.logout().await?;
        if let Some(e) = &ctx.session.error {
            warn!("{}", e);
        }
        println!("Signed out.");
        Ok(())
    }
}

/// Show who is signed in.
#[derive(Debug, Parser)]
pub(crate) struct Whoami {}

#[async_trait]
impl super::Command for Whoami {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        if !ctx.gateway.session().is_authenticated().await {
            println!("Not signed in.");
            return Ok(());
        }

        ctx.session
            .fetch_user()
            .await
            .map_err(|e| reported(e, ctx.session.error.as_deref()))?;
        match ctx.gateway.session().user().await {
            Some(user) => print_table([user]),
            None => println!("Signed in, but the server did not say as whom."),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;
    use serde_json::json;

    use crate::{
        command::{tests::context_over, Command as _},
        model::Role,
        storage::Memory,
        transport::scripted::Scripted,
    };

    use super::*;

    fn grant_body() -> serde_json::Value {
        json!({"data": {
            "user": {"id": 9, "name": "Sari", "email": "sari@example.com", "role": "user"},
            "token": "fresh-token",
        }})
    }

    async fn context(answers: &[Option<&'static str>]) -> (Context, Arc<Scripted>) {
        context_over(&Memory::new(), answers).await
    }

    #[tokio::test]
    async fn login_asks_again_after_wrong_credentials() -> Result<()> {
        let (mut ctx, transport) = context(&[Some("salah"), Some("benar")]).await;
        transport.expect(
            Method::POST,
            "/login",
            401,
            json!({"message": "Email atau password salah"}),
        );
        transport.expect(Method::POST, "/login", 200, grant_body());

        Login {
            admin: false,
            email: "sari@example.com".to_owned(),
        }
        .execute(&mut ctx)
        .await?;

        assert!(ctx.gateway.session().is_authenticated().await);
        assert_eq!(
            transport.sent()[1].body,
            Some(json!({"email": "sari@example.com", "password": "benar"}))
        );
        Ok(())
    }

    #[tokio::test]
    async fn admin_login_lands_on_the_dashboard() -> Result<()> {
        let (mut ctx, transport) = context(&[Some("rahasia")]).await;
        transport.expect(
            Method::POST,
            "/admin-login",
            200,
            json!({"data": {
                "user": {"id": 1, "name": "Admin", "email": "admin@example.com", "role": "admin"},
                "token": "admin-token",
            }}),
        );

        Login {
            admin: true,
            email: "admin@example.com".to_owned(),
        }
        .execute(&mut ctx)
        .await?;

        assert!(ctx.gateway.session().is_admin().await);
        assert_eq!(
            ctx.gateway.session().user().await.map(|user| user.role),
            Some(Role::Admin)
        );
        assert_eq!(
            ctx.gateway.navigator().location().await,
            routes::ADMIN_DASHBOARD
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_gives_up_when_the_prompt_is_dismissed() {
        let (mut ctx, transport) = context(&[None]).await;

        let err = Login {
            admin: false,
            email: "sari@example.com".to_owned(),
        }
        .execute(&mut ctx)
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn register_sends_both_passwords() -> Result<()> {
        let (mut ctx, transport) = context(&[Some("rahasia1"), Some("rahasia1")]).await;
        transport.expect(Method::POST, "/register", 201, grant_body());

        Register {
            name: "Sari".to_owned(),
            email: "sari@example.com".to_owned(),
            phone: Some("0812".to_owned()),
        }
        .execute(&mut ctx)
        .await?;

        assert_eq!(
            transport.sent()[0].body,
            Some(json!({
                "name": "Sari",
                "email": "sari@example.com",
                "phone": "0812",
                "password": "rahasia1",
                "password_confirmation": "rahasia1",
            }))
        );
        Ok(())
    }
}
