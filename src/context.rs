// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use log::info;

use crate::{
    cart, content,
    error::{Error, Result},
    gateway::Gateway,
    menu,
    model::Role,
    nav::Navigator,
    orders,
    password::Prompt,
    reviews,
    session::{self, Session},
    storage, team,
    transport::Transport,
};

/// Every store of one client, wired to a single gateway and session.
pub(crate) struct Context {
    pub(crate) gateway: Gateway,
    pub(crate) session: session::Store,
    pub(crate) cart: cart::Store,
    pub(crate) orders: orders::Store,
    pub(crate) menu: menu::Store,
    pub(crate) reviews: reviews::Store,
    pub(crate) team: team::Store,
    pub(crate) content: content::Store,
    pub(crate) prompt: Box<dyn Prompt>,
}

impl Context {
    /// Restores whatever the storage remembers and builds the stores on top.
    pub(crate) async fn new(
        transport: Arc<dyn Transport>,
        storage: storage::Shared,
        prompt: Box<dyn Prompt>,
    ) -> Result<Self> {
        let session = Session::hydrate(&storage).await?;
        let navigator = Navigator::new(session.clone());
        let gateway = Gateway::new(transport, session, Arc::clone(&storage), navigator);

        Ok(Self {
            session: session::Store::new(gateway.clone()),
            cart: cart::Store::new(gateway.clone()),
            orders: orders::Store::hydrate(gateway.clone()).await?,
            menu: menu::Store::new(gateway.clone()),
            reviews: reviews::Store::new(gateway.clone()),
            team: team::Store::new(gateway.clone()),
            content: content::Store::new(storage),
            prompt,
            gateway,
        })
    }

    /// Navigates to `path`, failing if the guard sends us elsewhere.
    pub(crate) async fn enter(&self, path: &str) -> Result<()> {
        let reached = self.gateway.navigator().navigate(path).await;
        if reached == path {
            return Ok(());
        }

        info!("{} is not reachable from this session", path);
        let session = self.gateway.session();
        if session.is_authenticated().await {
            Err(Error::Forbidden(
                session.user().await.map_or(Role::User, |user| user.role),
            ))
        } else {
            Err(Error::NotAuthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use crate::{
        model::Role,
        nav::routes,
        password::tests::Canned,
        session::tests::grant,
        storage::{keys, Memory, Storage as _, StorageExt as _},
        transport::scripted::Scripted,
    };

    use super::*;

    #[tokio::test]
    async fn stores_share_one_session() -> Result<()> {
        let transport = Scripted::new();
        let mut ctx = Context::new(
            Arc::<Scripted>::clone(&transport),
            storage::shared(Memory::new()),
            Box::<Canned>::default(),
        )
        .await?;

        assert!(matches!(
            ctx.cart.add_to_cart(1, 1).await,
            Err(Error::NotAuthenticated)
        ));

        transport.expect(
            Method::POST,
            "/login",
            200,
            json!({"data": {
                "user": {"id": 2, "name": "Sari", "email": "sari@example.com", "role": "user"},
                "token": "t",
            }}),
        );
        _ = ctx
            .session
            .login("sari@example.com", secrecy::SecretString::new("pw".to_owned()), false)
            .await?;

        transport.expect(Method::GET, "/orders", 200, json!({"data": []}));
        ctx.orders.fetch_user_orders().await?;
        assert_eq!(
            Scripted::bearer(&transport.sent()[1]).as_deref(),
            Some("Bearer t")
        );
        Ok(())
    }

    #[tokio::test]
    async fn a_new_context_picks_up_the_saved_session() -> Result<()> {
        let mut memory = Memory::new();
        memory.set(keys::TOKEN, "token-1").await?;
        memory.set_json(keys::USER, &grant(Role::Admin).user).await?;

        let ctx = Context::new(
            Scripted::new(),
            storage::shared(memory),
            Box::<Canned>::default(),
        )
        .await?;
        assert!(ctx.gateway.session().is_admin().await);
        ctx.enter(routes::ADMIN_ORDERS).await?;
        Ok(())
    }

    #[tokio::test]
    async fn entering_the_admin_area_needs_an_admin() -> Result<()> {
        let storage = storage::shared(Memory::new());
        let ctx = Context::new(
            Scripted::new(),
            Arc::clone(&storage),
            Box::<Canned>::default(),
        )
        .await?;
        assert!(matches!(
            ctx.enter(routes::ADMIN_ORDERS).await,
            Err(Error::NotAuthenticated)
        ));

        ctx.gateway
            .session()
            .establish(&storage, grant(Role::User))
            .await?;
        assert!(matches!(
            ctx.enter(routes::ADMIN_ORDERS).await,
            Err(Error::Forbidden(Role::User))
        ));
        assert_eq!(ctx.gateway.navigator().location().await, routes::ADMIN_LOGIN);
        Ok(())
    }
}
