// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod store;

use std::sync::Arc;

use log::{info, warn};
use secrecy::{ExposeSecret as _, SecretString};
use tokio::sync::RwLock;

use crate::{
    error::Result,
    model::{user::Grant, Role, User},
    storage::{self, keys, StorageExt as _},
};

pub(crate) use store::Store;

/// Who the client is signed in as.
///
/// The token alone decides whether the session is authenticated; the user
/// record catches up through `Store::fetch_user`.
#[derive(Default)]
pub(crate) struct State {
    token: Option<SecretString>,
    user: Option<User>,
}

impl State {
    pub(crate) const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().map_or(false, |u| u.role == Role::Admin)
    }

    pub(crate) const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

/// The session state shared by the gateway and every store of a context.
#[derive(Clone, Default)]
pub(crate) struct Session {
    state: Arc<RwLock<State>>,
}

impl Session {
    /// Restores the session persisted by an earlier run.
    pub(crate) async fn hydrate(storage: &storage::Shared) -> Result<Self> {
        let mut storage = storage.lock().await;
        let token = storage.get(keys::TOKEN).await?;
        let user = storage.restore_json::<User>(keys::USER).await?;
        let saved_admin_flag = storage.get(keys::IS_ADMIN).await?;

        let state = match token {
            Some(token) => State {
                token: Some(SecretString::new(token)),
                user,
            },
            None => {
                if user.is_some() {
                    warn!("Ignoring a saved user record that has no token next to it");
                }
                State::default()
            }
        };

        if let Some(flag) = saved_admin_flag {
            if (flag == "true") != state.is_admin() {
                warn!(
                    "The saved admin flag ({}) disagrees with the saved user record; trusting the user record",
                    flag
                );
            }
        }
        if state.is_authenticated() {
            info!(
                "Restored session for {}",
                state.user().map_or("an unknown user", |u| u.email.as_str())
            );
        }

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    pub(crate) async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub(crate) async fn is_admin(&self) -> bool {
        self.state.read().await.is_admin()
    }

    pub(crate) async fn user(&self) -> Option<User> {
        self.state.read().await.user().cloned()
    }

    /// The `Authorization` header value for the current token, if any.
    pub(crate) async fn bearer(&self) -> Option<String> {
        self.state
            .read()
            .await
            .token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }

    /// Signs in with a freshly granted token and user, in memory and on disk.
    pub(crate) async fn establish(&self, storage: &storage::Shared, grant: Grant) -> Result<()> {
        let token = grant.token.expose_secret().clone();
        let user = grant.user;
        {
            let mut state = self.state.write().await;
            state.token = Some(grant.token);
            state.user = Some(user.clone());
        }

        let mut storage = storage.lock().await;
        storage.set(keys::TOKEN, &token).await?;
        persist_user(&mut **storage, &user).await
    }

    pub(crate) async fn replace_user(&self, storage: &storage::Shared, user: User) -> Result<()> {
        self.state.write().await.user = Some(user.clone());
        persist_user(&mut **storage.lock().await, &user).await
    }

    /// Forgets the session everywhere. Clearing an empty session is a no-op.
    pub(crate) async fn clear(&self, storage: &storage::Shared) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.token = None;
            state.user = None;
        }

        let mut storage = storage.lock().await;
        storage.remove(keys::TOKEN).await?;
        storage.remove(keys::USER).await?;
        storage.remove(keys::IS_ADMIN).await
    }
}

async fn persist_user(storage: &mut dyn storage::Storage, user: &User) -> Result<()> {
    storage.set_json(keys::USER, user).await?;
    storage
        .set(
            keys::IS_ADMIN,
            if user.role == Role::Admin {
                "true"
            } else {
                "false"
            },
        )
        .await
}
