// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::Mutex;

use crate::session::Session;

pub(crate) mod routes {
    pub(crate) const HOME: &str = "/";
    pub(crate) const LOGIN: &str = "/login";
    pub(crate) const REGISTER: &str = "/register";
    pub(crate) const ADMIN_LOGIN: &str = "/admin-login";
    pub(crate) const ADMIN: &str = "/admin";
    pub(crate) const ADMIN_DASHBOARD: &str = "/admin/dashboard";
    pub(crate) const ADMIN_ORDERS: &str = "/admin/orders";
    pub(crate) const ADMIN_MEMBERS: &str = "/admin/members";
    pub(crate) const ADMIN_CONTENT: &str = "/admin/content";
    pub(crate) const ADMIN_FEEDBACK: &str = "/admin/feedback";
    pub(crate) const MENU: &str = "/menu";
    pub(crate) const CART: &str = "/keranjang";
    pub(crate) const ORDERS: &str = "/pesanan";
    pub(crate) const RECEIPT: &str = "/pesanan/struk";
    pub(crate) const TEAM: &str = "/team";
    pub(crate) const CONTACT: &str = "/contact";
}

/// Whether a path belongs to the admin area. `/admin-login` does not.
pub(crate) fn is_admin_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path == routes::ADMIN
        || path
            .strip_prefix(routes::ADMIN)
            .map_or(false, |rest| rest.starts_with('/'))
}

/// Where a navigation to `path` actually ends up.
pub(crate) fn guard(path: &str, is_admin: bool) -> &str {
    if is_admin_path(path) && !is_admin {
        routes::ADMIN_LOGIN
    } else {
        path
    }
}

/// Keeps track of where the client is, consulting the session on every move.
#[derive(Clone)]
pub(crate) struct Navigator {
    session: Session,
    history: Arc<Mutex<Vec<String>>>,
}

impl Navigator {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            history: Arc::new(Mutex::new(vec![routes::HOME.to_owned()])),
        }
    }

    /// Moves to `path`, or to the admin login when the guard refuses it.
    ///
    /// Returns the location actually reached. Moving to the current location
    /// again leaves the history alone.
    pub(crate) async fn navigate(&self, path: &str) -> String {
        let target = guard(path, self.session.is_admin().await).to_owned();
        if target != path {
            info!("Redirecting from {} to {}", path, target);
        }

        let mut history = self.history.lock().await;
        if history.last() != Some(&target) {
            debug!("Navigating to {}", target);
            history.push(target.clone());
        }
        target
    }

    pub(crate) async fn location(&self) -> String {
        self.history
            .lock()
            .await
            .last()
            .cloned()
            .unwrap_or_else(|| routes::HOME.to_owned())
    }

    #[cfg(test)]
    pub(crate) async fn history(&self) -> Vec<String> {
        self.history.lock().await.clone()
    }
}
