// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::error;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    context::Context,
    error::{Error, Result},
};

pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod cart;
pub(crate) mod checkout;
pub(crate) mod content;
pub(crate) mod menu;
pub(crate) mod orders;
pub(crate) mod reviews;
pub(crate) mod team;

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: &mut Context) -> Result<()>;
}

pub(crate) fn print_table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    println!("{}", Table::new(rows).with(Style::rounded()));
}

/// Logs what a store recorded about a failed action and passes the error on.
pub(crate) fn reported(err: Error, message: Option<&str>) -> Error {
    if let Some(message) = message {
        error!("{}", message);
    }
    err
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use crate::{
        model::Role,
        password::tests::Canned,
        session::tests::grant,
        storage::{self, keys, Memory, Storage as _, StorageExt as _},
        transport::scripted::Scripted,
    };

    use super::*;

    /// A context over `memory`, answering password prompts from `answers`.
    pub(crate) async fn context_over(
        memory: &Memory,
        answers: &[Option<&'static str>],
    ) -> (Context, Arc<Scripted>) {
        let transport = Scripted::new();
        let ctx = Context::new(
            Arc::<Scripted>::clone(&transport),
            storage::shared(memory.clone()),
            Box::new(Canned::new(answers)),
        )
        .await
        .unwrap();
        (ctx, transport)
    }

    /// Storage as a previous `login` would have left it.
    pub(crate) async fn remembered(role: Role) -> Memory {
        let mut memory = Memory::new();
        memory.set(keys::TOKEN, "token-1").await.unwrap();
        memory.set_json(keys::USER, &grant(role).user).await.unwrap();
        memory
    }

    pub(crate) async fn signed_in(role: Role) -> (Context, Arc<Scripted>, Memory) {
        let memory = remembered(role).await;
        let (ctx, transport) = context_over(&memory, &[]).await;
        (ctx, transport, memory)
    }
}
