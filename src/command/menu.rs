// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{
    context::Context,
    error::{Error, Result},
    model::ProductId,
    nav::routes,
};

use super::{print_table, reported};

/// List what the kitchen serves.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Show only the product with this ID.
    #[arg(long)]
    id: Option<ProductId>,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.enter(routes::MENU).await?;
        ctx.menu
            .fetch_menu_items()
            .await
            .map_err(|e| reported(e, ctx.menu.error.as_deref()))?;

        match self.id {
            Some(id) => {
                let product = ctx
                    .menu
                    .get_item_by_id(id)
                    .ok_or(Error::ProductNotFound(id))?;
                print_table([product]);
            }
            None if ctx.menu.items.is_empty() => println!("The menu is empty."),
            None => print_table(&ctx.menu.items),
        }
        Ok(())
    }
}
