// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use crate::{
    context::Context,
    error::Result,
    model::{LineId, ProductId},
    nav::routes,
};

use super::{print_table, reported};

#[derive(Debug, Subcommand)]
enum Action {
    /// Show the cart.
    Show,
    /// Put a product in the cart, or add to the line that already holds it.
    Add {
        product: ProductId,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        qty: u32,
    },
    /// Add one to a cart line.
    Inc { line: LineId },
    /// Take one from a cart line, removing it at zero.
    Dec { line: LineId },
    /// Remove a cart line.
    Remove { line: LineId },
    /// Empty the cart.
    Clear,
}

/// Look at and change the cart.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    #[clap(subcommand)]
    action: Option<Action>,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.enter(routes::CART).await?;
        let cart = &mut ctx.cart;
        cart.fetch_cart()
            .await
            .map_err(|e| reported(e, cart.error.as_deref()))?;

        let result = match self.action.unwrap_or(Action::Show) {
            Action::Show => Ok(()),
            Action::Add { product, qty } => cart.add_to_cart(product, qty).await,
            Action::Inc { line } => cart.increment(line).await,
            Action::Dec { line } => cart.decrement(line).await,
            Action::Remove { line } => cart.remove_from_cart(line).await,
            Action::Clear => cart.clear_cart().await,
        };
        result.map_err(|e| reported(e, cart.error.as_deref()))?;

        let items = cart.items().await;
        if items.is_empty() {
            println!("The cart is empty.");
        } else {
            print_table(items);
            println!("Total: {}", cart.total().await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::{json, Value};

    use crate::{
        command::{
            tests::{context_over, signed_in},
            Command as _,
        },
        error::Error,
        model::Role,
        storage::Memory,
    };

    use super::*;

    fn line(id: LineId, quantity: u32) -> Value {
        json!({
            "id": id,
            "product_id": 10,
            "quantity": quantity,
            "product": {"name": "Soto", "price": "12500", "image": null},
        })
    }

    #[tokio::test]
    async fn adding_loads_the_cart_first() -> Result<()> {
        let (mut ctx, transport, _) = signed_in(Role::User).await;
        transport.expect(Method::GET, "/cart", 200, json!({"data": []}));
        transport.expect(Method::POST, "/cart", 201, json!({}));
        transport.expect(Method::GET, "/cart", 200, json!({ "data": [line(8, 2)] }));

        Command {
            action: Some(Action::Add {
                product: 10,
                qty: 2,
            }),
        }
        .execute(&mut ctx)
        .await?;

        assert_eq!(
            transport.sent()[1].body,
            Some(json!({"product_id": 10, "quantity": 2}))
        );
        assert_eq!(ctx.cart.items().await.len(), 1);
        transport.assert_exhausted();
        Ok(())
    }

    #[tokio::test]
    async fn decrementing_the_last_one_removes_the_line() -> Result<()> {
        let (mut ctx, transport, _) = signed_in(Role::User).await;
        transport.expect(Method::GET, "/cart", 200, json!({ "data": [line(8, 1)] }));
        transport.expect(Method::DELETE, "/cart/8", 200, json!({}));

        Command {
            action: Some(Action::Dec { line: 8 }),
        }
        .execute(&mut ctx)
        .await?;

        assert!(ctx.cart.items().await.is_empty());
        transport.assert_exhausted();
        Ok(())
    }

    #[tokio::test]
    async fn unknown_lines_fail_without_a_request() {
        let (mut ctx, transport, _) = signed_in(Role::User).await;
        transport.expect(Method::GET, "/cart", 200, json!({ "data": [line(8, 1)] }));

        let err = Command {
            action: Some(Action::Remove { line: 9 }),
        }
        .execute(&mut ctx)
        .await
        .unwrap_err();

        assert!(matches!(err, Error::CartLineNotFound(9)));
        assert_eq!(transport.sent_count(), 1);
    }

    #[tokio::test]
    async fn showing_without_a_session_sends_nothing() -> Result<()> {
        let (mut ctx, transport) = context_over(&Memory::new(), &[]).await;

        Command { action: None }.execute(&mut ctx).await?;

        assert!(ctx.cart.items().await.is_empty());
        assert_eq!(transport.sent_count(), 0);
        Ok(())
    }
}
