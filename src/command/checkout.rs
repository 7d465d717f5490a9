// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::{error, warn};
use rust_decimal::Decimal;

use crate::{
    context::Context,
    error::{Error, Result},
    model::Checkout,
    nav::routes,
};

use super::{orders::print_receipt, reported};

/// Order everything in the cart.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Where the order should be delivered.
    #[arg(long)]
    address: Option<String>,

    #[arg(long, default_value = "cod")]
    payment_method: String,

    /// A note for the kitchen or the courier.
    #[arg(long)]
    notes: Option<String>,

    #[arg(long, default_value = "10000")]
    delivery_fee: Decimal,

    #[arg(long, default_value = "2000")]
    service_fee: Decimal,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.enter(routes::CART).await?;
        if !ctx.gateway.session().is_authenticated().await {
            error!("Sign in before checking out");
            return Err(Error::NotAuthenticated);
        }
        ctx.cart
            .fetch_cart()
            .await
            .map_err(|e| reported(e, ctx.cart.error.as_deref()))?;

        let lines = ctx.cart.items().await;
        if lines.is_empty() {
            error!("The cart is empty, so there is nothing to order");
            return Err(Error::Command);
        }
        let mut checkout = Checkout::from_cart(
            lines,
            self.delivery_fee,
            self.service_fee,
            self.payment_method,
        );
        checkout.address = self.address;
        checkout.notes = self.notes;

        let placed = ctx.orders.place_order(&checkout).await.map(|_| ());
        placed.map_err(|e| reported(e, ctx.orders.error.as_deref()))?;

        if let Err(e) = ctx.cart.clear_cart().await {
            warn!("The order went through, but we could not empty the cart: {}", e);
        }

        ctx.enter(routes::RECEIPT).await?;
        if let Some(order) = ctx.orders.last_order() {
            print_receipt(order);
        }
        Ok(())
    }
}
