// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::{
    context::Context,
    error::Result,
    model::{OrderId, PlacedOrder},
    nav::routes,
};

use super::{print_table, reported};

#[derive(Debug, Subcommand)]
enum Action {
    /// List your orders.
    List {
        /// Only orders that are still under way.
        #[arg(long, conflicts_with = "past")]
        active: bool,
        /// Only orders that are finished.
        #[arg(long)]
        past: bool,
    },
    /// Show one order in detail and remember it for tracking.
    Show { id: OrderId },
    /// Show the receipt of the order placed last.
    Receipt {
        /// Forget the receipt after showing it.
        #[arg(long)]
        clear: bool,
    },
}

/// Follow your orders.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    #[clap(subcommand)]
    action: Action,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        match self.action {
            Action::List { active, past } => {
                ctx.enter(routes::ORDERS).await?;
                let orders = &mut ctx.orders;
                orders.clear_current_order().await?;
                orders
                    .fetch_user_orders()
                    .await
                    .map_err(|e| reported(e, orders.error.as_deref()))?;

                let shown = if active {
                    orders.active_orders()
                } else if past {
                    orders.past_orders()
                } else {
                    orders.orders.iter().collect()
                };
                if shown.is_empty() {
                    println!("No orders to show.");
                } else {
                    print_table(shown);
                }
            }
            Action::Show { id } => {
                ctx.enter(&format!("{}/{id}", routes::ORDERS)).await?;
                let orders = &mut ctx.orders;
                let fetched = orders.fetch_order_by_id(id).await.map(|_| ());
                fetched.map_err(|e| reported(e, orders.error.as_deref()))?;

                if let Some(order) = orders.current_order() {
                    print_table([order]);
                    print_table(&order.items);
                }
            }
            Action::Receipt { clear } => {
                ctx.enter(routes::RECEIPT).await?;
                let orders = &mut ctx.orders;
                match orders.last_order() {
                    Some(order) => print_receipt(order),
                    None => println!("There is no recent order."),
                }
                if clear {
                    orders.clear_last_order().await?;
                }
            }
        }
        Ok(())
    }
}

fn amount(order: &PlacedOrder, field: &str) -> Option<String> {
    order.submitted.get(field).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

pub(crate) fn print_receipt(order: &PlacedOrder) {
    println!("Order #{} ({})", order.id, order.status);
    print_table(order.items());
    for (label, field) in [
        ("Subtotal", "subtotal"),
        ("Delivery fee", "delivery_fee"),
        ("Service fee", "service_fee"),
        ("Total", "total"),
        ("Payment", "payment_method"),
        ("Address", "address"),
    ] {
        if let Some(value) = amount(order, field) {
            println!("{label}: {value}");
        }
    }
    println!("Estimated delivery: {}", order.estimated_delivery_time);
}
