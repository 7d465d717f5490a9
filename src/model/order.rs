// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

use super::{display_option, CartLine, OrderId, ProductId};

pub(crate) const DEFAULT_DELIVERY_ESTIMATE: &str = "15 - 30 menit";

/// Where an order is in the kitchen's lifecycle.
///
/// The wire names are the Indonesian labels the API uses. Every status except
/// [`OrderStatus::Completed`] counts as active.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) enum OrderStatus {
    #[default]
    #[serde(rename = "Dipesan")]
    Placed,
    #[serde(rename = "Disiapkan")]
    Preparing,
    #[serde(rename = "Dikirim")]
    Delivering,
    /// Handed over, waiting for the customer to confirm.
    #[serde(rename = "Pesanan Selesai")]
    Delivered,
    #[serde(rename = "Selesai")]
    Completed,
}

impl OrderStatus {
    pub(crate) const LIFECYCLE: [Self; 5] = [
        Self::Placed,
        Self::Preparing,
        Self::Delivering,
        Self::Delivered,
        Self::Completed,
    ];

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "Dipesan",
            Self::Preparing => "Disiapkan",
            Self::Delivering => "Dikirim",
            Self::Delivered => "Pesanan Selesai",
            Self::Completed => "Selesai",
        }
    }

    const fn alias(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Preparing => "preparing",
            Self::Delivering => "delivering",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
        }
    }

    pub(crate) const fn is_closed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LIFECYCLE
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(s) || status.alias().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| {
                format!(
                    "unknown order status {s:?} (expected one of: {})",
                    Self::LIFECYCLE
                        .iter()
                        .map(|status| status.alias())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub(crate) struct OrderItem {
    #[serde(default)]
    #[tabled(rename = "#")]
    pub(crate) id: u64,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) product_id: Option<ProductId>,
    #[serde(default)]
    #[tabled(rename = "Name", display_with("Self::display_name", self))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) product_name: Option<String>,
    #[serde(alias = "qty")]
    #[tabled(rename = "Qty")]
    pub(crate) quantity: u32,
    #[serde(default)]
    #[tabled(rename = "Price")]
    pub(crate) price: Decimal,
}

impl OrderItem {
    pub(crate) fn display_name(&self) -> String {
        self.product_name
            .as_ref()
            .or(self.name.as_ref())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub(crate) struct Order {
    #[tabled(rename = "ID")]
    pub(crate) id: OrderId,
    #[tabled(rename = "Status")]
    pub(crate) status: OrderStatus,
    #[serde(default)]
    #[tabled(rename = "Items", display_with = "Self::display_items")]
    pub(crate) items: Vec<OrderItem>,
    #[serde(default)]
    #[tabled(rename = "Total")]
    pub(crate) total: Decimal,
    #[serde(default)]
    #[tabled(rename = "Placed At", display_with = "display_option")]
    pub(crate) created_at: Option<String>,
    #[serde(flatten)]
    #[tabled(skip)]
    pub(crate) extra: Map<String, Value>,
}

impl Order {
    fn display_items(items: &[OrderItem]) -> String {
        items
            .iter()
            .map(|item| format!("{}x {}", item.quantity, item.display_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Gives every item an ID, preferring the product's and falling back to
    /// its 1-based position.
    pub(crate) fn number_items(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.id = item.product_id.unwrap_or(index as u64 + 1);
        }
    }
}

/// The server's reply to `POST /orders`. A reply without a status describes
/// an order that was just placed.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Placement {
    pub(crate) id: OrderId,
    #[serde(default)]
    pub(crate) status: OrderStatus,
    #[serde(default)]
    pub(crate) order_items: Option<Vec<Value>>,
    #[serde(default)]
    pub(crate) estimated_delivery_time: Option<String>,
}

/// The order most recently placed from this client.
///
/// Everything the checkout submitted is kept next to the fields the server is
/// authoritative for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlacedOrder {
    pub(crate) id: OrderId,
    pub(crate) status: OrderStatus,
    pub(crate) order_items: Vec<Value>,
    pub(crate) estimated_delivery_time: String,
    #[serde(flatten)]
    pub(crate) submitted: Map<String, Value>,
}

impl PlacedOrder {
    const SERVER_FIELDS: [&'static str; 4] =
        ["id", "status", "order_items", "estimated_delivery_time"];

    pub(crate) fn merge(mut submitted: Map<String, Value>, placement: Placement) -> Self {
        let order_items = placement.order_items.unwrap_or_else(|| {
            submitted
                .get("items")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(with_product_name).collect())
                .unwrap_or_default()
        });
        for field in Self::SERVER_FIELDS {
            _ = submitted.remove(field);
        }

        Self {
            id: placement.id,
            status: placement.status,
            order_items,
            estimated_delivery_time: placement
                .estimated_delivery_time
                .unwrap_or_else(|| DEFAULT_DELIVERY_ESTIMATE.to_owned()),
            submitted,
        }
    }

    pub(crate) fn items(&self) -> Vec<OrderItem> {
        self.order_items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect()
    }
}

fn with_product_name(item: &Value) -> Value {
    let mut item = item.clone();
    if let Value::Object(fields) = &mut item {
        if let Some(name) = fields.get("name").cloned() {
            _ = fields.insert("product_name".to_owned(), name);
        }
    }
    item
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct CheckoutItem {
    pub(crate) id: ProductId,
    pub(crate) name: String,
    pub(crate) qty: u32,
    pub(crate) price: Decimal,
}

/// What the checkout submits to `POST /orders`.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct Checkout {
    pub(crate) items: Vec<CheckoutItem>,
    pub(crate) subtotal: Decimal,
    pub(crate) delivery_fee: Decimal,
    pub(crate) service_fee: Decimal,
    pub(crate) total: Decimal,
    pub(crate) payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
}

impl Checkout {
    pub(crate) fn from_cart(
        lines: &[CartLine],
        delivery_fee: Decimal,
        service_fee: Decimal,
        payment_method: String,
    ) -> Self {
        let subtotal = lines.iter().map(CartLine::subtotal).sum::<Decimal>();
        Self {
            items: lines
                .iter()
                .map(|line| CheckoutItem {
                    id: line.product_id,
                    name: line.name.clone(),
                    qty: line.quantity,
                    price: line.price,
                })
                .collect(),
            subtotal,
            delivery_fee,
            service_fee,
            total: subtotal + delivery_fee + service_fee,
            payment_method,
            address: None,
            notes: None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub(crate) status: OrderStatus,
}
