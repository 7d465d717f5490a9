// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{LineId, ProductId};

/// One line of the cart as the client keeps it.
#[derive(Clone, Debug, PartialEq, Tabled)]
pub(crate) struct CartLine {
    #[tabled(rename = "Line")]
    pub(crate) id: LineId,
    #[tabled(rename = "Product")]
    pub(crate) product_id: ProductId,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Price")]
    pub(crate) price: Decimal,
    #[tabled(skip)]
    pub(crate) image: Option<String>,
    #[tabled(rename = "Qty")]
    pub(crate) quantity: u32,
}

impl CartLine {
    pub(crate) fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RemoteProduct {
    pub(crate) name: String,
    pub(crate) price: Decimal,
    #[serde(default)]
    pub(crate) image: Option<String>,
}

/// One line of the cart as `GET /cart` reports it.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RemoteCartLine {
    pub(crate) id: LineId,
    pub(crate) product_id: ProductId,
    pub(crate) quantity: u32,
    pub(crate) product: RemoteProduct,
}

impl From<RemoteCartLine> for CartLine {
    fn from(value: RemoteCartLine) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            name: value.product.name,
            price: value.product.price,
            image: value.product.image,
            quantity: value.quantity,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct NewLine {
    pub(crate) product_id: ProductId,
    pub(crate) quantity: u32,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct QuantityUpdate {
    pub(crate) quantity: u32,
}
