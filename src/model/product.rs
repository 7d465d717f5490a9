// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{display_option, ProductId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub(crate) struct Product {
    #[tabled(rename = "ID")]
    pub(crate) id: ProductId,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Price")]
    pub(crate) price: Decimal,
    #[serde(default)]
    #[tabled(rename = "Category", display_with = "display_option")]
    pub(crate) category: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Description", display_with = "display_option")]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) image: Option<String>,
}
