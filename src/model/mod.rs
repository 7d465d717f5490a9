// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod cart;
pub(crate) mod member;
pub(crate) mod order;
pub(crate) mod product;
pub(crate) mod review;
pub(crate) mod user;

use serde::Deserialize;

pub(crate) use cart::CartLine;
pub(crate) use member::TeamMember;
pub(crate) use order::{Checkout, Order, OrderStatus, PlacedOrder};
pub(crate) use product::Product;
pub(crate) use review::Review;
pub(crate) use user::{Role, User};

pub(crate) type UserId = u64;
pub(crate) type ProductId = u64;
pub(crate) type LineId = u64;
pub(crate) type OrderId = u64;
pub(crate) type ReviewId = u64;
pub(crate) type MemberId = u64;

/// The `{"data": …}` wrapper most endpoints reply with.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Data<T> {
    pub(crate) data: T,
}

pub(crate) fn display_option<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Accepts a payload with or without the `{"data": …}` wrapper.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}
