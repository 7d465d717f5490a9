// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, info};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;

use crate::{
    error::{Error, Result},
    gateway::Gateway,
    model::{
        cart::{NewLine, QuantityUpdate, RemoteCartLine},
        CartLine, Envelope, LineId, ProductId,
    },
};

const FETCH_FAILED: &str = "Failed to fetch the cart.";
const ADD_FAILED: &str = "Failed to add the item to the cart.";
const UPDATE_FAILED: &str = "Failed to update the quantity.";
const REMOVE_FAILED: &str = "Failed to remove the item from the cart.";
const CLEAR_FAILED: &str = "Failed to clear the cart.";

/// The signed-in user's cart.
///
/// Changes that keep a line's identity are patched locally; creating a line
/// refetches the whole cart so the server's line IDs are picked up.
pub(crate) struct Store {
    gateway: Gateway,
    items: Vec<CartLine>,
    pub(crate) error: Option<String>,
    pub(crate) loading: bool,
}

impl Store {
    pub(crate) const fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            items: Vec::new(),
            error: None,
            loading: false,
        }
    }

    /// The cart lines, which are always empty without a session.
    pub(crate) async fn items(&self) -> &[CartLine] {
        if self.gateway.session().is_authenticated().await {
            &self.items
        } else {
            &[]
        }
    }

    pub(crate) async fn total(&self) -> Decimal {
        self.items().await.iter().map(CartLine::subtotal).sum()
    }

    pub(crate) async fn fetch_cart(&mut self) -> Result<()> {
        if !self.gateway.session().is_authenticated().await {
            self.items.clear();
            return Ok(());
        }

        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .get::<Envelope<Vec<RemoteCartLine>>>("/cart")
            .await;
        self.loading = false;

        let lines = self.record(result, FETCH_FAILED)?.into_inner();
        self.items = lines.into_iter().map(CartLine::from).collect();
        debug!("The cart holds {} lines", self.items.len());
        Ok(())
    }

    pub(crate) async fn add_to_cart(&mut self, product_id: ProductId, quantity: u32) -> Result<()> {
        self.require_session().await?;
        if quantity == 0 {
            return Ok(());
        }
        self.error = None;

        if let Some(line) = self.items.iter().find(|line| line.product_id == product_id) {
            let (id, current) = (line.id, line.quantity);
            let quantity = self.grown(id, current, quantity)?;
            return self.set_quantity(id, quantity, ADD_FAILED).await;
        }

        self.loading = true;
        let result = self
            .gateway
            .post::<_, IgnoredAny>(
                "/cart",
                &NewLine {
                    product_id,
                    quantity,
                },
            )
            .await;
        self.loading = false;
        _ = self.record(result, ADD_FAILED)?;

        info!("Added {} of product {} to the cart", quantity, product_id);
        self.fetch_cart().await
    }

    pub(crate) async fn increment(&mut self, id: LineId) -> Result<()> {
        let quantity = self.line(id).await?.quantity;
        self.error = None;
        let quantity = self.grown(id, quantity, 1)?;
        self.set_quantity(id, quantity, UPDATE_FAILED).await
    }

    /// Takes one away, removing the line instead of letting it reach zero.
    pub(crate) async fn decrement(&mut self, id: LineId) -> Result<()> {
        let quantity = self.line(id).await?.quantity;
        self.error = None;
        if quantity <= 1 {
            self.remove_from_cart(id).await
        } else {
            self.set_quantity(id, quantity - 1, UPDATE_FAILED).await
        }
    }

    pub(crate) async fn remove_from_cart(&mut self, id: LineId) -> Result<()> {
        _ = self.line(id).await?;

        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .delete::<IgnoredAny>(&format!("/cart/{id}"))
            .await;
        self.loading = false;
        _ = self.record(result, REMOVE_FAILED)?;

        self.items.retain(|line| line.id != id);
        Ok(())
    }

    /// Empties the cart, on the server too when there is a session.
    pub(crate) async fn clear_cart(&mut self) -> Result<()> {
        if !self.gateway.session().is_authenticated().await {
            self.items.clear();
            return Ok(());
        }

        self.loading = true;
        self.error = None;
        let result = self.gateway.trigger::<IgnoredAny>("/cart/clear").await;
        self.loading = false;
        _ = self.record(result, CLEAR_FAILED)?;

        self.items.clear();
        Ok(())
    }

    async fn set_quantity(&mut self, id: LineId, quantity: u32, fallback: &str) -> Result<()> {
        let result = self
            .gateway
            .patch::<_, IgnoredAny>(&format!("/cart/{id}"), &QuantityUpdate { quantity })
            .await;
        _ = self.record(result, fallback)?;

        if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    fn grown(&mut self, id: LineId, quantity: u32, by: u32) -> Result<u32> {
        quantity.checked_add(by).ok_or_else(|| {
            let err = Error::QuantityOverflow(id);
            self.error = Some(err.to_string());
            err
        })
    }

    async fn require_session(&mut self) -> Result<()> {
        if self.gateway.session().is_authenticated().await {
            Ok(())
        } else {
            self.items.clear();
            Err(Error::NotAuthenticated)
        }
    }

    async fn line(&mut self, id: LineId) -> Result<&CartLine> {
        self.require_session().await?;
        self.items
            .iter()
            .find(|line| line.id == id)
            .ok_or(Error::CartLineNotFound(id))
    }

    fn record<T>(&mut self, result: Result<T>, fallback: &str) -> Result<T> {
        result.map_err(|e| {
            if e.is_unauthorized() {
                self.items.clear();
            }
            self.error = Some(e.user_message(fallback));
            e
        })
    }
}
