// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, info};
use serde::{de::IgnoredAny, Serialize};
use serde_json::Value;

use crate::{
    error::{Api, Error, Result},
    gateway::Gateway,
    model::{
        order::{Placement, StatusUpdate},
        Envelope, Order, OrderId, OrderStatus, PlacedOrder,
    },
    storage::{keys, Storage as _, StorageExt as _},
};

const PLACE_FAILED: &str = "Failed to place the order.";
const FETCH_FAILED: &str = "Failed to load your orders. Please try again later.";
const FETCH_ONE_FAILED: &str = "Failed to load the order.";
const FETCH_ALL_FAILED: &str = "Failed to load all orders.";
const STATUS_FAILED: &str = "Failed to update the order status.";

/// Order history, the order just placed, and the order being tracked.
///
/// `last_order` and `current_order` are saved on every change so a receipt
/// or tracking view still has them on the next run.
pub(crate) struct Store {
    gateway: Gateway,
    pub(crate) orders: Vec<Order>,
    last_order: Option<PlacedOrder>,
    current_order: Option<Order>,
    pub(crate) error: Option<String>,
    pub(crate) loading: bool,
}

impl Store {
    /// Builds the store with whatever the previous run left behind.
    pub(crate) async fn hydrate(gateway: Gateway) -> Result<Self> {
        let (last_order, current_order) = {
            let mut storage = gateway.storage().lock().await;
            (
                storage.restore_json(keys::LAST_ORDER).await?,
                storage.restore_json(keys::CURRENT_ORDER).await?,
            )
        };

        Ok(Self {
            gateway,
            orders: Vec::new(),
            last_order,
            current_order,
            error: None,
            loading: false,
        })
    }

    pub(crate) const fn last_order(&self) -> Option<&PlacedOrder> {
        self.last_order.as_ref()
    }

    pub(crate) const fn current_order(&self) -> Option<&Order> {
        self.current_order.as_ref()
    }

    /// Orders still moving through the kitchen, including delivered ones
    /// awaiting confirmation.
    pub(crate) fn active_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| !order.status.is_closed())
            .collect()
    }

    pub(crate) fn past_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.status.is_closed())
            .collect()
    }

    /// Submits an order and keeps everything it said next to what the server
    /// assigned.
    pub(crate) async fn place_order<P: Serialize + ?Sized>(
        &mut self,
        payload: &P,
    ) -> Result<&PlacedOrder> {
        self.error = None;
        self.require_session(PLACE_FAILED).await?;

        let submitted = match serde_json::to_value(payload)? {
            Value::Object(fields) => fields,
            other => {
                return Err(Api::InvalidRequest(
                    "/orders".to_owned(),
                    format!("an order must be a JSON object, not {other}"),
                )
                .into())
            }
        };

        self.loading = true;
        let result = self
            .gateway
            .post::<_, Envelope<Placement>>("/orders", &submitted)
            .await;
        self.loading = false;
        let placement = self.record(result, PLACE_FAILED)?.into_inner();

        let placed = PlacedOrder::merge(submitted, placement);
        info!("Placed order {} ({})", placed.id, placed.status);
        self.save(keys::LAST_ORDER, Some(&placed)).await?;
        Ok(self.last_order.insert(placed))
    }

    /// Loads the signed-in user's history. Without a session the history is
    /// simply empty.
    pub(crate) async fn fetch_user_orders(&mut self) -> Result<()> {
        self.error = None;
        if !self.gateway.session().is_authenticated().await {
            self.orders.clear();
            return Ok(());
        }

        self.loading = true;
        let result = self.gateway.get::<Envelope<Vec<Order>>>("/orders").await;
        self.loading = false;

        let mut orders = self.record(result, FETCH_FAILED)?.into_inner();
        orders.iter_mut().for_each(Order::number_items);
        debug!("Fetched {} orders", orders.len());
        self.orders = orders;
        Ok(())
    }

    pub(crate) async fn fetch_order_by_id(&mut self, id: OrderId) -> Result<&Order> {
        self.error = None;
        self.clear_current_order().await?;
        self.require_session(FETCH_ONE_FAILED).await?;

        self.loading = true;
        let result = self
            .gateway
            .get::<Envelope<Order>>(&format!("/orders/{id}"))
            .await;
        self.loading = false;

        let mut order = self.record(result, FETCH_ONE_FAILED)?.into_inner();
        order.number_items();
        self.save(keys::CURRENT_ORDER, Some(&order)).await?;
        Ok(self.current_order.insert(order))
    }

    /// Loads every customer's orders for the admin view.
    pub(crate) async fn fetch_admin_orders(&mut self) -> Result<()> {
        self.error = None;
        if !self.gateway.session().is_authenticated().await {
            self.orders.clear();
            return Ok(());
        }

        self.loading = true;
        let result = self
            .gateway
            .get::<Envelope<Vec<Order>>>("/admin/orders")
            .await;
        self.loading = false;

        self.orders = self.record(result, FETCH_ALL_FAILED)?.into_inner();
        Ok(())
    }

    /// Moves an order to `status`, touching the local copy only once the
    /// server agreed.
    pub(crate) async fn update_order_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<()> {
        self.error = None;
        self.require_session(STATUS_FAILED).await?;

        self.loading = true;
        let result = self
            .gateway
            .patch::<_, IgnoredAny>(
                &format!("/admin/orders/{id}/status"),
                &StatusUpdate { status },
            )
            .await;
        self.loading = false;
        _ = self.record(result, STATUS_FAILED)?;

        if let Some(order) = self.orders.iter_mut().find(|order| order.id == id) {
            order.status = status;
        }
        info!("Order {} is now {}", id, status);
        Ok(())
    }

    pub(crate) async fn clear_last_order(&mut self) -> Result<()> {
        self.last_order = None;
        self.save::<PlacedOrder>(keys::LAST_ORDER, None).await
    }

    pub(crate) async fn clear_current_order(&mut self) -> Result<()> {
        self.current_order = None;
        self.save::<Order>(keys::CURRENT_ORDER, None).await
    }

    async fn require_session(&mut self, fallback: &str) -> Result<()> {
        if self.gateway.session().is_authenticated().await {
            return Ok(());
        }
        let err = Error::NotAuthenticated;
        self.error = Some(err.user_message(fallback));
        Err(err)
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, value: Option<&T>) -> Result<()> {
        let mut storage = self.gateway.storage().lock().await;
        match value {
            Some(value) => storage.set_json(key, value).await,
            None => storage.remove(key).await,
        }
    }

    fn record<T>(&mut self, result: Result<T>, fallback: &str) -> Result<T> {
        result.map_err(|e| {
            self.error = Some(e.user_message(fallback));
            e
        })
    }
}
