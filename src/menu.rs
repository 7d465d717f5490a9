// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::debug;

use crate::{
    error::Result,
    gateway::Gateway,
    model::{Envelope, Product, ProductId},
};

const FETCH_FAILED: &str = "Failed to load the menu.";

pub(crate) struct Store {
    gateway: Gateway,
    pub(crate) items: Vec<Product>,
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

    pub(crate) async fn fetch_menu_items(&mut self) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self.gateway.get::<Envelope<Vec<Product>>>("/products").await;
        self.loading = false;

        match result {
            Ok(items) => {
                self.items = items.into_inner();
                debug!("The menu lists {} products", self.items.len());
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message(FETCH_FAILED));
                Err(e)
            }
        }
    }

    pub(crate) fn get_item_by_id(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::gateway::tests::gateway;

    use super::*;

    #[tokio::test]
    async fn loads_the_menu_without_a_session() -> Result<()> {
        let (gateway, transport, _) = gateway();
        let mut store = Store::new(gateway);

        transport.expect(
            Method::GET,
            "/products",
            200,
            json!({"data": [
                {"id": 1, "name": "Nasi Goreng", "price": "18000.00", "category": "Makanan"},
                {"id": 2, "name": "Es Jeruk", "price": 7000},
            ]}),
        );
        store.fetch_menu_items().await?;

        assert_eq!(store.items.len(), 2);
        assert_eq!(
            store.get_item_by_id(2).map(|p| p.price),
            Some(Decimal::from(7000_u32))
        );
        assert!(store.get_item_by_id(3).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn failures_are_recorded() {
        let (gateway, transport, _) = gateway();
        let mut store = Store::new(gateway);

        transport.expect(Method::GET, "/products", 500, json!({}));
        _ = store.fetch_menu_items().await.unwrap_err();

        assert_eq!(store.error.as_deref(), Some(FETCH_FAILED));
        assert!(!store.loading);
    }
}
