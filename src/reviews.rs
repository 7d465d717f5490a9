// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::info;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::IgnoredAny;

use crate::{
    error::Result,
    gateway::Gateway,
    model::{
        review::{ReviewEnvelope, ReviewInput},
        Envelope, ProductId, Review, ReviewId,
    },
};

const FETCH_FAILED: &str = "Failed to load the product's reviews.";
const SUBMIT_FAILED: &str = "Failed to submit the review.";
const UPDATE_FAILED: &str = "Failed to update the review.";
const DELETE_FAILED: &str = "Failed to delete the review.";

/// Reviews of one product at a time.
pub(crate) struct Store {
    gateway: Gateway,
    pub(crate) reviews: Vec<Review>,
    pub(crate) error: Option<String>,
    pub(crate) loading: bool,
    pub(crate) submit_success: bool,
}

impl Store {
    pub(crate) const fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            reviews: Vec::new(),
            error: None,
            loading: false,
            submit_success: false,
        }
    }

    /// The mean rating to one decimal place, or zero without reviews.
    pub(crate) fn average_rating(&self) -> Decimal {
        if self.reviews.is_empty() {
            return Decimal::ZERO;
        }
        let sum = self
            .reviews
            .iter()
            .map(|review| Decimal::from(review.rating))
            .sum::<Decimal>();
        (sum / Decimal::from(self.reviews.len()))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    pub(crate) fn total_reviews(&self) -> usize {
        self.reviews.len()
    }

    pub(crate) async fn fetch_reviews_for_product(&mut self, product: ProductId) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .get::<Envelope<Vec<Review>>>(&format!("/products/{product}/reviews"))
            .await;
        self.loading = false;

        self.reviews = self.record(result, FETCH_FAILED)?.into_inner();
        Ok(())
    }

    /// Posts a review; the new review goes to the front of the list.
    pub(crate) async fn submit_review(
        &mut self,
        product: ProductId,
        input: &ReviewInput,
    ) -> Result<&Review> {
        self.loading = true;
        self.error = None;
        self.submit_success = false;
        let result = self
            .gateway
            .post::<_, ReviewEnvelope>(&format!("/products/{product}/reviews"), input)
            .await;
        self.loading = false;

        let review = self.record(result, SUBMIT_FAILED)?.review;
        info!("Posted review {} for product {}", review.id, product);
        self.submit_success = true;
        self.reviews.insert(0, review);
        Ok(&self.reviews[0])
    }

    pub(crate) async fn update_review(&mut self, id: ReviewId, input: &ReviewInput) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .put::<_, ReviewEnvelope>(&format!("/reviews/{id}"), input)
            .await;
        self.loading = false;

        let review = self.record(result, UPDATE_FAILED)?.review;
        if let Some(slot) = self.reviews.iter_mut().find(|r| r.id == id) {
            *slot = review;
        }
        Ok(())
    }

    pub(crate) async fn delete_review(&mut self, id: ReviewId) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .delete::<IgnoredAny>(&format!("/reviews/{id}"))
            .await;
        self.loading = false;

        _ = self.record(result, DELETE_FAILED)?;
        self.reviews.retain(|r| r.id != id);
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.reviews.clear();
        self.error = None;
        self.loading = false;
        self.submit_success = false;
    }

    fn record<T>(&mut self, result: Result<T>, fallback: &str) -> Result<T> {
        result.map_err(|e| {
            self.error = Some(e.user_message(fallback));
            e
        })
    }
}
