// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use crate::{
    context::Context,
    error::Result,
    model::{review::ReviewInput, ProductId, ReviewId},
    nav::routes,
};

use super::{print_table, reported};

#[derive(Debug, Subcommand)]
enum Action {
    /// Show a product's reviews and its average rating.
    List { product: ProductId },
    /// Review a product.
    Add {
        product: ProductId,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Change one of your reviews.
    Edit {
        review: ReviewId,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Delete one of your reviews.
    Delete { review: ReviewId },
}

/// Read and write product reviews.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    #[clap(subcommand)]
    action: Action,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.enter(routes::MENU).await?;
        let reviews = &mut ctx.reviews;

        match self.action {
            Action::List { product } => {
                reviews.reset();
                reviews
                    .fetch_reviews_for_product(product)
                    .await
                    .map_err(|e| reported(e, reviews.error.as_deref()))?;
                if reviews.reviews.is_empty() {
                    println!("No reviews yet.");
                } else {
                    print_table(&reviews.reviews);
                    println!(
                        "Average rating: {} from {} reviews",
                        reviews.average_rating(),
                        reviews.total_reviews()
                    );
                }
            }
            Action::Add {
                product,
                rating,
                comment,
            } => {
                let posted = reviews
                    .submit_review(product, &ReviewInput { rating, comment })
                    .await
                    .map(|review| review.id);
                let id = posted.map_err(|e| reported(e, reviews.error.as_deref()))?;
                if reviews.submit_success {
                    println!("Posted review {id}.");
                }
            }
            Action::Edit {
                review,
                rating,
                comment,
            } => {
                reviews
                    .update_review(review, &ReviewInput { rating, comment })
                    .await
                    .map_err(|e| reported(e, reviews.error.as_deref()))?;
                println!("Updated review {review}.");
            }
            Action::Delete { review } => {
                reviews
                    .delete_review(review)
                    .await
                    .map_err(|e| reported(e, reviews.error.as_deref()))?;
                println!("Deleted review {review}.");
            }
        }
        Ok(())
    }
}
