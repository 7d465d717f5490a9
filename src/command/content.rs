// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fs, path::PathBuf};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::{
    content::{ContactMessage, Page},
    context::Context,
    error::Result,
    nav::routes,
};

use super::print_table;

#[derive(Debug, Subcommand)]
enum ContentAction {
    /// Print a page's content as JSON.
    Show {
        #[arg(value_enum)]
        page: Page,
    },
    /// Replace a page's content with the JSON document in a file.
    Set {
        #[arg(value_enum)]
        page: Page,
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },
}

/// Read and edit the site's pages.
#[derive(Debug, Parser)]
pub(crate) struct Content {
    #[clap(subcommand)]
    action: ContentAction,
}

#[async_trait]
impl super::Command for Content {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        match self.action {
            ContentAction::Show { page } => {
                let content = ctx.content.page(page).await?;
                println!("{}", serde_json::to_string_pretty(&content)?);
            }
            ContentAction::Set { page, file } => {
                ctx.enter(routes::ADMIN_CONTENT).await?;
                let raw = fs::read_to_string(&file)?;
                let content: Value = serde_json::from_str(&raw)?;
                ctx.content.update_page(page, &content).await?;
                println!("Updated the {page:?} page.");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Subcommand)]
enum FeedbackAction {
    /// Send the kitchen a message.
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        message: String,
    },
    /// Read the feedback received so far.
    List,
}

/// Leave and read feedback.
#[derive(Debug, Parser)]
pub(crate) struct Feedback {
    #[clap(subcommand)]
    action: FeedbackAction,
}

#[async_trait]
impl super::Command for Feedback {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        match self.action {
            FeedbackAction::Send {
                name,
                email,
                message,
            } => {
                ctx.enter(routes::CONTACT).await?;
                _ = ctx
                    .content
                    .submit_contact_message(ContactMessage {
                        name,
                        email,
                        message,
                    })
                    .await?;
                println!("Thanks! Your message was saved.");
            }
            FeedbackAction::List => {
                ctx.enter(routes::ADMIN_FEEDBACK).await?;
                print_table(ctx.content.messages().await?);
            }
        }
        Ok(())
    }
}
