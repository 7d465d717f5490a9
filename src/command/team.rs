// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::warn;

use crate::{context::Context, error::Result, nav::routes};

use super::print_table;

/// Meet the team behind the kitchen.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.enter(routes::TEAM).await?;
        ctx.team.fetch_team_members().await?;
        if let Some(e) = &ctx.team.error {
            warn!("{}", e);
        }

        if ctx.team.members.is_empty() {
            println!("No team members to show.");
        } else {
            print_table(&ctx.team.members);
        }
        Ok(())
    }
}
