// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use log::error;

use crate::{
    context::Context,
    error::{Error, Result},
    model::{MemberId, OrderId, OrderStatus, TeamMember},
    nav::routes,
};

use super::{print_table, reported};

#[derive(Debug, Args)]
struct MemberFields {
    #[arg(long)]
    name: Option<String>,

    /// A role the member holds. Repeat for several.
    #[arg(long = "role")]
    roles: Vec<String>,

    /// A task the member takes care of. Repeat for several.
    #[arg(long = "task")]
    tasks: Vec<String>,

    #[arg(long)]
    image: Option<String>,

    #[arg(long)]
    github: Option<String>,
}

impl MemberFields {
    fn apply(self, member: &mut TeamMember) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if !self.roles.is_empty() {
            member.role = self.roles;
        }
        if !self.tasks.is_empty() {
            member.task = self.tasks;
        }
        if self.image.is_some() {
            member.image = self.image;
        }
        if self.github.is_some() {
            member.github = self.github;
        }
    }
}

#[derive(Debug, Subcommand)]
enum MemberAction {
    /// Add someone to the team.
    Add {
        #[command(flatten)]
        fields: MemberFields,
    },
    /// Change a team member. Options that are left out stay as they are.
    Edit {
        id: MemberId,
        #[command(flatten)]
        fields: MemberFields,
    },
    /// Remove someone from the team.
    Delete { id: MemberId },
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List every customer's orders.
    Orders,
    /// Move an order along, e.g. to `preparing` or `Dikirim`.
    SetStatus { id: OrderId, status: OrderStatus },
    /// Manage the team roster.
    Members {
        #[clap(subcommand)]
        action: MemberAction,
    },
}

/// Kitchen administration. Requires an admin session.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    #[clap(subcommand)]
    action: Action,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        match self.action {
            Action::Orders => {
                ctx.enter(routes::ADMIN_ORDERS).await?;
                let orders = &mut ctx.orders;
                orders
                    .fetch_admin_orders()
                    .await
                    .map_err(|e| reported(e, orders.error.as_deref()))?;
                print_table(&orders.orders);
            }
            Action::SetStatus { id, status } => {
                ctx.enter(routes::ADMIN_ORDERS).await?;
                let orders = &mut ctx.orders;
                orders
                    .fetch_admin_orders()
                    .await
                    .map_err(|e| reported(e, orders.error.as_deref()))?;
                orders
                    .update_order_status(id, status)
                    .await
                    .map_err(|e| reported(e, orders.error.as_deref()))?;
                print_table(orders.orders.iter().filter(|order| order.id == id));
            }
            Action::Members { action } => {
                ctx.enter(routes::ADMIN_MEMBERS).await?;
                members(ctx, action).await?;
                print_table(&ctx.team.members);
            }
        }
        Ok(())
    }
}

async fn members(ctx: &mut Context, action: MemberAction) -> Result<()> {
    let team = &mut ctx.team;
    let result = match action {
        MemberAction::Add { fields } => {
            let mut member = TeamMember::default();
            fields.apply(&mut member);
            if member.name.is_empty() {
                error!("A new team member needs a --name");
                return Err(Error::Command);
            }
            team.add_team_member(&member).await
        }
        MemberAction::Edit { id, fields } => {
            team.fetch_team_members()
                .await
                .map_err(|e| reported(e, team.error.as_deref()))?;
            let Some(mut member) = team
                .members
                .iter()
                .find(|member| member.id == Some(id))
                .cloned()
            else {
                error!("The team has no member with ID {}", id);
                return Err(Error::Command);
            };
            fields.apply(&mut member);
            team.update_team_member(id, &member).await
        }
        MemberAction::Delete { id } => team.delete_team_member(id).await,
    };
    result.map_err(|e| reported(e, team.error.as_deref()))
}
