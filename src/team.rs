// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{info, warn};
use serde::de::IgnoredAny;

use crate::{
    error::Result,
    gateway::Gateway,
    model::{Envelope, MemberId, TeamMember},
    storage::{keys, StorageExt as _},
};

const FETCH_FAILED: &str = "Failed to load the team from the server.";
const ADD_FAILED: &str = "Failed to add the team member.";
const UPDATE_FAILED: &str = "Failed to update the team member.";
const DELETE_FAILED: &str = "Failed to delete the team member.";

/// The team roster, cached locally so it can be shown while offline.
pub(crate) struct Store {
    gateway: Gateway,
    pub(crate) members: Vec<TeamMember>,
    pub(crate) error: Option<String>,
    pub(crate) loading: bool,
}

impl Store {
    pub(crate) const fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            members: Vec::new(),
            error: None,
            loading: false,
        }
    }

    /// Loads the roster, falling back to the last cached copy when the server
    /// cannot be reached. Only storage failures are returned as errors.
    pub(crate) async fn fetch_team_members(&mut self) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .get::<Envelope<Vec<TeamMember>>>("/members")
            .await;

        let outcome = match result {
            Ok(members) => {
                self.members = members.into_inner();
                let mut storage = self.gateway.storage().lock().await;
                storage.set_json(keys::TEAM_MEMBERS, &self.members).await
            }
            Err(e) => {
                warn!("Falling back to the cached team roster: {}", e);
                let mut message = e.user_message(FETCH_FAILED);
                let cached = self
                    .gateway
                    .storage()
                    .lock()
                    .await
                    .restore_json::<Vec<TeamMember>>(keys::TEAM_MEMBERS)
                    .await;
                match cached {
                    Ok(Some(members)) => {
                        self.members = members;
                        message.push_str("\n(Showing the locally cached team.)");
                    }
                    Ok(None) => {
                        self.members.clear();
                        message.push_str("\n(No cached team is available.)");
                    }
                    Err(e) => {
                        self.error = Some(message);
                        self.loading = false;
                        return Err(e);
                    }
                }
                self.error = Some(message);
                Ok(())
            }
        };
        self.loading = false;
        outcome
    }

    pub(crate) async fn add_team_member(&mut self, member: &TeamMember) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .post::<_, IgnoredAny>("/admin/members", member)
            .await;
        self.finish(result, ADD_FAILED).await?;
        info!("Added {} to the team", member.name);
        Ok(())
    }

    pub(crate) async fn update_team_member(
        &mut self,
        id: MemberId,
        member: &TeamMember,
    ) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .put::<_, IgnoredAny>(&format!("/admin/members/{id}"), member)
            .await;
        self.finish(result, UPDATE_FAILED).await
    }

    pub(crate) async fn delete_team_member(&mut self, id: MemberId) -> Result<()> {
        self.loading = true;
        self.error = None;
        let result = self
            .gateway
            .delete::<IgnoredAny>(&format!("/admin/members/{id}"))
            .await;
        self.finish(result, DELETE_FAILED).await
    }

    /// Reports a failed write, or refetches the roster after a successful one.
    async fn finish(&mut self, result: Result<IgnoredAny>, fallback: &str) -> Result<()> {
        if let Err(e) = result {
            self.loading = false;
            self.error = Some(e.user_message(fallback));
            return Err(e);
        }
        self.fetch_team_members().await
    }
}
