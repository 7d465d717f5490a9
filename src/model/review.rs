// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{display_option, ReviewId, UserId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Reviewer {
    pub(crate) name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub(crate) struct Review {
    #[tabled(rename = "ID")]
    pub(crate) id: ReviewId,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) user_id: Option<UserId>,
    #[serde(default)]
    #[tabled(rename = "By", display_with = "Self::display_reviewer")]
    pub(crate) user: Option<Reviewer>,
    #[tabled(rename = "Rating")]
    pub(crate) rating: u8,
    #[serde(default)]
    #[tabled(rename = "Comment", display_with = "display_option")]
    pub(crate) comment: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Date", display_with = "display_option")]
    pub(crate) created_at: Option<String>,
}

impl Review {
    fn display_reviewer(user: &Option<Reviewer>) -> String {
        user.as_ref().map(|u| u.name.clone()).unwrap_or_default()
    }
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct ReviewInput {
    pub(crate) rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) comment: Option<String>,
}

/// `POST` and `PUT` on reviews answer with `{"review": …}`.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ReviewEnvelope {
    pub(crate) review: Review,
}
