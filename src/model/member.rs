// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{display_option, MemberId};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Tabled)]
pub(crate) struct TeamMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "ID", display_with = "display_option")]
    pub(crate) id: Option<MemberId>,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[serde(default)]
    #[tabled(rename = "Role", display_with = "Self::display_list")]
    pub(crate) role: Vec<String>,
    #[serde(default)]
    #[tabled(rename = "Tasks", display_with = "Self::display_list")]
    pub(crate) task: Vec<String>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) image: Option<String>,
    #[serde(default)]
    #[tabled(rename = "GitHub", display_with = "display_option")]
    pub(crate) github: Option<String>,
}

impl TeamMember {
    fn display_list(values: &[String]) -> String {
        values.join(", ")
    }
}
