// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use tabled::Tabled;

use super::{display_option, UserId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "RoleRepr")]
pub(crate) enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum RoleName {
    Admin,
    #[serde(other)]
    User,
}

// The API sends roles either as a bare string or as an enum resource like
// `{"value": "admin"}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Name(RoleName),
    Wrapped { value: RoleName },
}

impl From<RoleRepr> for Role {
    fn from(value: RoleRepr) -> Self {
        match value {
            RoleRepr::Name(RoleName::Admin) | RoleRepr::Wrapped {
                value: RoleName::Admin,
            } => Self::Admin,
            RoleRepr::Name(RoleName::User) | RoleRepr::Wrapped {
                value: RoleName::User,
            } => Self::User,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub(crate) struct User {
    #[tabled(rename = "ID")]
    pub(crate) id: UserId,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Email")]
    pub(crate) email: String,
    #[tabled(rename = "Role")]
    pub(crate) role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "Phone", display_with = "display_option")]
    pub(crate) phone: Option<String>,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Serialize)]
pub(crate) struct Credentials {
    pub(crate) email: String,
    #[serde(serialize_with = "expose")]
    pub(crate) password: SecretString,
}

#[derive(Serialize)]
pub(crate) struct Registration {
    pub(crate) name: String,
    pub(crate) email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) phone: Option<String>,
    #[serde(serialize_with = "expose")]
    pub(crate) password: SecretString,
    #[serde(serialize_with = "expose")]
    pub(crate) password_confirmation: SecretString,
}

/// What `/login`, `/admin-login` and `/register` hand back on success.
#[derive(Deserialize)]
pub(crate) struct Grant {
    pub(crate) user: User,
    pub(crate) token: SecretString,
}
