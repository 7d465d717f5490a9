// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod file;
#[cfg(feature = "keychain")]
mod keychain;
mod memory;
#[cfg(feature = "secret-service")]
mod secret_service;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::lock::Mutex;
use log::warn;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

pub(crate) use file::File;
#[cfg(feature = "keychain")]
pub(crate) use keychain::Keychain;
pub(crate) use memory::Memory;
#[cfg(feature = "secret-service")]
pub(crate) use secret_service::SecretService;

/// Names of everything the client keeps between runs.
pub(crate) mod keys {
    pub(crate) const TOKEN: &str = "token";
    pub(crate) const USER: &str = "user";
    pub(crate) const IS_ADMIN: &str = "is_admin";
    pub(crate) const LAST_ORDER: &str = "last_order";
    pub(crate) const CURRENT_ORDER: &str = "current_order";
    pub(crate) const TEAM_MEMBERS: &str = "team_members";
    pub(crate) const ABOUT_PAGE: &str = "about_page";
    pub(crate) const HOME_PAGE: &str = "home_page";
    pub(crate) const FOOTER_INFO: &str = "footer_info";
    pub(crate) const FEEDBACK_MESSAGES: &str = "feedback_messages";
}

pub(crate) trait IsPersistent {
    fn is_persistent(&self) -> bool;
}

impl<T: IsPersistent + ?Sized> IsPersistent for Box<T> {
    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }
}

/// A string key/value store in the spirit of browser local storage.
///
/// Removing a key that is not present succeeds without doing anything.
#[async_trait]
pub(crate) trait Storage: Send + Sync + IsPersistent {
    async fn get(&mut self, key: &str) -> Result<Option<String>>;
    async fn set(&mut self, key: &str, value: &str) -> Result<()>;
    async fn remove(&mut self, key: &str) -> Result<()>;
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for Box<T> {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

#[async_trait]
pub(crate) trait StorageExt: Storage {
    async fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Like `get_json`, except that a value which no longer parses reads as
    /// absent.
    async fn restore_json<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.get_json(key).await {
            Err(Error::Json(e)) => {
                warn!("Ignoring the saved {} because we could not read it: {}", key, e);
                Ok(None)
            }
            other => other,
        }
    }

    async fn set_json<T: Serialize + Sync>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }
}

impl<S: Storage + ?Sized> StorageExt for S {}

/// Storage shared between the gateway and every store in a context.
pub(crate) type Shared = Arc<Mutex<Box<dyn Storage>>>;

pub(crate) fn shared<S: Storage + 'static>(storage: S) -> Shared {
    Arc::new(Mutex::new(Box::new(storage)))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn json_helpers_round_trip_through_any_backend() -> Result<()> {
        let mut storage: Box<dyn Storage> = Box::new(Memory::new());
        storage
            .set_json(
                "record",
                &Record {
                    name: "Nasi Goreng".to_owned(),
                    count: 2,
                },
            )
            .await?;

        assert_eq!(
            storage.get("record").await?.as_deref(),
            Some(r#"{"name":"Nasi Goreng","count":2}"#)
        );
        assert_eq!(
            storage.get_json::<Record>("record").await?,
            Some(Record {
                name: "Nasi Goreng".to_owned(),
                count: 2,
            })
        );
        assert_eq!(storage.get_json::<Record>("missing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn restore_skips_unreadable_values() -> Result<()> {
        let mut storage = Memory::new();
        storage.set("record", "{not json").await?;

        assert!(storage.get_json::<Record>("record").await.is_err());
        assert_eq!(storage.restore_json::<Record>("record").await?, None);
        Ok(())
    }
}
