// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Site content that lives only on this machine.
//!
//! Each page is a JSON document with a built-in default; the last write wins.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabled::Tabled;

use crate::{
    error::Result,
    model::display_option,
    storage::{self, keys, StorageExt as _},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Page {
    About,
    Home,
    Footer,
}

impl Page {
    const fn key(self) -> &'static str {
        match self {
            Self::About => keys::ABOUT_PAGE,
            Self::Home => keys::HOME_PAGE,
            Self::Footer => keys::FOOTER_INFO,
        }
    }

    fn default_content(self) -> Value {
        match self {
            Self::About => json!({
                "heroTitle": "Tentang Santapin",
                "heroSubtitle": "Menghubungkan cita rasa tradisional Indonesia dengan kemudahan teknologi modern.",
                "aboutTitle": "Tentang Kami",
                "aboutParagraphs": [
                    "Santapin adalah platform kuliner yang lahir dari kecintaan terhadap kekayaan cita rasa Indonesia.",
                ],
                "visionTitle": "Visi",
                "visionText": "Menjadi platform kuliner terdepan yang memperkenalkan cita rasa Indonesia kepada dunia.",
                "missionTitle": "Misi",
                "missionPoints": [
                    "Menyajikan hidangan Indonesia autentik dengan kualitas terbaik",
                    "Mendukung petani dan produsen lokal",
                ],
                "gallery": [],
            }),
            Self::Home => json!({
                "hero": {
                    "title": "Seperti rasa yang pernah ada",
                    "subtitle": "Nikmati hidangan autentik Indonesia yang dibuat dengan bahan-bahan berkualitas.",
                },
                "whyUs": {
                    "title": "Kenapa Santapin?",
                    "features": [
                        {"title": "Bahan Lokal", "description": "Bahan segar dari petani lokal."},
                        {"title": "Rasa Tradisional", "description": "Resep warisan dari generasi ke generasi."},
                        {"title": "Harga Bersahabat", "description": "Kualitas dengan harga terjangkau."},
                    ],
                },
            }),
            Self::Footer => json!({
                "address": "Jl. Raya Kuliner No. 123, Jakarta, Indonesia",
                "phone": "0812-3456-7890",
                "email": "contact@santapin.com",
            }),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MessageKind {
    Rating,
    Contact,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Rating => write!(f, "rating"),
            Self::Contact => write!(f, "contact"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub(crate) struct Message {
    #[tabled(skip)]
    pub(crate) id: i64,
    #[serde(rename = "type")]
    #[tabled(rename = "Type")]
    pub(crate) kind: MessageKind,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "Email", display_with = "display_option")]
    pub(crate) email: Option<String>,
    #[tabled(rename = "Message")]
    pub(crate) message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "Rating", display_with = "display_option")]
    pub(crate) rating: Option<u8>,
    #[tabled(rename = "Date")]
    pub(crate) date: DateTime<Utc>,
}

pub(crate) struct ContactMessage {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) message: String,
}

fn default_messages() -> Vec<Message> {
    [
        (1, "Budi", "Makanannya enak!", 5, "2025-06-19T10:00:00Z"),
        (2, "Sari", "Pengiriman cepat.", 4, "2025-06-20T11:30:00Z"),
        (3, "Andi", "Pelayanan bagus.", 5, "2025-06-20T12:00:00Z"),
    ]
    .into_iter()
    .map(|(id, name, message, rating, date)| Message {
        id,
        kind: MessageKind::Rating,
        name: name.to_owned(),
        email: None,
        message: message.to_owned(),
        rating: Some(rating),
        date: DateTime::parse_from_rfc3339(date)
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or_default(),
    })
    .collect()
}

pub(crate) struct Store {
    storage: storage::Shared,
}

impl Store {
    pub(crate) const fn new(storage: storage::Shared) -> Self {
        Self { storage }
    }

    /// The saved content of `page`, or its default.
    pub(crate) async fn page(&self, page: Page) -> Result<Value> {
        let saved = self
            .storage
            .lock()
            .await
            .restore_json::<Value>(page.key())
            .await?;
        Ok(saved.unwrap_or_else(|| page.default_content()))
    }

    pub(crate) async fn update_page(&self, page: Page, content: &Value) -> Result<()> {
        self.storage
            .lock()
            .await
            .set_json(page.key(), content)
            .await?;
        info!("Updated the {:?} page", page);
        Ok(())
    }

    /// Feedback, newest first.
    pub(crate) async fn messages(&self) -> Result<Vec<Message>> {
        let saved = self
            .storage
            .lock()
            .await
            .restore_json::<Vec<Message>>(keys::FEEDBACK_MESSAGES)
            .await?;
        Ok(saved.unwrap_or_else(default_messages))
    }

    pub(crate) async fn submit_contact_message(&self, contact: ContactMessage) -> Result<Message> {
        let now = Utc::now();
        let message = Message {
            id: now.timestamp_millis(),
            kind: MessageKind::Contact,
            name: contact.name,
            email: Some(contact.email),
            message: contact.message,
            rating: None,
            date: now,
        };

        let mut messages = self.messages().await?;
        messages.insert(0, message.clone());
        self.storage
            .lock()
            .await
            .set_json(keys::FEEDBACK_MESSAGES, &messages)
            .await?;
        Ok(message)
    }
}
