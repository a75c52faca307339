// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::{ApiClient, AuthToken, Error, expect_success, receive_response_body};

mod _core {
    pub(super) use ludoteka_core::{CollectionUid, GameUid, collection::Collection};
}

/// Partial update of a collection.
///
/// Only the present fields are transmitted and applied. `title` and
/// `pinned` are the only fields the backend accepts for updates.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq))]
pub struct CollectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl CollectionPatch {
    #[must_use]
    pub fn rename(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn pin(pinned: bool) -> Self {
        Self {
            pinned: Some(pinned),
            ..Default::default()
        }
    }
}

// The backend names the title field `name` and uses snake_case for
// collection payloads, unlike the camelCase game payloads.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Collection {
    id: String,
    name: String,
    pinned: bool,
    #[serde(default)]
    game_ids: Vec<String>,
}

impl From<Collection> for _core::Collection {
    fn from(from: Collection) -> Self {
        let Collection {
            id,
            name,
            pinned,
            game_ids,
        } = from;
        Self {
            uid: _core::CollectionUid::new(id),
            title: name,
            pinned,
            game_ids: game_ids.into_iter().map(_core::GameUid::new).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateCollection<'a> {
    title: &'a str,
}

impl ApiClient {
    /// `GET /collections`
    pub async fn list_collections(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<_core::Collection>, Error> {
        let url = self.api_url("collections")?;
        let response = self
            .client()
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let bytes = receive_response_body(response).await?;
        let collections: Vec<Collection> = serde_json::from_slice(&bytes)?;
        Ok(collections.into_iter().map(Into::into).collect())
    }

    /// `POST /collections`
    pub async fn create_collection(
        &self,
        token: &AuthToken,
        title: &str,
    ) -> Result<_core::Collection, Error> {
        let url = self.api_url("collections")?;
        let response = self
            .client()
            .post(url)
            .bearer_auth(token.as_str())
            .json(&CreateCollection { title })
            .send()
            .await?;
        let bytes = receive_response_body(response).await?;
        let collection: Collection = serde_json::from_slice(&bytes)?;
        Ok(collection.into())
    }

    /// `PUT /collections/{id}`
    pub async fn update_collection(
        &self,
        token: &AuthToken,
        uid: &_core::CollectionUid,
        patch: &CollectionPatch,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("collections/{uid}"))?;
        let response = self
            .client()
            .put(url)
            .bearer_auth(token.as_str())
            .json(patch)
            .send()
            .await?;
        expect_success(response).await
    }

    /// `DELETE /collections/{id}`
    pub async fn delete_collection(
        &self,
        token: &AuthToken,
        uid: &_core::CollectionUid,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("collections/{uid}"))?;
        let response = self
            .client()
            .delete(url)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        expect_success(response).await
    }
}
