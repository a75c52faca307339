// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ApiClient, AuthToken, Error, receive_response_body};

mod _core {
    pub(super) use ludoteka_core::{
        GameUid,
        game::{GameDetails, GameSummary},
    };
}

// The backend sends an empty string instead of omitting an unknown
// image. Both map to `None`, as does an unparsable URL.
fn parse_image_url(url: &str) -> Option<Url> {
    if url.is_empty() {
        return None;
    }
    match url.parse() {
        Ok(url) => Some(url),
        Err(err) => {
            log::warn!("Ignoring unparsable image URL \"{url}\": {err}");
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct GamesByIds<'a> {
    ids: Vec<&'a str>,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    id: String,
    title: String,
    #[serde(default)]
    box_image_uri: String,
}

impl From<GameSummary> for _core::GameSummary {
    fn from(from: GameSummary) -> Self {
        let GameSummary {
            id,
            title,
            box_image_uri,
        } = from;
        Self {
            uid: _core::GameUid::new(id),
            title,
            box_image_url: parse_image_url(&box_image_uri),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct GameDetails {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    age: Option<String>,
    #[serde(default)]
    box_image_uri: String,
    #[serde(default)]
    rules_pdf_url: Option<Url>,
}

impl From<GameDetails> for _core::GameDetails {
    fn from(from: GameDetails) -> Self {
        let GameDetails {
            id,
            title,
            description,
            genre,
            age,
            box_image_uri,
            rules_pdf_url,
        } = from;
        Self {
            uid: _core::GameUid::new(id),
            title,
            description,
            genre,
            age,
            box_image_url: parse_image_url(&box_image_uri),
            rules_pdf_url,
        }
    }
}

impl ApiClient {
    /// `POST /games/by-ids`
    ///
    /// Batch lookup of game summaries. The response preserves no
    /// particular order; callers reorder by id as needed.
    pub async fn games_by_ids(
        &self,
        token: &AuthToken,
        ids: &[_core::GameUid],
    ) -> Result<Vec<_core::GameSummary>, Error> {
        let url = self.api_url("games/by-ids")?;
        let ids = GamesByIds {
            ids: ids.iter().map(_core::GameUid::as_str).collect(),
        };
        let response = self
            .client()
            .post(url)
            .bearer_auth(token.as_str())
            .json(&ids)
            .send()
            .await?;
        let bytes = receive_response_body(response).await?;
        let summaries: Vec<GameSummary> = serde_json::from_slice(&bytes)?;
        Ok(summaries.into_iter().map(Into::into).collect())
    }

    /// `GET /games/{id}`
    ///
    /// Unauthenticated read access for the detail screen.
    pub async fn game_details(&self, uid: &_core::GameUid) -> Result<_core::GameDetails, Error> {
        let url = self.api_url(&format!("games/{uid}"))?;
        let response = self.client().get(url).send().await?;
        let bytes = receive_response_body(response).await?;
        let details: GameDetails = serde_json::from_slice(&bytes)?;
        Ok(details.into())
    }
}
