// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use semval::prelude::*;
use url::Url;

use crate::GameUid;

/// Read-only projection of a game for display on a shelf.
///
/// Owned by the remote game lookup, fetched in batches by id and cached
/// only for the lifetime of one card's display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub uid: GameUid,
    pub title: String,

    /// Cover image of the game box, if any.
    pub box_image_url: Option<Url>,
}

#[derive(Copy, Clone, Debug)]
pub enum GameSummaryInvalidity {
    TitleEmpty,
}

impl Validate for GameSummary {
    type Invalidity = GameSummaryInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let Self {
            uid: _,
            title,
            box_image_url: _,
        } = self;
        ValidationContext::new()
            .invalidate_if(title.trim().is_empty(), Self::Invalidity::TitleEmpty)
            .into()
    }
}

/// Full description of a game for the detail screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameDetails {
    pub uid: GameUid,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,

    /// Recommended minimum age, e.g. "6+".
    pub age: Option<String>,

    pub box_image_url: Option<Url>,

    /// Link to the published rule book.
    pub rules_pdf_url: Option<Url>,
}
