// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use semval::prelude::*;

use crate::{CollectionUid, GameUid};

/// A user-defined, named group of games.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    pub uid: CollectionUid,

    /// Non-empty display title.
    pub title: String,

    /// Promotes the collection's display priority.
    ///
    /// No ordering semantics beyond the flag itself.
    pub pinned: bool,

    /// Member games in insertion order.
    ///
    /// The order is meaningful and drives the display order. Membership
    /// is only displayed, never mutated through the card controller.
    pub game_ids: Vec<GameUid>,
}

#[derive(Copy, Clone, Debug)]
pub enum CollectionInvalidity {
    TitleEmpty,
}

impl Validate for Collection {
    type Invalidity = CollectionInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let Self {
            uid: _,
            title,
            pinned: _,
            game_ids: _,
        } = self;
        ValidationContext::new()
            .invalidate_if(title.trim().is_empty(), Self::Invalidity::TitleEmpty)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_collection(title: &str) -> Collection {
        Collection {
            uid: CollectionUid::new("col1"),
            title: title.into(),
            pinned: false,
            game_ids: vec![GameUid::new("g1")],
        }
    }

    #[test]
    fn validate_title() {
        assert!(new_collection("Для компании").validate().is_ok());
        assert!(new_collection("").validate().is_err());
        assert!(new_collection(" \t ").validate().is_err());
    }
}
