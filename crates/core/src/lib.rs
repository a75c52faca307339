// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! ludoteka - Core domain model
//!
//! Entities of the board game collection domain. This crate is free of
//! any I/O and does not depend on how entities are transferred or
//! displayed.

use std::fmt;

/// Chat messages
pub mod chat;

/// Collections of games
pub mod collection;

/// Games and their summaries
pub mod game;

/// Opaque identifier of a collection.
///
/// Assigned by the remote store on creation and immutable afterwards.
/// The sole key used for reconciliation with the remote store.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::AsRef, derive_more::Display, derive_more::From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionUid(String);

impl CollectionUid {
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CollectionUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CollectionUid").field(&self.0).finish()
    }
}

/// Opaque identifier of a game.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::AsRef, derive_more::Display, derive_more::From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameUid(String);

impl GameUid {
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GameUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GameUid").field(&self.0).finish()
    }
}
