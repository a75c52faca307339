// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! ludoteka - Mobile app support
//!
//! Screen models of the board game collection app. Each model owns
//! mutable, observable state and mediates user-initiated operations
//! against the remote backend. UI layers observe the state through
//! subscriptions and stay decoupled from the model internals.
//!
//! All operations are asynchronous and interleave cooperatively on a
//! single logical thread of control per model instance. Mutual
//! exclusion is achieved entirely through per-item sync-state guards,
//! never through locks.

/// Chat screen
pub mod chat;

/// Collection card controller
pub mod collection;

/// Shared runtime environment
pub mod environment;

/// Game detail screen
pub mod game;

/// Profile screen library of collections
pub mod library;

/// Screen routing
pub mod navigation;

/// Remote mutation guards
pub mod remote;

/// Authentication state
pub mod session;

/// Settings management
pub mod settings;

/// Why a user-initiated remote operation was rejected or rolled back.
///
/// Models never panic across their boundary. Every failure is converted
/// into a rollback of local state plus one of these values for the
/// presentation layer to display.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No credential available, or the backend rejected it.
    ///
    /// Surfaced as a blocking message without retry.
    #[error("not signed in")]
    Unauthenticated,

    /// Another mutating request for the same item is still in flight.
    ///
    /// The rejected request is not queued. The user may re-invoke the
    /// operation after the outstanding one has settled.
    #[error("another request is still in flight")]
    Busy,

    /// Failed HTTP round trip.
    ///
    /// Local state has been rolled back to the last confirmed value.
    /// Surfaced as a transient message; the user may retry manually.
    #[error(transparent)]
    Remote(ludoteka_webapi::Error),
}

impl From<ludoteka_webapi::Error> for SyncError {
    fn from(err: ludoteka_webapi::Error) -> Self {
        if err.is_unauthenticated() {
            Self::Unauthenticated
        } else {
            Self::Remote(err)
        }
    }
}
