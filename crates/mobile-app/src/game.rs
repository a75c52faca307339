// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{future::Future, time::Instant};

use discro::{Publisher, Ref, Subscriber};

use ludoteka_core::{
    GameUid,
    game::{GameDetails, GameSummary},
};
use ludoteka_webapi::ApiClient;

use crate::{SyncError, session::AuthToken};

/// Remote game lookup endpoints.
pub trait GameLookupRemote {
    /// Batch lookup of game summaries by id.
    fn games_by_ids(
        &self,
        token: &AuthToken,
        ids: &[GameUid],
    ) -> impl Future<Output = Result<Vec<GameSummary>, ludoteka_webapi::Error>> + Send;

    /// Full details of a single game. Unauthenticated read access.
    fn game_details(
        &self,
        uid: &GameUid,
    ) -> impl Future<Output = Result<GameDetails, ludoteka_webapi::Error>> + Send;
}

impl GameLookupRemote for ApiClient {
    async fn games_by_ids(
        &self,
        token: &AuthToken,
        ids: &[GameUid],
    ) -> Result<Vec<GameSummary>, ludoteka_webapi::Error> {
        self.games_by_ids(token, ids).await
    }

    async fn game_details(&self, uid: &GameUid) -> Result<GameDetails, ludoteka_webapi::Error> {
        self.game_details(uid).await
    }
}

/// State of the game detail screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Initial,
    Loading {
        game_uid: GameUid,
        pending_since: Instant,
    },
    Ready(GameDetails),
    Failed {
        game_uid: GameUid,
        message: String,
    },
}

impl State {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    #[must_use]
    pub const fn details(&self) -> Option<&GameDetails> {
        match self {
            Self::Ready(details) => Some(details),
            Self::Initial | Self::Loading { .. } | Self::Failed { .. } => None,
        }
    }

    fn set_loading(&mut self, game_uid: GameUid) -> bool {
        if self.is_pending() {
            // Loading the same or another game again while already
            // pending is not allowed.
            log::error!("Illegal state when loading game details: {self:?}");
            return false;
        }
        *self = Self::Loading {
            game_uid,
            pending_since: Instant::now(),
        };
        true
    }
}

/// Manages the mutable, observable state
#[derive(Debug, Default)]
pub struct ObservableState {
    state_pub: Publisher<State>,
}

impl ObservableState {
    #[must_use]
    pub fn new(initial_state: State) -> Self {
        let state_pub = Publisher::new(initial_state);
        Self { state_pub }
    }

    #[must_use]
    pub fn read(&self) -> Ref<'_, State> {
        self.state_pub.read()
    }

    #[must_use]
    pub fn subscribe_changed(&self) -> Subscriber<State> {
        self.state_pub.subscribe_changed()
    }

    /// Load the details of the given game.
    ///
    /// Rejected while an earlier load is still pending. A failed load
    /// leaves the screen in a retryable error state; retrying is a
    /// manual re-invocation.
    pub async fn fetch(
        &self,
        remote: &impl GameLookupRemote,
        game_uid: GameUid,
    ) -> Result<(), SyncError> {
        if !self
            .state_pub
            .modify(|state| state.set_loading(game_uid.clone()))
        {
            return Err(SyncError::Busy);
        }
        match remote.game_details(&game_uid).await {
            Ok(details) => {
                self.state_pub.modify(|state| {
                    *state = State::Ready(details);
                    true
                });
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                self.state_pub.modify(|state| {
                    *state = State::Failed {
                        game_uid: game_uid.clone(),
                        message,
                    };
                    true
                });
                Err(err.into())
            }
        }
    }
}
