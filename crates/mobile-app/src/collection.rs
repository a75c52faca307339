// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{future::Future, time::Instant};

use discro::{Publisher, Ref, Subscriber};

use ludoteka_core::{CollectionUid, collection::Collection, game::GameSummary};
use ludoteka_webapi::{ApiClient, collection::CollectionPatch};

use crate::{
    SyncError,
    game::GameLookupRemote,
    navigation::{Navigator, Route},
    remote::{MutationGate, RequestToken},
    session::{AuthToken, TokenProvider},
};

pub mod tasklet;

/// Remote collection endpoints.
pub trait CollectionRemote {
    fn list_collections(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<Vec<Collection>, ludoteka_webapi::Error>> + Send;

    fn create_collection(
        &self,
        token: &AuthToken,
        title: &str,
    ) -> impl Future<Output = Result<Collection, ludoteka_webapi::Error>> + Send;

    fn update_collection(
        &self,
        token: &AuthToken,
        uid: &CollectionUid,
        patch: CollectionPatch,
    ) -> impl Future<Output = Result<(), ludoteka_webapi::Error>> + Send;

    fn delete_collection(
        &self,
        token: &AuthToken,
        uid: &CollectionUid,
    ) -> impl Future<Output = Result<(), ludoteka_webapi::Error>> + Send;
}

impl CollectionRemote for ApiClient {
    async fn list_collections(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<Collection>, ludoteka_webapi::Error> {
        self.list_collections(token).await
    }

    async fn create_collection(
        &self,
        token: &AuthToken,
        title: &str,
    ) -> Result<Collection, ludoteka_webapi::Error> {
        self.create_collection(token, title).await
    }

    async fn update_collection(
        &self,
        token: &AuthToken,
        uid: &CollectionUid,
        patch: CollectionPatch,
    ) -> Result<(), ludoteka_webapi::Error> {
        self.update_collection(token, uid, &patch).await
    }

    async fn delete_collection(
        &self,
        token: &AuthToken,
        uid: &CollectionUid,
    ) -> Result<(), ludoteka_webapi::Error> {
        self.delete_collection(token, uid).await
    }
}

/// Synchronization state of a single collection card.
///
/// `Idle` is both the initial state and the only state from which a
/// new mutation may start. Every pending state has exactly one success
/// edge (commit, return to `Idle`) and one failure edge (rollback,
/// return to `Idle`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Renaming {
        token: RequestToken,
        pending_since: Instant,
    },
    TogglingPin {
        token: RequestToken,
        pending_since: Instant,
    },
    Deleting {
        token: RequestToken,
        pending_since: Instant,
    },
}

impl SyncState {
    /// Indicates if this is a transitional state while a request is
    /// in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn pending_since(&self) -> Option<Instant> {
        match self {
            Self::Idle => None,
            Self::Renaming { pending_since, .. }
            | Self::TogglingPin { pending_since, .. }
            | Self::Deleting { pending_since, .. } => Some(*pending_since),
        }
    }

    #[must_use]
    pub const fn pending_token(&self) -> Option<RequestToken> {
        match self {
            Self::Idle => None,
            Self::Renaming { token, .. }
            | Self::TogglingPin { token, .. }
            | Self::Deleting { token, .. } => Some(*token),
        }
    }
}

/// Horizontal distance between adjacent shelf items in design units.
pub const SHELF_ITEM_STRIDE: f64 = 120.0;

/// Index of the single enlarged item of a horizontally paged shelf.
///
/// Computed only from the offset reported after scrolling has settled,
/// never continuously during motion. This keeps re-renders from
/// thrashing on every scroll tick.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn settled_focus_index(offset_x: f64, item_stride: f64, num_items: usize) -> usize {
    if num_items == 0 || item_stride <= 0.0 {
        return 0;
    }
    let index = (offset_x / item_stride).round();
    if index.is_sign_negative() {
        return 0;
    }
    (index as usize).min(num_items - 1)
}

/// State of a single collection card.
///
/// The displayed `title` and `pinned` always reflect the last value
/// confirmed by the remote store or an optimistic value currently
/// awaiting confirmation, never a silently discarded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    collection: Collection,
    games: Vec<GameSummary>,
    focused_game: usize,
    sync: SyncState,
    gate: MutationGate,
}

impl State {
    #[must_use]
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            games: Vec::new(),
            focused_game: 0,
            sync: SyncState::default(),
            gate: MutationGate::default(),
        }
    }

    #[must_use]
    pub const fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Member game summaries in display order.
    ///
    /// Cached only for the lifetime of this card's display.
    #[must_use]
    pub fn games(&self) -> &[GameSummary] {
        &self.games
    }

    #[must_use]
    pub const fn focused_game_index(&self) -> usize {
        self.focused_game
    }

    #[must_use]
    pub fn focused_game(&self) -> Option<&GameSummary> {
        self.games.get(self.focused_game)
    }

    #[must_use]
    pub const fn sync(&self) -> &SyncState {
        &self.sync
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.sync.is_pending()
    }

    fn begin(
        &mut self,
        new_sync: impl FnOnce(RequestToken, Instant) -> SyncState,
    ) -> Option<RequestToken> {
        if self.sync.is_pending() {
            log::debug!(
                "Rejecting request while busy: {sync:?}",
                sync = self.sync
            );
            return None;
        }
        let token = self.gate.try_start()?;
        let sync = new_sync(token, Instant::now());
        log::debug!("Starting sync: {sync:?}");
        self.sync = sync;
        Some(token)
    }

    pub fn begin_renaming(&mut self) -> Option<RequestToken> {
        self.begin(|token, pending_since| SyncState::Renaming {
            token,
            pending_since,
        })
    }

    pub fn begin_toggling_pin(&mut self) -> Option<RequestToken> {
        self.begin(|token, pending_since| SyncState::TogglingPin {
            token,
            pending_since,
        })
    }

    pub fn begin_deleting(&mut self) -> Option<RequestToken> {
        self.begin(|token, pending_since| SyncState::Deleting {
            token,
            pending_since,
        })
    }

    fn settle(&mut self, token: RequestToken) -> bool {
        if !self.gate.finish(token) {
            return false;
        }
        debug_assert_eq!(self.sync.pending_token(), Some(token));
        self.sync = SyncState::Idle;
        true
    }

    /// Commit the acknowledged rename.
    pub fn commit_renamed(&mut self, token: RequestToken, new_title: String) -> bool {
        if !self.settle(token) {
            return false;
        }
        log::debug!(
            "Committing title: {old_title:?} -> {new_title:?}",
            old_title = self.collection.title
        );
        self.collection.title = new_title;
        true
    }

    /// Commit the acknowledged pin toggle, adopting the value that was
    /// sent with the request.
    pub fn commit_pin_toggled(&mut self, token: RequestToken, pinned: bool) -> bool {
        if !self.settle(token) {
            return false;
        }
        log::debug!(
            "Committing pinned: {old_pinned} -> {pinned}",
            old_pinned = self.collection.pinned
        );
        self.collection.pinned = pinned;
        true
    }

    /// Settle the acknowledged delete.
    ///
    /// The card has already left the visible set at this point.
    pub fn finish_deleted(&mut self, token: RequestToken) -> bool {
        self.settle(token)
    }

    /// Abort the outstanding request, leaving the previously committed
    /// field values untouched.
    pub fn rollback(&mut self, token: RequestToken) -> bool {
        self.settle(token)
    }

    /// Replace the cached member game summaries.
    ///
    /// Reorders the summaries by the insertion order of the member ids
    /// and clamps the focused index into the new range.
    pub fn set_games(&mut self, mut summaries: Vec<GameSummary>) -> bool {
        let mut games = Vec::with_capacity(summaries.len());
        for uid in &self.collection.game_ids {
            if let Some(index) = summaries.iter().position(|summary| &summary.uid == uid) {
                games.push(summaries.swap_remove(index));
            }
        }
        if !summaries.is_empty() {
            log::debug!(
                "Discarding {num_unrequested} summaries of non-member games",
                num_unrequested = summaries.len()
            );
        }
        let focused_game = self.focused_game.min(games.len().saturating_sub(1));
        if games == self.games && focused_game == self.focused_game {
            return false;
        }
        self.games = games;
        self.focused_game = focused_game;
        true
    }

    /// Update the focused item from a settled scroll position.
    pub fn on_shelf_scroll_settled(&mut self, offset_x: f64) -> bool {
        let focused_game = settled_focus_index(offset_x, SHELF_ITEM_STRIDE, self.games.len());
        if focused_game == self.focused_game {
            return false;
        }
        self.focused_game = focused_game;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,

    /// The submitted title was empty after trimming. No request has
    /// been issued and the state is unchanged.
    IgnoredEmptyTitle,
}

/// Manages the mutable, observable state of a single collection card
/// and mediates every user-initiated mutation against the remote
/// store.
#[derive(Debug)]
pub struct ObservableState {
    state_pub: Publisher<State>,
}

impl ObservableState {
    #[must_use]
    pub fn new(collection: Collection) -> Self {
        let state_pub = Publisher::new(State::new(collection));
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

    #[allow(clippy::must_use_candidate)]
    pub fn modify(&self, modify_state: impl FnOnce(&mut State) -> bool) -> bool {
        self.state_pub.modify(modify_state)
    }

    #[must_use]
    pub fn uid(&self) -> CollectionUid {
        self.read().collection().uid.clone()
    }

    /// Rename the collection.
    ///
    /// Input that is empty after trimming is silently ignored without
    /// issuing a request. The displayed title keeps its last committed
    /// value while the request is in flight and adopts the new title
    /// only after the remote store has acknowledged it.
    pub async fn rename<E>(
        &self,
        env: &E,
        new_title: impl Into<String>,
    ) -> Result<RenameOutcome, SyncError>
    where
        E: CollectionRemote + TokenProvider,
    {
        let new_title = new_title.into().trim().to_owned();
        if new_title.is_empty() {
            return Ok(RenameOutcome::IgnoredEmptyTitle);
        }
        let Some(token) = env.bearer_token() else {
            return Err(SyncError::Unauthenticated);
        };
        let mut begun = None;
        self.modify(|state| {
            begun = state
                .begin_renaming()
                .map(|request_token| (request_token, state.collection().uid.clone()));
            begun.is_some()
        });
        let Some((request_token, uid)) = begun else {
            return Err(SyncError::Busy);
        };
        let patch = CollectionPatch::rename(new_title.clone());
        match env.update_collection(&token, &uid, patch).await {
            Ok(()) => {
                self.modify(|state| state.commit_renamed(request_token, new_title));
                Ok(RenameOutcome::Renamed)
            }
            Err(err) => {
                log::warn!("Failed to rename collection {uid}: {err}");
                self.modify(|state| state.rollback(request_token));
                Err(err.into())
            }
        }
    }

    /// Toggle the pinned flag.
    ///
    /// Sends the inverse of the locally known value instead of
    /// re-reading the remote state first: a small race risk traded for
    /// a simpler protocol, appropriate for a single-user client. On
    /// success the sent value is committed.
    ///
    /// Returns the committed `pinned` value.
    pub async fn toggle_pin<E>(&self, env: &E) -> Result<bool, SyncError>
    where
        E: CollectionRemote + TokenProvider,
    {
        let Some(token) = env.bearer_token() else {
            return Err(SyncError::Unauthenticated);
        };
        let mut begun = None;
        self.modify(|state| {
            begun = state.begin_toggling_pin().map(|request_token| {
                (
                    request_token,
                    state.collection().uid.clone(),
                    !state.collection().pinned,
                )
            });
            begun.is_some()
        });
        let Some((request_token, uid, desired_pinned)) = begun else {
            return Err(SyncError::Busy);
        };
        let patch = CollectionPatch::pin(desired_pinned);
        match env.update_collection(&token, &uid, patch).await {
            Ok(()) => {
                self.modify(|state| state.commit_pin_toggled(request_token, desired_pinned));
                Ok(desired_pinned)
            }
            Err(err) => {
                log::warn!("Failed to toggle pin of collection {uid}: {err}");
                self.modify(|state| state.rollback(request_token));
                Err(err.into())
            }
        }
    }

    /// Load the member game summaries for display.
    ///
    /// A read-only refresh that is not guarded by the sync state.
    pub async fn fetch_games<E>(&self, env: &E) -> Result<(), SyncError>
    where
        E: GameLookupRemote + TokenProvider,
    {
        let Some(token) = env.bearer_token() else {
            return Err(SyncError::Unauthenticated);
        };
        let (uid, game_ids) = {
            let read = self.read();
            (
                read.collection().uid.clone(),
                read.collection().game_ids.clone(),
            )
        };
        if game_ids.is_empty() {
            self.modify(|state| state.set_games(Vec::new()));
            return Ok(());
        }
        match env.games_by_ids(&token, &game_ids).await {
            Ok(summaries) => {
                self.modify(|state| state.set_games(summaries));
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to load games of collection {uid}: {err}");
                Err(err.into())
            }
        }
    }

    /// Notify that the shelf has settled on a new scroll position.
    #[allow(clippy::must_use_candidate)]
    pub fn shelf_scroll_settled(&self, offset_x: f64) -> bool {
        self.modify(|state| state.on_shelf_scroll_settled(offset_x))
    }

    /// Open the detail screen of the shelf item at `index`.
    #[allow(clippy::must_use_candidate)]
    pub fn open_game_detail(&self, navigator: &impl Navigator, index: usize) -> bool {
        let Some(game) = self.read().games().get(index).map(|game| game.uid.clone()) else {
            return false;
        };
        navigator.navigate_to(Route::GameDetail { game });
        true
    }
}

#[cfg(test)]
mod tests;
