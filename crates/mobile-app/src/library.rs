// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use discro::{Publisher, Ref, Subscriber};

use ludoteka_core::CollectionUid;

use crate::{
    SyncError,
    collection::{self, CollectionRemote},
    remote::RequestToken,
    session::TokenProvider,
};

/// Shared handle of a single collection card model.
pub type CardHandle = Arc<collection::ObservableState>;

/// Pending confirmation before a collection is deleted.
///
/// Deletion is a two-step gesture. The first step only raises this
/// prompt, the remote request starts with the explicit confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub collection: CollectionUid,
    pub title: String,
}

/// A card that has optimistically left the visible list while its
/// delete request is still in flight.
#[derive(Debug)]
struct PendingDeletion {
    index: usize,
    card: CardHandle,
    token: RequestToken,
}

/// State of the collection overview screen.
#[derive(Debug, Default)]
pub struct State {
    cards: Vec<CardHandle>,
    pending_deletions: Vec<PendingDeletion>,
    delete_prompt: Option<DeletePrompt>,
}

impl State {
    #[must_use]
    pub fn cards(&self) -> &[CardHandle] {
        &self.cards
    }

    #[must_use]
    pub const fn delete_prompt(&self) -> Option<&DeletePrompt> {
        self.delete_prompt.as_ref()
    }

    #[must_use]
    pub fn card(&self, uid: &CollectionUid) -> Option<&CardHandle> {
        self.card_position(uid).map(|index| &self.cards[index])
    }

    fn card_position(&self, uid: &CollectionUid) -> Option<usize> {
        self.cards
            .iter()
            .position(|card| &card.read().collection().uid == uid)
    }

    /// Rebuild the visible cards from an authoritative listing.
    ///
    /// Abandons the delete prompt and all pending deletions. A delete
    /// request that fails after its card has been replaced here must
    /// not resurrect the stale card.
    fn replace_cards(&mut self, collections: Vec<ludoteka_core::collection::Collection>) -> bool {
        self.cards = collections
            .into_iter()
            .map(|collection| Arc::new(collection::ObservableState::new(collection)))
            .collect();
        self.pending_deletions.clear();
        self.delete_prompt = None;
        true
    }

    /// Raise the delete prompt for the given collection.
    pub fn request_delete(&mut self, uid: &CollectionUid) -> bool {
        let Some(card) = self.card(uid) else {
            return false;
        };
        let title = card.read().collection().title.clone();
        self.delete_prompt = Some(DeletePrompt {
            collection: uid.clone(),
            title,
        });
        true
    }

    /// Dismiss the delete prompt without deleting anything.
    pub fn cancel_delete(&mut self) -> bool {
        self.delete_prompt.take().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,

    /// The submitted title was empty after trimming. No request has
    /// been issued and the state is unchanged.
    IgnoredEmptyTitle,
}

/// Manages the observable list of collection cards.
#[derive(Debug, Default)]
pub struct ObservableState {
    state_pub: Publisher<State>,
}

impl ObservableState {
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

    /// Replace the visible cards with the authoritative server listing.
    pub async fn refresh<E>(&self, env: &E) -> Result<(), SyncError>
    where
        E: CollectionRemote + TokenProvider,
    {
        let Some(token) = env.bearer_token() else {
            return Err(SyncError::Unauthenticated);
        };
        let collections = match env.list_collections(&token).await {
            Ok(collections) => collections,
            Err(err) => {
                log::warn!("Failed to list collections: {err}");
                return Err(err.into());
            }
        };
        self.modify(|state| state.replace_cards(collections));
        Ok(())
    }

    /// Create a new, empty collection and append its card.
    ///
    /// Input that is empty after trimming is silently ignored without
    /// issuing a request.
    pub async fn create_collection<E>(
        &self,
        env: &E,
        title: impl Into<String>,
    ) -> Result<CreateOutcome, SyncError>
    where
        E: CollectionRemote + TokenProvider,
    {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Ok(CreateOutcome::IgnoredEmptyTitle);
        }
        let Some(token) = env.bearer_token() else {
            return Err(SyncError::Unauthenticated);
        };
        match env.create_collection(&token, &title).await {
            Ok(collection) => {
                self.modify(|state| {
                    state
                        .cards
                        .push(Arc::new(collection::ObservableState::new(collection)));
                    true
                });
                Ok(CreateOutcome::Created)
            }
            Err(err) => {
                log::warn!("Failed to create collection {title:?}: {err}");
                Err(err.into())
            }
        }
    }

    /// Raise the delete prompt for the given collection.
    #[allow(clippy::must_use_candidate)]
    pub fn request_delete(&self, uid: &CollectionUid) -> bool {
        self.modify(|state| state.request_delete(uid))
    }

    /// Dismiss the delete prompt without deleting anything.
    #[allow(clippy::must_use_candidate)]
    pub fn cancel_delete(&self) -> bool {
        self.modify(State::cancel_delete)
    }

    /// Delete the collection of the currently prompted card.
    ///
    /// The card leaves the visible list optimistically before the
    /// request completes. A failed request re-inserts it at its former
    /// position, clamped into the current range.
    ///
    /// Returns `Ok(false)` if no prompt was pending.
    pub async fn confirm_delete<E>(&self, env: &E) -> Result<bool, SyncError>
    where
        E: CollectionRemote + TokenProvider,
    {
        let Some(token) = env.bearer_token() else {
            return Err(SyncError::Unauthenticated);
        };
        let mut busy = false;
        let mut begun = None;
        self.modify(|state| {
            let Some(prompt) = state.delete_prompt.take() else {
                return false;
            };
            let Some(index) = state.card_position(&prompt.collection) else {
                // Already gone, only the prompt is dismissed.
                return true;
            };
            let card = Arc::clone(&state.cards[index]);
            let mut request_token = None;
            card.modify(|card_state| {
                request_token = card_state.begin_deleting();
                request_token.is_some()
            });
            let Some(request_token) = request_token else {
                busy = true;
                return true;
            };
            state.cards.remove(index);
            state.pending_deletions.push(PendingDeletion {
                index,
                card: Arc::clone(&card),
                token: request_token,
            });
            begun = Some((prompt.collection, card, request_token));
            true
        });
        let Some((uid, card, request_token)) = begun else {
            if busy {
                return Err(SyncError::Busy);
            }
            return Ok(false);
        };
        match env.delete_collection(&token, &uid).await {
            Ok(()) => {
                card.modify(|card_state| card_state.finish_deleted(request_token));
                self.modify(|state| {
                    let num_pending = state.pending_deletions.len();
                    state.pending_deletions.retain(|pending| {
                        pending.token != request_token || !Arc::ptr_eq(&pending.card, &card)
                    });
                    state.pending_deletions.len() != num_pending
                });
                Ok(true)
            }
            Err(err) => {
                log::warn!("Failed to delete collection {uid}: {err}");
                card.modify(|card_state| card_state.rollback(request_token));
                self.modify(|state| {
                    let Some(position) = state.pending_deletions.iter().position(|pending| {
                        pending.token == request_token && Arc::ptr_eq(&pending.card, &card)
                    }) else {
                        // Superseded by a refresh in the meantime.
                        return false;
                    };
                    let pending = state.pending_deletions.remove(position);
                    let index = pending.index.min(state.cards.len());
                    state.cards.insert(index, pending.card);
                    true
                });
                Err(err.into())
            }
        }
    }
}
