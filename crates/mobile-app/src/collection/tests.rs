// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use tokio::sync::Notify;

use super::*;

#[derive(Default)]
struct FakeEnv {
    token: Option<AuthToken>,
    update_results: Mutex<Vec<Result<(), ludoteka_webapi::Error>>>,
    recorded_updates: Mutex<Vec<(CollectionUid, CollectionPatch)>>,
    update_calls: AtomicUsize,
    /// Keeps update round trips in flight until notified.
    block_updates: Option<Arc<Notify>>,
    lookup_results: Mutex<Vec<Result<Vec<GameSummary>, ludoteka_webapi::Error>>>,
}

impl TokenProvider for FakeEnv {
    fn bearer_token(&self) -> Option<AuthToken> {
        self.token.clone()
    }
}

impl CollectionRemote for FakeEnv {
    async fn list_collections(
        &self,
        _token: &AuthToken,
    ) -> Result<Vec<Collection>, ludoteka_webapi::Error> {
        unreachable!("not used by a single card");
    }

    async fn create_collection(
        &self,
        _token: &AuthToken,
        _title: &str,
    ) -> Result<Collection, ludoteka_webapi::Error> {
        unreachable!("not used by a single card");
    }

    async fn update_collection(
        &self,
        _token: &AuthToken,
        uid: &CollectionUid,
        patch: CollectionPatch,
    ) -> Result<(), ludoteka_webapi::Error> {
        self.recorded_updates
            .lock()
            .unwrap()
            .push((uid.clone(), patch));
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(release) = &self.block_updates {
            release.notified().await;
        }
        self.update_results.lock().unwrap().remove(0)
    }

    async fn delete_collection(
        &self,
        _token: &AuthToken,
        _uid: &CollectionUid,
    ) -> Result<(), ludoteka_webapi::Error> {
        unreachable!("deletion is driven by the library model");
    }
}

impl crate::game::GameLookupRemote for FakeEnv {
    async fn games_by_ids(
        &self,
        _token: &AuthToken,
        _ids: &[ludoteka_core::GameUid],
    ) -> Result<Vec<GameSummary>, ludoteka_webapi::Error> {
        self.lookup_results.lock().unwrap().remove(0)
    }

    async fn game_details(
        &self,
        _uid: &ludoteka_core::GameUid,
    ) -> Result<ludoteka_core::game::GameDetails, ludoteka_webapi::Error> {
        unreachable!("not used by a card");
    }
}

fn signed_in() -> FakeEnv {
    FakeEnv {
        token: Some(AuthToken::new("jwt")),
        ..Default::default()
    }
}

fn game_uid(uid: &str) -> ludoteka_core::GameUid {
    ludoteka_core::GameUid::new(uid)
}

fn summary(uid: &str) -> GameSummary {
    GameSummary {
        uid: game_uid(uid),
        title: uid.to_owned(),
        box_image_url: None,
    }
}

fn board_game_night() -> Collection {
    Collection {
        uid: CollectionUid::new("col1"),
        title: "Для компании".to_owned(),
        pinned: true,
        game_ids: vec![game_uid("g1"), game_uid("g2")],
    }
}

fn server_error() -> ludoteka_webapi::Error {
    ludoteka_webapi::Error::Server {
        status: ludoteka_webapi::StatusCode::INTERNAL_SERVER_ERROR,
        message: None,
    }
}

#[tokio::test]
async fn toggle_pin_sends_inverse_and_commits_it() {
    let env = FakeEnv {
        update_results: Mutex::new(vec![Ok(())]),
        ..signed_in()
    };
    let card = ObservableState::new(board_game_night());
    assert!(card.read().collection().pinned);

    let pinned = card.toggle_pin(&env).await.unwrap();

    assert!(!pinned);
    let state = card.read();
    assert!(!state.collection().pinned);
    assert!(!state.is_pending());
    let recorded = env.recorded_updates.lock().unwrap();
    let [(uid, patch)] = recorded.as_slice() else {
        panic!("expected a single update: {recorded:?}");
    };
    assert_eq!(uid, &CollectionUid::new("col1"));
    assert_eq!(patch.pinned, Some(false));
    assert_eq!(patch.title, None);
}

#[tokio::test]
async fn failed_pin_toggle_rolls_back() {
    let env = FakeEnv {
        update_results: Mutex::new(vec![Err(server_error())]),
        ..signed_in()
    };
    let card = ObservableState::new(board_game_night());

    let err = card.toggle_pin(&env).await.unwrap_err();

    assert!(matches!(err, SyncError::Remote(_)));
    let state = card.read();
    // The last committed value survives the rollback.
    assert!(state.collection().pinned);
    assert!(!state.is_pending());
}

#[tokio::test]
async fn rename_commits_trimmed_title() {
    let env = FakeEnv {
        update_results: Mutex::new(vec![Ok(())]),
        ..signed_in()
    };
    let card = ObservableState::new(board_game_night());

    let outcome = card.rename(&env, "  Семейные игры  ").await.unwrap();

    assert_eq!(outcome, RenameOutcome::Renamed);
    assert_eq!(card.read().collection().title, "Семейные игры");
    let recorded = env.recorded_updates.lock().unwrap();
    assert_eq!(recorded[0].1.title.as_deref(), Some("Семейные игры"));
}

#[tokio::test]
async fn failed_rename_restores_last_committed_title() {
    let env = FakeEnv {
        update_results: Mutex::new(vec![Err(server_error())]),
        ..signed_in()
    };
    let card = ObservableState::new(board_game_night());

    assert!(card.rename(&env, "Новое имя").await.is_err());

    let state = card.read();
    assert_eq!(state.collection().title, "Для компании");
    assert!(!state.is_pending());
}

#[tokio::test]
async fn rename_with_blank_title_is_ignored_without_any_request() {
    // No token is required because no request is issued.
    let env = FakeEnv::default();
    let card = ObservableState::new(board_game_night());

    let outcome = card.rename(&env, "   ").await.unwrap();

    assert_eq!(outcome, RenameOutcome::IgnoredEmptyTitle);
    assert_eq!(env.update_calls.load(Ordering::SeqCst), 0);
    assert_eq!(card.read().collection().title, "Для компании");
}

#[tokio::test]
async fn mutations_without_token_fail_fast() {
    let env = FakeEnv::default();
    let card = ObservableState::new(board_game_night());

    assert!(matches!(
        card.rename(&env, "Новое имя").await,
        Err(SyncError::Unauthenticated)
    ));
    assert!(matches!(
        card.toggle_pin(&env).await,
        Err(SyncError::Unauthenticated)
    ));

    assert_eq!(env.update_calls.load(Ordering::SeqCst), 0);
    assert!(!card.read().is_pending());
}

#[tokio::test]
async fn rejects_overlapping_mutations() {
    let release = Arc::new(Notify::new());
    let env = Arc::new(FakeEnv {
        update_results: Mutex::new(vec![Ok(())]),
        block_updates: Some(Arc::clone(&release)),
        ..signed_in()
    });
    let card = Arc::new(ObservableState::new(board_game_night()));

    let rename = tokio::spawn({
        let card = Arc::clone(&card);
        let env = Arc::clone(&env);
        async move { card.rename(&*env, "Новое имя").await }
    });
    // Wait until the first round trip is in flight.
    while env.update_calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    assert!(matches!(card.toggle_pin(&*env).await, Err(SyncError::Busy)));
    // The rejected toggle must not have reached the remote.
    assert_eq!(env.update_calls.load(Ordering::SeqCst), 1);

    release.notify_one();
    assert_eq!(rename.await.unwrap().unwrap(), RenameOutcome::Renamed);
    let state = card.read();
    assert_eq!(state.collection().title, "Новое имя");
    assert!(!state.is_pending());
}

#[test]
fn replayed_completions_have_no_effect() {
    let mut state = State::new(board_game_night());
    let token = state.begin_renaming().unwrap();
    assert!(state.is_pending());
    // No concurrent mutation while pending.
    assert_eq!(state.begin_toggling_pin(), None);

    assert!(state.commit_renamed(token, "Переименована".to_owned()));
    assert!(!state.is_pending());
    // Replaying the same completion must not overwrite the state again.
    assert!(!state.commit_renamed(token, "Призрак".to_owned()));
    assert!(!state.rollback(token));
    assert_eq!(state.collection().title, "Переименована");
}

#[tokio::test]
async fn fetch_games_orders_summaries_by_membership() {
    let env = FakeEnv {
        lookup_results: Mutex::new(vec![Ok(vec![summary("g2"), summary("g1")])]),
        ..signed_in()
    };
    let card = ObservableState::new(board_game_night());

    card.fetch_games(&env).await.unwrap();

    let state = card.read();
    let titles: Vec<_> = state.games().iter().map(|game| game.title.as_str()).collect();
    assert_eq!(titles, ["g1", "g2"]);
}

#[test]
fn focus_follows_settled_scroll_offset_and_clamps() {
    let mut state = State::new(board_game_night());
    state.set_games(vec![summary("g1"), summary("g2")]);

    assert!(!state.on_shelf_scroll_settled(0.0));
    assert_eq!(state.focused_game_index(), 0);
    assert!(state.on_shelf_scroll_settled(130.0));
    assert_eq!(state.focused_game_index(), 1);
    // Overscroll clamps to the last item.
    assert!(!state.on_shelf_scroll_settled(10_000.0));
    assert_eq!(state.focused_game_index(), 1);
    // Bounce-back below zero clamps to the first item.
    assert!(state.on_shelf_scroll_settled(-40.0));
    assert_eq!(state.focused_game_index(), 0);
}

#[test]
fn shrinking_membership_clamps_focus() {
    let mut state = State::new(board_game_night());
    state.set_games(vec![summary("g1"), summary("g2")]);
    state.on_shelf_scroll_settled(SHELF_ITEM_STRIDE);
    assert_eq!(state.focused_game_index(), 1);

    let mut shrunk = state.collection().clone();
    shrunk.game_ids = vec![game_uid("g1")];
    state.collection = shrunk;
    assert!(state.set_games(vec![summary("g1")]));
    assert_eq!(state.focused_game_index(), 0);
    assert_eq!(state.focused_game().unwrap().uid, game_uid("g1"));
}

#[test]
fn settled_focus_index_rounds_to_nearest_item() {
    assert_eq!(settled_focus_index(0.0, SHELF_ITEM_STRIDE, 5), 0);
    assert_eq!(settled_focus_index(59.0, SHELF_ITEM_STRIDE, 5), 0);
    assert_eq!(settled_focus_index(61.0, SHELF_ITEM_STRIDE, 5), 1);
    assert_eq!(settled_focus_index(240.0, SHELF_ITEM_STRIDE, 5), 2);
    assert_eq!(settled_focus_index(-50.0, SHELF_ITEM_STRIDE, 5), 0);
    assert_eq!(settled_focus_index(9_999.0, SHELF_ITEM_STRIDE, 5), 4);
    assert_eq!(settled_focus_index(240.0, SHELF_ITEM_STRIDE, 0), 0);
}

#[test]
fn open_game_detail_navigates_to_the_selected_game() {
    #[derive(Default)]
    struct FakeNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for FakeNavigator {
        fn navigate_to(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    let card = ObservableState::new(board_game_night());
    card.modify(|state| state.set_games(vec![summary("g1"), summary("g2")]));
    let navigator = FakeNavigator::default();

    assert!(card.open_game_detail(&navigator, 1));
    // Out of range, no transition.
    assert!(!card.open_game_detail(&navigator, 2));

    let routes = navigator.routes.lock().unwrap();
    assert_eq!(*routes, [Route::GameDetail { game: game_uid("g2") }]);
}
