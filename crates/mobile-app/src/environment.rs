// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    ops::Deref,
    sync::{Arc, Weak},
};

use ludoteka_core::{CollectionUid, GameUid, collection::Collection, game::{GameDetails, GameSummary}};
use ludoteka_webapi::{ApiClient, chat::ChatResponse, collection::CollectionPatch, user::{Credentials, NewUser}};

use crate::{
    chat::ChatRemote,
    collection::CollectionRemote,
    game::GameLookupRemote,
    session::{AuthRemote, AuthToken, Session, TokenProvider},
    settings::Settings,
};

/// Shared runtime environment of all models.
///
/// Bundles the API client with the session so that model operations
/// can take a single dependency for both the remote endpoints and the
/// bearer credential.
#[derive(Debug)]
pub struct Environment {
    api: ApiClient,
    session: Session,
}

impl Environment {
    /// Set up the runtime environment.
    ///
    /// Modifying the service URL at runtime requires commissioning a
    /// new environment.
    pub fn commission(settings: &Settings) -> anyhow::Result<Self> {
        log::info!("Commissioning runtime environment");
        let api = settings.new_api_client()?;
        let session = Session::default();
        Ok(Self { api, session })
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl TokenProvider for Environment {
    fn bearer_token(&self) -> Option<AuthToken> {
        self.session.bearer_token()
    }
}

impl CollectionRemote for Environment {
    async fn list_collections(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<Collection>, ludoteka_webapi::Error> {
        self.api.list_collections(token).await
    }

    async fn create_collection(
        &self,
        token: &AuthToken,
        title: &str,
    ) -> Result<Collection, ludoteka_webapi::Error> {
        self.api.create_collection(token, title).await
    }

    async fn update_collection(
        &self,
        token: &AuthToken,
        uid: &CollectionUid,
        patch: CollectionPatch,
    ) -> Result<(), ludoteka_webapi::Error> {
        self.api.update_collection(token, uid, &patch).await
    }

    async fn delete_collection(
        &self,
        token: &AuthToken,
        uid: &CollectionUid,
    ) -> Result<(), ludoteka_webapi::Error> {
        self.api.delete_collection(token, uid).await
    }
}

impl GameLookupRemote for Environment {
    async fn games_by_ids(
        &self,
        token: &AuthToken,
        ids: &[GameUid],
    ) -> Result<Vec<GameSummary>, ludoteka_webapi::Error> {
        self.api.games_by_ids(token, ids).await
    }

    async fn game_details(&self, uid: &GameUid) -> Result<GameDetails, ludoteka_webapi::Error> {
        self.api.game_details(uid).await
    }
}

impl AuthRemote for Environment {
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ludoteka_webapi::Error> {
        self.api.login(credentials).await
    }

    async fn register(&self, new_user: &NewUser) -> Result<(), ludoteka_webapi::Error> {
        self.api.register(new_user).await
    }
}

impl ChatRemote for Environment {
    async fn send_chat_message(
        &self,
        token: &AuthToken,
        message: &str,
    ) -> Result<ChatResponse, ludoteka_webapi::Error> {
        self.api.send_chat_message(token, message).await
    }
}

/// Shared runtime environment handle
///
/// A cheaply `Clone`able and `Send`able handle to a shared runtime environment
/// for invoking operations.
#[derive(Debug, Clone)]
pub struct Handle(Arc<Environment>);

impl Handle {
    /// Set up a shared runtime environment
    ///
    /// See also: [`Environment::commission()`]
    pub fn commission(settings: &Settings) -> anyhow::Result<Self> {
        let environment = Environment::commission(settings)?;
        Ok(Self(Arc::new(environment)))
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakHandle {
        WeakHandle(Arc::downgrade(&self.0))
    }
}

impl AsRef<Environment> for Handle {
    fn as_ref(&self) -> &Environment {
        &self.0
    }
}

impl Deref for Handle {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct WeakHandle(Weak<Environment>);

impl WeakHandle {
    #[must_use]
    pub fn upgrade(&self) -> Option<Handle> {
        self.0.upgrade().map(Handle)
    }
}
