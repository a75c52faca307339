// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::future::Future;

use discro::{Publisher, Ref, Subscriber};

use ludoteka_webapi::{
    ApiClient,
    user::{Credentials, NewUser},
};

pub use ludoteka_webapi::AuthToken;

/// Supplies the bearer credential for remote operations.
///
/// Passed as an explicit dependency into every model operation that
/// needs it. An absent token makes mutating operations fail fast with
/// [`crate::SyncError::Unauthenticated`] before any network I/O.
pub trait TokenProvider {
    fn bearer_token(&self) -> Option<AuthToken>;
}

/// Remote authentication endpoints.
pub trait AuthRemote {
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthToken, ludoteka_webapi::Error>> + Send;

    fn register(
        &self,
        new_user: &NewUser,
    ) -> impl Future<Output = Result<(), ludoteka_webapi::Error>> + Send;
}

impl AuthRemote for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ludoteka_webapi::Error> {
        self.login(credentials).await
    }

    async fn register(&self, new_user: &NewUser) -> Result<(), ludoteka_webapi::Error> {
        self.register(new_user).await
    }
}

/// The single, opaque token store of the app.
///
/// Observable so that the UI shell can switch between the signed-in
/// and signed-out navigation stacks when the token appears or
/// disappears.
#[derive(Debug, Default)]
pub struct Session {
    token_pub: Publisher<Option<AuthToken>>,
}

impl Session {
    #[must_use]
    pub fn new(initial_token: Option<AuthToken>) -> Self {
        let token_pub = Publisher::new(initial_token);
        Self { token_pub }
    }

    #[must_use]
    pub fn read(&self) -> Ref<'_, Option<AuthToken>> {
        self.token_pub.read()
    }

    #[must_use]
    pub fn subscribe_changed(&self) -> Subscriber<Option<AuthToken>> {
        self.token_pub.subscribe_changed()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.read().is_some()
    }

    #[allow(clippy::must_use_candidate)]
    pub fn update_token(&self, new_token: Option<AuthToken>) -> bool {
        self.token_pub.modify(|token| {
            if *token == new_token {
                return false;
            }
            *token = new_token;
            true
        })
    }

    /// Sign in against the backend and store the issued token.
    pub async fn sign_in(
        &self,
        remote: &impl AuthRemote,
        credentials: &Credentials,
    ) -> Result<(), ludoteka_webapi::Error> {
        let token = remote.login(credentials).await?;
        log::info!("Signed in");
        self.update_token(Some(token));
        Ok(())
    }

    /// Discard the stored token.
    ///
    /// Purely local, the backend is not notified.
    #[allow(clippy::must_use_candidate)]
    pub fn sign_out(&self) -> bool {
        let signed_out = self.update_token(None);
        if signed_out {
            log::info!("Signed out");
        }
        signed_out
    }
}

/// Register a new account.
///
/// Does not sign in and leaves any session untouched. The UI navigates
/// back to the login screen on success.
pub async fn register(
    remote: &impl AuthRemote,
    new_user: &NewUser,
) -> Result<(), ludoteka_webapi::Error> {
    remote.register(new_user).await
}

impl TokenProvider for Session {
    fn bearer_token(&self) -> Option<AuthToken> {
        self.read().clone()
    }
}
