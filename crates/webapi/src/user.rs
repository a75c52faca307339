// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::{ApiClient, AuthToken, Error, expect_success, receive_response_body};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

impl ApiClient {
    /// `POST /user/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, Error> {
        let url = self.api_url("user/login")?;
        let response = self.client().post(url).json(credentials).send().await?;
        let bytes = receive_response_body(response).await?;
        let LoginResponse { token } = serde_json::from_slice(&bytes)?;
        Ok(AuthToken::new(token))
    }

    /// `POST /user/register`
    ///
    /// Registration does not sign the user in. The client navigates
    /// back to the login screen afterwards.
    pub async fn register(&self, new_user: &NewUser) -> Result<(), Error> {
        let url = self.api_url("user/register")?;
        let response = self.client().post(url).json(new_user).send().await?;
        expect_success(response).await
    }
}
