// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::{ApiClient, AuthToken, Error, receive_response_body};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Serialize, PartialEq, Eq))]
pub struct ChatResponse {
    /// Conversation history as seen by the backend, oldest first.
    /// The last entry is the reply to the message just sent.
    #[serde(default)]
    pub history: Vec<String>,
}

impl ChatResponse {
    #[must_use]
    pub fn into_reply(mut self) -> Option<String> {
        self.history.pop()
    }
}

impl ApiClient {
    /// `POST /chat`
    pub async fn send_chat_message(
        &self,
        token: &AuthToken,
        message: &str,
    ) -> Result<ChatResponse, Error> {
        let url = self.api_url("chat")?;
        let response = self
            .client()
            .post(url)
            .bearer_auth(token.as_str())
            .json(&ChatRequest { message })
            .send()
            .await?;
        let bytes = receive_response_body(response).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_is_last_history_entry() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"history":["Привет!","Чем могу помочь?"]}"#).unwrap();
        assert_eq!(response.into_reply().as_deref(), Some("Чем могу помочь?"));
    }

    #[test]
    fn missing_history_yields_no_reply() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.into_reply(), None);
    }
}
