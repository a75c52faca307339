// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::future::Future;

use discro::{Publisher, Ref, Subscriber};

use ludoteka_core::chat::ChatMessage;
use ludoteka_webapi::{ApiClient, chat::ChatResponse};

use crate::{
    SyncError,
    session::{AuthToken, TokenProvider},
};

/// Remote chat proxy endpoint.
pub trait ChatRemote {
    fn send_chat_message(
        &self,
        token: &AuthToken,
        message: &str,
    ) -> impl Future<Output = Result<ChatResponse, ludoteka_webapi::Error>> + Send;
}

impl ChatRemote for ApiClient {
    async fn send_chat_message(
        &self,
        token: &AuthToken,
        message: &str,
    ) -> Result<ChatResponse, ludoteka_webapi::Error> {
        self.send_chat_message(token, message).await
    }
}

/// State of the assistant chat screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    messages: Vec<ChatMessage>,
}

impl State {
    /// Conversation in chronological order, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Manages the observable conversation with the game assistant.
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

    /// Send a message to the assistant.
    ///
    /// The own message appears in the conversation immediately and
    /// stays there even if delivery fails, so the user can see what
    /// they sent and retry. Input that is empty after trimming is
    /// silently ignored.
    pub async fn send_message<E>(
        &self,
        env: &E,
        message: impl Into<String>,
    ) -> Result<(), SyncError>
    where
        E: ChatRemote + TokenProvider,
    {
        let message = message.into().trim().to_owned();
        if message.is_empty() {
            return Ok(());
        }
        let Some(token) = env.bearer_token() else {
            return Err(SyncError::Unauthenticated);
        };
        self.state_pub.modify(|state| {
            state.messages.push(ChatMessage::own(message.clone()));
            true
        });
        match env.send_chat_message(&token, &message).await {
            Ok(response) => {
                if let Some(reply) = response.into_reply() {
                    self.state_pub.modify(|state| {
                        state.messages.push(ChatMessage::reply(reply));
                        true
                    });
                }
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to send chat message: {err}");
                Err(err.into())
            }
        }
    }
}
