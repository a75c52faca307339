// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

/// A single entry of the chat conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,

    /// `true` for messages authored by the local user, `false` for
    /// replies received from the backend.
    pub own: bool,
}

impl ChatMessage {
    #[must_use]
    pub fn own(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            own: true,
        }
    }

    #[must_use]
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            own: false,
        }
    }
}
