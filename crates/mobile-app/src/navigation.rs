// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use ludoteka_core::GameUid;

/// Screens of the app's navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Start,
    Login,
    Register,
    Profile,
    GameDetail { game: GameUid },
    Chat,
}

/// Performs screen transitions.
///
/// Implemented by the UI shell. Models only invoke it and never decide
/// how a transition is rendered.
pub trait Navigator {
    fn navigate_to(&self, route: Route);
}
