// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! ludoteka - Board game collection app support
//!
//! Re-exports the contents of the sub-crates depending on the enabled
//! features.

pub use ludoteka_core as core;

#[cfg(feature = "mobile-app")]
pub use ludoteka_mobile_app as mobile_app;

#[cfg(feature = "webapi")]
pub use ludoteka_webapi as webapi;
