// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{future::Future, path::PathBuf};

use discro::{Subscriber, tasklet::OnChanged};
use url::Url;

use super::Settings;

/// Save the settings after changed.
///
/// The current settings at the time of invocation are not saved.
pub fn on_state_changed_save_to_file(
    mut subscriber: Subscriber<Settings>,
    settings_dir: PathBuf,
    mut report_error: impl FnMut(anyhow::Error) + Send + 'static,
) -> impl Future<Output = ()> + Send + 'static {
    // Read and acknowledge the initial settings immediately before spawning
    // the async task. These are supposed to be saved already. Only subsequent
    // changes will be noticed, which might occur already while spawning the task.
    let mut old_settings = subscriber.read_ack().clone();
    async move {
        log::debug!("Starting on_state_changed_save_to_file");
        loop {
            if subscriber.changed().await.is_err() {
                // Publisher has disappeared
                log::debug!("Aborting on_state_changed_save_to_file");
                break;
            }
            {
                let new_settings = subscriber.read_ack();
                if old_settings == *new_settings {
                    log::debug!("Settings unchanged: {old_settings:?}");
                    continue;
                }
                old_settings = new_settings.clone();
            }
            log::info!("Saving changed settings: {old_settings:?}");
            let new_settings = old_settings.clone();
            if let Err(err) = new_settings.save_spawn_blocking(settings_dir.clone()).await {
                report_error(err);
            }
        }
    }
}

/// Listen for changes of the service URL.
pub fn on_service_url_changed(
    mut subscriber: Subscriber<Settings>,
    mut on_changed: impl FnMut(Option<&Url>) -> OnChanged + Send + 'static,
) -> impl Future<Output = ()> + Send + 'static {
    // Read the initial value immediately before spawning the async task
    let mut value = subscriber.read_ack().service_url.clone();
    async move {
        log::debug!("Starting on_service_url_changed");
        // Enforce initial update
        let mut value_changed = true;
        loop {
            if value_changed {
                log::debug!("on_service_url_changed({value:?})");
                match on_changed(value.as_ref()) {
                    OnChanged::Continue => (),
                    OnChanged::Abort => {
                        // Consumer has rejected the notification
                        log::debug!("Aborting on_service_url_changed");
                        return;
                    }
                }
            }
            value_changed = false;
            if subscriber.changed().await.is_err() {
                // Publisher has disappeared
                log::debug!("Aborting on_service_url_changed");
                break;
            }
            let settings = subscriber.read_ack();
            let new_value = settings.service_url.as_ref();
            if value.as_ref() != new_value {
                value = new_value.cloned();
                value_changed = true;
            }
        }
        log::debug!("Stopping on_service_url_changed");
    }
}
