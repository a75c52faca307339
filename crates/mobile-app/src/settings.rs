// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fs,
    path::{Path, PathBuf},
};

use discro::{Publisher, Ref, Subscriber};
use serde::{Deserialize, Serialize};
use url::Url;

use ludoteka_webapi::ApiClient;

pub mod tasklet;

pub const FILE_NAME: &str = "ludoteka_settings";

pub const FILE_SUFFIX: &str = "ron";

/// Fallback base URL of the backend service.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:3000/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the backend service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_url: Option<Url>,
}

impl Settings {
    pub fn load(parent_dir: &Path) -> anyhow::Result<Settings> {
        let file_path = new_settings_file_path(parent_dir.to_path_buf());
        log::info!("Loading settings from file: {}", file_path.display());
        match fs::read(&file_path) {
            Ok(bytes) => ron::de::from_bytes(&bytes).map_err(Into::into),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Default::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, parent_dir: &Path) -> anyhow::Result<()> {
        let file_path = new_settings_file_path(parent_dir.to_path_buf());
        log::info!("Saving current settings into file: {}", file_path.display());
        let mut bytes = vec![];
        ron::ser::to_writer_pretty(&mut bytes, self, Default::default())?;
        if let Some(parent_path) = file_path.parent() {
            fs::create_dir_all(parent_path)?;
        }
        fs::write(&file_path, &bytes)?;
        Ok(())
    }

    pub async fn save_spawn_blocking(self, parent_dir: PathBuf) -> anyhow::Result<()> {
        match tokio::runtime::Handle::current()
            .spawn_blocking(move || self.save(&parent_dir))
            .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                anyhow::bail!("Failed to save: {err}");
            }
            Err(err) => {
                anyhow::bail!("Failed to join blocking task after saving: {err}");
            }
        }
    }

    pub fn update_service_url(&mut self, new_service_url: Option<Url>) -> bool {
        if self.service_url == new_service_url {
            return false;
        }
        if let Some(new_service_url) = &new_service_url {
            log::info!("Updating service URL: {new_service_url}");
        } else {
            log::info!("Resetting service URL");
        }
        self.service_url = new_service_url;
        true
    }

    /// Create an API client for the configured service.
    pub fn new_api_client(&self) -> anyhow::Result<ApiClient> {
        let base_url = self
            .service_url
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Missing service URL"))?;
        ApiClient::new(base_url.clone()).map_err(Into::into)
    }
}

#[must_use]
fn new_settings_file_path(parent_dir: PathBuf) -> PathBuf {
    let mut path_buf = parent_dir;
    path_buf.push(FILE_NAME);
    path_buf.set_extension(FILE_SUFFIX);
    path_buf
}

pub fn restore_from_parent_dir(parent_dir: &Path) -> anyhow::Result<Settings> {
    log::info!("Loading saved settings from: {}", parent_dir.display());
    let mut settings = Settings::load(parent_dir)
        .map_err(|err| {
            log::warn!("Failed to load saved settings: {err}");
        })
        .unwrap_or_default();
    if settings.service_url.is_none() {
        log::info!("Using default service URL: {DEFAULT_SERVICE_URL}");
        settings.service_url = Url::parse(DEFAULT_SERVICE_URL).ok();
    }
    debug_assert!(settings.service_url.is_some());
    Ok(settings)
}

/// Manages the mutable, observable state
#[derive(Debug)]
pub struct ObservableState {
    state_pub: Publisher<Settings>,
}

impl ObservableState {
    #[must_use]
    pub fn new(initial_state: Settings) -> Self {
        let state_pub = Publisher::new(initial_state);
        Self { state_pub }
    }

    #[must_use]
    pub fn read(&self) -> Ref<'_, Settings> {
        self.state_pub.read()
    }

    #[must_use]
    pub fn subscribe_changed(&self) -> Subscriber<Settings> {
        self.state_pub.subscribe_changed()
    }

    #[allow(clippy::must_use_candidate)]
    pub fn modify(&self, modify_state: impl FnOnce(&mut Settings) -> bool) -> bool {
        self.state_pub.modify(modify_state)
    }

    #[allow(clippy::must_use_candidate)]
    pub fn update_service_url(&self, new_service_url: Option<Url>) -> bool {
        self.modify(|state| state.update_service_url(new_service_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            service_url: Some(Url::parse("https://ludoteka.example/api/").unwrap()),
        };
        settings.save(temp_dir.path()).unwrap();
        let reloaded = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(settings, reloaded);
    }

    #[test]
    fn load_missing_file_yields_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn restore_falls_back_to_default_service_url() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = restore_from_parent_dir(temp_dir.path()).unwrap();
        assert_eq!(
            settings.service_url,
            Some(Url::parse(DEFAULT_SERVICE_URL).unwrap())
        );
    }
}
