//! Selection store: the mutable aggregate a builder session works on.
//!
//! One owned [`ModpackSession`] replaces ambient global state; callers
//! hold it and apply transitions under a single-writer discipline.
//! Lifetime is the application session; the [`SessionSnapshot`] is the
//! opaque blob an external storage collaborator may persist verbatim.

use serde::{Deserialize, Serialize};

use crate::model::{EnvRequirement, Loader, ModpackConfig, Platform, SelectedMod};
use crate::share::{ShareRef, ShareState};

/// Game versions offered by the builder UI, newest first.
pub const GAME_VERSIONS: &[&str] = &[
    "1.21.4", "1.21.3", "1.21.1", "1.21", "1.20.6", "1.20.4", "1.20.2", "1.20.1", "1.19.4",
    "1.19.2", "1.18.2", "1.16.5", "1.12.2",
];

const DEFAULT_GAME_VERSION: &str = "1.21.4";
const DEFAULT_LOADER: Loader = Loader::Fabric;

/// Mutable builder-session aggregate: filters, pack config, and the
/// ordered mod selection. The selection is de-duplicated by mod
/// identity `(platform, id)`; order is insertion order and is what the
/// exporters see.
#[derive(Debug, Clone, PartialEq)]
pub struct ModpackSession {
    pub game_version: String,
    pub loader: Loader,
    pub search_query: String,
    pub config: ModpackConfig,
    mods: Vec<SelectedMod>,
}

/// Persisted subset of a session (the transient search query is not
/// part of it). Shape only; storage is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub game_version: String,
    pub loader: Loader,
    pub config: ModpackConfig,
    pub mods: Vec<SelectedMod>,
}

impl Default for ModpackSession {
    fn default() -> Self {
        Self {
            game_version: DEFAULT_GAME_VERSION.to_string(),
            loader: DEFAULT_LOADER,
            search_query: String::new(),
            config: ModpackConfig {
                name: "My Modpack".to_string(),
                version: "1.0.0".to_string(),
                description: "A custom Minecraft modpack".to_string(),
                author: String::new(),
                game_version: DEFAULT_GAME_VERSION.to_string(),
                loader: DEFAULT_LOADER,
                loader_version: String::new(),
            },
            mods: Vec::new(),
        }
    }
}

impl ModpackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &[SelectedMod] {
        &self.mods
    }

    pub fn has_mod(&self, platform: Platform, id: &str) -> bool {
        self.mods.iter().any(|m| m.mod_info.identity() == (platform, id))
    }

    /// Append a selection. A duplicate identity is a no-op returning
    /// false; the existing entry wins.
    pub fn add_mod(&mut self, selection: SelectedMod) -> bool {
        if self.has_mod(selection.mod_info.platform, &selection.mod_info.id) {
            return false;
        }
        self.mods.push(selection);
        true
    }

    /// Remove by identity; false when absent.
    pub fn remove_mod(&mut self, platform: Platform, id: &str) -> bool {
        let before = self.mods.len();
        self.mods.retain(|m| m.mod_info.identity() != (platform, id));
        self.mods.len() != before
    }

    /// Set the client/server override on one selection.
    pub fn update_env(
        &mut self,
        platform: Platform,
        id: &str,
        client_side: EnvRequirement,
        server_side: EnvRequirement,
    ) -> bool {
        match self.mods.iter_mut().find(|m| m.mod_info.identity() == (platform, id)) {
            Some(entry) => {
                entry.client_side = client_side;
                entry.server_side = server_side;
                true
            }
            None => false,
        }
    }

    pub fn clear_mods(&mut self) {
        self.mods.clear();
    }

    /// Changing the filter also retargets the pack config.
    pub fn set_game_version(&mut self, game_version: impl Into<String>) {
        let game_version = game_version.into();
        self.config.game_version = game_version.clone();
        self.game_version = game_version;
    }

    /// Changing the filter also retargets the pack config.
    pub fn set_loader(&mut self, loader: Loader) {
        self.loader = loader;
        self.config.loader = loader;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Reduced selection summary for the share codec.
    pub fn share_state(&self) -> ShareState {
        ShareState {
            name: self.config.name.clone(),
            game_version: self.config.game_version.clone(),
            loader: self.config.loader,
            mods: self
                .mods
                .iter()
                .map(|m| ShareRef {
                    mod_id: m.mod_info.id.clone(),
                    platform: m.mod_info.platform,
                    version_id: m.version.id.clone(),
                })
                .collect(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            game_version: self.game_version.clone(),
            loader: self.loader,
            config: self.config.clone(),
            mods: self.mods.clone(),
        }
    }

    pub fn restore(snapshot: SessionSnapshot) -> Self {
        Self {
            game_version: snapshot.game_version,
            loader: snapshot.loader,
            search_query: String::new(),
            config: snapshot.config,
            mods: snapshot.mods,
        }
    }
}
