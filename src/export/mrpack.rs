//! mrpack generator: portable manifest with content-addressed
//! downloads.
//!
//! The manifest demands both a SHA1 and a SHA512 per file, so every
//! version missing either is excluded with a diagnostic. In practice
//! that drops all CurseForge-origin mods, whose platform never
//! publishes a SHA512.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::export::{
    sanitize_pack_name, to_pretty_json, ArchiveBuilder, ExportOutput, SkipReason, SkippedMod,
};
use crate::model::{EnvRequirement, ModpackConfig, SelectedMod};

/// Loader version written when the config leaves it unpinned.
const UNPINNED_LOADER_VERSION: &str = "*";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MrpackIndex<'a> {
    format_version: u32,
    game: &'static str,
    version_id: &'a str,
    name: &'a str,
    summary: &'a str,
    files: Vec<MrpackFile>,
    dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MrpackFile {
    path: String,
    hashes: MrpackHashes,
    env: MrpackEnv,
    downloads: Vec<String>,
    file_size: u64,
}

#[derive(Debug, Serialize)]
struct MrpackHashes {
    sha1: String,
    sha512: String,
}

#[derive(Debug, Serialize)]
struct MrpackEnv {
    client: EnvRequirement,
    server: EnvRequirement,
}

pub(crate) fn generate(config: &ModpackConfig, mods: &[SelectedMod]) -> Result<ExportOutput> {
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for selection in mods {
        let version = &selection.version;

        let Some(download_url) = version.download_url.as_deref().filter(|u| !u.is_empty()) else {
            warn!(mod_name = %selection.mod_info.name, "mrpack: skipping mod without a download URL");
            skipped.push(SkippedMod {
                name: selection.mod_info.name.clone(),
                reason: SkipReason::MissingDownloadUrl,
            });
            continue;
        };

        let (Some(sha1), Some(sha512)) = (version.sha1.as_deref(), version.sha512.as_deref())
        else {
            warn!(mod_name = %selection.mod_info.name, "mrpack: skipping mod without both hashes");
            skipped.push(SkippedMod {
                name: selection.mod_info.name.clone(),
                reason: SkipReason::MissingHashes,
            });
            continue;
        };

        files.push(MrpackFile {
            path: format!("mods/{}", version.file_name),
            hashes: MrpackHashes {
                sha1: sha1.to_string(),
                sha512: sha512.to_string(),
            },
            // The user override, not the version's raw field.
            env: MrpackEnv {
                client: selection.client_side,
                server: selection.server_side,
            },
            downloads: vec![download_url.to_string()],
            file_size: version.file_size,
        });
    }

    let mut dependencies = BTreeMap::new();
    dependencies.insert("minecraft".to_string(), config.game_version.clone());
    let loader_version = if config.loader_version.is_empty() {
        UNPINNED_LOADER_VERSION.to_string()
    } else {
        config.loader_version.clone()
    };
    dependencies.insert(config.loader.mrpack_dependency_key().to_string(), loader_version);

    let index = MrpackIndex {
        format_version: 1,
        game: "minecraft",
        version_id: &config.version,
        name: &config.name,
        summary: &config.description,
        files,
        dependencies,
    };

    let mut archive = ArchiveBuilder::new();
    archive.add_file("modrinth.index.json", to_pretty_json(&index).as_bytes())?;
    archive.add_directory("overrides")?;

    Ok(ExportOutput {
        file_name: format!("{}-{}.mrpack", sanitize_pack_name(&config.name), config.version),
        bytes: archive.finish()?,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::{
        archive_entry, curseforge_selection, modrinth_selection, pack_config, read_archive,
    };
    use crate::model::{EnvRequirement, Loader};

    #[test]
    fn manifest_lists_only_fully_hashed_mods() {
        let config = pack_config();
        let mut no_url = modrinth_selection("lithium", "v2");
        no_url.version.download_url = None;
        let mods = vec![
            modrinth_selection("sodium", "v1"),
            curseforge_selection("238222", "900"),
            no_url,
        ];

        let output = generate(&config, &mods).unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(&archive_entry(&output.bytes, "modrinth.index.json").unwrap())
                .unwrap();

        let files = manifest["files"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["path"], "mods/sodium-v1.jar");
        assert_eq!(files[0]["hashes"]["sha512"], "sha512-v1");
        assert_eq!(files[0]["downloads"][0], "https://cdn.modrinth.com/sodium/v1.jar");
        assert_eq!(files[0]["fileSize"], 4096);

        // Every CurseForge mod lacks a SHA512 and is reported, as is
        // the URL-less one.
        assert_eq!(
            output.skipped,
            vec![
                SkippedMod { name: "CurseForge 238222".to_string(), reason: SkipReason::MissingHashes },
                SkippedMod { name: "Modrinth lithium".to_string(), reason: SkipReason::MissingDownloadUrl },
            ]
        );
    }

    #[test]
    fn env_block_uses_selection_override() {
        let config = pack_config();
        let mut selection = modrinth_selection("sodium", "v1");
        selection.client_side = EnvRequirement::Required;
        selection.server_side = EnvRequirement::Unsupported;

        let output = generate(&config, &[selection]).unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(&archive_entry(&output.bytes, "modrinth.index.json").unwrap())
                .unwrap();
        assert_eq!(manifest["files"][0]["env"]["client"], "required");
        assert_eq!(manifest["files"][0]["env"]["server"], "unsupported");
    }

    #[test]
    fn dependencies_seed_game_version_and_loader() {
        let mut config = pack_config();
        let output = generate(&config, &[]).unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(&archive_entry(&output.bytes, "modrinth.index.json").unwrap())
                .unwrap();
        assert_eq!(manifest["dependencies"]["minecraft"], "1.21.1");
        assert_eq!(manifest["dependencies"]["fabric-loader"], "0.16.9");
        assert_eq!(manifest["formatVersion"], 1);
        assert_eq!(manifest["game"], "minecraft");

        // Unpinned loader becomes a wildcard; quilt uses its own key.
        config.loader = Loader::Quilt;
        config.loader_version = String::new();
        let output = generate(&config, &[]).unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(&archive_entry(&output.bytes, "modrinth.index.json").unwrap())
                .unwrap();
        assert_eq!(manifest["dependencies"]["quilt-loader"], "*");
    }

    #[test]
    fn overrides_directory_and_file_name() {
        let mut config = pack_config();
        config.name = "My Cool Pack!".to_string();
        let output = generate(&config, &[]).unwrap();

        assert_eq!(output.file_name, "My-Cool-Pack--1.0.0.mrpack");
        let names: Vec<String> = read_archive(&output.bytes)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert!(names.contains(&"overrides/".to_string()));
        assert!(names.contains(&"modrinth.index.json".to_string()));
    }

    #[test]
    fn manifest_bytes_are_deterministic() {
        let config = pack_config();
        let mods = vec![
            modrinth_selection("sodium", "v1"),
            modrinth_selection("lithium", "v2"),
        ];
        let first = generate(&config, &mods).unwrap();
        let second = generate(&config, &mods).unwrap();
        assert_eq!(
            archive_entry(&first.bytes, "modrinth.index.json"),
            archive_entry(&second.bytes, "modrinth.index.json"),
        );
        // Input order is mirrored, never re-sorted.
        let manifest: serde_json::Value =
            serde_json::from_str(&archive_entry(&first.bytes, "modrinth.index.json").unwrap())
                .unwrap();
        assert_eq!(manifest["files"][0]["path"], "mods/sodium-v1.jar");
        assert_eq!(manifest["files"][1]["path"], "mods/lithium-v2.jar");
    }
}
