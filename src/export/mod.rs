//! Export engine: one generator per target package layout.
//!
//! All three generators consume the same canonical input (pack config
//! plus the ordered selection) and produce an in-memory zip archive.
//! Output ordering always mirrors the selection's ordering. A mod that
//! lacks the fields a format requires is excluded from that format
//! with a diagnostic [`SkippedMod`] entry, never a hard failure: a
//! partial export still succeeds and tells the caller what was
//! dropped and why.

use std::io::{Cursor, Write};

use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::model::{ModpackConfig, SelectedMod};

pub mod curseforge;
pub mod mrpack;
pub mod packwiz;

/// Author written into manifests when the pack config leaves it blank.
pub(crate) const FALLBACK_PACK_AUTHOR: &str = "ModWeaver User";

/// The three target installer ecosystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Portable manifest with content-addressed downloads (.mrpack).
    Mrpack,
    /// Legacy CurseForge installer manifest.
    CurseForge,
    /// Server-oriented declarative packwiz layout.
    Packwiz,
}

impl ExportFormat {
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Mrpack => "mrpack",
            ExportFormat::CurseForge => "curseforge",
            ExportFormat::Packwiz => "packwiz",
        }
    }
}

/// Why a mod was excluded from a format's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The version carries no direct download URL.
    MissingDownloadUrl,
    /// The format requires both a weak and a strong hash and the
    /// version lacks at least one.
    MissingHashes,
    /// The format cannot reference files from the mod's platform; the
    /// mod is listed in the archive's manual-download notice instead.
    ForeignPlatform,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingDownloadUrl => write!(f, "no direct download URL"),
            SkipReason::MissingHashes => write!(f, "missing required hashes"),
            SkipReason::ForeignPlatform => {
                write!(f, "foreign platform, listed for manual download")
            }
        }
    }
}

/// One mod excluded from a format's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMod {
    pub name: String,
    pub reason: SkipReason,
}

/// A finished export: archive bytes, the download file name, and the
/// per-mod exclusion report.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub skipped: Vec<SkippedMod>,
}

/// Generate an archive in the given format. `mods` may be empty; the
/// result is then a structurally valid archive with no content
/// entries. Inputs are never mutated.
pub fn generate(
    format: ExportFormat,
    config: &ModpackConfig,
    mods: &[SelectedMod],
) -> Result<ExportOutput> {
    match format {
        ExportFormat::Mrpack => mrpack::generate(config, mods),
        ExportFormat::CurseForge => curseforge::generate(config, mods),
        ExportFormat::Packwiz => packwiz::generate(config, mods),
    }
}

/// Pack name reduced to alphanumeric-and-dash for file names.
pub fn sanitize_pack_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Serialize a manifest struct to pretty JSON. Field order follows the
/// struct declaration, so identical input yields identical bytes.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("manifest serialization cannot fail")
}

/// Deflate-compressed zip archive assembled in memory. Scoped to one
/// generate call; the caller takes the bytes and the builder is gone.
pub(crate) struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
    }

    pub fn add_file(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        self.writer.start_file(path, Self::options())?;
        self.writer.write_all(contents)?;
        Ok(())
    }

    pub fn add_directory(&mut self, path: &str) -> Result<()> {
        self.writer.add_directory(path, Self::options())?;
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.writer.finish()?.into_inner())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Canonical-model fixtures shared by the export and store tests.

    use crate::model::{
        EnvRequirement, Loader, Mod, ModVersion, ModpackConfig, Platform, SelectedMod,
    };

    pub fn pack_config() -> ModpackConfig {
        ModpackConfig {
            name: "Test Pack".to_string(),
            version: "1.0.0".to_string(),
            description: "An integration fixture".to_string(),
            author: "tester".to_string(),
            game_version: "1.21.1".to_string(),
            loader: Loader::Fabric,
            loader_version: "0.16.9".to_string(),
        }
    }

    pub fn modrinth_mod(id: &str) -> Mod {
        Mod {
            id: id.to_string(),
            platform: Platform::Modrinth,
            slug: format!("{id}-slug"),
            name: format!("Modrinth {id}"),
            description: "a mod".to_string(),
            author: "alex".to_string(),
            icon_url: None,
            downloads: 100,
            updated_at: "2024-11-01T12:00:00Z".to_string(),
            loaders: vec![Loader::Fabric],
            game_versions: vec!["1.21.1".to_string()],
            categories: vec!["utility".to_string()],
            page_url: format!("https://modrinth.com/mod/{id}-slug"),
        }
    }

    pub fn modrinth_version(mod_id: &str, version_id: &str) -> ModVersion {
        ModVersion {
            id: version_id.to_string(),
            mod_id: mod_id.to_string(),
            platform: Platform::Modrinth,
            version_number: "1.0".to_string(),
            game_versions: vec!["1.21.1".to_string()],
            loaders: vec![Loader::Fabric],
            download_url: Some(format!("https://cdn.modrinth.com/{mod_id}/{version_id}.jar")),
            file_name: format!("{mod_id}-{version_id}.jar"),
            file_size: 4096,
            sha512: Some(format!("sha512-{version_id}")),
            sha1: Some(format!("sha1-{version_id}")),
            cf_project_id: None,
            cf_file_id: None,
            client_side: EnvRequirement::Required,
            server_side: EnvRequirement::Required,
            dependencies: Vec::new(),
        }
    }

    pub fn modrinth_selection(mod_id: &str, version_id: &str) -> SelectedMod {
        SelectedMod::new(modrinth_mod(mod_id), modrinth_version(mod_id, version_id))
    }

    pub fn curseforge_mod(id: &str) -> Mod {
        Mod {
            id: id.to_string(),
            platform: Platform::CurseForge,
            slug: format!("cf-{id}"),
            name: format!("CurseForge {id}"),
            description: "a mod".to_string(),
            author: "sam".to_string(),
            icon_url: None,
            downloads: 200,
            updated_at: "2024-10-30T08:00:00Z".to_string(),
            loaders: vec![Loader::Fabric],
            game_versions: vec!["1.21.1".to_string()],
            categories: vec!["storage".to_string()],
            page_url: format!("https://www.curseforge.com/minecraft/mc-mods/cf-{id}"),
        }
    }

    pub fn curseforge_version(mod_id: &str, file_id: &str) -> ModVersion {
        ModVersion {
            id: file_id.to_string(),
            mod_id: mod_id.to_string(),
            platform: Platform::CurseForge,
            version_number: "2.0".to_string(),
            game_versions: vec!["1.21.1".to_string()],
            loaders: vec![Loader::Fabric],
            download_url: Some(format!("https://edge.forgecdn.net/{mod_id}/{file_id}.jar")),
            file_name: format!("cf-{mod_id}-{file_id}.jar"),
            file_size: 8192,
            // CurseForge never supplies a strong hash.
            sha512: None,
            sha1: Some(format!("sha1-{file_id}")),
            cf_project_id: mod_id.parse().ok(),
            cf_file_id: file_id.parse().ok(),
            client_side: EnvRequirement::Required,
            server_side: EnvRequirement::Required,
            dependencies: Vec::new(),
        }
    }

    pub fn curseforge_selection(mod_id: &str, file_id: &str) -> SelectedMod {
        SelectedMod::new(curseforge_mod(mod_id), curseforge_version(mod_id, file_id))
    }

    /// Entry names and UTF-8 contents of a generated archive.
    pub fn read_archive(bytes: &[u8]) -> Vec<(String, String)> {
        use std::io::Read;

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut entries = Vec::new();
        for index in 0..archive.len() {
            let mut file = archive.by_index(index).unwrap();
            let mut contents = String::new();
            file.read_to_string(&mut contents).unwrap();
            entries.push((file.name().to_string(), contents));
        }
        entries
    }

    pub fn archive_entry(bytes: &[u8], name: &str) -> Option<String> {
        read_archive(bytes)
            .into_iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, contents)| contents)
    }
}
