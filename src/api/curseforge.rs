//! CurseForge catalog adapter
//!
//! CurseForge requires a server-held API key and does not serve CORS
//! headers, so this client is pointed at a same-origin proxy that
//! forwards requests verbatim and injects the key. The proxy itself is
//! not implemented here; the client only needs its base URL. Every
//! payload arrives wrapped in a `{ "data": ... }` envelope.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::api;
use crate::error::Result;
use crate::model::{
    Dependency, DependencyKind, Loader, Mod, ModVersion, Platform, SearchQuery,
    DEFAULT_ENV_REQUIREMENT, UNKNOWN_AUTHOR,
};

/// Query-parameter path the reference deployment mounts the proxy on.
pub const DEFAULT_PROXY_PATH: &str = "/api/cf";

/// CurseForge game id for Minecraft.
const MINECRAFT_GAME_ID: u32 = 432;
/// CurseForge class id for the "mods" section.
const MODS_CLASS_ID: u32 = 6;
/// Search sort field 2 is popularity.
const SORT_FIELD_POPULARITY: u32 = 2;
/// Hash algo code for SHA1 in the file hash list.
const HASH_ALGO_SHA1: u32 = 1;

/// Client for the CurseForge catalog, reached through a key-injecting
/// proxy.
#[derive(Debug, Clone)]
pub struct CurseForgeClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CfEnvelope<T> {
    data: T,
}

/// Raw CurseForge mod.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfMod {
    id: u64,
    slug: String,
    name: String,
    summary: String,
    #[serde(default)]
    authors: Vec<CfAuthor>,
    #[serde(default)]
    logo: Option<CfLogo>,
    download_count: u64,
    date_modified: String,
    #[serde(default)]
    categories: Vec<CfCategory>,
    #[serde(default)]
    latest_files_indexes: Vec<CfFileIndex>,
    links: CfLinks,
}

#[derive(Debug, Deserialize)]
struct CfAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CfLogo {
    url: String,
}

#[derive(Debug, Deserialize)]
struct CfCategory {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfFileIndex {
    game_version: String,
    #[serde(default)]
    mod_loader: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfLinks {
    website_url: String,
}

/// Raw CurseForge file (one published release).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfFile {
    id: u64,
    mod_id: u64,
    display_name: String,
    file_name: String,
    file_length: u64,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    game_versions: Vec<String>,
    #[serde(default)]
    dependencies: Vec<CfDependency>,
    #[serde(default)]
    hashes: Vec<CfHash>,
    #[serde(default = "available_when_absent")]
    is_available: bool,
}

/// Files with no availability flag are treated as downloadable.
fn available_when_absent() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfDependency {
    mod_id: u64,
    relation_type: u32,
}

#[derive(Debug, Deserialize)]
struct CfHash {
    algo: u32,
    value: String,
}

/// Convert a raw CurseForge mod to the canonical [`Mod`]. Loaders and
/// game versions are collected from the latest-file indexes,
/// deduplicated in first-seen order.
fn to_mod(raw: CfMod) -> Mod {
    let mut loaders = Vec::new();
    let mut game_versions: Vec<String> = Vec::new();
    for index in &raw.latest_files_indexes {
        if let Some(loader) = index.mod_loader.and_then(Loader::from_curseforge_id) {
            if !loaders.contains(&loader) {
                loaders.push(loader);
            }
        }
        if !game_versions.contains(&index.game_version) {
            game_versions.push(index.game_version.clone());
        }
    }

    Mod {
        id: raw.id.to_string(),
        platform: Platform::CurseForge,
        slug: raw.slug,
        name: raw.name,
        description: raw.summary,
        author: raw
            .authors
            .first()
            .map(|a| a.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        icon_url: raw.logo.map(|l| l.url),
        downloads: raw.download_count,
        updated_at: raw.date_modified,
        loaders,
        game_versions,
        categories: raw.categories.into_iter().map(|c| c.name).collect(),
        page_url: raw.links.website_url,
    }
}

/// CurseForge interleaves loader names with game versions in a file's
/// `gameVersions` list; a leading `<digits>.<digits>` marks a game
/// version.
fn looks_like_game_version(value: &str) -> bool {
    let mut parts = value.splitn(3, '.');
    let (Some(major), Some(minor)) = (parts.next(), parts.next()) else {
        return false;
    };
    !major.is_empty()
        && major.chars().all(|c| c.is_ascii_digit())
        && minor.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Convert a raw file to the canonical [`ModVersion`].
fn to_version(raw: CfFile) -> ModVersion {
    let mut loaders = Vec::new();
    let mut game_versions = Vec::new();
    for entry in &raw.game_versions {
        if let Some(loader) = Loader::from_name(entry) {
            if !loaders.contains(&loader) {
                loaders.push(loader);
            }
        } else if looks_like_game_version(entry) {
            game_versions.push(entry.clone());
        }
    }

    let sha1 = raw
        .hashes
        .iter()
        .find(|h| h.algo == HASH_ALGO_SHA1)
        .map(|h| h.value.clone());

    ModVersion {
        id: raw.id.to_string(),
        mod_id: raw.mod_id.to_string(),
        platform: Platform::CurseForge,
        version_number: raw.display_name,
        game_versions,
        loaders,
        download_url: raw.download_url.filter(|u| !u.is_empty()),
        file_name: raw.file_name,
        file_size: raw.file_length,
        // CurseForge never supplies a SHA512.
        sha512: None,
        sha1,
        cf_project_id: Some(raw.mod_id),
        cf_file_id: Some(raw.id),
        // CurseForge does not report client/server requirements.
        client_side: DEFAULT_ENV_REQUIREMENT,
        server_side: DEFAULT_ENV_REQUIREMENT,
        dependencies: raw
            .dependencies
            .into_iter()
            .map(|d| Dependency {
                project_id: d.mod_id.to_string(),
                kind: DependencyKind::from_curseforge_relation(d.relation_type),
                version_id: None,
            })
            .collect(),
    }
}

impl CurseForgeClient {
    /// `base_url` is the proxy root, e.g. `https://app.example/api/cf`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: api::build_client()?,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        api::endpoint(&self.base_url, path)
    }

    /// Search the catalog, ordered by upstream popularity ranking.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Mod>> {
        let mut url = self.endpoint("/mods/search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("gameId", &MINECRAFT_GAME_ID.to_string())
                .append_pair("classId", &MODS_CLASS_ID.to_string())
                .append_pair("searchFilter", &query.query)
                .append_pair("pageSize", &query.limit.to_string())
                .append_pair("index", &query.offset.to_string())
                .append_pair("sortField", &SORT_FIELD_POPULARITY.to_string())
                .append_pair("sortOrder", "desc");
            if let Some(loader) = query.loader {
                pairs.append_pair("modLoaderType", &loader.curseforge_id().to_string());
            }
            if let Some(game_version) = &query.game_version {
                pairs.append_pair("gameVersion", game_version);
            }
        }

        let envelope: CfEnvelope<Vec<CfMod>> = api::get_json(&self.client, url).await?;
        Ok(envelope.data.into_iter().map(to_mod).collect())
    }

    /// Fetch a single mod by id.
    pub async fn get_mod(&self, id: &str) -> Result<Mod> {
        let url = self.endpoint(&format!("/mods/{id}"))?;
        let envelope: CfEnvelope<CfMod> = api::get_json(&self.client, url).await?;
        Ok(to_mod(envelope.data))
    }

    /// Batch fetch. Short-circuits to an empty result for empty input
    /// without touching the network. Ids that are not numeric are
    /// dropped from the request.
    pub async fn get_mods(&self, ids: &[String]) -> Result<Vec<Mod>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mod_ids: Vec<u64> = ids.iter().filter_map(|id| id.parse().ok()).collect();
        let url = self.endpoint("/mods")?;
        let body = serde_json::json!({ "modIds": mod_ids });

        let envelope: CfEnvelope<Vec<CfMod>> = api::post_json(&self.client, url, &body).await?;
        Ok(envelope.data.into_iter().map(to_mod).collect())
    }

    /// List a mod's files, filtered server-side when a loader or game
    /// version is given. Files the platform marks unavailable are
    /// filtered out.
    pub async fn get_mod_versions(
        &self,
        mod_id: &str,
        loader: Option<Loader>,
        game_version: Option<&str>,
    ) -> Result<Vec<ModVersion>> {
        let mut url = self.endpoint(&format!("/mods/{mod_id}/files"))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(loader) = loader {
                pairs.append_pair("modLoaderType", &loader.curseforge_id().to_string());
            }
            if let Some(game_version) = game_version {
                pairs.append_pair("gameVersion", game_version);
            }
        }

        let envelope: CfEnvelope<Vec<CfFile>> = api::get_json(&self.client, url).await?;
        Ok(envelope
            .data
            .into_iter()
            .filter(|f| f.is_available)
            .map(to_version)
            .collect())
    }

    /// Fetch a single file. CurseForge keys files by (mod, file) pair.
    pub async fn get_mod_version(&self, mod_id: &str, file_id: &str) -> Result<ModVersion> {
        let url = self.endpoint(&format!("/mods/{mod_id}/files/{file_id}"))?;
        let envelope: CfEnvelope<CfFile> = api::get_json(&self.client, url).await?;
        Ok(to_version(envelope.data))
    }
}
