//! Canonical data model shared by the adapters, the selection store,
//! the share codec, and the export engine.
//!
//! Both upstream catalogs are mapped into these types by exactly one
//! transform per platform; every silent default applied during that
//! mapping is a named constant here so tests can assert the exact
//! fallback value.

use serde::{Deserialize, Serialize};

/// Author shown when an upstream entry carries no usable author name.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Requirement assumed when an upstream does not report one.
/// CurseForge never reports client/server requirements, so every one
/// of its versions gets this on both sides.
pub const DEFAULT_ENV_REQUIREMENT: EnvRequirement = EnvRequirement::Required;

/// The two upstream catalogs a mod can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Modrinth,
    CurseForge,
}

impl Platform {
    /// Single-character tag used by the share codec.
    pub fn share_tag(self) -> char {
        match self {
            Platform::Modrinth => 'm',
            Platform::CurseForge => 'c',
        }
    }

    pub fn from_share_tag(tag: char) -> Option<Platform> {
        match tag {
            'm' => Some(Platform::Modrinth),
            'c' => Some(Platform::CurseForge),
            _ => None,
        }
    }
}

/// The four mod-loading runtimes a mod can target.
///
/// Each platform speaks its own loader dialect: Modrinth uses
/// free-text names, CurseForge numeric codes (and sometimes loader
/// names interleaved with game versions). The mapping tables for both
/// live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Fabric,
    Forge,
    NeoForge,
    Quilt,
}

impl Loader {
    pub const ALL: [Loader; 4] = [Loader::Fabric, Loader::Forge, Loader::NeoForge, Loader::Quilt];

    pub fn as_str(self) -> &'static str {
        match self {
            Loader::Fabric => "fabric",
            Loader::Forge => "forge",
            Loader::NeoForge => "neoforge",
            Loader::Quilt => "quilt",
        }
    }

    /// Case-insensitive parse of a loader name. Unknown names map to
    /// `None` and are silently dropped from loader sets, never an error.
    pub fn from_name(name: &str) -> Option<Loader> {
        match name.to_ascii_lowercase().as_str() {
            "fabric" => Some(Loader::Fabric),
            "forge" => Some(Loader::Forge),
            "neoforge" => Some(Loader::NeoForge),
            "quilt" => Some(Loader::Quilt),
            _ => None,
        }
    }

    /// CurseForge `modLoaderType` code.
    pub fn curseforge_id(self) -> u32 {
        match self {
            Loader::Forge => 1,
            Loader::Fabric => 4,
            Loader::Quilt => 5,
            Loader::NeoForge => 6,
        }
    }

    /// Inverse of [`Loader::curseforge_id`]; unknown codes map to `None`.
    pub fn from_curseforge_id(id: u32) -> Option<Loader> {
        match id {
            1 => Some(Loader::Forge),
            4 => Some(Loader::Fabric),
            5 => Some(Loader::Quilt),
            6 => Some(Loader::NeoForge),
            _ => None,
        }
    }

    /// Dependency key used in the mrpack manifest's dependencies map.
    pub fn mrpack_dependency_key(self) -> &'static str {
        match self {
            Loader::Fabric => "fabric-loader",
            Loader::Forge => "forge",
            Loader::NeoForge => "neoforge",
            Loader::Quilt => "quilt-loader",
        }
    }
}

impl std::fmt::Display for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a mod is needed on the client or server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvRequirement {
    Required,
    Optional,
    Unsupported,
}

/// Relationship between a version and another project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Required,
    Optional,
    Incompatible,
    Embedded,
}

impl DependencyKind {
    /// CurseForge `relationType` table. Unrecognized codes default to
    /// optional rather than failing.
    pub fn from_curseforge_relation(code: u32) -> DependencyKind {
        match code {
            1 => DependencyKind::Embedded,
            2 => DependencyKind::Optional,
            3 => DependencyKind::Required,
            4 => DependencyKind::Incompatible,
            _ => DependencyKind::Optional,
        }
    }
}

/// A catalog entry, normalized from either platform.
///
/// Identity is `(platform, id)`; ids are opaque and platform-scoped.
/// Instances are immutable and rebuilt fresh on every lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mod {
    pub id: String,
    pub platform: Platform,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub author: String,
    pub icon_url: Option<String>,
    pub downloads: u64,
    /// Last-update timestamp, passed through verbatim from upstream.
    pub updated_at: String,
    pub loaders: Vec<Loader>,
    pub game_versions: Vec<String>,
    pub categories: Vec<String>,
    pub page_url: String,
}

impl Mod {
    pub fn identity(&self) -> (Platform, &str) {
        (self.platform, &self.id)
    }
}

/// One published release of a [`Mod`].
///
/// The loader/game-version sets record what upstream reports; their
/// consistency with the parent mod's advertised sets is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModVersion {
    pub id: String,
    pub mod_id: String,
    pub platform: Platform,
    pub version_number: String,
    pub game_versions: Vec<String>,
    pub loaders: Vec<Loader>,
    /// Primary download URL; `None` when the platform withholds one.
    pub download_url: Option<String>,
    pub file_name: String,
    pub file_size: u64,
    /// Strong hash. CurseForge never supplies one, so it is always
    /// `None` for that platform's versions.
    pub sha512: Option<String>,
    pub sha1: Option<String>,
    /// Cross-reference ids, populated only for CurseForge versions.
    pub cf_project_id: Option<u64>,
    pub cf_file_id: Option<u64>,
    pub client_side: EnvRequirement,
    pub server_side: EnvRequirement,
    pub dependencies: Vec<Dependency>,
}

/// Reference from a version to another project it relates to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub project_id: String,
    pub kind: DependencyKind,
    /// Pinned version, when the platform names one.
    pub version_id: Option<String>,
}

/// A `(Mod, ModVersion)` pair chosen for the pack, with a user-settable
/// client/server override distinct from the version's declared
/// requirement. Upstream requirement metadata is sometimes wrong or
/// absent, so the override is what the exporters consult.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMod {
    pub mod_info: Mod,
    pub version: ModVersion,
    pub client_side: EnvRequirement,
    pub server_side: EnvRequirement,
}

impl SelectedMod {
    /// Seeds the override from the version's declared requirements.
    pub fn new(mod_info: Mod, version: ModVersion) -> Self {
        let client_side = version.client_side;
        let server_side = version.server_side;
        Self { mod_info, version, client_side, server_side }
    }
}

/// Pack-level metadata. The ordered selection itself lives alongside
/// this in [`crate::store::ModpackSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModpackConfig {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub game_version: String,
    pub loader: Loader,
    /// Empty string means "unpinned / latest".
    pub loader_version: String,
}

/// Catalog search parameters, identical for both adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub loader: Option<Loader>,
    pub game_version: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            loader: None,
            game_version: None,
            limit: 20,
            offset: 0,
        }
    }

    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_game_version(mut self, game_version: impl Into<String>) -> Self {
        self.game_version = Some(game_version.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_name_round_trips() {
        for loader in Loader::ALL {
            assert_eq!(Loader::from_name(loader.as_str()), Some(loader));
        }
        assert_eq!(Loader::from_name("NeoForge"), Some(Loader::NeoForge));
        assert_eq!(Loader::from_name("rift"), None);
    }

    #[test]
    fn loader_curseforge_code_round_trips() {
        for loader in Loader::ALL {
            assert_eq!(Loader::from_curseforge_id(loader.curseforge_id()), Some(loader));
        }
        // Unknown codes are dropped, never an error.
        assert_eq!(Loader::from_curseforge_id(0), None);
        assert_eq!(Loader::from_curseforge_id(99), None);
    }

    #[test]
    fn platform_share_tag_round_trips() {
        for platform in [Platform::Modrinth, Platform::CurseForge] {
            assert_eq!(Platform::from_share_tag(platform.share_tag()), Some(platform));
        }
        assert_eq!(Platform::from_share_tag('x'), None);
    }

    #[test]
    fn curseforge_relation_table() {
        assert_eq!(DependencyKind::from_curseforge_relation(1), DependencyKind::Embedded);
        assert_eq!(DependencyKind::from_curseforge_relation(2), DependencyKind::Optional);
        assert_eq!(DependencyKind::from_curseforge_relation(3), DependencyKind::Required);
        assert_eq!(DependencyKind::from_curseforge_relation(4), DependencyKind::Incompatible);
        // Unrecognized codes default to optional.
        assert_eq!(DependencyKind::from_curseforge_relation(7), DependencyKind::Optional);
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Platform::CurseForge).unwrap(), "curseforge");
        assert_eq!(serde_json::to_value(Loader::NeoForge).unwrap(), "neoforge");
        assert_eq!(serde_json::to_value(EnvRequirement::Unsupported).unwrap(), "unsupported");
        assert_eq!(serde_json::to_value(DependencyKind::Embedded).unwrap(), "embedded");
    }
}
