//! Modrinth catalog adapter
//!
//! Talks to the Modrinth v2 REST API directly (Modrinth serves CORS
//! headers, so no proxy sits in between). Raw response shapes are
//! mirrored as private structs and converted to the canonical model by
//! [`to_mod`] / [`to_version`].

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::api;
use crate::error::Result;
use crate::model::{
    Dependency, DependencyKind, EnvRequirement, Loader, Mod, ModVersion, Platform, SearchQuery,
    DEFAULT_ENV_REQUIREMENT, UNKNOWN_AUTHOR,
};

const MODRINTH_API: &str = "https://api.modrinth.com/v2";

/// Client for the Modrinth catalog.
#[derive(Debug, Clone)]
pub struct ModrinthClient {
    client: Client,
    base_url: String,
}

/// Raw Modrinth project, as returned by both search hits and the
/// single-project endpoint (which names the id field differently).
#[derive(Debug, Deserialize)]
struct ModrinthProject {
    #[serde(alias = "id")]
    project_id: String,
    slug: String,
    title: String,
    description: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    icon_url: Option<String>,
    downloads: u64,
    date_modified: String,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    loaders: Vec<String>,
    #[serde(default)]
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ModrinthSearchResponse {
    hits: Vec<ModrinthProject>,
}

/// Raw Modrinth version.
#[derive(Debug, Deserialize)]
struct ModrinthVersion {
    id: String,
    project_id: String,
    version_number: String,
    #[serde(default)]
    game_versions: Vec<String>,
    #[serde(default)]
    loaders: Vec<String>,
    #[serde(default)]
    files: Vec<ModrinthFile>,
    #[serde(default)]
    dependencies: Vec<ModrinthDependency>,
    #[serde(default)]
    client_side: Option<EnvRequirement>,
    #[serde(default)]
    server_side: Option<EnvRequirement>,
}

#[derive(Debug, Deserialize)]
struct ModrinthFile {
    url: String,
    filename: String,
    size: u64,
    hashes: ModrinthHashes,
    #[serde(default)]
    primary: bool,
}

#[derive(Debug, Deserialize)]
struct ModrinthHashes {
    #[serde(default)]
    sha512: Option<String>,
    #[serde(default)]
    sha1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModrinthDependency {
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    version_id: Option<String>,
    dependency_type: DependencyKind,
}

/// Convert a raw project to the canonical [`Mod`].
fn to_mod(project: ModrinthProject) -> Mod {
    let page_url = format!("https://modrinth.com/mod/{}", project.slug);
    Mod {
        id: project.project_id,
        platform: Platform::Modrinth,
        slug: project.slug,
        name: project.title,
        description: project.description,
        author: project
            .author
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        icon_url: project.icon_url,
        downloads: project.downloads,
        updated_at: project.date_modified,
        // Unknown loader names are dropped from the set.
        loaders: project.loaders.iter().filter_map(|l| Loader::from_name(l)).collect(),
        game_versions: project.versions,
        categories: project.categories,
        page_url,
    }
}

/// Convert a raw version to the canonical [`ModVersion`], using the
/// primary file (or the first file when none is marked primary).
fn to_version(version: ModrinthVersion) -> ModVersion {
    let file = version
        .files
        .iter()
        .find(|f| f.primary)
        .or_else(|| version.files.first());

    let (download_url, file_name, file_size, sha512, sha1) = match file {
        Some(f) => (
            Some(f.url.clone()),
            f.filename.clone(),
            f.size,
            f.hashes.sha512.clone(),
            f.hashes.sha1.clone(),
        ),
        None => (None, String::new(), 0, None, None),
    };

    ModVersion {
        id: version.id,
        mod_id: version.project_id,
        platform: Platform::Modrinth,
        version_number: version.version_number,
        game_versions: version.game_versions,
        loaders: version.loaders.iter().filter_map(|l| Loader::from_name(l)).collect(),
        download_url,
        file_name,
        file_size,
        sha512,
        sha1,
        cf_project_id: None,
        cf_file_id: None,
        client_side: version.client_side.unwrap_or(DEFAULT_ENV_REQUIREMENT),
        server_side: version.server_side.unwrap_or(DEFAULT_ENV_REQUIREMENT),
        // Dependencies without a project id cannot be referenced and
        // are dropped.
        dependencies: version
            .dependencies
            .into_iter()
            .filter_map(|d| {
                d.project_id.map(|project_id| Dependency {
                    project_id,
                    kind: d.dependency_type,
                    version_id: d.version_id,
                })
            })
            .collect(),
    }
}

impl ModrinthClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(MODRINTH_API)
    }

    /// Point the client at a different API root, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: api::build_client()?,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        api::endpoint(&self.base_url, path)
    }

    /// Search the catalog. Hits come back in upstream ranking order,
    /// which is preserved as-is.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Mod>> {
        let mut facets: Vec<Vec<String>> = vec![vec!["project_type:mod".to_string()]];
        if let Some(loader) = query.loader {
            facets.push(vec![format!("categories:{loader}")]);
        }
        if let Some(game_version) = &query.game_version {
            facets.push(vec![format!("versions:{game_version}")]);
        }

        let mut url = self.endpoint("/search")?;
        url.query_pairs_mut()
            .append_pair("query", &query.query)
            .append_pair("facets", &serde_json::json!(facets).to_string())
            .append_pair("limit", &query.limit.to_string())
            .append_pair("offset", &query.offset.to_string());

        let response: ModrinthSearchResponse = api::get_json(&self.client, url).await?;
        Ok(response.hits.into_iter().map(to_mod).collect())
    }

    /// Fetch a single project by id or slug.
    pub async fn get_mod(&self, id_or_slug: &str) -> Result<Mod> {
        let url = self.endpoint(&format!("/project/{id_or_slug}"))?;
        let project: ModrinthProject = api::get_json(&self.client, url).await?;
        Ok(to_mod(project))
    }

    /// Batch fetch. Short-circuits to an empty result for empty input
    /// without touching the network.
    pub async fn get_mods(&self, ids: &[String]) -> Result<Vec<Mod>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint("/projects")?;
        url.query_pairs_mut()
            .append_pair("ids", &serde_json::json!(ids).to_string());

        let projects: Vec<ModrinthProject> = api::get_json(&self.client, url).await?;
        Ok(projects.into_iter().map(to_mod).collect())
    }

    /// List a project's versions, filtered server-side when a loader
    /// or game version is given.
    pub async fn get_mod_versions(
        &self,
        mod_id: &str,
        loader: Option<Loader>,
        game_version: Option<&str>,
    ) -> Result<Vec<ModVersion>> {
        let mut url = self.endpoint(&format!("/project/{mod_id}/version"))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(loader) = loader {
                pairs.append_pair("loaders", &serde_json::json!([loader.as_str()]).to_string());
            }
            if let Some(game_version) = game_version {
                pairs.append_pair("game_versions", &serde_json::json!([game_version]).to_string());
            }
        }

        let versions: Vec<ModrinthVersion> = api::get_json(&self.client, url).await?;
        Ok(versions.into_iter().map(to_version).collect())
    }

    /// Fetch a single version by id.
    pub async fn get_mod_version(&self, version_id: &str) -> Result<ModVersion> {
        let url = self.endpoint(&format!("/version/{version_id}"))?;
        let version: ModrinthVersion = api::get_json(&self.client, url).await?;
        Ok(to_version(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn project_json() -> serde_json::Value {
        serde_json::json!({
            "project_id": "AANobbMI",
            "slug": "sodium",
            "title": "Sodium",
            "description": "A modern rendering engine",
            "author": "jellysquid3",
            "icon_url": "https://cdn.modrinth.com/sodium.png",
            "downloads": 12345678,
            "date_modified": "2024-11-01T12:00:00Z",
            "categories": ["optimization"],
            "loaders": ["fabric", "quilt", "liteloader"],
            "versions": ["1.21", "1.21.1"],
            "project_type": "mod"
        })
    }

    fn version_json() -> serde_json::Value {
        serde_json::json!({
            "id": "vXyZ01",
            "project_id": "AANobbMI",
            "version_number": "0.6.0",
            "game_versions": ["1.21.1"],
            "loaders": ["fabric"],
            "files": [
                {
                    "url": "https://cdn.modrinth.com/sodium-0.6.0.jar",
                    "filename": "sodium-0.6.0.jar",
                    "size": 1048576,
                    "hashes": { "sha512": "s512", "sha1": "s1" },
                    "primary": true
                }
            ],
            "dependencies": [
                { "project_id": "P7dR8mSH", "version_id": null, "dependency_type": "required" },
                { "project_id": null, "version_id": null, "dependency_type": "optional" }
            ],
            "client_side": "required",
            "server_side": "unsupported"
        })
    }

    #[tokio::test]
    async fn search_maps_hits_and_drops_unknown_loaders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("query", "sodium"))
            .and(query_param("limit", "20"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "hits": [project_json()] })),
            )
            .mount(&server)
            .await;

        let client = ModrinthClient::with_base_url(server.uri()).unwrap();
        let mods = client.search(&SearchQuery::new("sodium")).await.unwrap();

        assert_eq!(mods.len(), 1);
        let m = &mods[0];
        assert_eq!(m.identity(), (Platform::Modrinth, "AANobbMI"));
        assert_eq!(m.name, "Sodium");
        assert_eq!(m.page_url, "https://modrinth.com/mod/sodium");
        // "liteloader" is not a canonical loader and is dropped.
        assert_eq!(m.loaders, vec![Loader::Fabric, Loader::Quilt]);
        assert_eq!(m.downloads, 12345678);
    }

    #[tokio::test]
    async fn search_sends_loader_and_game_version_facets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param(
                "facets",
                r#"[["project_type:mod"],["categories:fabric"],["versions:1.21.1"]]"#,
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "hits": [] })),
            )
            .mount(&server)
            .await;

        let client = ModrinthClient::with_base_url(server.uri()).unwrap();
        let query = SearchQuery::new("map")
            .with_loader(Loader::Fabric)
            .with_game_version("1.21.1");
        let mods = client.search(&query).await.unwrap();
        assert!(mods.is_empty());
    }

    #[tokio::test]
    async fn get_mod_not_found_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ModrinthClient::with_base_url(server.uri()).unwrap();
        let err = client.get_mod("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, crate::error::WeaveError::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn get_mod_tolerates_missing_author_and_icon() {
        let mut raw = project_json();
        raw.as_object_mut().unwrap().remove("author");
        raw.as_object_mut().unwrap().remove("icon_url");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/sodium"))
            .respond_with(ResponseTemplate::new(200).set_body_json(raw))
            .mount(&server)
            .await;

        let client = ModrinthClient::with_base_url(server.uri()).unwrap();
        let m = client.get_mod("sodium").await.unwrap();
        assert_eq!(m.author, UNKNOWN_AUTHOR);
        assert_eq!(m.icon_url, None);
    }

    #[tokio::test]
    async fn get_mods_empty_input_makes_no_request() {
        // Unroutable base URL: any network call would error out.
        let client = ModrinthClient::with_base_url("http://127.0.0.1:1").unwrap();
        let mods = client.get_mods(&[]).await.unwrap();
        assert!(mods.is_empty());
    }

    #[tokio::test]
    async fn version_mapping_uses_primary_file_and_drops_null_dependencies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/version/vXyZ01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(version_json()))
            .mount(&server)
            .await;

        let client = ModrinthClient::with_base_url(server.uri()).unwrap();
        let version = client.get_mod_version("vXyZ01").await.unwrap();

        assert_eq!(version.download_url.as_deref(), Some("https://cdn.modrinth.com/sodium-0.6.0.jar"));
        assert_eq!(version.file_name, "sodium-0.6.0.jar");
        assert_eq!(version.sha512.as_deref(), Some("s512"));
        assert_eq!(version.sha1.as_deref(), Some("s1"));
        assert_eq!(version.cf_project_id, None);
        assert_eq!(version.client_side, EnvRequirement::Required);
        assert_eq!(version.server_side, EnvRequirement::Unsupported);
        // The dependency with a null project id is dropped.
        assert_eq!(version.dependencies.len(), 1);
        assert_eq!(version.dependencies[0].project_id, "P7dR8mSH");
        assert_eq!(version.dependencies[0].kind, DependencyKind::Required);
    }

    #[tokio::test]
    async fn version_env_defaults_to_required_when_absent() {
        let mut raw = version_json();
        raw.as_object_mut().unwrap().remove("client_side");
        raw.as_object_mut().unwrap().remove("server_side");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/version/vXyZ01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(raw))
            .mount(&server)
            .await;

        let client = ModrinthClient::with_base_url(server.uri()).unwrap();
        let version = client.get_mod_version("vXyZ01").await.unwrap();
        assert_eq!(version.client_side, DEFAULT_ENV_REQUIREMENT);
        assert_eq!(version.server_side, DEFAULT_ENV_REQUIREMENT);
    }

    #[tokio::test]
    async fn get_mod_versions_sends_server_side_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/AANobbMI/version"))
            .and(query_param("loaders", r#"["fabric"]"#))
            .and(query_param("game_versions", r#"["1.21.1"]"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = ModrinthClient::with_base_url(server.uri()).unwrap();
        let versions = client
            .get_mod_versions("AANobbMI", Some(Loader::Fabric), Some("1.21.1"))
            .await
            .unwrap();
        assert!(versions.is_empty());
    }
}
