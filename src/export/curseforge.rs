//! CurseForge pack generator: legacy installer manifest.
//!
//! Only CurseForge-native selections can be referenced from the
//! manifest's files list. Modrinth-native selections are listed in a
//! plain-text notice under `overrides/mods/` instead; this format
//! cannot point at foreign files and the engine does not fetch and
//! re-host their binaries.

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::export::{
    sanitize_pack_name, to_pretty_json, ArchiveBuilder, ExportOutput, SkipReason, SkippedMod,
    FALLBACK_PACK_AUTHOR,
};
use crate::model::{ModpackConfig, Platform, SelectedMod};

const MANUAL_DOWNLOAD_NOTICE: &str = "_DOWNLOAD_THESE.md";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CfManifest<'a> {
    minecraft: CfMinecraft<'a>,
    manifest_type: &'static str,
    manifest_version: u32,
    name: &'a str,
    version: &'a str,
    author: &'a str,
    files: Vec<CfManifestFile>,
    overrides: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CfMinecraft<'a> {
    version: &'a str,
    mod_loaders: Vec<CfModLoader>,
}

#[derive(Debug, Serialize)]
struct CfModLoader {
    id: String,
    primary: bool,
}

#[derive(Debug, Serialize)]
struct CfManifestFile {
    #[serde(rename = "projectID")]
    project_id: u64,
    #[serde(rename = "fileID")]
    file_id: u64,
    // Fixed flag; the per-mod env override is not consulted here.
    required: bool,
}

pub(crate) fn generate(config: &ModpackConfig, mods: &[SelectedMod]) -> Result<ExportOutput> {
    let native: Vec<&SelectedMod> = mods
        .iter()
        .filter(|m| m.mod_info.platform == Platform::CurseForge)
        .collect();
    let foreign: Vec<&SelectedMod> = mods
        .iter()
        .filter(|m| m.mod_info.platform == Platform::Modrinth)
        .collect();

    let loader_version = if config.loader_version.is_empty() {
        "latest"
    } else {
        config.loader_version.as_str()
    };
    let loader_id = format!("{}-{}", config.loader.as_str(), loader_version);

    let manifest = CfManifest {
        minecraft: CfMinecraft {
            version: &config.game_version,
            mod_loaders: vec![CfModLoader { id: loader_id, primary: true }],
        },
        manifest_type: "minecraftModpack",
        manifest_version: 1,
        name: &config.name,
        version: &config.version,
        author: if config.author.is_empty() { FALLBACK_PACK_AUTHOR } else { config.author.as_str() },
        files: native
            .iter()
            .filter_map(|m| match (m.version.cf_project_id, m.version.cf_file_id) {
                (Some(project_id), Some(file_id)) => {
                    Some(CfManifestFile { project_id, file_id, required: true })
                }
                _ => None,
            })
            .collect(),
        overrides: "overrides",
    };

    // Human-readable list of every selected mod, both platforms.
    let modlist_items: Vec<String> = mods
        .iter()
        .map(|m| {
            format!(
                "<li><a href=\"{}\">{}</a> (by {})</li>",
                m.mod_info.page_url, m.mod_info.name, m.mod_info.author
            )
        })
        .collect();
    let modlist_html = format!("<ul>\n{}\n</ul>", modlist_items.join("\n"));

    let mut archive = ArchiveBuilder::new();
    archive.add_file("manifest.json", to_pretty_json(&manifest).as_bytes())?;
    archive.add_file("modlist.html", modlist_html.as_bytes())?;
    archive.add_directory("overrides")?;
    archive.add_directory("overrides/mods")?;

    let mut skipped = Vec::new();
    if !foreign.is_empty() {
        let listing: Vec<String> = foreign
            .iter()
            .map(|m| format!("- {}: {}", m.mod_info.name, m.mod_info.page_url))
            .collect();
        let notice = format!(
            "# Manual Downloads Required\n\n\
             The following mods are from Modrinth and need to be downloaded manually:\n\n\
             {}\n\n\
             Download these mods and place the .jar files in the mods folder.\n",
            listing.join("\n"),
        );
        archive.add_file(&format!("overrides/mods/{MANUAL_DOWNLOAD_NOTICE}"), notice.as_bytes())?;

        for m in &foreign {
            warn!(mod_name = %m.mod_info.name, "curseforge pack: foreign mod listed for manual download");
            skipped.push(SkippedMod {
                name: m.mod_info.name.clone(),
                reason: SkipReason::ForeignPlatform,
            });
        }
    }

    Ok(ExportOutput {
        file_name: format!(
            "{}-{}-curseforge.zip",
            sanitize_pack_name(&config.name),
            config.version
        ),
        bytes: archive.finish()?,
        skipped,
    })
}
