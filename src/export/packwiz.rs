//! packwiz generator: server-oriented declarative layout.
//!
//! Emits `pack.toml`, `index.toml`, and one `mods/<slug>.pw.toml`
//! descriptor per selection. The descriptor bodies are fixed-layout
//! generated text so identical input yields identical bytes. Index
//! hashes are intentionally left blank; packwiz recomputes them with
//! its own refresh tooling. Every mod's side is fixed to "both": this
//! format does not model per-mod environment scoping at generation
//! time.

use crate::error::Result;
use crate::export::{
    sanitize_pack_name, ArchiveBuilder, ExportOutput, FALLBACK_PACK_AUTHOR,
};
use crate::model::{ModpackConfig, Platform, SelectedMod};

fn pack_toml(config: &ModpackConfig) -> String {
    let author = if config.author.is_empty() { FALLBACK_PACK_AUTHOR } else { config.author.as_str() };
    let loader_version =
        if config.loader_version.is_empty() { "*" } else { config.loader_version.as_str() };
    format!(
        "name = \"{name}\"\n\
         author = \"{author}\"\n\
         version = \"{version}\"\n\
         pack-format = \"packwiz:1.1.0\"\n\
         \n\
         [versions]\n\
         minecraft = \"{game_version}\"\n\
         {loader} = \"{loader_version}\"\n\
         \n\
         [index]\n\
         file = \"index.toml\"\n\
         hash-format = \"sha256\"\n",
        name = config.name,
        author = author,
        version = config.version,
        game_version = config.game_version,
        loader = config.loader.as_str(),
        loader_version = loader_version,
    )
}

/// Descriptor slug: the mod slug reduced to alphanumeric-and-dash.
fn sanitize_slug(slug: &str) -> String {
    slug.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}

fn descriptor_path(selection: &SelectedMod) -> String {
    format!("mods/{}.pw.toml", sanitize_slug(&selection.mod_info.slug))
}

/// One per-mod descriptor. Native-origin (Modrinth) mods embed the
/// direct download plus an update-by-origin reference; foreign-origin
/// (CurseForge) mods carry only an update-by-legacy-platform
/// reference, since their download URLs may not be redistributable.
fn mod_toml(selection: &SelectedMod) -> String {
    let mod_info = &selection.mod_info;
    let version = &selection.version;

    match mod_info.platform {
        Platform::Modrinth => format!(
            "name = \"{name}\"\n\
             filename = \"{file_name}\"\n\
             side = \"both\"\n\
             \n\
             [download]\n\
             url = \"{url}\"\n\
             hash-format = \"sha512\"\n\
             hash = \"{hash}\"\n\
             \n\
             [update]\n\
             [update.modrinth]\n\
             mod-id = \"{mod_id}\"\n\
             version = \"{version_id}\"\n",
            name = mod_info.name,
            file_name = version.file_name,
            url = version.download_url.as_deref().unwrap_or(""),
            hash = version.sha512.as_deref().unwrap_or(""),
            mod_id = mod_info.id,
            version_id = version.id,
        ),
        Platform::CurseForge => format!(
            "name = \"{name}\"\n\
             filename = \"{file_name}\"\n\
             side = \"both\"\n\
             \n\
             [update]\n\
             [update.curseforge]\n\
             file-id = {file_id}\n\
             project-id = {project_id}\n",
            name = mod_info.name,
            file_name = version.file_name,
            file_id = version.cf_file_id.unwrap_or(0),
            project_id = version.cf_project_id.unwrap_or(0),
        ),
    }
}

fn index_toml(mods: &[SelectedMod]) -> String {
    let entries: Vec<String> = mods
        .iter()
        .map(|selection| {
            format!(
                "[[files]]\n\
                 file = \"{path}\"\n\
                 hash = \"\"\n\
                 metafile = true",
                path = descriptor_path(selection),
            )
        })
        .collect();
    format!("hash-format = \"sha256\"\n\n{}\n", entries.join("\n\n"))
}

pub(crate) fn generate(config: &ModpackConfig, mods: &[SelectedMod]) -> Result<ExportOutput> {
    let mut archive = ArchiveBuilder::new();
    archive.add_file("pack.toml", pack_toml(config).as_bytes())?;
    archive.add_file("index.toml", index_toml(mods).as_bytes())?;
    archive.add_directory("mods")?;
    for selection in mods {
        archive.add_file(&descriptor_path(selection), mod_toml(selection).as_bytes())?;
    }

    Ok(ExportOutput {
        file_name: format!("{}-packwiz.zip", sanitize_pack_name(&config.name)),
        bytes: archive.finish()?,
        skipped: Vec::new(),
    })
}
