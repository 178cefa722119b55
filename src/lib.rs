//! modweaver
//!
//! Builds Minecraft modpacks from two rival catalogs and exports them
//! to any of three installer ecosystems.
//!
//! - **Canonical model** ([`model`]): one platform-independent schema
//!   for mods, versions, and pack configuration.
//! - **Source adapters** ([`api`]): clients for Modrinth and
//!   CurseForge that normalize each catalog's native responses into
//!   the canonical model.
//! - **Selection store** ([`store`]): the mutable session aggregate a
//!   builder works on, de-duplicated by mod identity.
//! - **Export engine** ([`export`]): mrpack, CurseForge, and packwiz
//!   archive generators over the same canonical input.
//! - **Share codec** ([`share`]): a selection compressed into a
//!   URL-safe token, so a pack can be shared with no server-side
//!   storage at all.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use modweaver::{
//!     export, ExportFormat, ModrinthClient, ModpackSession, SearchQuery, SelectedMod,
//! };
//!
//! # async fn example() -> modweaver::Result<()> {
//! let catalog = ModrinthClient::new()?;
//! let mut session = ModpackSession::new();
//!
//! // Find a mod and pick its newest matching release.
//! let hits = catalog.search(&SearchQuery::new("sodium")).await?;
//! let mod_info = hits.into_iter().next().expect("no search hits");
//! let versions = catalog
//!     .get_mod_versions(&mod_info.id, Some(session.loader), Some(session.game_version.as_str()))
//!     .await?;
//! let version = versions.into_iter().next().expect("no matching release");
//! session.add_mod(SelectedMod::new(mod_info, version));
//!
//! // Export the selection as an .mrpack archive.
//! let output = export::generate(ExportFormat::Mrpack, &session.config, session.selected())?;
//! println!("{} ({} bytes)", output.file_name, output.bytes.len());
//! for skip in &output.skipped {
//!     println!("skipped {}: {}", skip.name, skip.reason);
//! }
//!
//! // Or hand out a stateless share link instead.
//! let token = modweaver::share::encode(&session.share_state());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod export;
pub mod model;
pub mod share;
pub mod store;

// Re-export commonly used types for convenience
pub use api::{CurseForgeClient, ModrinthClient};
pub use error::{Result, WeaveError};
pub use export::{ExportFormat, ExportOutput, SkipReason, SkippedMod};
pub use model::{
    Dependency, DependencyKind, EnvRequirement, Loader, Mod, ModVersion, ModpackConfig, Platform,
    SearchQuery, SelectedMod,
};
pub use share::{ShareRef, ShareState};
pub use store::{ModpackSession, SessionSnapshot};
