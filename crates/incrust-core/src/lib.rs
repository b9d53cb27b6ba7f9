//! incrust-core — Cœur d'incrust
//!
//! Transforme des fragments de code machine déjà assemblés (par un
//! assembleur JIT externe, vu ici comme un simple fournisseur d'octets)
//! en une unité de traduction C auto-suffisante : un tableau d'octets par
//! fragment, une routine de fixup exécutée avant `main` (mprotect →
//! lecture + exécution) et l'entête de déclarations correspondant.
//!
//! ## Modules
//! - `registry` : `Fragment` + `Registry` (collection ordonnée, append-only)
//!   et le trait `Assembled` (interface du collaborateur assembleur).
//! - `emit`     : rendus texte purs — `render_source`, `render_header`,
//!   `render_combined` — au contrat d'octets près.
//! - `output`   : plan d'émission multi-artefacts vers fichiers (`EmitPlan`).
//!
//! ## Features
//! - **serde** : dérive `Serialize`/`Deserialize` sur `Fragment`.
//!
//! Le cœur ne lit jamais le contenu des fragments : octets opaques, copiés
//! une fois à l'enregistrement, jamais mutés ensuite.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

pub mod emit;
pub mod output;
pub mod registry;

// ---------- Reexports de confort ----------
pub use emit::{
    render_combined, render_header, render_source, render_source_with, round_to_page,
    SourceOptions, BYTES_PER_LINE, PAGE_ALIGN, SENTINEL,
};
pub use output::{Artifact, EmitError, EmitPlan, OutputKind};
pub use registry::{Assembled, Fragment, Registry};

// ---------- Version ----------
/// Version du crate (lisible, via Cargo).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Renvoie une jolie bannière de version (utile pour logs/outils).
pub fn version() -> String {
    format!("incrust-core {VERSION}")
}
