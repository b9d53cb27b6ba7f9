//! incrust-cli/src/lib.rs — CLI lib pour incrust
//!
//! Sous-commandes :
//!   - demo : incruste les deux fragments de démonstration et imprime le
//!     flux combiné (source, sentinelle `***`, entête) sur stdout.
//!   - emit : lit un manifest `incrust.toml` décrivant les fragments
//!     (octets bruts sur disque) et produit les artefacts demandés.
//!
//! Le cœur (`incrust-core`) fait tout le travail de rendu ; ici on ne fait
//! que la colle processus : arguments, manifest, fichiers, logs.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use log::info;
use serde::Deserialize;

use incrust_core::{render_combined, EmitPlan, OutputKind, Registry, SourceOptions};

mod demos;
pub use demos::{demo_registry, Prebuilt, ADD_CODE, EXAMPLE_CODE};

/// Point d'entrée du binaire (à appeler depuis src/main.rs)
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let opts = SourceOptions { check_protect: cli.check_protect };
    match cli.cmd {
        Cmd::Demo => cmd_demo(&opts),
        Cmd::Emit { manifest } => cmd_emit(manifest, &opts),
    }
}

#[derive(Parser, Debug)]
#[command(name = "incrust", version, about = "Incruste du code machine pré-assemblé dans une unité C")]
struct Cli {
    /// Vérifie le retour de mprotect dans la routine générée (abort si échec)
    #[arg(long, global = true)]
    check_protect: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Imprime les fragments de démonstration sur stdout (source *** entête)
    Demo,
    /// Produit les artefacts décrits par un manifest incrust.toml
    Emit {
        /// Chemin vers incrust.toml
        #[arg(default_value = "incrust.toml")]
        manifest: PathBuf,
    },
}

/// Manifest minimal pour un lot de fragments.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    output: Option<Output>,
    #[serde(default, rename = "fragment")]
    fragments: Vec<FragmentSpec>,
}

/// Destinations des artefacts ; absentes → flux combiné sur stdout.
#[derive(Debug, Default, Deserialize)]
struct Output {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    header: Option<String>,
}

/// Un fragment à incruster : types textuels + chemin des octets bruts.
#[derive(Debug, Deserialize)]
struct FragmentSpec {
    name: String,
    result: String,
    #[serde(default)]
    params: Vec<String>,
    /// Fichier d'octets bruts, relatif au manifest.
    code: String,
}

fn read_manifest(path: &Utf8Path) -> Result<Manifest> {
    let s = fs::read_to_string(path).with_context(|| format!("lecture {path}"))?;
    let m: Manifest = toml::from_str(&s).with_context(|| format!("TOML invalide: {path}"))?;
    Ok(m)
}

fn cmd_demo(opts: &SourceOptions) -> Result<()> {
    let reg = demo_registry();
    info!("demo: {} fragment(s)", reg.len());
    print!("{}", render_combined(&reg, opts));
    Ok(())
}

fn cmd_emit(manifest: PathBuf, opts: &SourceOptions) -> Result<()> {
    let manifest = Utf8PathBuf::from_path_buf(manifest).map_err(|_| anyhow!("chemin invalide"))?;
    let m = read_manifest(&manifest)?;
    let root = manifest.parent().context("manifest sans parent ?")?.to_path_buf();

    let mut reg = Registry::new();
    for spec in &m.fragments {
        let path = root.join(&spec.code);
        let bytes = fs::read(&path).with_context(|| format!("lecture {path}"))?;
        info!("fragment `{}` : {} octet(s) depuis {path}", spec.name, bytes.len());
        reg.append(&spec.name, &spec.result, spec.params.clone(), bytes);
    }

    let out = m.output.unwrap_or_default();
    if out.source.is_none() && out.header.is_none() {
        // Pas de destinations → frontière de processus historique : un seul
        // canal, sentinelle au milieu.
        print!("{}", render_combined(&reg, opts));
        return Ok(());
    }

    let mut plan = EmitPlan::new().with_options(*opts);
    if let Some(src) = &out.source {
        plan = plan.with(OutputKind::Source(Some(root.join(src).into_std_path_buf())));
    }
    if let Some(hdr) = &out.header {
        plan = plan.with(OutputKind::Header(Some(root.join(hdr).into_std_path_buf())));
    }
    let arts = plan.emit_all(&reg).context("émission des artefacts")?;
    for a in &arts {
        info!("artefact {} → {} ({} octets)", a.kind, a.path.display(), a.size);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_fragments_and_outputs() {
        let toml_src = r#"
            [output]
            source = "gen/embedded.c"
            header = "gen/embedded.h"

            [[fragment]]
            name = "example"
            result = "int"
            code = "blobs/example.bin"

            [[fragment]]
            name = "add"
            result = "void"
            params = ["int *", "int *", "int"]
            code = "blobs/add.bin"
        "#;
        let m: Manifest = toml::from_str(toml_src).expect("parse ok");
        assert_eq!(m.fragments.len(), 2);
        assert_eq!(m.fragments[0].name, "example");
        assert!(m.fragments[0].params.is_empty());
        assert_eq!(m.fragments[1].params.len(), 3);
        let out = m.output.expect("output présent");
        assert_eq!(out.source.as_deref(), Some("gen/embedded.c"));
        assert_eq!(out.header.as_deref(), Some("gen/embedded.h"));
    }

    #[test]
    fn manifest_outputs_are_optional() {
        let m: Manifest = toml::from_str(
            r#"
            [[fragment]]
            name = "seul"
            result = "void"
            code = "seul.bin"
        "#,
        )
        .expect("parse ok");
        assert!(m.output.is_none());
        assert_eq!(m.fragments[0].result, "void");
    }

    #[test]
    fn cli_parses_check_protect_flag() {
        let cli = Cli::try_parse_from(["incrust", "demo", "--check-protect"]).expect("parse");
        assert!(cli.check_protect);
        let cli = Cli::try_parse_from(["incrust", "emit", "projet/incrust.toml"]).expect("parse");
        assert!(!cli.check_protect);
        match cli.cmd {
            Cmd::Emit { manifest } => {
                assert_eq!(manifest, PathBuf::from("projet/incrust.toml"));
            }
            Cmd::Demo => panic!("sous-commande inattendue"),
        }
    }
}
