//! output.rs — Plan d'émission des artefacts vers fichiers.
//!
//! Les rendus de `emit` sont purs ; ce module est la seule surface
//! faillible du crate : il **écrit** les textes générés (source, entête,
//! flux combiné) là où on le lui demande. Il ne construit pas le registre.
//!
//! Usage typique :
//! ```no_run
//! use std::path::PathBuf;
//! use incrust_core::{EmitPlan, OutputKind, Registry};
//! # let reg = Registry::new();
//! let plan = EmitPlan::new()
//!     .with_out_dir(PathBuf::from("target/gen"))
//!     .with_base_stem("embedded")
//!     .with(OutputKind::Source(None))
//!     .with(OutputKind::Header(None));
//! plan.emit_all(&reg).expect("write");
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::emit::{render_combined, render_header, render_source_with, SourceOptions};
use crate::registry::Registry;

/// Type d'artefact à produire. `None` = chemin déduit du plan.
#[derive(Debug, Clone)]
pub enum OutputKind {
    /// Unité de traduction C (tableaux + routine de fixup), ext. `c`.
    Source(Option<PathBuf>),
    /// Entête de déclarations, ext. `h`.
    Header(Option<PathBuf>),
    /// Flux combiné source + sentinelle + entête, ext. `txt`.
    Combined(Option<PathBuf>),
}

/// Plan complet d'émission (multi-artefacts).
#[derive(Debug, Clone, Default)]
pub struct EmitPlan {
    /// Répertoire de sortie commun (sinon : répertoire courant).
    pub out_dir: Option<PathBuf>,
    /// Nom de base sans extension (défaut : `gen`).
    pub base_stem: Option<String>,
    /// Options du rendu source, partagées par tous les artefacts.
    pub options: SourceOptions,
    /// Liste d'artefacts à produire.
    pub outputs: Vec<OutputKind>,
}

impl EmitPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Définit un répertoire de sortie commun.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Définit le nom de base (sans extension).
    pub fn with_base_stem(mut self, stem: impl Into<String>) -> Self {
        self.base_stem = Some(stem.into());
        self
    }

    /// Options du rendu source.
    pub fn with_options(mut self, opts: SourceOptions) -> Self {
        self.options = opts;
        self
    }

    /// Ajoute un artefact à produire.
    pub fn with(mut self, kind: OutputKind) -> Self {
        self.outputs.push(kind);
        self
    }

    /// Émet **tous** les artefacts du plan.
    pub fn emit_all(&self, reg: &Registry) -> Result<Vec<Artifact>, EmitError> {
        let mut out = Vec::with_capacity(self.outputs.len());
        for kind in &self.outputs {
            out.push(self.emit_one(reg, kind)?);
        }
        Ok(out)
    }

    /// Émet **un** artefact.
    pub fn emit_one(&self, reg: &Registry, kind: &OutputKind) -> Result<Artifact, EmitError> {
        let (label, text, target) = match kind {
            OutputKind::Source(path) => (
                "source",
                render_source_with(reg, &self.options),
                self.resolve_path(path.as_ref(), "c"),
            ),
            OutputKind::Header(path) => {
                ("header", render_header(reg), self.resolve_path(path.as_ref(), "h"))
            }
            OutputKind::Combined(path) => (
                "combined",
                render_combined(reg, &self.options),
                self.resolve_path(path.as_ref(), "txt"),
            ),
        };
        write_text(&target, &text)?;
        Ok(Artifact { kind: label.into(), path: target, size: text.len() })
    }

    /// Résolution d'un chemin cible :
    /// - `explicit` fourni → tel quel ;
    /// - sinon `<out_dir>/<base_stem>.<ext>`.
    fn resolve_path(&self, explicit: Option<&PathBuf>, ext: &str) -> PathBuf {
        if let Some(p) = explicit {
            return p.clone();
        }
        let base = self.base_stem.clone().unwrap_or_else(|| "gen".into());
        let file = format!("{base}.{ext}");
        match &self.out_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

/// Artefact émis (pour logs/tests).
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Type logique (“source”, “header”, “combined”).
    pub kind: String,
    /// Chemin de sortie.
    pub path: PathBuf,
    /// Taille en octets UTF-8.
    pub size: usize,
}

/// Erreurs d'émission.
#[derive(Debug, Error)]
pub enum EmitError {
    /// I/O lors de l'écriture d'un artefact.
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

fn write_text(path: &Path, s: &str) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut f = fs::File::create(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
