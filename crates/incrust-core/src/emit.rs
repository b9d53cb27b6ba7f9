//! emit.rs — Rendus texte purs : source C incrustée + entête de déclarations.
//!
//! Deux fonctions totales sur le `Registry` :
//! - `render_source` : un tableau d'octets par fragment (hex minuscule,
//!   16 octets par ligne, aligné sur 4096) + une routine constructeur qui
//!   bascule chaque région en lecture+exécution via `mprotect`.
//! - `render_header` : une déclaration `extern "C" auto … -> …;` par
//!   fragment, gardée par `#pragma once`.
//!
//! Le format de sortie est un contrat à l'octet près : même registre en
//! entrée ⇒ même texte en sortie, toujours. Aucune dépendance à
//! l'environnement — la taille de page n'est résolue qu'au démarrage du
//! *programme généré*, jamais à l'émission.

use std::fmt::Write as _;

use crate::registry::Registry;

/// Alignement des tableaux émis. La bascule de protection opère par pages
/// entières : l'alignement garantit qu'elle ne touche que ce tableau.
pub const PAGE_ALIGN: usize = 4096;

/// Nombre maximal de littéraux hexadécimaux par ligne.
pub const BYTES_PER_LINE: usize = 16;

/// Ligne sentinelle séparant source et entête dans le flux combiné, pour
/// qu'un splitter aval puisse re-découper.
pub const SENTINEL: &str = "***";

/// Options du rendu source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceOptions {
    /// Si vrai, la routine générée vérifie le retour de `mprotect` et
    /// `abort()` en cas d'échec. Par défaut : comportement permissif
    /// (appel non vérifié), voir DESIGN.md.
    pub check_protect: bool,
}

/// Rendu source avec les options par défaut (permissif).
pub fn render_source(reg: &Registry) -> String {
    render_source_with(reg, &SourceOptions::default())
}

/// Rendu source : includes, tableaux d'octets, routine de fixup.
pub fn render_source_with(reg: &Registry, opts: &SourceOptions) -> String {
    let mut s = String::new();
    s.push_str("#include <sys/mman.h>\n");
    s.push_str("#include <unistd.h>\n");
    if opts.check_protect {
        s.push_str("#include <stdlib.h>\n");
    }
    s.push('\n');

    for frag in reg.iter() {
        let _ = writeln!(
            s,
            "extern \"C\" __attribute__((aligned({PAGE_ALIGN}))) const unsigned char {}[] = {{",
            frag.name
        );
        let last = frag.code.len().wrapping_sub(1);
        for (i, byte) in frag.code.iter().enumerate() {
            let _ = write!(s, "0x{byte:02x},");
            if i % BYTES_PER_LINE == BYTES_PER_LINE - 1 || i == last {
                s.push('\n');
            }
        }
        s.push_str("};\n");
    }

    s.push('\n');
    s.push_str("__attribute__((constructor)) static void incrust_init_() {\n");
    // Masque calculé une fois, partagé par tous les fragments.
    s.push_str("    long page_size = sysconf(_SC_PAGESIZE) - 1;\n");
    for frag in reg.iter() {
        let call = format!(
            "mprotect((void*){name}, (sizeof({name}) + page_size) & ~page_size, PROT_READ | PROT_EXEC)",
            name = frag.name
        );
        if opts.check_protect {
            let _ = writeln!(s, "    if ({call} != 0) abort();");
        } else {
            let _ = writeln!(s, "    {call};");
        }
    }
    s.push_str("}\n");
    s
}

/// Rendu entête : une déclaration à liaison externe par fragment, types
/// recopiés tels quels, paramètres joints par `, ` dans l'ordre
/// d'enregistrement.
pub fn render_header(reg: &Registry) -> String {
    let mut s = String::from("#pragma once\n\n");
    for frag in reg.iter() {
        let _ = writeln!(s, "extern \"C\" auto {};", frag.signature());
    }
    s
}

/// Flux combiné : source, ligne sentinelle, entête. C'est la frontière de
/// processus du générateur (deux artefacts sur un seul canal).
pub fn render_combined(reg: &Registry, opts: &SourceOptions) -> String {
    format!("{}{SENTINEL}\n{}", render_source_with(reg, opts), render_header(reg))
}

/// Même arithmétique de masque que la routine de fixup générée :
/// arrondit `len` au multiple de page supérieur. `page_minus_one` est
/// `taille_de_page - 1` (la taille doit être une puissance de deux).
pub const fn round_to_page(len: usize, page_minus_one: usize) -> usize {
    (len + page_minus_one) & !page_minus_one
}
