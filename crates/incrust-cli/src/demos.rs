//! demos.rs — Fragments de démonstration, pré-assemblés.
//!
//! Le cœur traite le code machine comme un blob opaque fourni par un
//! assembleur externe ; ici, deux blobs x86-64 (SysV) figés servent de
//! charge utile de démonstration. `Prebuilt` joue le rôle du collaborateur
//! assembleur : des octets finis, rien d'autre.

use incrust_core::{Assembled, Registry};

/// Blob déjà assemblé : l'implémentation minimale du collaborateur.
pub struct Prebuilt(pub &'static [u8]);

impl Assembled for Prebuilt {
    fn bytes(&self) -> &[u8] {
        self.0
    }
}

/// `example() -> int` :
/// ```asm
/// mov eax, 114514
/// ret
/// ```
pub const EXAMPLE_CODE: &[u8] = &[0xb8, 0x52, 0xbf, 0x01, 0x00, 0xc3];

/// `add(int *dst, int *src, int n)` — additionne `src` dans `dst`,
/// élément par élément :
/// ```asm
///     mov eax, 0
///     jmp .check
/// .body:
///     movsxd rcx, eax
///     mov r8d, dword [rsi + rcx*4]
///     add dword [rdi + rcx*4], r8d
///     add eax, 1
/// .check:
///     cmp eax, edx
///     jl .body
///     ret
/// ```
pub const ADD_CODE: &[u8] = &[
    0xb8, 0x00, 0x00, 0x00, 0x00, 0xeb, 0x0e, 0x48, 0x63, 0xc8, 0x44, 0x8b, 0x04, 0x8e, 0x44,
    0x01, 0x04, 0x8f, 0x83, 0xc0, 0x01, 0x39, 0xd0, 0x7c, 0xee, 0xc3,
];

/// Registre contenant les deux fragments de démonstration.
pub fn demo_registry() -> Registry {
    let mut reg = Registry::new();
    reg.append_assembled("example", "int", Vec::<String>::new(), &Prebuilt(EXAMPLE_CODE));
    reg.append_assembled("add", "void", ["int *", "int *", "int"], &Prebuilt(ADD_CODE));
    reg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_registry_holds_both_fragments() {
        let reg = demo_registry();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("example").unwrap().code, EXAMPLE_CODE);
        let add = reg.get("add").unwrap();
        assert_eq!(add.code.len(), 26);
        assert_eq!(add.signature(), "add(int *, int *, int) -> void");
    }
}
