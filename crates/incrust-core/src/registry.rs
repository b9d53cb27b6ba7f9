//! registry.rs — Registre ordonné des fragments de code machine.
//!
//! Un `Fragment` = un symbole à incruster : nom, type de retour, types de
//! paramètres (textes recopiés tels quels dans l'entête générée) et les
//! octets finis du code. Le `Registry` est une séquence append-only qui
//! préserve l'ordre d'insertion — cet ordre ne pilote que l'ordre de
//! sortie des émetteurs, jamais la sémantique.
//!
//! `append` ne valide rien : nom vide, collision de noms ou type textuel
//! bancal sont acceptés et n'échouent qu'en aval, à la compilation du
//! texte généré.

/// Interface du collaborateur assembleur : une séquence d'instructions
/// déjà finalisée, exposée comme un blob d'octets opaque. Le cœur n'en
/// inspecte jamais le contenu.
pub trait Assembled {
    /// Octets finis du fragment.
    fn bytes(&self) -> &[u8];

    /// Taille du blob.
    fn size(&self) -> usize {
        self.bytes().len()
    }
}

/// Un fragment enregistré. Tous les champs sont figés après `append`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fragment {
    /// Nom du symbole, recopié tel quel (doit être un identifiant C valide
    /// et unique — non vérifié ici).
    pub name: String,
    /// Type de retour, texte libre recopié tel quel.
    pub result_type: String,
    /// Types des paramètres formels, dans l'ordre d'appel.
    pub params: Vec<String>,
    /// Code machine fini. Buffer possédé, copié à l'enregistrement,
    /// longueur nulle légale.
    pub code: Vec<u8>,
}

impl Fragment {
    /// Signature lisible : `name(p1, p2) -> res`.
    pub fn signature(&self) -> String {
        format!("{}({}) -> {}", self.name, self.params.join(", "), self.result_type)
    }
}

/// Collection ordonnée de fragments. Créée vide, grossit par `append`,
/// lue (autant de fois qu'on veut) par les émetteurs.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    fragments: Vec<Fragment>,
}

impl Registry {
    pub fn new() -> Self {
        Self { fragments: Vec::new() }
    }

    /// Ajoute un fragment en fin de séquence. Infaillible : aucune
    /// contrainte n'est vérifiée ici.
    pub fn append<I, S>(
        &mut self,
        name: impl Into<String>,
        result_type: impl Into<String>,
        params: I,
        code: Vec<u8>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.push(Fragment {
            name: name.into(),
            result_type: result_type.into(),
            params: params.into_iter().map(Into::into).collect(),
            code,
        });
    }

    /// Variante passant par le collaborateur assembleur : les octets sont
    /// copiés une fois ici, aucun aliasing avec le buffer interne de
    /// l'assembleur ensuite.
    pub fn append_assembled<I, S>(
        &mut self,
        name: impl Into<String>,
        result_type: impl Into<String>,
        params: I,
        assembled: &dyn Assembled,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.append(name, result_type, params, assembled.bytes().to_vec());
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Parcours en ordre d'insertion.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Premier fragment portant ce nom (les doublons sont un bug de
    /// l'appelant, voir doc de module).
    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.name == name)
    }
}
