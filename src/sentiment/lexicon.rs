//! Spanish sentiment lexicon for wine reviews.
//!
//! Entries are pre-normalized: lowercase, no accents. Gendered adjectives
//! appear in both forms because scoring is exact token membership, not
//! stemming.

pub const POSITIVE_WORDS: &[&str] = &[
    "excelente",
    "bueno",
    "buena",
    "increible",
    "delicioso",
    "deliciosa",
    "suave",
    "equilibrado",
    "equilibrada",
    "aromatico",
    "aromatica",
    "rico",
    "rica",
    "agradable",
    "elegante",
    "intenso",
    "intensa",
    "fresco",
    "fresca",
    "fino",
    "fina",
    "recomendable",
    "espectacular",
    "fantastico",
    "fantastica",
    "perfecto",
    "perfecta",
    "sorprendente",
    "impresionante",
    "encantador",
    "encantadora",
    "satisfecho",
    "satisfecha",
    "satisfactorio",
    "satisfactoria",
    "premium",
    "calidad",
    "maravilloso",
    "maravillosa",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "malo",
    "mala",
    "horrible",
    "terrible",
    "desagradable",
    "decepcionante",
    "aspero",
    "acido",
    "amargo",
    "amarga",
    "seco",
    "seca",
    "flojo",
    "floja",
    "aguado",
    "aguada",
    "insipido",
    "insipida",
    "ordinario",
    "ordinaria",
    "descompuesto",
    "descompuesta",
    "vinagre",
    "oxidado",
    "oxidada",
    "rancio",
    "rancia",
];

/// Words that amplify the sentiment of a nearby lexicon word.
pub const INTENSIFIERS: &[&str] = &[
    "muy",
    "super",
    "tan",
    "bastante",
    "realmente",
    "extremadamente",
    "verdaderamente",
    "increiblemente",
    "totalmente",
    "absolutamente",
    "completamente",
    "demasiado",
];

/// Words that flip the sign of a nearby lexicon word.
pub const NEGATORS: &[&str] = &["no", "nunca", "jamas", "ni", "tampoco", "apenas"];
