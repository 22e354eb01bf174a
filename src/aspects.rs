//! Aspect detection: does a comment discuss aroma, price or shipping?
//!
//! Unanchored substring containment against fixed Spanish keyword lists, run
//! over the normalized comment. Substring (rather than word-boundary)
//! matching is deliberate: the stems catch suffixed forms ("aromatico",
//! "rapidisimo") at the cost of some precision. The lists are public so the
//! trade-off stays tunable.

use serde::Serialize;

use crate::sentiment::normalize;

pub const AROMA_TERMS: &[&str] = &[
    "aroma",
    "aromatico",
    "aromatica",
    "olor",
    "fragancia",
    "bouquet",
    "nariz",
    "perfume",
    "esencia",
    "frutado",
    "floral",
    "especiado",
];

pub const PRICE_TERMS: &[&str] = &[
    "precio",
    "barato",
    "economico",
    "accesible",
    "vale",
    "cuesta",
    "relacion",
    "calidad precio",
    "precio calidad",
    "caro",
    "costoso",
    "inversion",
    "dinero",
    "pesos",
];

pub const SHIPPING_TERMS: &[&str] = &[
    "envio",
    "entrega",
    "llego",
    "rapido",
    "tiempo",
    "demora",
    "shipping",
    "delivery",
    "recibi",
    "tardo",
];

/// Which product-quality dimensions a comment (or set of comments) touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AspectFlags {
    pub aroma: bool,
    pub price: bool,
    pub shipping: bool,
}

impl AspectFlags {
    pub fn union(self, other: Self) -> Self {
        Self {
            aroma: self.aroma || other.aroma,
            price: self.price || other.price,
            shipping: self.shipping || other.shipping,
        }
    }
}

/// Detect aspects in one comment. Empty or blank input yields all-false.
pub fn detect(text: &str) -> AspectFlags {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return AspectFlags::default();
    }

    AspectFlags {
        aroma: contains_any(&normalized, AROMA_TERMS),
        price: contains_any(&normalized, PRICE_TERMS),
        shipping: contains_any(&normalized, SHIPPING_TERMS),
    }
}

/// OR of per-comment detections across a product's comments.
pub fn detect_all<'a>(comments: impl IntoIterator<Item = &'a str>) -> AspectFlags {
    comments
        .into_iter()
        .map(detect)
        .fold(AspectFlags::default(), AspectFlags::union)
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_shipping_and_aroma() {
        let flags = detect("llegó en 2 días, buen aroma");
        assert!(flags.aroma);
        assert!(flags.shipping);
        assert!(!flags.price);
    }

    #[test]
    fn substring_matching_catches_suffixed_forms() {
        assert!(detect("muy aromatico este malbec").aroma);
        // "precio" matches inside "precioso"; recall over precision
        assert!(detect("un vino precioso").price);
    }

    #[test]
    fn accents_are_normalized_before_matching() {
        assert!(detect("el envío fue rápido").shipping);
        assert!(detect("ECONÓMICO y rico").price);
    }

    #[test]
    fn empty_input_is_all_false() {
        assert_eq!(detect(""), AspectFlags::default());
        assert_eq!(detect("   "), AspectFlags::default());
    }

    #[test]
    fn union_ors_across_comments() {
        let flags = detect_all(["buen aroma", "precio justo", "sin comentarios"]);
        assert!(flags.aroma);
        assert!(flags.price);
        assert!(!flags.shipping);
    }
}
