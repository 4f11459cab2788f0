//! Normalisation des noms de barangays
//!
//! Les noms issus du GeoJSON des limites administratives sont parfois lus en
//! Windows-1252 alors qu'ils sont encodés en UTF-8 (`"Ã±"` au lieu de `"ñ"`).

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;

/// Répare un texte UTF-8 décodé à tort en Windows-1252
///
/// Le texte est ré-encodé en Windows-1252 puis relu en UTF-8. Si l'aller-retour
/// échoue, le texte d'origine est retourné tel quel.
pub fn fix_encoding(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| c == 'Ã' || c == 'Â') {
        return Cow::Borrowed(text);
    }

    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    if had_errors {
        return Cow::Borrowed(text);
    }

    match String::from_utf8(bytes.into_owned()) {
        Ok(fixed) => Cow::Owned(fixed),
        Err(_) => Cow::Borrowed(text),
    }
}

/// Clé de comparaison : encodage réparé, minuscules, espaces normalisés
pub fn normalize_name(name: &str) -> String {
    fix_encoding(name)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_encoding() {
        assert_eq!(fix_encoding("BolilaÃ±o"), "Bolilaño");
        assert_eq!(fix_encoding("San JosÃ©"), "San José");
        assert_eq!(fix_encoding("Tabuc Suba"), "Tabuc Suba");
        // Déjà correct : rien à faire
        assert_eq!(fix_encoding("Bolilaño"), "Bolilaño");
    }

    #[test]
    fn test_fix_encoding_borrowed_when_clean() {
        assert!(matches!(fix_encoding("Lapuz"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  San   Jose "), "san jose");
        assert_eq!(normalize_name("SAN JOSÃ‰"), "san josé");
    }
}
