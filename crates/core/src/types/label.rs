/// Keeps only characters from space (U+0020) up to `»` (U+00BB)
///
/// Game descriptions in existing list files were produced with this exact
/// range, so it is kept literal rather than locale aware.
pub fn label_cleanup(value: &str) -> String {
    value.chars().filter(|c| (' '..='»').contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_printable_latin() {
        assert_eq!(label_cleanup("Pac-Man (Midway)"), "Pac-Man (Midway)");
        assert_eq!(label_cleanup("«Street» Fighter"), "«Street» Fighter");
    }

    #[test]
    fn test_drops_control_and_high_characters() {
        assert_eq!(label_cleanup("Tab\there\n"), "Tabhere");
        assert_eq!(label_cleanup("Déjà vu"), "Dj vu");
        assert_eq!(label_cleanup("ストリート"), "");
    }
}
