//! Cite key generation
//!
//! Keys are `LastName` + `Year` ("Smith2024"). Collisions get letter
//! suffixes (Smith2024a, Smith2024b, ...) and then numeric ones.

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Issues cite keys that are unique within one export
#[derive(Debug, Default)]
pub struct CiteKeyGenerator {
    used: HashSet<String>,
}

impl CiteKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` has already been issued or reserved
    pub fn contains(&self, key: &str) -> bool {
        self.used.contains(key)
    }

    /// Register a key taken from an embedded citation
    pub fn reserve(&mut self, key: &str) {
        self.used.insert(key.to_string());
    }

    /// Generate a fresh key from an author's last name and a year
    pub fn generate(&mut self, last_name: &str, year: &str) -> String {
        let base = base_key(last_name, year);
        let key = make_unique(&base, &self.used);
        self.used.insert(key.clone());
        key
    }
}

/// `LastName` folded to ASCII letters ("Unknown" if nothing is left) + year ("NoYear" if empty)
pub fn base_key(last_name: &str, year: &str) -> String {
    let mut name: String = last_name.nfkd().filter(|c| c.is_ascii_alphabetic()).collect();
    if name.is_empty() {
        name = "Unknown".to_string();
    }
    let year = year.trim();
    if year.is_empty() {
        format!("{}NoYear", name)
    } else {
        format!("{}{}", name, year)
    }
}

fn make_unique(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }

    for suffix in 'a'..='z' {
        let candidate = format!("{}{}", base, suffix);
        if !used.contains(&candidate) {
            return candidate;
        }
    }

    (2..)
        .map(|n| format!("{}{}", base, n))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_key_ascii_fold() {
        assert_eq!(base_key("García", "2024"), "Garcia2024");
        assert_eq!(base_key("Müller-Lüdenscheidt", "2021"), "MullerLudenscheidt2021");
        assert_eq!(base_key("O'Brien", "1999"), "OBrien1999");
    }

    #[test]
    fn test_base_key_fallbacks() {
        assert_eq!(base_key("", ""), "UnknownNoYear");
        assert_eq!(base_key("王", "2020"), "Unknown2020");
    }

    #[test]
    fn test_generate_suffixes() {
        let mut keys = CiteKeyGenerator::new();
        assert_eq!(keys.generate("Smith", "2024"), "Smith2024");
        assert_eq!(keys.generate("Smith", "2024"), "Smith2024a");
        assert_eq!(keys.generate("Smith", "2024"), "Smith2024b");
        assert_eq!(keys.generate("Smith", "2023"), "Smith2023");
    }

    #[test]
    fn test_reserved_keys_are_skipped() {
        let mut keys = CiteKeyGenerator::new();
        keys.reserve("Smith2024");
        keys.reserve("Smith2024a");
        assert_eq!(keys.generate("Smith", "2024"), "Smith2024b");
        assert!(keys.contains("Smith2024b"));
    }

    #[test]
    fn test_numeric_after_letters() {
        let mut keys = CiteKeyGenerator::new();
        for _ in 0..27 {
            keys.generate("Doe", "2020");
        }
        assert!(keys.contains("Doe2020z"));
        assert_eq!(keys.generate("Doe", "2020"), "Doe20202");
    }
}
