use anyhow::{Context, Error};
use serde_json::Value;
use std::collections::HashMap;

use crate::models::language::Language;

const EN: &str = include_str!("../../locales/en.json");
const HI: &str = include_str!("../../locales/hi.json");
const TA: &str = include_str!("../../locales/ta.json");
const TE: &str = include_str!("../../locales/te.json");

/// Nested key/string tables, one per language.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<Language, Value>,
}

impl Catalog {
    /// Tables compiled into the binary.
    pub fn bundled() -> Result<Catalog, Error> {
        let mut catalog = Catalog::default();

        for (language, source) in [
            (Language::En, EN),
            (Language::Hi, HI),
            (Language::Ta, TA),
            (Language::Te, TE),
        ] {
            catalog.insert_json(language, source)?;
        }

        Ok(catalog)
    }

    pub fn insert_json(&mut self, language: Language, source: &str) -> Result<(), Error> {
        let table: Value = serde_json::from_str(source)
            .with_context(|| format!("Invalid string table for {}", language))?;

        self.tables.insert(language, table);
        Ok(())
    }

    /// Looks up a dotted key path in one language only.
    pub fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        let mut node = self.tables.get(&language)?;

        for segment in key.split('.') {
            node = node.get(segment)?;
        }

        node.as_str()
    }

    /// Looks up `key` in `language`, then in the fallback language.
    pub fn resolve(&self, language: Language, key: &str) -> Option<&str> {
        self.lookup(language, key)
            .or_else(|| self.lookup(Language::FALLBACK, key))
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::models::language::Language;

    #[test]
    fn bundled_tables_parse() {
        let catalog = Catalog::bundled().unwrap();

        for language in Language::ALL {
            assert!(catalog.lookup(language, "settings.title").is_some());
        }
    }

    #[test]
    fn lookup_follows_dotted_path() {
        let catalog = Catalog::bundled().unwrap();

        assert_eq!(
            catalog.lookup(Language::En, "learn.anthracnose.treatment"),
            Some("Use copper-based fungicides.")
        );
        assert_eq!(
            catalog.lookup(Language::En, "preddata.Bacterial Canker"),
            Some("Bacterial Canker")
        );
    }

    #[test]
    fn non_string_nodes_are_not_values() {
        let catalog = Catalog::bundled().unwrap();

        assert_eq!(catalog.lookup(Language::En, "learn.anthracnose"), None);
        assert_eq!(catalog.lookup(Language::En, "home.title.extra"), None);
    }

    #[test]
    fn resolve_falls_back_to_english() {
        let catalog = Catalog::bundled().unwrap();

        assert_eq!(catalog.lookup(Language::Ta, "diseases.healthy"), None);
        assert_eq!(
            catalog.resolve(Language::Ta, "diseases.healthy"),
            catalog.lookup(Language::En, "diseases.healthy")
        );
        assert_eq!(catalog.resolve(Language::Hi, "buttons.camera"), Some("कैमरा"));
    }

    #[test]
    fn reject_invalid_table() {
        let mut catalog = Catalog::default();

        assert!(catalog.insert_json(Language::Hi, "{ not json").is_err());
    }
}
