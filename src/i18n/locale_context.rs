use std::sync::Arc;

use crate::i18n::catalog::Catalog;
use crate::models::language::Language;

/// Active display language plus the string tables. Switching language
/// produces a new context; an existing one never changes.
#[derive(Debug, Clone)]
pub struct LocaleContext {
    language: Language,
    catalog: Arc<Catalog>,
}

impl LocaleContext {
    pub fn new(catalog: Arc<Catalog>, language: Language) -> LocaleContext {
        LocaleContext { language, catalog }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn with_language(&self, language: Language) -> LocaleContext {
        LocaleContext {
            language,
            catalog: Arc::clone(&self.catalog),
        }
    }

    /// Translated text for `key`, or the key itself when no table has it.
    pub fn t(&self, key: &str) -> String {
        self.catalog
            .resolve(self.language, key)
            .unwrap_or(key)
            .to_string()
    }

    /// Translated text for `key`, or `default` when no table has it.
    pub fn t_or(&self, key: &str, default: &str) -> String {
        self.catalog
            .resolve(self.language, key)
            .unwrap_or(default)
            .to_string()
    }
}
