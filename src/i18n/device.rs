use log::debug;
use regex::Regex;
use std::env;
use std::sync::OnceLock;

use crate::models::language::Language;

const LOCALE_VARIABLES: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

fn language_subtag() -> &'static Regex {
    static SUBTAG: OnceLock<Regex> = OnceLock::new();
    SUBTAG.get_or_init(|| Regex::new(r"^([A-Za-z]{2,3})(?:[_\-.@]|$)").unwrap())
}

/// Language code reported by the environment, e.g. `hi` for `hi_IN.UTF-8`.
pub fn detect_device_language() -> Option<String> {
    LOCALE_VARIABLES
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| language_code(&value))
}

/// Extracts the leading language subtag of a POSIX or BCP 47 locale name.
pub fn language_code(locale: &str) -> Option<String> {
    language_subtag()
        .captures(locale.trim())
        .map(|captures| captures[1].to_lowercase())
}

/// Startup language: the device language when supported, else the fallback.
pub fn resolve_language(device_code: Option<&str>) -> Language {
    match device_code.and_then(Language::from_code) {
        Some(language) => language,
        None => {
            debug!(
                "Device language {:?} is not supported, using {}",
                device_code,
                Language::FALLBACK
            );
            Language::FALLBACK
        }
    }
}
