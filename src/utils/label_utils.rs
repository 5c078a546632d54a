use regex::Regex;
use std::sync::OnceLock;

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Lower-cases a disease label and strips all whitespace, e.g.
/// `Powdery Mildew` becomes `powderymildew`.
pub fn normalize_label(label: &str) -> String {
    whitespace()
        .replace_all(&label.to_lowercase(), "")
        .into_owned()
}
