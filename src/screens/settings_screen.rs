use log::info;

use crate::i18n::LocaleContext;
use crate::models::language::Language;
use crate::services::prompt_service::Prompter;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Language picker and app information.
#[derive(Debug)]
pub struct SettingsScreen {
    selected: Language,
}

impl SettingsScreen {
    pub fn new(current: Language) -> SettingsScreen {
        SettingsScreen { selected: current }
    }

    pub fn selected(&self) -> Language {
        self.selected
    }

    /// Returns the context that replaces `current`; nothing is persisted.
    pub fn change_language(
        &mut self,
        current: &LocaleContext,
        language: Language,
        prompter: &dyn Prompter,
    ) -> LocaleContext {
        info!("Change language {} -> {}", current.language(), language);

        self.selected = language;
        let next = current.with_language(language);

        prompter.alert(
            "✅",
            &format!(
                "{} {}",
                next.t("settings.languageChanged"),
                language.code().to_uppercase()
            ),
        );

        next
    }

    pub fn about(&self, prompter: &dyn Prompter, locale: &LocaleContext) {
        prompter.alert(
            &locale.t("about_title"),
            &format!(
                "{}\n{} {}\nBuilt with Rust, talking to the prediction service over HTTP",
                locale.t("app.name"),
                locale.t("version"),
                APP_VERSION
            ),
        );
    }

    pub fn render(&self, locale: &LocaleContext) -> String {
        let mut lines = vec![
            locale.t("settings.title"),
            String::new(),
            format!("{}:", locale.t("settings.language")),
        ];

        for language in Language::ALL {
            let marker = if language == self.selected { "(*)" } else { "( )" };
            lines.push(format!(
                "  {} {} [{}]",
                marker,
                language.native_name(),
                language.code()
            ));
        }

        lines.push(String::new());
        lines.push(locale.t("settings.about_app"));
        lines.push(format!("{}: {}", locale.t("version"), APP_VERSION));

        lines.join("\n")
    }
}
