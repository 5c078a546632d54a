use crate::i18n::LocaleContext;

/// Diseases covered by the fact cards, in display order.
pub const LEARN_DISEASES: [&str; 5] = [
    "powderymildew",
    "anthracnose",
    "bacterialcanker",
    "sootymould",
    "dieback",
];

/// Static fact cards; at most one is expanded at a time.
#[derive(Debug, Default)]
pub struct LearnScreen {
    expanded: Option<usize>,
}

impl LearnScreen {
    pub fn new() -> LearnScreen {
        LearnScreen::default()
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Expands card `index`, or collapses it when it is already expanded.
    /// Out-of-range indexes are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= LEARN_DISEASES.len() {
            return;
        }

        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn render(&self, locale: &LocaleContext) -> String {
        let mut lines = vec![locale.t("learn.title")];

        for (index, key) in LEARN_DISEASES.iter().enumerate() {
            let expanded = self.expanded == Some(index);

            lines.push(String::new());
            lines.push(format!("{}. {}", index + 1, locale.t(&format!("home.{}", key))));
            lines.push(format!(
                "   {}: {}",
                locale.t_or("learn.symptoms", "Symptoms"),
                locale.t(&format!("learn.{}.symptoms", key))
            ));
            lines.push(format!(
                "   {}: {}",
                locale.t_or("learn.treatment", "Treatment"),
                locale.t(&format!("learn.{}.treatment", key))
            ));

            if expanded {
                lines.push(format!(
                    "   {}: {}",
                    locale.t_or("learn.more", "More Info"),
                    locale.t(&format!("learn.{}.more", key))
                ));
                lines.push(format!("   {}", locale.t_or("learn.hideDetails", "Hide details ▲")));
            } else {
                lines.push(format!("   {}", locale.t_or("learn.showMore", "Show more ▼")));
            }
        }

        lines.join("\n")
    }
}
