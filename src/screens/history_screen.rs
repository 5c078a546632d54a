use log::{debug, error, info, warn};

use crate::i18n::LocaleContext;
use crate::models::history_record::HistoryRecord;
use crate::screens::navigation::ScreenLifecycle;
use crate::services::plant_api_service::{DeleteStatus, PlantApi};
use crate::services::prompt_service::Prompter;
use crate::utils::format_utils::format_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(usize),
    Failed,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Rejected,
    Failed,
    Discarded,
}

/// Server-held list of past predictions.
pub struct HistoryScreen {
    lifecycle: ScreenLifecycle,
    records: Vec<HistoryRecord>,
    loading: bool,
}

impl HistoryScreen {
    pub fn new(lifecycle: ScreenLifecycle) -> HistoryScreen {
        HistoryScreen {
            lifecycle,
            records: Vec::new(),
            loading: true,
        }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn on_mount(&mut self) {
        self.loading = true;
    }

    /// Replaces the list with the server's. Failures are logged and leave
    /// an empty list.
    pub async fn fetch_history(&mut self, api: &dyn PlantApi) -> FetchOutcome {
        let token = self.lifecycle.token();
        self.loading = true;

        let result = api.fetch_history().await;

        if !token.is_current() {
            debug!("Discard history response, history screen was left");
            return FetchOutcome::Discarded;
        }

        self.loading = false;

        match result {
            Ok(records) => {
                info!("Loaded {} history records", records.len());
                self.records = records;
                FetchOutcome::Loaded(self.records.len())
            }
            Err(err) => {
                error!("Error fetching history: {:#}", err);
                self.records.clear();
                FetchOutcome::Failed
            }
        }
    }

    /// Deletes one record after confirmation. The local copy is only
    /// removed once the server reports success.
    pub async fn delete_record(
        &mut self,
        id: &str,
        api: &dyn PlantApi,
        prompter: &dyn Prompter,
        locale: &LocaleContext,
    ) -> DeleteOutcome {
        let confirmed = prompter.confirm(
            &locale.t("history.confirmTitle"),
            &locale.t("history.confirmMessage"),
            &locale.t("history.cancel"),
            &locale.t("history.delete"),
        );

        if !confirmed {
            return DeleteOutcome::Cancelled;
        }

        let token = self.lifecycle.token();
        let result = api.delete_history(id).await;

        if !token.is_current() {
            debug!("Discard delete response for {}, history screen was left", id);
            return DeleteOutcome::Discarded;
        }

        match result {
            Ok(DeleteStatus::Deleted) => {
                self.records.retain(|record| record.id != id);
                DeleteOutcome::Deleted
            }
            Ok(DeleteStatus::Rejected(status)) => {
                warn!("Server refused to delete record {}, status {}", id, status);
                prompter.alert(
                    &locale.t("history.errorTitle"),
                    &locale.t("history.deleteFailed"),
                );
                DeleteOutcome::Rejected
            }
            Err(err) => {
                error!("Delete error: {:#}", err);
                prompter.alert(
                    &locale.t("history.errorTitle"),
                    &locale.t("history.deleteError"),
                );
                DeleteOutcome::Failed
            }
        }
    }

    pub fn render(&self, locale: &LocaleContext) -> String {
        let mut lines = vec![locale.t("history.title")];

        if self.loading {
            lines.push(locale.t("history.loading"));
        } else if self.records.is_empty() {
            lines.push(locale.t("history.message"));
        } else {
            for record in &self.records {
                lines.push(String::new());
                lines.push(format!(
                    "#{} {}: {}",
                    record.id,
                    locale.t("home.predictedDisease"),
                    record.predicted_disease
                ));
                lines.push(format!(
                    "   {}: {}",
                    locale.t("home.Confidence"),
                    record.confidence
                ));
                lines.push(format!("   {}", format_timestamp(&record.timestamp)));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::{DeleteOutcome, FetchOutcome, HistoryScreen};
    use crate::i18n::{Catalog, LocaleContext};
    use crate::models::confidence::Fraction;
    use crate::models::history_record::HistoryRecord;
    use crate::models::language::Language;
    use crate::screens::navigation::ScreenLifecycle;
    use crate::services::plant_api_service::tests::FakePlantApi;
    use crate::services::plant_api_service::DeleteStatus;
    use crate::services::prompt_service::tests::ScriptedPrompter;
    use std::sync::Arc;

    fn english() -> LocaleContext {
        LocaleContext::new(Arc::new(Catalog::bundled().unwrap()), Language::En)
    }

    fn record(id: &str, disease: &str, confidence: f64) -> HistoryRecord {
        HistoryRecord {
            id: id.to_string(),
            predicted_disease: disease.to_string(),
            confidence: Fraction(confidence),
            timestamp: "2025-07-07T04:22:51+00:00".to_string(),
        }
    }

    fn loaded_screen() -> (HistoryScreen, ScreenLifecycle) {
        let lifecycle = ScreenLifecycle::default();
        lifecycle.mount();
        let mut screen = HistoryScreen::new(lifecycle.clone());
        screen.records = vec![record("1", "Anthracnose", 0.875), record("2", "Healthy", 0.5)];
        screen.loading = false;
        (screen, lifecycle)
    }

    #[tokio::test]
    async fn fetch_replaces_records() {
        let lifecycle = ScreenLifecycle::default();
        lifecycle.mount();
        let mut screen = HistoryScreen::new(lifecycle);
        let api = FakePlantApi {
            history: Some(vec![record("9", "Die Back", 0.7)]),
            ..FakePlantApi::default()
        };

        assert!(screen.is_loading());
        assert_eq!(screen.fetch_history(&api).await, FetchOutcome::Loaded(1));
        assert_eq!(screen.records()[0].id, "9");
        assert!(!screen.is_loading());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_empty_list_and_clears_loading() {
        let (mut screen, _) = loaded_screen();

        let outcome = screen.fetch_history(&FakePlantApi::default()).await;

        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(screen.records().is_empty());
        assert!(!screen.is_loading());
    }

    #[tokio::test]
    async fn confirmed_delete_removes_record_after_success() {
        let (mut screen, _) = loaded_screen();
        let api = FakePlantApi {
            delete_status: Some(DeleteStatus::Deleted),
            ..FakePlantApi::default()
        };
        let prompter = ScriptedPrompter::default().confirming(&[true]);

        let outcome = screen.delete_record("1", &api, &prompter, &english()).await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(screen.records(), &[record("2", "Healthy", 0.5)]);
        assert_eq!(api.calls(), vec!["DELETE history/delete/1/".to_string()]);
        assert_eq!(prompter.confirms(), vec!["Confirm Deletion".to_string()]);
        assert!(prompter.alerts().is_empty());
    }

    #[tokio::test]
    async fn rejected_delete_keeps_list_and_alerts() {
        let (mut screen, _) = loaded_screen();
        let before = screen.records().to_vec();
        let api = FakePlantApi {
            delete_status: Some(DeleteStatus::Rejected(404)),
            ..FakePlantApi::default()
        };
        let prompter = ScriptedPrompter::default().confirming(&[true]);

        let outcome = screen.delete_record("1", &api, &prompter, &english()).await;

        assert_eq!(outcome, DeleteOutcome::Rejected);
        assert_eq!(screen.records(), before.as_slice());
        assert_eq!(
            prompter.alerts(),
            vec![("Error".to_string(), "Failed to delete the record.".to_string())]
        );
    }

    #[tokio::test]
    async fn transport_failure_on_delete_keeps_list_and_alerts() {
        let (mut screen, _) = loaded_screen();
        let prompter = ScriptedPrompter::default().confirming(&[true]);

        let outcome = screen
            .delete_record("2", &FakePlantApi::default(), &prompter, &english())
            .await;

        assert_eq!(outcome, DeleteOutcome::Failed);
        assert_eq!(screen.records().len(), 2);
        assert_eq!(
            prompter.alerts(),
            vec![(
                "Error".to_string(),
                "An error occurred while deleting.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn cancelled_delete_sends_nothing() {
        let (mut screen, _) = loaded_screen();
        let api = FakePlantApi {
            delete_status: Some(DeleteStatus::Deleted),
            ..FakePlantApi::default()
        };
        let prompter = ScriptedPrompter::default().confirming(&[false]);

        let outcome = screen.delete_record("1", &api, &prompter, &english()).await;

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(api.calls().is_empty());
        assert_eq!(screen.records().len(), 2);
    }

    #[tokio::test]
    async fn delete_after_leaving_screen_is_discarded() {
        let (mut screen, lifecycle) = loaded_screen();
        let api = FakePlantApi {
            delete_status: Some(DeleteStatus::Deleted),
            leave_during_request: Some(lifecycle),
            ..FakePlantApi::default()
        };
        let prompter = ScriptedPrompter::default().confirming(&[true]);

        let outcome = screen.delete_record("1", &api, &prompter, &english()).await;

        assert_eq!(outcome, DeleteOutcome::Discarded);
        assert_eq!(screen.records().len(), 2);
    }

    #[test]
    fn render_scales_history_confidence() {
        let (screen, _) = loaded_screen();

        let text = screen.render(&english());

        assert!(text.contains("#1 Predicted Disease: Anthracnose\n   Confidence: 87.50%"));
        assert!(text.contains("   Confidence: 50.00%"));
    }

    #[test]
    fn render_empty_and_loading_states() {
        let lifecycle = ScreenLifecycle::default();
        let mut screen = HistoryScreen::new(lifecycle);

        assert!(screen.render(&english()).contains("Loading..."));

        screen.loading = false;
        assert!(screen.render(&english()).contains("No predictions yet."));
    }
}
