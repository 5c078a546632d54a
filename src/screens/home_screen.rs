use log::{debug, error, info};

use crate::i18n::LocaleContext;
use crate::models::prediction::PredictionResult;
use crate::screens::navigation::ScreenLifecycle;
use crate::services::media_service::{ImageRef, MediaPicker};
use crate::services::plant_api_service::PlantApi;
use crate::services::prompt_service::Prompter;

/// Diseases always listed at the bottom of the home screen.
pub const STATIC_DISEASES: [&str; 5] = [
    "anthracnose",
    "powderymildew",
    "bacterialcanker",
    "sootymould",
    "dieback",
];

const DEFAULT_DISEASE: &str = "anthracnose";
const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyseOutcome {
    NoImage,
    Diagnosed,
    Failed,
    /// The screen was left before the response arrived.
    Discarded,
}

/// Capture/predict screen.
pub struct HomeScreen {
    lifecycle: ScreenLifecycle,
    image: Option<ImageRef>,
    prediction: Option<PredictionResult>,
    selected_disease: String,
    loading: bool,
}

impl HomeScreen {
    pub fn new(lifecycle: ScreenLifecycle) -> HomeScreen {
        HomeScreen {
            lifecycle,
            image: None,
            prediction: None,
            selected_disease: DEFAULT_DISEASE.to_string(),
            loading: false,
        }
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn selected_disease(&self) -> &str {
        &self.selected_disease
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn on_mount(&mut self) {
        self.loading = false;
    }

    pub async fn pick_image(&mut self, picker: &dyn MediaPicker) -> bool {
        let token = self.lifecycle.token();
        let picked = picker.pick_from_library().await;

        match picked {
            Some(image) if token.is_current() => {
                self.select_image(image);
                true
            }
            _ => false,
        }
    }

    pub async fn take_photo(&mut self, picker: &dyn MediaPicker) -> bool {
        let token = self.lifecycle.token();
        let captured = picker.take_photo().await;

        match captured {
            Some(image) if token.is_current() => {
                self.select_image(image);
                true
            }
            _ => false,
        }
    }

    fn select_image(&mut self, image: ImageRef) {
        info!("Selected image {}", image);
        self.prediction = None;
        self.image = Some(image);
    }

    pub fn remove_image(&mut self) {
        self.image = None;
        self.prediction = None;
    }

    /// Submits the selected image. Any failure ends in a single generic alert.
    pub async fn analyse(
        &mut self,
        api: &dyn PlantApi,
        prompter: &dyn Prompter,
        locale: &LocaleContext,
    ) -> AnalyseOutcome {
        let image = match &self.image {
            Some(image) => image.clone(),
            None => return AnalyseOutcome::NoImage,
        };

        let token = self.lifecycle.token();
        self.loading = true;

        let result = api.predict(&image).await;

        if !token.is_current() {
            debug!("Discard prediction for {}, home screen was left", image);
            return AnalyseOutcome::Discarded;
        }

        self.loading = false;

        match result {
            Ok(prediction) => {
                info!(
                    "Predicted {} with confidence {}",
                    prediction.label, prediction.confidence
                );
                self.selected_disease = prediction.label_key();
                self.prediction = Some(prediction);
                self.image = None;
                AnalyseOutcome::Diagnosed
            }
            Err(err) => {
                error!("Error while analysing {}: {:#}", image, err);
                prompter.alert("", &locale.t("alerts.apiError"));
                AnalyseOutcome::Failed
            }
        }
    }

    pub fn render(&self, locale: &LocaleContext) -> String {
        let mut lines = vec![
            locale.t("home.title"),
            locale.t("home.uploadPrompt"),
            format!(
                "  [{}]  {}  [{}]",
                locale.t("buttons.upload"),
                locale.t("home.or"),
                locale.t("buttons.camera")
            ),
        ];

        if let Some(image) = &self.image {
            lines.push(String::new());
            lines.push(format!("{}: {}", locale.t("home.selectedImage"), image));
            lines.push(format!(
                "  [{}]  [{}]",
                locale.t("home.Remove"),
                locale.t("buttons.analyse")
            ));
        }

        if self.loading {
            lines.push(locale.t("home.analysing"));
        }

        if let Some(prediction) = &self.prediction {
            lines.push(String::new());
            lines.extend(render_prediction(prediction, locale));
        }

        lines.push(String::new());
        lines.push(format!("== {} ==", locale.t("home.diseaseInfo")));
        for key in STATIC_DISEASES {
            lines.push(locale.t(&format!("home.{}", key)));
            lines.push(format!("  {}", disease_description(key, locale)));
        }

        lines.join("\n")
    }
}

fn disease_description(key: &str, locale: &LocaleContext) -> String {
    locale.t_or(&format!("diseases.{}", key), NO_DESCRIPTION)
}

fn render_prediction(prediction: &PredictionResult, locale: &LocaleContext) -> Vec<String> {
    let key = prediction.label_key();

    let mut lines = vec![
        format!("== {} ==", locale.t("home.predictedDisease")),
        locale.t_or(&format!("home.{}", key), &prediction.label),
        format!("{}: {}", locale.t("home.Confidence"), prediction.confidence),
        locale.t("home.confidenceBreakdown"),
    ];

    for (class, score) in prediction.breakdown_by_score() {
        lines.push(format!(
            "  * {}: {}",
            locale.t_or(&format!("preddata.{}", class), class),
            score
        ));
    }

    lines.push(locale.t("home.diseaseInfo"));
    lines.push(disease_description(&key, locale));

    lines
}

#[cfg(test)]
mod tests {
    use super::{AnalyseOutcome, HomeScreen};
    use crate::i18n::{Catalog, LocaleContext};
    use crate::models::confidence::Percent;
    use crate::models::language::Language;
    use crate::models::prediction::decode_prediction;
    use crate::screens::navigation::ScreenLifecycle;
    use crate::services::media_service::tests::FakeMediaPicker;
    use crate::services::media_service::ImageRef;
    use crate::services::plant_api_service::tests::FakePlantApi;
    use crate::services::prompt_service::tests::ScriptedPrompter;
    use std::sync::Arc;

    const MILDEW: &str = r#"[{"success": true, "prediction": {
        "label": "Powdery Mildew",
        "confidence": 87.5,
        "confidence_breakdown": {"Powdery Mildew": 87.5, "Healthy": 12.5}
    }}]"#;

    fn english() -> LocaleContext {
        LocaleContext::new(Arc::new(Catalog::bundled().unwrap()), Language::En)
    }

    fn mounted_screen() -> (HomeScreen, ScreenLifecycle) {
        let lifecycle = ScreenLifecycle::default();
        lifecycle.mount();
        (HomeScreen::new(lifecycle.clone()), lifecycle)
    }

    fn leaf() -> ImageRef {
        ImageRef::new("/photos/leaf.jpg")
    }

    #[tokio::test]
    async fn pick_image_clears_previous_prediction() {
        let (mut screen, _) = mounted_screen();
        screen.prediction = Some(decode_prediction(MILDEW).unwrap());

        let picker = FakeMediaPicker {
            library: Some(leaf()),
            ..FakeMediaPicker::default()
        };

        assert!(screen.pick_image(&picker).await);
        assert_eq!(screen.image(), Some(&leaf()));
        assert!(screen.prediction().is_none());
    }

    #[tokio::test]
    async fn cancelled_capture_keeps_state() {
        let (mut screen, _) = mounted_screen();
        screen.image = Some(leaf());

        assert!(!screen.take_photo(&FakeMediaPicker::default()).await);
        assert_eq!(screen.image(), Some(&leaf()));
    }

    #[tokio::test]
    async fn successful_analysis_sets_prediction_and_clears_image() {
        let (mut screen, _) = mounted_screen();
        screen.image = Some(leaf());
        let api = FakePlantApi {
            predict_body: Some(MILDEW.to_string()),
            ..FakePlantApi::default()
        };
        let prompter = ScriptedPrompter::default();

        let outcome = screen.analyse(&api, &prompter, &english()).await;

        assert_eq!(outcome, AnalyseOutcome::Diagnosed);
        assert_eq!(api.calls(), vec!["POST predict/ leaf.jpg".to_string()]);
        assert_eq!(screen.prediction().unwrap().confidence, Percent(87.5));
        assert_eq!(screen.selected_disease(), "powderymildew");
        assert!(screen.image().is_none());
        assert!(!screen.is_loading());
        assert!(prompter.alerts().is_empty());
    }

    #[tokio::test]
    async fn missing_label_alerts_and_keeps_state() {
        let (mut screen, _) = mounted_screen();
        screen.image = Some(leaf());
        let api = FakePlantApi {
            predict_body: Some(r#"{"prediction": {"label": null, "confidence": 40.0}}"#.to_string()),
            ..FakePlantApi::default()
        };
        let prompter = ScriptedPrompter::default();

        let outcome = screen.analyse(&api, &prompter, &english()).await;

        assert_eq!(outcome, AnalyseOutcome::Failed);
        assert!(screen.prediction().is_none());
        assert_eq!(screen.image(), Some(&leaf()));
        assert_eq!(screen.selected_disease(), "anthracnose");
        assert!(!screen.is_loading());
        assert_eq!(
            prompter.alerts(),
            vec![(
                String::new(),
                "Could not analyse the image. Please try again.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn transport_failure_shows_the_same_alert() {
        let (mut screen, _) = mounted_screen();
        screen.image = Some(leaf());
        let prompter = ScriptedPrompter::default();

        let outcome = screen
            .analyse(&FakePlantApi::default(), &prompter, &english())
            .await;

        assert_eq!(outcome, AnalyseOutcome::Failed);
        assert_eq!(prompter.alerts().len(), 1);
    }

    #[tokio::test]
    async fn analyse_without_image_does_nothing() {
        let (mut screen, _) = mounted_screen();
        let api = FakePlantApi::default();

        let outcome = screen
            .analyse(&api, &ScriptedPrompter::default(), &english())
            .await;

        assert_eq!(outcome, AnalyseOutcome::NoImage);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn response_after_leaving_screen_is_discarded() {
        let (mut screen, lifecycle) = mounted_screen();
        screen.image = Some(leaf());
        let api = FakePlantApi {
            predict_body: Some(MILDEW.to_string()),
            leave_during_request: Some(lifecycle),
            ..FakePlantApi::default()
        };
        let prompter = ScriptedPrompter::default();

        let outcome = screen.analyse(&api, &prompter, &english()).await;

        assert_eq!(outcome, AnalyseOutcome::Discarded);
        assert!(screen.prediction().is_none());
        assert_eq!(screen.image(), Some(&leaf()));
        assert!(prompter.alerts().is_empty());
    }

    #[tokio::test]
    async fn render_prediction_with_two_decimal_confidence() {
        let (mut screen, _) = mounted_screen();
        screen.prediction = Some(decode_prediction(MILDEW).unwrap());

        let text = screen.render(&english());

        assert!(text.contains("Powdery Mildew\nConfidence: 87.50%"));
        assert!(text.contains("  * Powdery Mildew: 87.50%\n  * Healthy: 12.50%"));
        assert!(text.contains("White powdery fungal spots"));
    }

    #[test]
    fn unknown_label_renders_raw_name_and_default_description() {
        let (mut screen, _) = mounted_screen();
        screen.prediction = Some(
            decode_prediction(r#"{"prediction": {"label": "Leaf Blight", "confidence": 61.0}}"#)
                .unwrap(),
        );

        let text = screen.render(&english());

        assert!(text.contains("Leaf Blight\nConfidence: 61.00%"));
        assert!(text.contains("No description available."));
    }

    #[test]
    fn remove_image_clears_everything() {
        let (mut screen, _) = mounted_screen();
        screen.image = Some(leaf());
        screen.prediction = Some(decode_prediction(MILDEW).unwrap());

        screen.remove_image();

        assert!(screen.image().is_none());
        assert!(screen.prediction().is_none());
    }
}
