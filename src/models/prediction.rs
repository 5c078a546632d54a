use anyhow::{anyhow, Context, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::confidence::Percent;
use crate::utils::label_utils::normalize_label;

/// Diagnosis for one submitted image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: String,
    pub confidence: Percent,
    pub confidence_breakdown: BTreeMap<String, Percent>,
}

impl PredictionResult {
    /// Key used for localized name and description lookups.
    pub fn label_key(&self) -> String {
        normalize_label(&self.label)
    }

    /// Breakdown entries, highest score first.
    pub fn breakdown_by_score(&self) -> Vec<(&str, Percent)> {
        let mut entries: Vec<(&str, Percent)> = self
            .confidence_breakdown
            .iter()
            .map(|(class, score)| (class.as_str(), *score))
            .collect();

        entries.sort_by(|a, b| b.1 .0.total_cmp(&a.1 .0));
        entries
    }
}

/// Body of the predict endpoint: either the envelope itself or a list
/// whose first element is the envelope. Elements after the first are
/// never decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Batch(Vec<serde_json::Value>),
    Single(PredictEnvelope),
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct PredictEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub prediction: Option<RawPrediction>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct RawPrediction {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub confidence_breakdown: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PredictResponse {
    pub fn into_envelope(self) -> Result<PredictEnvelope, Error> {
        match self {
            PredictResponse::Batch(items) => {
                let first = items
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow!("Predict response is an empty list"))?;

                serde_json::from_value(first)
                    .context("Predict response list does not start with a prediction")
            }
            PredictResponse::Single(envelope) => Ok(envelope),
        }
    }
}

/// Decodes a raw predict body into the canonical result.
pub fn decode_prediction(body: &str) -> Result<PredictionResult, Error> {
    let response: PredictResponse =
        serde_json::from_str(body).context("Predict response is not valid JSON")?;

    let envelope = response.into_envelope()?;

    let prediction = match envelope.prediction {
        Some(prediction) => prediction,
        None => {
            return Err(anyhow!(
                "Predict response has no prediction (server error: {})",
                envelope.error.as_deref().unwrap_or("none")
            ))
        }
    };

    let label = prediction
        .label
        .filter(|label| !label.is_empty())
        .ok_or_else(|| anyhow!("Predict response has no label"))?;

    let confidence = prediction
        .confidence
        .ok_or_else(|| anyhow!("Prediction {} has no confidence", label))?;

    let confidence_breakdown = prediction
        .confidence_breakdown
        .unwrap_or_default()
        .into_iter()
        .map(|(class, score)| (class, Percent(score)))
        .collect();

    Ok(PredictionResult {
        label,
        confidence: Percent(confidence),
        confidence_breakdown,
    })
}
