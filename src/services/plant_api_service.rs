use anyhow::{anyhow, Context, Error};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;

use crate::models::history_record::HistoryRecord;
use crate::models::prediction::{decode_prediction, PredictionResult};
use crate::services::media_service::ImageRef;

const IMAGE_FIELD: &str = "image";
const IMAGE_MIME: &str = "image/jpeg";

/// Result of a delete call that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    Deleted,
    Rejected(u16),
}

/// Backend operations the screens depend on.
#[async_trait]
pub trait PlantApi: Send + Sync {
    async fn predict(&self, image: &ImageRef) -> Result<PredictionResult, Error>;

    async fn fetch_history(&self) -> Result<Vec<HistoryRecord>, Error>;

    async fn delete_history(&self, id: &str) -> Result<DeleteStatus, Error>;
}

pub struct PlantApiService {
    base_url: Url,
    client: reqwest::Client,
}

impl PlantApiService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<PlantApiService, Error> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid api_base_url {}", base_url))?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow!("api_base_url {} can't carry a path", base_url));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(PlantApiService { base_url, client })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// `{base}/history/delete/{id}/` with `id` encoded as a single path segment.
    pub fn delete_url(&self, id: &str) -> Result<Url, Error> {
        if matches!(id, "" | "." | "..") {
            return Err(anyhow!("Invalid history record id {:?}", id));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("api_base_url {} can't carry a path", self.base_url))?
            .pop_if_empty()
            .extend(["history", "delete", id, ""]);

        Ok(url)
    }
}

#[async_trait]
impl PlantApi for PlantApiService {
    async fn predict(&self, image: &ImageRef) -> Result<PredictionResult, Error> {
        let bytes = tokio::fs::read(&image.path)
            .await
            .with_context(|| format!("Failed to read image {}", image.path.display()))?;

        info!("Submit {} ({} bytes) for prediction", image, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(image.file_name())
            .mime_str(IMAGE_MIME)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let resp = self
            .client
            .post(self.endpoint("predict/"))
            .multipart(form)
            .send()
            .await?;

        debug!("Predict responded with status {}", resp.status());

        let body = resp.text().await?;
        decode_prediction(&body)
    }

    async fn fetch_history(&self) -> Result<Vec<HistoryRecord>, Error> {
        let resp = self.client.get(self.endpoint("history")).send().await?;

        if !resp.status().is_success() {
            return Err(anyhow!(
                "Failed to fetch history, status {}",
                resp.status()
            ));
        }

        let records = resp.json::<Vec<HistoryRecord>>().await?;
        debug!("Fetched {} history records", records.len());

        Ok(records)
    }

    async fn delete_history(&self, id: &str) -> Result<DeleteStatus, Error> {
        let url = self.delete_url(id)?;
        let resp = self.client.delete(url).send().await?;

        if resp.status().is_success() {
            info!("Deleted history record {}", id);
            Ok(DeleteStatus::Deleted)
        } else {
            Ok(DeleteStatus::Rejected(resp.status().as_u16()))
        }
    }
}
