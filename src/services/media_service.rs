use anyhow::{anyhow, Context, Error};
use async_trait::async_trait;
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;
use tokio::process::Command;

use crate::services::prompt_service::Prompter;

const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Reference to an image on local storage.
///
/// Captured photos own their temporary file, which is removed once the
/// last clone of the reference is dropped.
#[derive(Debug, Clone)]
pub struct ImageRef {
    pub path: PathBuf,
    owned: Option<Arc<TempPath>>,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> ImageRef {
        ImageRef {
            path: path.into(),
            owned: None,
        }
    }

    fn captured(temp: TempPath) -> ImageRef {
        ImageRef {
            path: temp.to_path_buf(),
            owned: Some(Arc::new(temp)),
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.owned.is_some()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.jpg".to_string())
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &ImageRef) -> bool {
        self.path == other.path
    }
}

impl Eq for ImageRef {}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Source of images. `None` means the user cancelled.
#[async_trait]
pub trait MediaPicker: Send + Sync {
    async fn pick_from_library(&self) -> Option<ImageRef>;

    async fn take_photo(&self) -> Option<ImageRef>;
}

/// Picks images from the filesystem and captures photos through an
/// external camera command.
pub struct DeviceMediaPicker<P: Prompter> {
    prompter: P,
    preselected: Option<PathBuf>,
    camera_command: Option<String>,
}

impl<P: Prompter> DeviceMediaPicker<P> {
    pub fn new(prompter: P, camera_command: Option<String>) -> DeviceMediaPicker<P> {
        DeviceMediaPicker {
            prompter,
            preselected: None,
            camera_command,
        }
    }

    /// Library picks return `path` instead of asking.
    pub fn with_preselected(mut self, path: Option<PathBuf>) -> DeviceMediaPicker<P> {
        self.preselected = path;
        self
    }

    async fn capture(&self, command: &str) -> Result<ImageRef, Error> {
        // Dropping `output` on any early return removes the file.
        let output = tempfile::Builder::new()
            .prefix("mango-detector-")
            .suffix(".jpg")
            .tempfile()
            .context("Failed to create a temporary photo file")?
            .into_temp_path();
        let command_line = command.replace(OUTPUT_PLACEHOLDER, &output.to_string_lossy());

        info!("Capture photo with: {}", command_line);

        let status = Command::new("sh")
            .arg("-c")
            .arg(&command_line)
            .status()
            .await?;

        if !status.success() {
            return Err(anyhow!("Camera command exited with {}", status));
        }

        let written = tokio::fs::metadata(&output)
            .await
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(anyhow!("Camera command produced no image"));
        }

        Ok(ImageRef::captured(output))
    }
}

fn existing_image(path: &Path) -> Option<ImageRef> {
    if path.is_file() {
        Some(ImageRef::new(path))
    } else {
        None
    }
}

#[async_trait]
impl<P: Prompter> MediaPicker for DeviceMediaPicker<P> {
    async fn pick_from_library(&self) -> Option<ImageRef> {
        let path = match &self.preselected {
            Some(path) => path.clone(),
            None => {
                let answer = self.prompter.ask("Image path")?;
                if answer.trim().is_empty() {
                    return None;
                }
                PathBuf::from(answer.trim())
            }
        };

        let image = existing_image(&path);
        if image.is_none() {
            warn!("No image file at {}", path.display());
        }

        image
    }

    async fn take_photo(&self) -> Option<ImageRef> {
        let command = match &self.camera_command {
            Some(command) => command,
            None => {
                warn!("No camera_command configured, photo capture cancelled");
                return None;
            }
        };

        match self.capture(command).await {
            Ok(image) => Some(image),
            Err(err) => {
                warn!("Photo capture failed: {:#}", err);
                None
            }
        }
    }
}
