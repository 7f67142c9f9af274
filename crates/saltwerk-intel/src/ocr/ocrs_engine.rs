// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `ocrs`-backed OCR engine.
//
// `ocrs` is a pure-Rust OCR engine backed by neural network models executed
// via `rten`. Model loading is the expensive step, so `OcrsEngineFactory`
// loads both models once and every acquired `OcrsEngine` shares them.
// Recognition is CPU-bound and runs on tokio's blocking pool.
//
// # Model Setup
//
// Two model files are required:
//
// - **Detection model** (`text-detection.rten`) — locates text regions.
// - **Recognition model** (`text-recognition.rten`) — decodes characters.
//
// Running the `ocrs-cli` tool once downloads both into the default cache
// directory, `$XDG_CACHE_HOME/ocrs` (typically `~/.cache/ocrs`).
//
// # Confidence
//
// `ocrs` reports no score, so the transcript confidence is the percentage of
// detected text lines that decoded to non-empty text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use ocrs::{ImageSource as OcrsImageSource, OcrEngine as OcrsModels, OcrEngineParams};
use rten::Model;
use saltwerk_core::ImageSource;
use saltwerk_core::error::{Result, SaltError};
use tracing::{debug, info, instrument};

use super::{OcrEngine, OcrEngineFactory, Recognition};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Where to find the two `ocrs` model files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrsModelConfig {
    /// `.rten` model that finds word regions on the label.
    pub detection_model_path: PathBuf,
    /// `.rten` model that turns each text line into characters.
    pub recognition_model_path: PathBuf,
}

impl Default for OcrsModelConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrsModelConfig {
    /// Expect `text-detection.rten` and `text-recognition.rten` in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(SaltError::EngineUnavailable(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Loads the `ocrs` models once and hands out engines that share them.
pub struct OcrsEngineFactory {
    models: Arc<OcrsModels>,
}

impl OcrsEngineFactory {
    /// Load both models from the paths in `config`.
    ///
    /// # Errors
    ///
    /// [`SaltError::EngineUnavailable`] if a model file is missing or corrupt.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrsModelConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading OCR detection model");
        let detection_model = load_model(&config.detection_model_path, "detection")?;

        info!("Loading OCR recognition model");
        let recognition_model = load_model(&config.recognition_model_path, "recognition")?;

        let models = OcrsModels::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            SaltError::EngineUnavailable(format!("failed to initialise OCR engine: {err}"))
        })?;

        info!("OCR engine initialised");
        Ok(Self {
            models: Arc::new(models),
        })
    }

    /// Load models from the default cache directory.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OcrsModelConfig::default())
    }

    /// Load models from `dir`.
    pub fn from_model_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(OcrsModelConfig::from_dir(dir))
    }
}

fn load_model(path: &Path, kind: &str) -> Result<Model> {
    Model::load_file(path).map_err(|err| {
        SaltError::EngineUnavailable(format!(
            "failed to load {kind} model from {}: {err}",
            path.display()
        ))
    })
}

#[async_trait]
impl OcrEngineFactory for OcrsEngineFactory {
    type Engine = OcrsEngine;

    async fn acquire(&self) -> Result<OcrsEngine> {
        Ok(OcrsEngine {
            models: Some(Arc::clone(&self.models)),
        })
    }
}

/// One acquired handle on the shared `ocrs` models.
pub struct OcrsEngine {
    models: Option<Arc<OcrsModels>>,
}

#[async_trait]
impl OcrEngine for OcrsEngine {
    async fn recognize(&mut self, source: &ImageSource) -> Result<Recognition> {
        let models = self
            .models
            .clone()
            .ok_or_else(|| SaltError::EngineUnavailable("OCR engine already released".into()))?;
        let source = source.clone();

        tokio::task::spawn_blocking(move || {
            let image = decode_image(&source)?;
            recognize_blocking(&models, &image)
        })
        .await
        .map_err(|err| SaltError::Ocr(format!("recognition task failed: {err}")))?
    }

    fn release(&mut self) {
        // A recognition abandoned by a timeout keeps its own handle until the
        // blocking task finishes.
        if self.models.take().is_some() {
            debug!("OCR engine handle released");
        }
    }
}

fn decode_image(source: &ImageSource) -> Result<DynamicImage> {
    match source {
        ImageSource::Path(path) => image::open(path).map_err(|err| {
            SaltError::ImageError(format!("failed to open {}: {err}", path.display()))
        }),
        ImageSource::Bytes(bytes) => image::load_from_memory(bytes)
            .map_err(|err| SaltError::ImageError(format!("failed to decode image bytes: {err}"))),
        ImageSource::Url(url) => Err(SaltError::UnsupportedSource(format!(
            "remote images are not fetched by the ocrs engine: {url}"
        ))),
    }
}

/// Detect, group and decode text lines.
fn recognize_blocking(models: &OcrsModels, image: &DynamicImage) -> Result<Recognition> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let source = OcrsImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
        SaltError::Ocr(format!("failed to create image source ({width}x{height}): {err}"))
    })?;

    let input = models
        .prepare_input(source)
        .map_err(|err| SaltError::Ocr(format!("OCR preprocessing failed: {err}")))?;

    let word_rects = models
        .detect_words(&input)
        .map_err(|err| SaltError::Ocr(format!("word detection failed: {err}")))?;
    let line_rects = models.find_text_lines(&input, &word_rects);

    let line_texts = models
        .recognize_text(&input, &line_rects)
        .map_err(|err| SaltError::Ocr(format!("line recognition failed: {err}")))?;

    let detected = line_texts.len();
    let lines: Vec<String> = line_texts
        .iter()
        .flatten()
        .map(|line| line.to_string())
        .filter(|text| !text.trim().is_empty())
        .collect();

    let confidence = if detected == 0 {
        0.0
    } else {
        lines.len() as f64 * 100.0 / detected as f64
    };
    debug!(
        words = word_rects.len(),
        detected_lines = detected,
        decoded_lines = lines.len(),
        "ocrs recognition complete"
    );

    Ok(Recognition {
        text: lines.join("\n"),
        confidence,
    })
}
