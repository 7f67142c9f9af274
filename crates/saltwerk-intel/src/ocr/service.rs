// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Salt extraction pipeline.
//
// acquire engine -> recognise (with timeout) -> release -> select lines ->
// parse -> drop noise -> dedup by name (last wins) -> score -> OCR floor.
//
// Engine failures are never swallowed: the lease is released and the error
// goes back to the caller. "No salts found" is an `OcrResult` with an empty
// list, not an error.

use std::collections::HashMap;

use saltwerk_core::error::{Result, SaltError};
use saltwerk_core::{Confidence, ExtractedComponent, ImageSource, OcrResult, SaltConfig};
use tracing::{debug, info, instrument, warn};

use super::{EngineLease, OcrEngineFactory};
use crate::confidence::{apply_ocr_floor, rescore};
use crate::lines::relevant_lines;
use crate::parser::parse_composition;

/// Drives an OCR engine over label images and extracts salt components.
///
/// Holds no per-submission state; concurrent calls each acquire their own
/// engine from the factory.
///
/// # Example
///
/// ```rust,ignore
/// use saltwerk_core::{ImageSource, SaltConfig};
/// use saltwerk_intel::{OcrsEngineFactory, SaltOcrService};
///
/// let factory = OcrsEngineFactory::with_defaults()?;
/// let service = SaltOcrService::new(factory, SaltConfig::default());
/// let result = service.process_image(&ImageSource::Path("label.png".into())).await?;
/// for salt in &result.extracted_salts {
///     println!("{} {:?}{:?} {}", salt.name, salt.strength_value, salt.strength_unit, salt.confidence);
/// }
/// ```
pub struct SaltOcrService<F: OcrEngineFactory> {
    factory: F,
    config: SaltConfig,
}

impl<F: OcrEngineFactory> SaltOcrService<F> {
    pub fn new(factory: F, config: SaltConfig) -> Self {
        Self { factory, config }
    }

    /// Run the full pipeline over one image.
    ///
    /// # Errors
    ///
    /// - whatever the factory returns when acquisition fails
    /// - the engine's error when recognition fails
    /// - [`SaltError::OcrTimeout`] when recognition exceeds
    ///   `recognize_timeout_ms`
    ///
    /// The engine is released before any of these reach the caller.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub async fn process_image(&self, source: &ImageSource) -> Result<OcrResult> {
        let engine = self.factory.acquire().await?;
        let mut lease = EngineLease::new(engine);
        debug!("OCR engine acquired");

        let timeout = self.config.recognize_timeout();
        let outcome = tokio::time::timeout(timeout, lease.recognize(source)).await;
        let recognition = match outcome {
            Ok(Ok(recognition)) => recognition,
            Ok(Err(err)) => {
                warn!(error = %err, "OCR recognition failed");
                return Err(err);
            }
            Err(_) => {
                warn!(timeout_ms = self.config.recognize_timeout_ms, "OCR recognition timed out");
                return Err(SaltError::OcrTimeout {
                    timeout_ms: self.config.recognize_timeout_ms,
                });
            }
        };
        lease.release();

        info!(
            chars = recognition.text.len(),
            lines = recognition.text.lines().count(),
            confidence = recognition.confidence,
            "OCR recognition complete"
        );

        Ok(process_text(recognition.text, recognition.confidence, &self.config))
    }
}

/// Run the post-recognition half of the pipeline over a transcript the
/// caller already has. Needs no engine.
pub fn process_text(raw_text: impl Into<String>, confidence: f64, config: &SaltConfig) -> OcrResult {
    let raw_text = raw_text.into();
    let extracted_salts = extract_salts(&raw_text, confidence, config);
    OcrResult {
        raw_text,
        extracted_salts,
        confidence,
    }
}

/// Extract, deduplicate and score salt components from a transcript.
pub fn extract_salts(
    raw_text: &str,
    ocr_confidence: f64,
    config: &SaltConfig,
) -> Vec<ExtractedComponent> {
    let lines = relevant_lines(raw_text, config);

    let kept: Vec<ExtractedComponent> = lines
        .iter()
        .flat_map(|line| parse_composition(line))
        .filter(|component| {
            component.confidence != Confidence::Low
                && component.name.chars().count() > config.min_name_length
        })
        .collect();
    let kept_count = kept.len();

    let mut salts = dedup_by_name(kept);
    debug!(
        relevant_lines = lines.len(),
        kept = kept_count,
        unique = salts.len(),
        "composition lines parsed"
    );

    if config.rescore_components {
        rescore(&mut salts);
    }
    if apply_ocr_floor(&mut salts, ocr_confidence, config.ocr_confidence_floor) {
        info!(
            confidence = ocr_confidence,
            floor = config.ocr_confidence_floor,
            "transcript below confidence floor, all components downgraded to LOW"
        );
    }

    salts
}

/// Deduplicate by exact name. For repeated names the last occurrence's
/// values win while the position of the first occurrence is kept.
pub fn dedup_by_name(components: Vec<ExtractedComponent>) -> Vec<ExtractedComponent> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(components.len());
    let mut unique: Vec<ExtractedComponent> = Vec::with_capacity(components.len());

    for component in components {
        match positions.get(&component.name) {
            Some(&index) => unique[index] = component,
            None => {
                positions.insert(component.name.clone(), unique.len());
                unique.push(component);
            }
        }
    }

    unique
}
