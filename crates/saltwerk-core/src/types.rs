// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Salt Intelligence.
//
// All of these are transient value objects: built once per submission,
// handed to the caller, never mutated afterwards by this workspace.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Coarse trust classification of an extracted component.
///
/// Ordered so that `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Wire name of the tier (`"HIGH"`, `"MEDIUM"`, `"LOW"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One drug/salt component parsed out of a composition string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedComponent {
    /// Cleaned name (pharmacopeia qualifiers stripped, whitespace collapsed).
    /// Holds the raw fragment when the part had no recognisable structure.
    pub name: String,
    /// Dose magnitude, if one was captured.
    pub strength_value: Option<f64>,
    /// Lower-cased unit exactly as captured (`"mg"`, `"mcg"`, `"%"`).
    pub strength_unit: Option<String>,
    /// The untouched substring this component was derived from.
    pub original_part: String,
    /// Derived trust tier; never authoritative input.
    pub confidence: Confidence,
}

impl ExtractedComponent {
    /// Component for a fragment that matched no recognised shape.
    pub fn unstructured(part: &str) -> Self {
        Self {
            name: part.to_string(),
            strength_value: None,
            strength_unit: None,
            original_part: part.to_string(),
            confidence: Confidence::Low,
        }
    }

    /// Whether both a strength value and a unit are present.
    pub fn has_strength(&self) -> bool {
        self.strength_value.is_some() && self.strength_unit.is_some()
    }
}

/// Output of the end-to-end OCR pipeline for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    /// Full OCR transcript, unmodified.
    pub raw_text: String,
    /// Components deduplicated by name.
    pub extracted_salts: Vec<ExtractedComponent>,
    /// The engine's own transcript confidence, comparable to a 0–100 scale.
    pub confidence: f64,
}

impl OcrResult {
    /// True when recognition succeeded but no composition was found.
    ///
    /// This is a valid outcome, distinct from an OCR failure.
    pub fn is_empty(&self) -> bool {
        self.extracted_salts.is_empty()
    }
}

/// Reference to the image handed to the OCR engine.
///
/// Opaque to the pipeline; only engine backends interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// Image file on local storage.
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// Remote image location.
    Url(String),
}

impl ImageSource {
    /// Short description for logs — never dumps the byte payload.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => format!("file {}", path.display()),
            Self::Bytes(bytes) => format!("{} bytes", bytes.len()),
            Self::Url(url) => format!("url {url}"),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}
