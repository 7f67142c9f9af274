// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Saltwerk.
//
// Composition parsing never fails: unstructured text becomes a LOW-confidence
// component. Only OCR acquisition/recognition and config I/O produce errors.

use thiserror::Error;

/// Top-level error type for all Saltwerk operations.
#[derive(Debug, Error)]
pub enum SaltError {
    // -- OCR errors --
    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("OCR recognition timed out after {timeout_ms}ms")]
    OcrTimeout { timeout_ms: u64 },

    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("image decoding failed: {0}")]
    ImageError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SaltError>;
