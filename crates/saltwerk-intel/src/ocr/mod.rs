// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR adapter.
//
// The OCR engine itself is an external collaborator. This module defines the
// seam it plugs into (`OcrEngineFactory` hands out `OcrEngine`s), the scoped
// lease that guarantees every acquired engine is released, and the pipeline
// service that turns a recognised transcript into salt components.
//
// # Feature Gate
//
// The `ocrs`-backed engine is only available with the `ocr` feature:
//
// ```toml
// saltwerk-intel = { path = "crates/saltwerk-intel", features = ["ocr"] }
// ```

mod service;

#[cfg(feature = "ocr")]
pub mod ocrs_engine;

pub use service::{SaltOcrService, dedup_by_name, extract_salts, process_text};

use async_trait::async_trait;
use saltwerk_core::ImageSource;
use saltwerk_core::error::{Result, SaltError};
use tracing::debug;

/// Raw engine output for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Full transcript, lines separated by `\n`.
    pub text: String,
    /// Engine confidence for the whole transcript, comparable to 0–100.
    pub confidence: f64,
}

/// An acquired OCR engine instance.
///
/// `recognize` takes `&mut self`: an engine serves one recognition at a time.
#[async_trait]
pub trait OcrEngine: Send {
    /// Recognise the text in one image.
    async fn recognize(&mut self, source: &ImageSource) -> Result<Recognition>;

    /// Release worker resources. Called exactly once per acquired engine,
    /// on success, error, timeout and cancellation alike.
    fn release(&mut self);
}

/// Source of OCR engines. May create a fresh engine per call or draw from a
/// pool it owns.
#[async_trait]
pub trait OcrEngineFactory: Send + Sync {
    type Engine: OcrEngine;

    /// Acquire an engine for exclusive use by one submission.
    async fn acquire(&self) -> Result<Self::Engine>;
}

/// Scoped ownership of an acquired engine.
///
/// Dropping the lease releases the engine, so early returns, `?`, timeouts
/// and dropped futures cannot leak it.
pub struct EngineLease<E: OcrEngine> {
    engine: Option<E>,
}

impl<E: OcrEngine> EngineLease<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Run recognition on the leased engine.
    pub async fn recognize(&mut self, source: &ImageSource) -> Result<Recognition> {
        match self.engine.as_mut() {
            Some(engine) => engine.recognize(source).await,
            None => Err(SaltError::EngineUnavailable(
                "engine lease already released".into(),
            )),
        }
    }

    /// Release the engine now rather than at end of scope.
    pub fn release(mut self) {
        self.release_engine();
    }

    fn release_engine(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            debug!("releasing OCR engine");
            engine.release();
        }
    }
}

impl<E: OcrEngine> Drop for EngineLease<E> {
    fn drop(&mut self) {
        self.release_engine();
    }
}
