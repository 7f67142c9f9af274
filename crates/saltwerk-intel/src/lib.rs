// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// saltwerk-intel — Salt Intelligence engine.
//
// Turns OCR'd medicine labels into structured drug components: a composition
// parser, a three-tier confidence scorer, OCR line filtering, and the
// end-to-end pipeline that drives an external OCR engine with scoped
// acquisition.

pub mod confidence;
pub mod lines;
pub mod ocr;
pub mod parser;
pub mod validate;

// Re-export the primary entry points so callers can use
// `saltwerk_intel::parse_composition` etc.
pub use confidence::{ComponentFields, apply_ocr_floor, calculate_confidence, rescore};
pub use lines::filter_relevant_lines;
pub use ocr::{EngineLease, OcrEngine, OcrEngineFactory, Recognition, SaltOcrService, process_text};
pub use parser::parse_composition;
pub use validate::{ComponentValidation, format_composition, validate_component};

#[cfg(feature = "ocr")]
pub use ocr::ocrs_engine::{OcrsEngine, OcrsEngineFactory, OcrsModelConfig};
