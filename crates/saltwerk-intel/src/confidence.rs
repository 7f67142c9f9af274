// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Confidence scorer.
//
// `calculate_confidence` is a pure decision table over field completeness.
// The transcript-level OCR floor is a separate pass over a whole component
// list so the per-component function stays independent of engine output.

use saltwerk_core::{Confidence, ExtractedComponent};

/// The fields the scorer looks at. Every field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComponentFields<'a> {
    pub name: Option<&'a str>,
    pub strength_value: Option<f64>,
    pub strength_unit: Option<&'a str>,
}

impl<'a> From<&'a ExtractedComponent> for ComponentFields<'a> {
    fn from(component: &'a ExtractedComponent) -> Self {
        Self {
            name: Some(component.name.as_str()),
            strength_value: component.strength_value,
            strength_unit: component.strength_unit.as_deref(),
        }
    }
}

/// Classify one component.
///
/// - name, positive value and unit all present: HIGH
/// - name plus either a positive value or a unit: MEDIUM
/// - anything else, including a missing or empty name: LOW
pub fn calculate_confidence(fields: &ComponentFields<'_>) -> Confidence {
    let has_name = fields.name.is_some_and(|name| !name.is_empty());
    let has_strength = fields.strength_value.is_some_and(|value| value > 0.0);
    let has_unit = fields.strength_unit.is_some_and(|unit| !unit.is_empty());

    if has_name && has_strength && has_unit {
        Confidence::High
    } else if has_name && (has_strength || has_unit) {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Replace every component's tier with its scored tier.
pub fn rescore(components: &mut [ExtractedComponent]) {
    for component in components.iter_mut() {
        let tier = calculate_confidence(&ComponentFields::from(&*component));
        component.confidence = tier;
    }
}

/// Force every component to LOW when the transcript confidence is below
/// `floor`. A NaN transcript confidence counts as below the floor.
///
/// Returns `true` if the floor was applied.
pub fn apply_ocr_floor(
    components: &mut [ExtractedComponent],
    ocr_confidence: f64,
    floor: f64,
) -> bool {
    if ocr_confidence >= floor {
        return false;
    }
    for component in components.iter_mut() {
        component.confidence = Confidence::Low;
    }
    true
}
