// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sanity checks and formatting for extracted components, used when a
// pharmacist reviews or edits OCR output before it is matched.

use saltwerk_core::ExtractedComponent;
use serde::Serialize;

/// Strength values above this are flagged as implausible. Vitamin D
/// preparations legitimately reach 600,000 IU, so the bar is high.
const MAX_PLAUSIBLE_STRENGTH: f64 = 10_000_000.0;

/// Outcome of [`validate_component`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Check a component for problems a pharmacist should look at.
pub fn validate_component(component: &ExtractedComponent) -> ComponentValidation {
    let mut errors = Vec::new();

    if component.name.chars().count() < 2 {
        errors.push("Salt name must be at least 2 characters".to_string());
    }

    if let Some(value) = component.strength_value {
        if value <= 0.0 {
            errors.push("Strength value must be greater than 0".to_string());
        }
        if value > MAX_PLAUSIBLE_STRENGTH {
            errors.push("Warning: Strength value seems unusually high".to_string());
        }
        if component.strength_unit.as_deref().is_none_or(str::is_empty) {
            errors.push("Strength unit is required when value is provided".to_string());
        }
    }

    ComponentValidation {
        valid: errors.is_empty(),
        errors,
    }
}

/// Render components back into a single composition string,
/// e.g. `"Paracetamol 500mg + Caffeine 30mg"`.
pub fn format_composition(components: &[ExtractedComponent]) -> String {
    components
        .iter()
        .map(|component| match (component.strength_value, component.strength_unit.as_deref()) {
            (Some(value), Some(unit)) if value != 0.0 && !unit.is_empty() => {
                format!("{} {}{}", component.name, value, unit)
            }
            _ => component.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

#[cfg(test)]
mod tests {
    use saltwerk_core::Confidence;

    use super::*;
    use crate::parser::parse_composition;

    fn component(name: &str, value: Option<f64>, unit: Option<&str>) -> ExtractedComponent {
        ExtractedComponent {
            name: name.to_string(),
            strength_value: value,
            strength_unit: unit.map(str::to_string),
            original_part: name.to_string(),
            confidence: Confidence::Medium,
        }
    }

    #[test]
    fn complete_component_is_valid() {
        let result = validate_component(&component("Paracetamol", Some(500.0), Some("mg")));
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn short_name_is_rejected() {
        let result = validate_component(&component("P", Some(500.0), Some("mg")));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn non_positive_strength_is_rejected() {
        let result = validate_component(&component("Paracetamol", Some(0.0), Some("mg")));
        assert!(!result.valid);
        assert!(result.errors[0].contains("greater than 0"));
    }

    #[test]
    fn implausible_strength_is_flagged() {
        let result = validate_component(&component("Cholecalciferol", Some(20_000_000.0), Some("iu")));
        assert!(!result.valid);
        assert!(result.errors[0].contains("unusually high"));

        let result = validate_component(&component("Cholecalciferol", Some(600_000.0), Some("iu")));
        assert!(result.valid, "600,000 IU is a real vitamin D dose");
    }

    #[test]
    fn value_without_unit_is_rejected() {
        let result = validate_component(&component("Paracetamol", Some(500.0), None));
        assert!(!result.valid);
        assert!(result.errors[0].contains("unit is required"));
    }

    #[test]
    fn name_only_component_is_valid() {
        assert!(validate_component(&component("Lactobacillus", None, None)).valid);
    }

    #[test]
    fn formats_with_and_without_strength() {
        let components = vec![
            component("Paracetamol", Some(500.0), Some("mg")),
            component("Glimepiride", Some(2.5), Some("mg")),
            component("Lactobacillus", None, None),
        ];
        assert_eq!(
            format_composition(&components),
            "Paracetamol 500mg + Glimepiride 2.5mg + Lactobacillus"
        );
        assert_eq!(format_composition(&[]), "");
    }

    #[test]
    fn formatted_output_parses_back_to_the_same_components() {
        let parsed = parse_composition("Amoxycillin IP (500mg) + Clavulanic Acid 125 MG");
        let formatted = format_composition(&parsed);
        assert_eq!(formatted, "Amoxycillin 500mg + Clavulanic Acid 125mg");

        let reparsed = parse_composition(&formatted);
        let names: Vec<_> = reparsed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Amoxycillin", "Clavulanic Acid"]);
        assert_eq!(reparsed[0].strength_value, parsed[0].strength_value);
        assert_eq!(reparsed[1].strength_unit, parsed[1].strength_unit);
    }
}
