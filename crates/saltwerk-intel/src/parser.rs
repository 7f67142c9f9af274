// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition parser.
//
// Splits a composition string such as
// "Amoxycillin (500mg) + Clavulanic Acid (125mg)" into one
// `ExtractedComponent` per ingredient. Pure and total: every input string
// produces a (possibly empty) list, never an error.
//
// Confidence assigned here is structural only: MEDIUM when both a value and
// a unit were captured, LOW otherwise. The three-tier semantic score lives in
// `crate::confidence` and is applied by the pipeline afterwards.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use saltwerk_core::{Confidence, ExtractedComponent};

/// One or more consecutive `+`, `/`, `&` form a single split point.
static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+/&]+").expect("delimiter pattern is valid"));

/// Label prefixes that precede the first ingredient on a pack
/// ("Composition:", "Contains", "Each film coated tablet contains:").
static LABEL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:composition|contains|each\b.*?\bcontains)\b\s*:?\s*")
        .expect("label prefix pattern is valid")
});

/// `<name> (<value><unit>)`. Values may carry digit-group commas
/// ("5,000", "6,00,000"); a unit may end in a stray full stop.
static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>.*?)\s*\(\s*(?P<value>[0-9][0-9,]*(?:\.[0-9]+)?)\s*(?P<unit>[A-Za-zµμ%]+)\.?\s*\)\.?$",
    )
    .expect("parenthesized pattern is valid")
});

/// `<name> <value><unit>`. The name must end on something other than a
/// digit, comma or dot so the value always takes the full number.
static BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>.*?[^0-9.,])\s*(?P<value>[0-9][0-9,]*(?:\.[0-9]+)?)\s*(?P<unit>[A-Za-zµμ%]+)\.?$",
    )
    .expect("bare pattern is valid")
});

/// `<name>` alone — must start with a letter.
static NAME_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>\p{L}.*)$").expect("name pattern is valid"));

/// Stand-alone pharmacopeia qualifiers. Case-insensitive over ASCII only.
static QUALIFIERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[Ii][Pp]|[Bb][Pp]|[Uu][Ss][Pp])\b").expect("qualifier pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Name, value and unit captured from one part.
struct PartMatch<'a> {
    name: &'a str,
    value: Option<&'a str>,
    unit: Option<&'a str>,
}

impl<'a> PartMatch<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        Some(Self {
            name: caps.name("name")?.as_str(),
            value: caps.name("value").map(|m| m.as_str()),
            unit: caps.name("unit").map(|m| m.as_str()),
        })
    }
}

/// Parse a composition string into its components, in input order.
///
/// Empty or whitespace-only input yields an empty list. Parts that are empty
/// after trimming are dropped; every other part yields exactly one component.
///
/// # Example
///
/// ```
/// use saltwerk_intel::parse_composition;
///
/// let parts = parse_composition("Paracetamol (500mg) + Caffeine 30 MG");
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[1].name, "Caffeine");
/// assert_eq!(parts[1].strength_unit.as_deref(), Some("mg"));
/// ```
pub fn parse_composition(composition: &str) -> Vec<ExtractedComponent> {
    if composition.is_empty() {
        return Vec::new();
    }

    DELIMITERS
        .split(composition)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_part)
        .collect()
}

/// Parse one trimmed, non-empty part.
fn parse_part(part: &str) -> ExtractedComponent {
    let body = match LABEL_PREFIX.find(part) {
        Some(prefix) => &part[prefix.end()..],
        None => part,
    };

    let Some(matched) = match_shape(body) else {
        return ExtractedComponent::unstructured(part);
    };

    let mut component = ExtractedComponent {
        name: clean_name(matched.name),
        strength_value: matched.value.and_then(parse_value),
        strength_unit: matched.unit.map(str::to_ascii_lowercase),
        original_part: part.to_string(),
        confidence: Confidence::Low,
    };
    if component.has_strength() {
        component.confidence = Confidence::Medium;
    }
    component
}

/// Parse a captured value, ignoring digit-group commas.
fn parse_value(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// Try each structural shape in order; the first that matches wins.
fn match_shape(body: &str) -> Option<PartMatch<'_>> {
    [&*PARENTHESIZED, &*BARE, &*NAME_ONLY]
        .into_iter()
        .find_map(|shape| shape.captures(body))
        .and_then(|caps| PartMatch::from_captures(&caps))
}

/// Strip IP/BP/USP qualifiers and normalise whitespace.
///
/// May return an empty string (e.g. for a bare "IP"); callers keep it.
fn clean_name(raw: &str) -> String {
    let stripped = QUALIFIERS.replace_all(raw, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> ExtractedComponent {
        let mut parts = parse_composition(text);
        assert_eq!(parts.len(), 1, "expected one component from {text:?}, got {parts:?}");
        parts.remove(0)
    }

    // -- Empty input --

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_composition("").is_empty());
        assert!(parse_composition(&String::default()).is_empty());
    }

    #[test]
    fn whitespace_and_delimiters_only_yield_nothing() {
        assert!(parse_composition("   ").is_empty());
        assert!(parse_composition(" + / & ").is_empty());
    }

    // -- Splitting --

    #[test]
    fn splits_on_plus_into_two_components() {
        let parts = parse_composition("A (1mg) + B (2mg)");
        assert_eq!(parts.len(), 2);

        assert_eq!(parts[0].name, "A");
        assert_eq!(parts[0].strength_value, Some(1.0));
        assert_eq!(parts[0].strength_unit.as_deref(), Some("mg"));
        assert_eq!(parts[0].confidence, Confidence::Medium);

        assert_eq!(parts[1].name, "B");
        assert_eq!(parts[1].strength_value, Some(2.0));
        assert_eq!(parts[1].strength_unit.as_deref(), Some("mg"));
        assert_eq!(parts[1].confidence, Confidence::Medium);
    }

    #[test]
    fn consecutive_delimiters_collapse() {
        let parts = parse_composition("Zinc 10mg ++ Folic Acid 5mg &/ Biotin 30mcg");
        let names: Vec<_> = parts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Zinc", "Folic Acid", "Biotin"]);
    }

    #[test]
    fn slash_and_ampersand_split_too() {
        let parts = parse_composition("Amoxycillin 250mg / Dicloxacillin 250mg & Lactobacillus");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].name, "Lactobacillus");
        assert_eq!(parts[2].confidence, Confidence::Low);
    }

    #[test]
    fn original_part_is_the_trimmed_fragment() {
        let parts = parse_composition("  Paracetamol IP (500 mg)  +Caffeine 30mg");
        assert_eq!(parts[0].original_part, "Paracetamol IP (500 mg)");
        assert_eq!(parts[1].original_part, "Caffeine 30mg");
    }

    // -- Shapes --

    #[test]
    fn parenthesized_strength() {
        let c = single("Paracetamol (500mg)");
        assert_eq!(c.name, "Paracetamol");
        assert_eq!(c.strength_value, Some(500.0));
        assert_eq!(c.strength_unit.as_deref(), Some("mg"));
        assert_eq!(c.confidence, Confidence::Medium);
    }

    #[test]
    fn parenthesized_strength_with_inner_spaces() {
        let c = single("Clavulanic Acid ( 125 mg )");
        assert_eq!(c.name, "Clavulanic Acid");
        assert_eq!(c.strength_value, Some(125.0));
        assert_eq!(c.strength_unit.as_deref(), Some("mg"));
    }

    #[test]
    fn bare_strength() {
        let c = single("Paracetamol 500mg");
        assert_eq!(c.name, "Paracetamol");
        assert_eq!(c.strength_value, Some(500.0));
        assert_eq!(c.strength_unit.as_deref(), Some("mg"));
        assert_eq!(c.confidence, Confidence::Medium);
    }

    #[test]
    fn decimal_values_keep_the_whole_number() {
        let c = single("Glimepiride 2.5 mg");
        assert_eq!(c.name, "Glimepiride");
        assert_eq!(c.strength_value, Some(2.5));
    }

    #[test]
    fn trailing_strength_wins_over_digits_in_name() {
        let c = single("Vitamin B12 500mcg");
        assert_eq!(c.name, "Vitamin B12");
        assert_eq!(c.strength_value, Some(500.0));
        assert_eq!(c.strength_unit.as_deref(), Some("mcg"));
    }

    #[test]
    fn percent_unit() {
        let c = single("Clotrimazole 1%");
        assert_eq!(c.strength_value, Some(1.0));
        assert_eq!(c.strength_unit.as_deref(), Some("%"));
    }

    #[test]
    fn plain_name_is_low() {
        let c = single("Lactic Acid Bacillus");
        assert_eq!(c.name, "Lactic Acid Bacillus");
        assert_eq!(c.strength_value, None);
        assert_eq!(c.strength_unit, None);
        assert_eq!(c.confidence, Confidence::Low);
    }

    #[test]
    fn value_without_unit_is_low() {
        let c = single("Paracetamol 500");
        assert_eq!(c.strength_value, None);
        assert_eq!(c.confidence, Confidence::Low);
    }

    // -- Name cleanup --

    #[test]
    fn strips_pharmacopeia_qualifier() {
        let c = single("Amoxycillin IP 500mg");
        assert_eq!(c.name, "Amoxycillin");
        assert_eq!(c.strength_value, Some(500.0));
        assert_eq!(c.strength_unit.as_deref(), Some("mg"));
    }

    #[test]
    fn strips_qualifiers_case_insensitively() {
        assert_eq!(single("Cetirizine usp 10mg").name, "Cetirizine");
        assert_eq!(single("Ibuprofen Bp (400mg)").name, "Ibuprofen");
    }

    #[test]
    fn qualifier_inside_a_word_is_kept() {
        // "Lipase" contains "ip" but not as a stand-alone token.
        assert_eq!(single("Lipase 100mg").name, "Lipase");
        assert_eq!(single("Bupivacaine 5mg").name, "Bupivacaine");
    }

    #[test]
    fn collapses_inner_whitespace() {
        let c = single("Clavulanic    IP   Acid 125mg");
        assert_eq!(c.name, "Clavulanic Acid");
    }

    #[test]
    fn name_emptied_by_stripping_is_still_emitted() {
        let c = single("IP (500mg)");
        assert_eq!(c.name, "");
        assert_eq!(c.strength_value, Some(500.0));
        assert_eq!(c.confidence, Confidence::Medium);
    }

    #[test]
    fn label_prefix_is_not_part_of_the_name() {
        let parts = parse_composition("Composition: Paracetamol (500mg) + Caffeine (30mg)");
        assert_eq!(parts[0].name, "Paracetamol");
        assert_eq!(parts[1].name, "Caffeine");

        let c = single("Each tablet contains: Metformin IP 500mg");
        assert_eq!(c.name, "Metformin");
    }

    #[test]
    fn multi_word_dosage_form_prefix_is_stripped() {
        let c = single("Each film coated tablet contains: Paracetamol IP 500mg");
        assert_eq!(c.name, "Paracetamol");
        assert_eq!(c.strength_value, Some(500.0));
        assert_eq!(c.original_part, "Each film coated tablet contains: Paracetamol IP 500mg");

        let c = single("EACH 5 ML CONTAINS Ambroxol Hydrochloride 15mg");
        assert_eq!(c.name, "Ambroxol Hydrochloride");
    }

    #[test]
    fn prefix_words_only_strip_as_whole_words() {
        let c = single("Containsine 5mg");
        assert_eq!(c.name, "Containsine");
        assert_eq!(c.strength_value, Some(5.0));

        let c = single("Compositionol (10mg)");
        assert_eq!(c.name, "Compositionol");
    }

    // -- Values --

    #[test]
    fn digit_group_commas_are_part_of_the_value() {
        let c = single("Vitamin A 5,000 IU");
        assert_eq!(c.name, "Vitamin A");
        assert_eq!(c.strength_value, Some(5000.0));
        assert_eq!(c.strength_unit.as_deref(), Some("iu"));
        assert_eq!(c.confidence, Confidence::Medium);

        let c = single("Cholecalciferol 6,00,000 IU");
        assert_eq!(c.name, "Cholecalciferol");
        assert_eq!(c.strength_value, Some(600_000.0));

        let c = single("Vitamin A (25,000 IU)");
        assert_eq!(c.name, "Vitamin A");
        assert_eq!(c.strength_value, Some(25_000.0));
    }

    #[test]
    fn trailing_full_stop_after_unit_is_tolerated() {
        let c = single("Paracetamol IP 500 mg.");
        assert_eq!(c.name, "Paracetamol");
        assert_eq!(c.strength_value, Some(500.0));
        assert_eq!(c.strength_unit.as_deref(), Some("mg"));
        assert_eq!(c.confidence, Confidence::Medium);

        let c = single("Caffeine (30mg).");
        assert_eq!(c.name, "Caffeine");
        assert_eq!(c.strength_unit.as_deref(), Some("mg"));
    }

    // -- Units --

    #[test]
    fn unit_is_lowercased_without_synonym_mapping() {
        assert_eq!(single("Paracetamol 500MG").strength_unit.as_deref(), Some("mg"));
        assert_eq!(single("Cyanocobalamin 1500MCG").strength_unit.as_deref(), Some("mcg"));
        assert_eq!(single("Vitamin D3 1000 IU").strength_unit.as_deref(), Some("iu"));
    }

    // -- Fallback --

    #[test]
    fn unknown_ingredient_falls_back_to_low() {
        let c = single("Some Unknown Ingredient");
        assert_eq!(c.name, "Some Unknown Ingredient");
        assert_eq!(c.strength_value, None);
        assert_eq!(c.strength_unit, None);
        assert_eq!(c.confidence, Confidence::Low);
    }

    #[test]
    fn unstructured_part_keeps_raw_text() {
        let c = single("500mg");
        assert_eq!(c.name, "500mg");
        assert_eq!(c.original_part, "500mg");
        assert_eq!(c.strength_value, None);
        assert_eq!(c.confidence, Confidence::Low);

        let c = single("(ii) 12 x 10");
        assert_eq!(c.name, "(ii) 12 x 10");
        assert_eq!(c.confidence, Confidence::Low);
    }

    // -- Determinism --

    #[test]
    fn parsing_is_deterministic() {
        let inputs = [
            "",
            "Amoxycillin (500mg) + Clavulanic Acid (125mg)",
            "Some Unknown Ingredient",
            "IP BP USP",
            "Vitamin B12 500mcg & Folic Acid 1.5 MG / Zinc",
        ];
        for input in inputs {
            assert_eq!(parse_composition(input), parse_composition(input), "input {input:?}");
        }
    }
}
