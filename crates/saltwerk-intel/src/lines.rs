// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR line selection.
//
// A label transcript is mostly brand names, batch numbers and storage
// instructions. These helpers pick out the lines worth handing to the
// composition parser.

use std::sync::LazyLock;

use regex::Regex;
use saltwerk_core::SaltConfig;

/// Words that mark a line as describing the composition.
static COMPOSITION_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)composition|contains|each.*tablet|\b(?:ip|bp|usp)\b")
        .expect("keyword pattern is valid")
});

/// Whether a line carries a composition keyword.
pub fn is_composition_line(line: &str) -> bool {
    COMPOSITION_KEYWORDS.is_match(line)
}

/// Trimmed lines whose char count exceeds `min_length`, in transcript order.
pub fn candidate_lines(text: &str, min_length: usize) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > min_length)
        .collect()
}

/// Candidate lines that should be parsed, in transcript order.
///
/// On small labels (fewer candidates than `small_label_line_count`) every
/// candidate is kept; otherwise only keyword lines survive.
pub fn relevant_lines<'a>(text: &'a str, config: &SaltConfig) -> Vec<&'a str> {
    let candidates = candidate_lines(text, config.min_line_length);
    if candidates.len() < config.small_label_line_count {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|line| is_composition_line(line))
        .collect()
}

/// Keep only the lines of `text` that carry a composition keyword.
///
/// Lines are returned untrimmed and joined with `\n`. Unlike
/// [`relevant_lines`] there is no length or small-label rule.
pub fn filter_relevant_lines(text: &str) -> String {
    text.split('\n')
        .filter(|line| is_composition_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}
