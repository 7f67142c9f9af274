// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for pharmacy counter staff.
//
// An OCR failure and "no salts found" must read differently: the first means
// the scan did not work, the second means it worked and found nothing.

use crate::error::SaltError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Engine hiccup or timeout — trying again may help.
    Transient,
    /// The user must do something (retake the photo, pick another file).
    ActionRequired,
    /// Retrying will not help — installation or configuration problem.
    Permanent,
    /// Not an error; shown as a notice.
    Informational,
}

/// A human-readable message with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether submitting the same image again may succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl HumanError {
    /// Notice for a successful scan that yielded no composition.
    pub fn no_composition_detected() -> Self {
        Self {
            message: "No composition detected in this image.".into(),
            suggestion: "Please add the salts manually, or photograph the side of the pack that lists the composition.".into(),
            retriable: true,
            severity: Severity::Informational,
        }
    }
}

/// Convert a `SaltError` into a `HumanError` suitable for the counter screen.
pub fn humanize_error(err: &SaltError) -> HumanError {
    match err {
        SaltError::Ocr(_) => HumanError {
            message: "We couldn't read the text on this label.".into(),
            suggestion: "Try again with a sharper, well-lit photo, or add the salts manually.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        SaltError::OcrTimeout { .. } => HumanError {
            message: "Reading the label took too long.".into(),
            suggestion: "Try again, or crop the photo to just the composition text.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        SaltError::EngineUnavailable(_) => HumanError {
            message: "Label scanning is not available right now.".into(),
            suggestion: "Add the salts manually. If this keeps happening, ask an administrator to check the OCR installation.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
        SaltError::UnsupportedSource(_) => HumanError {
            message: "This kind of image can't be scanned.".into(),
            suggestion: "Upload the photo from this device instead of a link.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        SaltError::ImageError(_) => HumanError {
            message: "This file doesn't look like a picture we can open.".into(),
            suggestion: "Use a PNG or JPEG photo of the label.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        SaltError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "We couldn't find that file.".into(),
                suggestion: "Check the file still exists and pick it again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "We aren't allowed to open that file.".into(),
                suggestion: "Check the file permissions, or copy it somewhere else first.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "Something went wrong reading the file.".into(),
                suggestion: "Try again.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },
        SaltError::Config(_) | SaltError::Serialization(_) => HumanError {
            message: "The scanner settings are invalid.".into(),
            suggestion: "Ask an administrator to fix or reset the Salt Intelligence configuration.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
