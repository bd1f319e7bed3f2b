//! Study material and the input sanitizer
//!
//! All lengths are counted in Unicode scalar values, never bytes, and
//! truncation always lands on a character boundary.

use crate::config::LimitsConfig;
use crate::error::GenerationError;

/// Trimmed, length-bounded study text ready to be sent to the provider
///
/// Only [`sanitize`] constructs this type, so holding one proves the text
/// passed the minimum-length rule and fits the maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyMaterial {
    text: String,
    original_chars: usize,
}

impl StudyMaterial {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Character count of the text that will be sent
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Character count of the trimmed input before truncation
    pub fn original_chars(&self) -> usize {
        self.original_chars
    }

    pub fn was_truncated(&self) -> bool {
        self.original_chars > self.char_count()
    }
}

/// Return the prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Trim, validate and bound raw study text
///
/// # Errors
///
/// - [`GenerationError::EmptyInput`] if `raw` is absent or blank after trimming
/// - [`GenerationError::TooShort`] if the trimmed text is below `limits.min_chars`
///
/// Text longer than `limits.max_chars` is truncated silently; that is not an error.
pub fn sanitize(raw: Option<&str>, limits: &LimitsConfig) -> Result<StudyMaterial, GenerationError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyInput);
    }

    let original_chars = trimmed.chars().count();
    if original_chars < limits.min_chars {
        return Err(GenerationError::TooShort {
            min_chars: limits.min_chars,
            actual: original_chars,
        });
    }

    let bounded = truncate_chars(trimmed, limits.max_chars);
    if bounded.len() < trimmed.len() {
        tracing::debug!(
            original_chars = original_chars,
            max_chars = limits.max_chars,
            "Study material truncated to provider budget"
        );
    }

    Ok(StudyMaterial {
        text: bounded.to_string(),
        original_chars,
    })
}
