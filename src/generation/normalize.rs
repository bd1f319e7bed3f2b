//! Response validator/normalizer
//!
//! Turns the provider's free-form text into a [`CardSet`]. Tolerance is applied
//! per record: malformed elements are dropped, and only an unparseable body or
//! zero surviving records fails the request.

use serde_json::Value;

use super::card::{CardSet, Flashcard, MAX_CARDS};
use crate::error::GenerationError;

/// Longest prefix of the raw text quoted in a `MalformedResponse` log detail
const MAX_DETAIL_PREVIEW: usize = 200;

/// Coerce one field value to text
///
/// Strings pass through, numbers and booleans use their textual form, arrays
/// join their coerced elements with `,`, objects use their JSON text, and
/// null or a missing field become empty (which discards the record).
fn coerce_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| coerce_field(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(object @ Value::Object(_)) => object.to_string(),
        Some(Value::Null) | None => String::new(),
    }
}

fn preview(raw: &str) -> &str {
    super::material::truncate_chars(raw, MAX_DETAIL_PREVIEW)
}

/// Parse and normalize provider output into a card set
///
/// # Errors
///
/// - [`GenerationError::MalformedResponse`] if `raw` is not JSON or its top
///   level is not an array
/// - [`GenerationError::EmptyResult`] if no element yields a card with both a
///   non-empty `front` and `back`
pub fn normalize(raw: &str) -> Result<CardSet, GenerationError> {
    let parsed: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        GenerationError::MalformedResponse {
            detail: format!("{} (response starts with {:?})", e, preview(raw)),
        }
    })?;

    let Value::Array(elements) = parsed else {
        return Err(GenerationError::MalformedResponse {
            detail: format!(
                "top-level value is not an array (response starts with {:?})",
                preview(raw)
            ),
        });
    };

    let total = elements.len();
    let cards: Vec<Flashcard> = elements
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|record| {
            Flashcard::new(
                coerce_field(record.get("front")),
                coerce_field(record.get("back")),
            )
        })
        .take(MAX_CARDS)
        .collect();

    let valid = cards.len();
    match CardSet::from_cards(cards) {
        Some(set) => {
            if valid < total.min(MAX_CARDS) {
                tracing::debug!(
                    records = total,
                    kept = valid,
                    "Dropped invalid records from provider response"
                );
            }
            Ok(set)
        }
        None => Err(GenerationError::EmptyResult { discarded: total }),
    }
}
