//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They keep the rules
//! for names, emails and amounts in one place so every operation applies
//! them the same way.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim and NFC-normalize a required display name.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(normalized)
}

/// Trim an email address. Comparison stays case-sensitive.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(
            "email must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

/// Amounts are signed minor units; only zero is meaningless.
pub(crate) fn validate_amount(amount: i64) -> ResultEngine<()> {
    if amount == 0 {
        return Err(EngineError::InvalidAmount(
            "amount must not be zero".to_string(),
        ));
    }
    Ok(())
}
