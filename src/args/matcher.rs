//! Option matcher: one token position → one typed option value.

use crate::args::registry::{OptionArity, OptionDef};
use crate::error::UsageError;

/// Value carried by a recognised option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag,
    Text(String),
    Number(u32),
}

/// A recognised option, produced once per matched token (pair).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOption {
    /// Canonical long name, whichever spelling was used.
    pub name: &'static str,
    pub value: OptionValue,
}

impl RawOption {
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<u32> {
        match self.value {
            OptionValue::Number(n) => Some(n),
            _ => None,
        }
    }
}

/// Does the token at `index` match either spelling?
pub fn match_flag(tokens: &[String], index: usize, short: &str, long: &str) -> bool {
    tokens
        .get(index)
        .is_some_and(|token| token == short || token == long)
}

/// Match a string option; on success `index` is advanced onto the value.
pub fn match_text(
    tokens: &[String],
    index: &mut usize,
    short: &str,
    long: &str,
) -> Result<Option<String>, UsageError> {
    if !match_flag(tokens, *index, short, long) {
        return Ok(None);
    }
    let value = tokens
        .get(*index + 1)
        .ok_or_else(|| UsageError::MissingString {
            option: tokens[*index].clone(),
        })?;
    *index += 1;
    Ok(Some(value.clone()))
}

/// Match a numeric option bounded by `min..=max`; on success `index` is
/// advanced onto the value.
pub fn match_numeric(
    tokens: &[String],
    index: &mut usize,
    short: &str,
    long: &str,
    min: u32,
    max: u32,
) -> Result<Option<u32>, UsageError> {
    if !match_flag(tokens, *index, short, long) {
        return Ok(None);
    }
    let bad_number = || UsageError::BadNumber {
        option: tokens[*index].clone(),
        min,
        max,
    };
    let token = tokens.get(*index + 1).ok_or_else(bad_number)?;
    let value = parse_numeric(token, min, max).ok_or_else(bad_number)?;
    *index += 1;
    Ok(Some(value))
}

/// Parse the whole token as a number inside `min..=max`.
///
/// Follows `strtod`: leading whitespace is skipped and an empty token reads
/// as zero. Fractions are truncated. Trailing characters, non-finite values
/// and anything outside the range are rejected.
pub fn parse_numeric(token: &str, min: u32, max: u32) -> Option<u32> {
    let value: f64 = if token.is_empty() {
        0.0
    } else {
        token.trim_start_matches(is_c_space).parse().ok()?
    };
    if !value.is_finite() || value < f64::from(min) || value > f64::from(max) {
        return None;
    }
    Some(value.trunc() as u32)
}

fn is_c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Match the token at `index` against a registry definition, using every
/// spelling it has.
pub fn match_def(
    tokens: &[String],
    index: &mut usize,
    def: &OptionDef,
) -> Result<Option<RawOption>, UsageError> {
    let Some(token) = tokens.get(*index) else {
        return Ok(None);
    };
    if !def.matches(token) {
        return Ok(None);
    }
    // Whichever spelling was typed is the one both names are compared to.
    let spelled = token.clone();
    let value = match def.arity {
        OptionArity::Flag => Some(OptionValue::Flag),
        OptionArity::Text => {
            match_text(tokens, index, &spelled, &spelled)?.map(OptionValue::Text)
        }
        OptionArity::Numeric { min, max } => {
            match_numeric(tokens, index, &spelled, &spelled, min, max)?.map(OptionValue::Number)
        }
    };
    Ok(value.map(|value| RawOption {
        name: def.long,
        value,
    }))
}
