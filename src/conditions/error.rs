//! error taxonomy for condition evaluation

use serde::Serialize;
use strsim::levenshtein;

use super::calendar::{DAY_NAMES, MONTH_NAMES};

/// what went wrong, in the order they are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// a token in day position is not a day name or abbreviation
    InvalidDay,
    /// a month name is unknown or a month number is outside 1-12
    InvalidMonth,
    /// a range with a missing endpoint, e.g. `mon..`
    IncompleteRange,
    /// operators or parentheses in the wrong place
    SyntaxError,
    /// text left over that is not part of the condition language
    SafetyViolation,
}

/// a classified evaluation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConditionError {
    pub kind: ErrorKind,
    pub message: String,
    /// the offending tokens, lowercased (empty for syntax errors)
    pub tokens: Vec<String>,
}

impl ConditionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tokens,
        }
    }

    pub fn invalid_days(tokens: Vec<String>) -> Self {
        let message = format!("Invalid day name(s) in condition: {}", tokens.join(", "));
        Self::new(ErrorKind::InvalidDay, message, tokens)
    }

    pub fn invalid_months(tokens: Vec<String>) -> Self {
        let message = format!("Invalid month name(s) in condition: {}", tokens.join(", "));
        Self::new(ErrorKind::InvalidMonth, message, tokens)
    }

    pub fn incomplete_range(tokens: Vec<String>) -> Self {
        Self::new(
            ErrorKind::IncompleteRange,
            "Eval failed: syntax error, incomplete range in condition.",
            tokens,
        )
    }

    /// `processed` is the condition text after predicates were reduced to 1/0
    pub fn safety(processed: &str) -> Self {
        Self::new(
            ErrorKind::SafetyViolation,
            format!("Safety check failed for processed condition '{}'", processed),
            vec![processed.to_string()],
        )
    }

    pub fn unexpected_token(token: &str) -> Self {
        Self::new(
            ErrorKind::SyntaxError,
            format!("Eval failed: syntax error, unexpected token \"{}\"", token),
            vec![token.to_string()],
        )
    }

    pub fn unexpected_end() -> Self {
        Self::new(
            ErrorKind::SyntaxError,
            "Eval failed: syntax error, unexpected end of condition",
            Vec::new(),
        )
    }

    /// canonical names close to the offending tokens (invalid day/month only)
    pub fn suggestions(&self, threshold: usize) -> Vec<String> {
        let candidates: Vec<&str> = match self.kind {
            ErrorKind::InvalidDay => DAY_NAMES.to_vec(),
            ErrorKind::InvalidMonth => MONTH_NAMES.to_vec(),
            _ => return Vec::new(),
        };

        let mut suggestions = Vec::new();
        for token in &self.tokens {
            let mut scored: Vec<(usize, &str)> = candidates
                .iter()
                .map(|name| {
                    // compare against both the full name and its abbreviation
                    let full = levenshtein(token, name);
                    let abbr = levenshtein(token, &name[..3]);
                    (full.min(abbr), *name)
                })
                .filter(|(distance, _)| *distance <= threshold)
                .collect();
            scored.sort_by_key(|(distance, _)| *distance);

            if let Some((_, name)) = scored.first() {
                if !suggestions.iter().any(|s| s == name) {
                    suggestions.push(name.to_string());
                }
            }
        }
        suggestions
    }
}
