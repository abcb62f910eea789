//! text cleanup applied before a condition is tokenized

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref OPEN_BRACKET_SPACE: Regex = Regex::new(r"\[\s+").unwrap();
    static ref CLOSE_BRACKET_SPACE: Regex = Regex::new(r"\s+\]").unwrap();
    static ref BRACKET_SEGMENT: Regex = Regex::new(r"\[[^\[\]]*\]").unwrap();
    static ref RANGE_SPACE: Regex = Regex::new(r"\s*\.\.\s*").unwrap();
    static ref COMMA_SPACE: Regex = Regex::new(r"\s*,\s*").unwrap();
}

/// collapse whitespace runs to single spaces, trim, and strip quote characters
pub fn normalize(condition: &str) -> String {
    let collapsed = WHITESPACE.replace_all(condition.trim(), " ");
    collapsed.replace(['"', '\''], "")
}

/// canonicalize spacing inside every `[...]` segment
///
/// `[ mon .. fri , sun ]` becomes `[mon..fri,sun]`; running it twice gives
/// the same result as running it once
pub fn normalize_bracket_lists(condition: &str) -> String {
    let tightened = OPEN_BRACKET_SPACE.replace_all(condition, "[");
    let tightened = CLOSE_BRACKET_SPACE.replace_all(&tightened, "]");

    BRACKET_SEGMENT
        .replace_all(&tightened, |caps: &regex::Captures| {
            let segment = &caps[0];
            let inner = &segment[1..segment.len() - 1];
            let inner = RANGE_SPACE.replace_all(inner, "..");
            let inner = COMMA_SPACE.replace_all(&inner, ",");
            format!("[{}]", inner.trim())
        })
        .into_owned()
}

/// full normalization: whitespace and quotes, then bracket lists
pub fn normalize_condition(condition: &str) -> String {
    normalize_bracket_lists(&normalize(condition))
}
