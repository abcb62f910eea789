//! condition evaluator
//!
//! evaluates condition text against a pair of calendar clocks

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use super::calendar::{
    is_weekend, last_weekday_of_month, nth_weekday_of_month, parse_weekday, shift_weekday,
};
use super::error::{ConditionError, ErrorKind};
use super::lexer::tokenize;
use super::logic;
use super::normalize::{normalize, normalize_bracket_lists};
use super::parser::reduce;
use super::types::{Condition, DayClass, Ordinal, Predicate};
use crate::clock::TimeZoneSetting;

/// the dates a condition is evaluated against
///
/// `row` drives day, today, tomorrow, yesterday, offsets and ordinals;
/// `anchor` drives month, year and weekday/weekend. outside of truth tables
/// both hold the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clocks {
    pub row: NaiveDate,
    pub anchor: NaiveDate,
}

impl Clocks {
    pub fn new(row: NaiveDate, anchor: NaiveDate) -> Self {
        Self { row, anchor }
    }

    /// both clocks on the same date
    pub fn fixed(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// the current date in the given timezone
    pub fn today(tz: &TimeZoneSetting) -> Self {
        Self::fixed(tz.today())
    }
}

impl Predicate {
    pub fn evaluate(&self, clocks: &Clocks) -> bool {
        let row = clocks.row;
        let anchor = clocks.anchor;

        match self {
            Predicate::DayComparison {
                subject,
                op,
                target,
            } => {
                let day = shift_weekday(row.weekday(), subject.offset());
                op.apply(day.num_days_from_monday(), target.num_days_from_monday())
            }
            Predicate::DayOffset { offset } => {
                shift_weekday(row.weekday(), *offset) == row.weekday()
            }
            Predicate::DayRange(days) => days.contains(&row.weekday()),
            Predicate::DayClass { class, negated } => {
                let weekend = is_weekend(anchor.weekday());
                let matched = match class {
                    DayClass::Weekend => weekend,
                    DayClass::Weekday => !weekend,
                };
                matched != *negated
            }
            Predicate::OrdinalWeekday {
                ordinal,
                weekday,
                negated,
            } => {
                let target = match ordinal {
                    Ordinal::Nth(n) => nth_weekday_of_month(row.year(), row.month(), *weekday, *n),
                    Ordinal::Last => last_weekday_of_month(row.year(), row.month(), *weekday),
                };
                (target == Some(row.day())) != *negated
            }
            Predicate::MonthComparison { op, month } => op.apply(anchor.month(), *month),
            Predicate::MonthRange(months) => months.contains(&anchor.month()),
            Predicate::YearComparison { op, year } => op.apply(anchor.year(), *year),
        }
    }
}

impl Condition {
    pub fn evaluate(&self, clocks: &Clocks) -> bool {
        match self {
            Condition::Literal(value) => *value,
            Condition::Predicate(p) => p.evaluate(clocks),
            Condition::Not(inner) => !inner.evaluate(clocks),
            Condition::And(lhs, rhs) => lhs.evaluate(clocks) && rhs.evaluate(clocks),
            Condition::Or(lhs, rhs) => lhs.evaluate(clocks) || rhs.evaluate(clocks),
        }
    }
}

/// evaluate a condition with both clocks on `date`
pub fn evaluate(condition: &str, date: NaiveDate) -> Result<bool, ConditionError> {
    evaluate_with(condition, &Clocks::fixed(date))
}

/// evaluate a condition against explicit row and anchor clocks
pub fn evaluate_with(condition: &str, clocks: &Clocks) -> Result<bool, ConditionError> {
    let cleaned = normalize(condition);

    if is_lone_unknown_word(&cleaned) {
        debug!(condition = %cleaned, "rejecting lone word");
        return Err(ConditionError::safety(&cleaned));
    }

    let normalized = normalize_bracket_lists(&cleaned);
    let tokens = tokenize(&normalized);
    let reduction = reduce(&normalized, &tokens);

    if let Some(err) = reduction.errors.first() {
        debug!(condition = %normalized, error = %err, "condition names unknown values");
        return Err(err);
    }

    let processed = reduction.processed(&normalized, |p| p.evaluate(clocks));
    debug!(
        condition = %normalized,
        processed = %processed,
        shorthand = reduction.shorthand,
        predicates = reduction.predicates().count(),
        "reduced condition"
    );

    if reduction.items.is_empty() || !processed.chars().all(is_boolean_char) {
        return Err(ConditionError::safety(&processed));
    }

    // residue left here is stray operator text the grammar rejects

    let tree = logic::parse(&reduction.items, &normalized)?;
    let value = tree.evaluate(clocks);
    debug!(tree = %tree, value, "evaluated condition");

    Ok(value)
}

/// characters a fully reduced condition may contain
fn is_boolean_char(c: char) -> bool {
    matches!(c, '0' | '1' | '(' | ')' | '!' | '<' | '>' | '=' | '&' | '|') || c.is_whitespace()
}

/// a single alphabetic word that is not a day name or day class
fn is_lone_unknown_word(condition: &str) -> bool {
    !condition.is_empty()
        && condition.bytes().all(|b| b.is_ascii_alphabetic())
        && parse_weekday(condition).is_none()
        && DayClass::parse(condition).is_none()
}

/// serializable outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Result<bool, ConditionError>> for EvaluationResult {
    fn from(result: Result<bool, ConditionError>) -> Self {
        match result {
            Ok(value) => Self {
                ok: true,
                value: Some(value),
                kind: None,
                message: None,
            },
            Err(err) => Self {
                ok: false,
                value: None,
                kind: Some(err.kind),
                message: Some(err.message),
            },
        }
    }
}
