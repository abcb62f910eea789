//! week truth tables
//!
//! runs a condition once per weekday, on the most recent date before a base
//! date that falls on that weekday

use chrono::{NaiveDate, Weekday};

use super::calendar::{day_name, previous_weekday, WEEKDAYS};
use super::error::ConditionError;
use super::eval::{evaluate_with, Clocks, EvaluationResult};

#[derive(Debug, Clone, PartialEq)]
pub struct TruthRow {
    pub weekday: Weekday,
    pub clocks: Clocks,
    pub result: Result<bool, ConditionError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TruthTable {
    pub condition: String,
    pub base: NaiveDate,
    /// month, year and weekday/weekend stay on `base` for every row
    pub anchored: bool,
    pub rows: Vec<TruthRow>,
}

impl TruthTable {
    /// weekdays whose row evaluated to true
    pub fn true_days(&self) -> Vec<Weekday> {
        self.rows
            .iter()
            .filter(|row| row.result == Ok(true))
            .map(|row| row.weekday)
            .collect()
    }

    /// first failing row, if any
    pub fn error(&self) -> Option<&ConditionError> {
        self.rows.iter().find_map(|row| row.result.as_ref().err())
    }

    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                serde_json::json!({
                    "day": day_name(row.weekday),
                    "date": row.clocks.row.to_string(),
                    "result": EvaluationResult::from(row.result.clone()),
                })
            })
            .collect();

        serde_json::json!({
            "condition": self.condition,
            "base": self.base.to_string(),
            "anchored": self.anchored,
            "rows": rows,
        })
    }
}

/// evaluate `condition` for each weekday monday..sunday before `base`
pub fn truth_table(condition: &str, base: NaiveDate, anchored: bool) -> TruthTable {
    let rows = WEEKDAYS
        .iter()
        .filter_map(|weekday| {
            let row = previous_weekday(base, *weekday)?;
            let anchor = if anchored { base } else { row };
            let clocks = Clocks::new(row, anchor);
            Some(TruthRow {
                weekday: *weekday,
                clocks,
                result: evaluate_with(condition, &clocks),
            })
        })
        .collect();

    TruthTable {
        condition: condition.to_string(),
        base,
        anchored,
        rows,
    }
}
