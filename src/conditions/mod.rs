//! calendar condition language for `<ifday>` blocks
//!
//! supports:
//! - day tests: `day == mon`, `day is not sun`, `today is fri`, `tomorrow != sat`
//! - offsets: `day+1 == sat`, `day-2 == sun`
//! - day lists and wrapping ranges: `day in [mon..wed, fri]`, `day in [sat..mon]`
//! - day classes: `weekday`, `is not weekend`, `workday`, `businessday`
//! - ordinal weekdays: `2nd monday`, `last fri of month`, `today is not 1st sun`
//! - months and years: `month >= nov`, `month in [nov..feb]`, `year < 2030`
//! - shorthand day lists: `mon or tue`, `(mon, wed) | fri`, `not mon`
//! - logic: `AND OR NOT` / `&& || !` with parentheses
//!
//! evaluation normalizes the text, tokenizes it, reduces calendar phrases to
//! predicates, then parses the remaining boolean structure.

mod calendar;
mod error;
mod eval;
mod lexer;
mod logic;
mod normalize;
mod parser;
mod table;
mod types;

pub use calendar::{day_name, month_name, DAY_NAMES, MONTH_NAMES};
pub use error::{ConditionError, ErrorKind};
pub use eval::{evaluate, evaluate_with, Clocks, EvaluationResult};
pub use normalize::normalize_condition;
pub use table::{truth_table, TruthRow, TruthTable};
pub use types::{CompareOp, Condition, DayClass, DaySubject, Ordinal, Predicate};
