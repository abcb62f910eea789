//! core types for the condition system

use std::fmt;

use chrono::Weekday;

use super::calendar::{day_name, month_name};

/// comparison operators supported in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// equality: ==, is
    Eq,
    /// inequality: !=, is not
    Ne,
    /// greater than: >
    Gt,
    /// greater than or equal: >=
    Gte,
    /// less than: <
    Lt,
    /// less than or equal: <=
    Lte,
}

impl CompareOp {
    /// parse operator from its symbol
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }

    /// only == and != make sense for weekdays
    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    pub fn apply<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Gte => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Lte => lhs <= rhs,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Ne => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

/// which day a day comparison looks at, relative to the row clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySubject {
    Day,
    Today,
    Tomorrow,
    Yesterday,
    /// day+N / day-N
    Offset(i64),
}

impl DaySubject {
    /// calendar days between the row clock and the compared day
    pub fn offset(self) -> i64 {
        match self {
            DaySubject::Day | DaySubject::Today => 0,
            DaySubject::Tomorrow => 1,
            DaySubject::Yesterday => -1,
            DaySubject::Offset(n) => n,
        }
    }
}

impl fmt::Display for DaySubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaySubject::Day => write!(f, "day"),
            DaySubject::Today => write!(f, "today"),
            DaySubject::Tomorrow => write!(f, "tomorrow"),
            DaySubject::Yesterday => write!(f, "yesterday"),
            DaySubject::Offset(n) => write!(f, "day{:+}", n),
        }
    }
}

/// weekday/weekend classification (workday and businessday map to Weekday)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClass {
    Weekday,
    Weekend,
}

impl DayClass {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weekday" | "workday" | "businessday" => Some(DayClass::Weekday),
            "weekend" => Some(DayClass::Weekend),
            _ => None,
        }
    }
}

impl fmt::Display for DayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayClass::Weekday => write!(f, "weekday"),
            DayClass::Weekend => write!(f, "weekend"),
        }
    }
}

/// position of a weekday within its month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordinal {
    /// 1st..5th; anything else never matches
    Nth(u32),
    Last,
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ordinal::Last => write!(f, "last"),
            Ordinal::Nth(n) => {
                let suffix = match (n % 10, n % 100) {
                    (_, 11..=13) => "th",
                    (1, _) => "st",
                    (2, _) => "nd",
                    (3, _) => "rd",
                    _ => "th",
                };
                write!(f, "{}{}", n, suffix)
            }
        }
    }
}

/// a single calendar test, resolved to true/false against the clocks
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `day is mon`, `today != fri`, `tomorrow is tue`, `day+2 == wed`
    DayComparison {
        subject: DaySubject,
        op: CompareOp,
        target: Weekday,
    },
    /// bare `day+N`: the row weekday equals the weekday N days later
    DayOffset { offset: i64 },
    /// `day in [mon..fri, sun]`, already expanded
    DayRange(Vec<Weekday>),
    /// `weekday`, `is not weekend`, ... (anchor clock)
    DayClass { class: DayClass, negated: bool },
    /// `2nd monday`, `last fri of month`, `today is not 1st sun`
    OrdinalWeekday {
        ordinal: Ordinal,
        weekday: Weekday,
        negated: bool,
    },
    /// `month >= nov`, `month == 3` (anchor clock)
    MonthComparison { op: CompareOp, month: u32 },
    /// `month in [nov..feb]`, already expanded (anchor clock)
    MonthRange(Vec<u32>),
    /// `year < 2030` (anchor clock)
    YearComparison { op: CompareOp, year: i32 },
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::DayComparison {
                subject,
                op,
                target,
            } => write!(f, "{} {} {}", subject, op, day_name(*target)),
            Predicate::DayOffset { offset } => write!(f, "{}", DaySubject::Offset(*offset)),
            Predicate::DayRange(days) => {
                let names: Vec<&str> = days.iter().map(|d| day_name(*d)).collect();
                write!(f, "day in [{}]", names.join(", "))
            }
            Predicate::DayClass { class, negated } => {
                if *negated {
                    write!(f, "is not {}", class)
                } else {
                    write!(f, "is {}", class)
                }
            }
            Predicate::OrdinalWeekday {
                ordinal,
                weekday,
                negated,
            } => {
                if *negated {
                    write!(f, "not ")?;
                }
                write!(f, "{} {}", ordinal, day_name(*weekday))
            }
            Predicate::MonthComparison { op, month } => match month_name(*month) {
                Some(name) => write!(f, "month {} {}", op, name),
                None => write!(f, "month {} {}", op, month),
            },
            Predicate::MonthRange(months) => {
                let nums: Vec<String> = months.iter().map(|m| m.to_string()).collect();
                write!(f, "month in [{}]", nums.join(", "))
            }
            Predicate::YearComparison { op, year } => write!(f, "year {} {}", op, year),
        }
    }
}

/// the condition AST - boolean structure over predicates
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// a bare 0 or 1
    Literal(bool),
    Predicate(Predicate),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// create an AND condition
    pub fn and(lhs: Condition, rhs: Condition) -> Self {
        Condition::And(Box::new(lhs), Box::new(rhs))
    }

    /// create an OR condition
    pub fn or(lhs: Condition, rhs: Condition) -> Self {
        Condition::Or(Box::new(lhs), Box::new(rhs))
    }

    /// create a NOT condition
    #[allow(clippy::should_implement_trait)]
    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// number of predicates in the tree
    pub fn predicate_count(&self) -> usize {
        match self {
            Condition::Literal(_) => 0,
            Condition::Predicate(_) => 1,
            Condition::Not(inner) => inner.predicate_count(),
            Condition::And(l, r) | Condition::Or(l, r) => l.predicate_count() + r.predicate_count(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Literal(b) => write!(f, "{}", if *b { 1 } else { 0 }),
            Condition::Predicate(p) => write!(f, "{}", p),
            Condition::Not(inner) => write!(f, "not({})", inner),
            Condition::And(l, r) => write!(f, "and({}, {})", l, r),
            Condition::Or(l, r) => write!(f, "or({}, {})", l, r),
        }
    }
}
