//! token reducer
//!
//! walks the token stream once, folding every calendar phrase into a
//! [`Predicate`] and every logical keyword into an operator item. anything
//! outside the condition language is kept as residue so the processed text
//! can be reported back verbatim.

use std::ops::Range;

use chrono::Weekday;

use super::calendar::{expand_day_range, expand_month_range, parse_month, parse_weekday};
use super::error::ConditionError;
use super::lexer::{Token, TokenKind};
use super::types::{CompareOp, DayClass, DaySubject, Ordinal, Predicate};

/// words that switch off shorthand day lists
const CANONICAL_KEYWORDS: [&str; 5] = ["day", "today", "tomorrow", "yesterday", "is"];

/// logical keywords, recognized in every mode
const LOGIC_WORDS: [&str; 3] = ["and", "or", "not"];

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Predicate(Predicate),
    /// a bare 0 or 1
    Literal(bool),
    And,
    Or,
    Not,
    LParen,
    RParen,
    /// a phrase naming an unknown day or month, or a broken range
    Invalid,
    /// text outside the condition language
    Residue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    /// byte span in the normalized condition
    pub span: Range<usize>,
}

/// domain errors collected over the whole condition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainErrors {
    pub invalid_days: Vec<String>,
    pub invalid_months: Vec<String>,
    pub incomplete_ranges: Vec<String>,
}

impl DomainErrors {
    pub fn is_empty(&self) -> bool {
        self.invalid_days.is_empty()
            && self.invalid_months.is_empty()
            && self.incomplete_ranges.is_empty()
    }

    fn merge(&mut self, other: DomainErrors) {
        self.invalid_days.extend(other.invalid_days);
        self.invalid_months.extend(other.invalid_months);
        self.incomplete_ranges.extend(other.incomplete_ranges);
    }

    /// the error to report: days first, then months, then ranges
    pub fn first(&self) -> Option<ConditionError> {
        if !self.invalid_days.is_empty() {
            return Some(ConditionError::invalid_days(self.invalid_days.clone()));
        }
        if !self.invalid_months.is_empty() {
            return Some(ConditionError::invalid_months(self.invalid_months.clone()));
        }
        if !self.incomplete_ranges.is_empty() {
            return Some(ConditionError::incomplete_range(
                self.incomplete_ranges.clone(),
            ));
        }
        None
    }
}

/// output of [`reduce`]
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub items: Vec<Item>,
    pub errors: DomainErrors,
    /// whether bare day names were read as predicates
    pub shorthand: bool,
}

impl Reduction {
    pub fn has_residue(&self) -> bool {
        self.items.iter().any(|item| item.kind == ItemKind::Residue)
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Predicate(p) => Some(p),
            _ => None,
        })
    }

    /// rebuild the condition text with predicates replaced by `1`/`0` and
    /// logical keywords by `&&`, `||`, `!`; residue is copied verbatim
    pub fn processed(&self, source: &str, mut value_of: impl FnMut(&Predicate) -> bool) -> String {
        let mut out = String::with_capacity(source.len());
        let mut last = 0;

        for item in &self.items {
            out.push_str(&source[last..item.span.start]);
            match &item.kind {
                ItemKind::Predicate(p) => out.push(if value_of(p) { '1' } else { '0' }),
                ItemKind::Literal(value) => out.push(if *value { '1' } else { '0' }),
                ItemKind::And => out.push_str("&&"),
                ItemKind::Or => out.push_str("||"),
                ItemKind::Not => out.push('!'),
                ItemKind::LParen => out.push('('),
                ItemKind::RParen => out.push(')'),
                ItemKind::Invalid | ItemKind::Residue => out.push_str(&source[item.span.clone()]),
            }
            last = item.span.end;
        }

        out.push_str(&source[last..]);
        out
    }
}

/// true when bare day names should be read as `day is <name>`
///
/// shorthand is off as soon as a canonical keyword, a comparison, a bracket,
/// a number or any other punctuation shows up
pub fn shorthand_applies(tokens: &[Token]) -> bool {
    !tokens.is_empty()
        && tokens.iter().all(|token| match &token.kind {
            TokenKind::Word(w) => !CANONICAL_KEYWORDS.contains(&w.as_str()),
            TokenKind::Ordinal(_)
            | TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::Comma
            | TokenKind::Pipe
            | TokenKind::OrOr
            | TokenKind::Amp
            | TokenKind::AndAnd => true,
            _ => false,
        })
}

/// reduce the tokens of `source` (the normalized condition) to items
pub fn reduce(source: &str, tokens: &[Token]) -> Reduction {
    let reducer = Reducer {
        source,
        tokens,
        shorthand: shorthand_applies(tokens),
    };

    let mut items = Vec::with_capacity(tokens.len());
    let mut errors = DomainErrors::default();
    let mut pos = 0;

    while pos < tokens.len() {
        if let Some((found, end)) = reducer.match_predicate(pos) {
            let kind = match found {
                Found::Predicate(p) => ItemKind::Predicate(p),
                Found::Invalid(e) => {
                    errors.merge(e);
                    ItemKind::Invalid
                }
            };
            items.push(Item {
                kind,
                span: reducer.span(pos, end),
            });
            pos = end;
            continue;
        }

        let token = &tokens[pos];
        items.push(Item {
            kind: reducer.classify(token),
            span: token.span.clone(),
        });
        pos += 1;
    }

    Reduction {
        items,
        errors,
        shorthand: reducer.shorthand,
    }
}

/// a recognized calendar phrase
enum Found {
    Predicate(Predicate),
    Invalid(DomainErrors),
}

impl Found {
    fn invalid_day(name: &str) -> Self {
        Found::Invalid(DomainErrors {
            invalid_days: vec![name.to_string()],
            ..Default::default()
        })
    }

    fn invalid_month(name: &str) -> Self {
        Found::Invalid(DomainErrors {
            invalid_months: vec![name.to_string()],
            ..Default::default()
        })
    }

    fn day(name: &str, build: impl FnOnce(Weekday) -> Predicate) -> Self {
        match parse_weekday(name) {
            Some(day) => Found::Predicate(build(day)),
            None => Found::invalid_day(name),
        }
    }

    /// flip an ordinal phrase for `is not` / `!=`
    fn negated_if(self, negate: bool) -> Self {
        match self {
            Found::Predicate(Predicate::OrdinalWeekday {
                ordinal,
                weekday,
                negated,
            }) => Found::Predicate(Predicate::OrdinalWeekday {
                ordinal,
                weekday,
                negated: negated ^ negate,
            }),
            other => other,
        }
    }
}

/// values collected from one `[...]` list
struct ListValues<T> {
    values: Vec<T>,
    invalid: Vec<String>,
    incomplete: Vec<String>,
}

impl<T: PartialEq> ListValues<T> {
    fn push(&mut self, value: T) {
        if !self.values.contains(&value) {
            self.values.push(value);
        }
    }
}

struct Reducer<'a> {
    source: &'a str,
    tokens: &'a [Token],
    shorthand: bool,
}

impl<'a> Reducer<'a> {
    fn kind_at(&self, i: usize) -> Option<&'a TokenKind> {
        self.tokens.get(i).map(|t| &t.kind)
    }

    fn word_at(&self, i: usize) -> Option<&'a str> {
        self.tokens.get(i).and_then(Token::word)
    }

    fn span(&self, from: usize, to: usize) -> Range<usize> {
        self.tokens[from].span.start..self.tokens[to - 1].span.end
    }

    /// lowercased source text covered by `tokens`
    fn text(&self, tokens: &[Token]) -> String {
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => self.source[first.span.start..last.span.end].to_lowercase(),
            _ => String::new(),
        }
    }

    /// try every phrase shape at `i`; returns the phrase and the index past it
    fn match_predicate(&self, i: usize) -> Option<(Found, usize)> {
        self.match_subject_comparison(i)
            .or_else(|| self.match_day_offset(i))
            .or_else(|| self.match_day_list(i))
            .or_else(|| self.match_month(i))
            .or_else(|| self.match_year(i))
            .or_else(|| self.match_is_class(i))
            .or_else(|| self.match_bare_class(i))
            .or_else(|| self.match_ordinal(i))
            .or_else(|| self.match_shorthand_day(i))
    }

    /// `is`, `is not`, `==` or `!=`
    fn match_equality(&self, i: usize) -> Option<(CompareOp, usize)> {
        match self.kind_at(i)? {
            TokenKind::Compare(op) if op.is_equality() => Some((*op, i + 1)),
            TokenKind::Word(w) if w == "is" => {
                if self.word_at(i + 1) == Some("not") {
                    Some((CompareOp::Ne, i + 2))
                } else {
                    Some((CompareOp::Eq, i + 1))
                }
            }
            _ => None,
        }
    }

    /// `day is mon`, `today != fri`, `yesterday == sun`, `today is 2nd monday`
    fn match_subject_comparison(&self, i: usize) -> Option<(Found, usize)> {
        let subject = match self.word_at(i)? {
            "day" => DaySubject::Day,
            "today" => DaySubject::Today,
            "tomorrow" => DaySubject::Tomorrow,
            "yesterday" => DaySubject::Yesterday,
            _ => return None,
        };
        let (op, next) = self.match_equality(i + 1)?;

        if matches!(subject, DaySubject::Day | DaySubject::Today) {
            if let Some((found, end)) = self.match_ordinal(next) {
                return Some((found.negated_if(op == CompareOp::Ne), end));
            }
        }

        // `day is weekday` leaves `day` behind and reads `is weekday` alone;
        // any other subject or `==`/`!=` treats the class word as a bad day
        let target = self.word_at(next)?;
        let via_is = self.word_at(i + 1) == Some("is");
        if subject == DaySubject::Day && via_is && DayClass::parse(target).is_some() {
            return None;
        }

        let found = Found::day(target, |day| Predicate::DayComparison {
            subject,
            op,
            target: day,
        });
        Some((found, next + 1))
    }

    /// `day+N`, `day-N`, optionally followed by `== <day>` / `!= <day>`
    fn match_day_offset(&self, i: usize) -> Option<(Found, usize)> {
        if self.word_at(i)? != "day" {
            return None;
        }
        let sign = match self.kind_at(i + 1)? {
            TokenKind::Plus => 1,
            TokenKind::Minus => -1,
            _ => return None,
        };
        let digits = match self.kind_at(i + 2)? {
            TokenKind::Number(d) => d,
            _ => return None,
        };
        if !self.tokens[i + 1].is_adjacent_to(&self.tokens[i + 2]) {
            return None;
        }
        let offset = sign * digits.parse::<i64>().ok()?;

        if let Some(TokenKind::Compare(op)) = self.kind_at(i + 3) {
            if op.is_equality() {
                if let Some(target) = self.word_at(i + 4) {
                    let op = *op;
                    let found = Found::day(target, |day| Predicate::DayComparison {
                        subject: DaySubject::Offset(offset),
                        op,
                        target: day,
                    });
                    return Some((found, i + 5));
                }
            }
        }

        Some((Found::Predicate(Predicate::DayOffset { offset }), i + 3))
    }

    /// `day in [mon..fri, sun]`
    fn match_day_list(&self, i: usize) -> Option<(Found, usize)> {
        if self.word_at(i)? != "day" || self.word_at(i + 1)? != "in" {
            return None;
        }
        let (list, end) = self.parse_list(
            i + 2,
            |token| token_name(token).and_then(parse_weekday),
            expand_day_range,
        )?;

        if list.invalid.is_empty() && list.incomplete.is_empty() {
            return Some((Found::Predicate(Predicate::DayRange(list.values)), end));
        }
        let errors = DomainErrors {
            invalid_days: list.invalid,
            incomplete_ranges: list.incomplete,
            ..Default::default()
        };
        Some((Found::Invalid(errors), end))
    }

    /// `month >= nov`, `month == 3`, `month in [nov..feb]`
    fn match_month(&self, i: usize) -> Option<(Found, usize)> {
        if self.word_at(i)? != "month" {
            return None;
        }

        if self.word_at(i + 1) == Some("in") {
            let (list, end) = self.parse_list(i + 2, month_value, expand_month_range)?;
            if list.invalid.is_empty() && list.incomplete.is_empty() {
                return Some((Found::Predicate(Predicate::MonthRange(list.values)), end));
            }
            let errors = DomainErrors {
                invalid_months: list.invalid,
                incomplete_ranges: list.incomplete,
                ..Default::default()
            };
            return Some((Found::Invalid(errors), end));
        }

        let op = match self.kind_at(i + 1)? {
            TokenKind::Compare(op) => *op,
            _ => return None,
        };
        let value = self.tokens.get(i + 2)?;
        if !matches!(value.kind, TokenKind::Word(_) | TokenKind::Number(_)) {
            return None;
        }
        let found = match month_value(value) {
            Some(month) => Found::Predicate(Predicate::MonthComparison { op, month }),
            None => Found::invalid_month(&self.text(std::slice::from_ref(value))),
        };
        Some((found, i + 3))
    }

    /// `year < 2030`
    fn match_year(&self, i: usize) -> Option<(Found, usize)> {
        if self.word_at(i)? != "year" {
            return None;
        }
        let op = match self.kind_at(i + 1)? {
            TokenKind::Compare(op) => *op,
            _ => return None,
        };
        let year = match self.kind_at(i + 2)? {
            TokenKind::Number(d) if d.len() <= 4 => d.parse::<i32>().ok()?,
            _ => return None,
        };
        Some((
            Found::Predicate(Predicate::YearComparison { op, year }),
            i + 3,
        ))
    }

    /// `is weekday`, `is not weekend`
    fn match_is_class(&self, i: usize) -> Option<(Found, usize)> {
        if self.word_at(i)? != "is" {
            return None;
        }
        let (negated, next) = if self.word_at(i + 1) == Some("not") {
            (true, i + 2)
        } else {
            (false, i + 1)
        };
        let class = DayClass::parse(self.word_at(next)?)?;
        Some((
            Found::Predicate(Predicate::DayClass { class, negated }),
            next + 1,
        ))
    }

    /// bare `weekday`, `workday`, `businessday`, `weekend`
    fn match_bare_class(&self, i: usize) -> Option<(Found, usize)> {
        let class = DayClass::parse(self.word_at(i)?)?;
        Some((
            Found::Predicate(Predicate::DayClass {
                class,
                negated: false,
            }),
            i + 1,
        ))
    }

    /// `2nd monday`, `last fri of month`
    fn match_ordinal(&self, i: usize) -> Option<(Found, usize)> {
        let ordinal = match self.kind_at(i)? {
            TokenKind::Ordinal(n) => Ordinal::Nth(n.unwrap_or(0)),
            TokenKind::Word(w) if w == "last" => Ordinal::Last,
            _ => return None,
        };
        let day_word = self.word_at(i + 1)?;

        let mut end = i + 2;
        if self.word_at(end) == Some("of") && self.word_at(end + 1) == Some("month") {
            end += 2;
        }

        let found = Found::day(day_word, |weekday| Predicate::OrdinalWeekday {
            ordinal,
            weekday,
            negated: false,
        });
        Some((found, end))
    }

    /// in shorthand mode every non-logical word names a day
    fn match_shorthand_day(&self, i: usize) -> Option<(Found, usize)> {
        if !self.shorthand {
            return None;
        }
        let word = self.word_at(i)?;
        if LOGIC_WORDS.contains(&word) {
            return None;
        }
        let found = Found::day(word, |day| Predicate::DayComparison {
            subject: DaySubject::Day,
            op: CompareOp::Eq,
            target: day,
        });
        Some((found, i + 1))
    }

    /// parse `[item, item..item, ...]` starting at the `[` at `open`
    fn parse_list<T: Copy + PartialEq>(
        &self,
        open: usize,
        resolve: impl Fn(&Token) -> Option<T>,
        expand: impl Fn(T, T) -> Vec<T>,
    ) -> Option<(ListValues<T>, usize)> {
        if *self.kind_at(open)? != TokenKind::LBracket {
            return None;
        }
        let close = open
            + 1
            + self.tokens[open + 1..]
                .iter()
                .position(|t| t.kind == TokenKind::RBracket)?;

        let mut list = ListValues {
            values: Vec::new(),
            invalid: Vec::new(),
            incomplete: Vec::new(),
        };

        for entry in self.tokens[open + 1..close].split(|t| t.kind == TokenKind::Comma) {
            if entry.is_empty() {
                continue;
            }
            let sides: Vec<&[Token]> = entry.split(|t| t.kind == TokenKind::DotDot).collect();
            match sides.as_slice() {
                [single] => match self.resolve_side(single, &resolve) {
                    Ok(value) => list.push(value),
                    Err(name) => list.invalid.push(name),
                },
                [start, end] if !start.is_empty() && !end.is_empty() => {
                    match (
                        self.resolve_side(start, &resolve),
                        self.resolve_side(end, &resolve),
                    ) {
                        (Ok(start), Ok(end)) => {
                            for value in expand(start, end) {
                                list.push(value);
                            }
                        }
                        (start, end) => {
                            list.invalid.extend(start.err());
                            list.invalid.extend(end.err());
                        }
                    }
                }
                // `mon..` or `..fri`, and `mon..tue..wed` with more than two sides
                _ => list.incomplete.push(self.text(entry)),
            }
        }

        Some((list, close + 1))
    }

    /// one list endpoint must be a single known name
    fn resolve_side<T>(
        &self,
        side: &[Token],
        resolve: &impl Fn(&Token) -> Option<T>,
    ) -> Result<T, String> {
        match side {
            [token] => resolve(token).ok_or_else(|| self.text(side)),
            _ => Err(self.text(side)),
        }
    }

    fn classify(&self, token: &Token) -> ItemKind {
        match &token.kind {
            TokenKind::Word(w) if w == "and" => ItemKind::And,
            TokenKind::Word(w) if w == "or" => ItemKind::Or,
            TokenKind::Word(w) if w == "not" => ItemKind::Not,
            TokenKind::AndAnd => ItemKind::And,
            TokenKind::OrOr => ItemKind::Or,
            TokenKind::Bang => ItemKind::Not,
            TokenKind::LParen => ItemKind::LParen,
            TokenKind::RParen => ItemKind::RParen,
            TokenKind::Comma | TokenKind::Pipe if self.shorthand => ItemKind::Or,
            TokenKind::Amp if self.shorthand => ItemKind::And,
            TokenKind::Number(d) if d == "0" => ItemKind::Literal(false),
            TokenKind::Number(d) if d == "1" => ItemKind::Literal(true),
            _ => ItemKind::Residue,
        }
    }
}

fn token_name(token: &Token) -> Option<&str> {
    match &token.kind {
        TokenKind::Word(w) => Some(w),
        TokenKind::Number(d) => Some(d),
        _ => None,
    }
}

/// month name, or a one or two digit month number
fn month_value(token: &Token) -> Option<u32> {
    match &token.kind {
        TokenKind::Word(w) => parse_month(w),
        TokenKind::Number(d) if d.len() <= 2 => parse_month(d),
        _ => None,
    }
}
