//! boolean grammar over reduced items
//!
//! ```text
//! expr  := or
//! or    := and ('||' and)*
//! and   := unary ('&&' unary)*
//! unary := '!' unary | '(' expr ')' | literal | predicate
//! ```

use super::error::ConditionError;
use super::parser::{Item, ItemKind};
use super::types::Condition;

/// deepest nesting of parentheses and negations accepted
const MAX_DEPTH: usize = 128;

/// build the condition tree; leftover residue items are unexpected tokens
pub fn parse(items: &[Item], source: &str) -> Result<Condition, ConditionError> {
    let mut parser = LogicParser {
        items,
        source,
        pos: 0,
        depth: 0,
    };

    let condition = parser.parse_or()?;
    if let Some(item) = parser.peek() {
        return Err(ConditionError::unexpected_token(&parser.describe(item)));
    }
    Ok(condition)
}

struct LogicParser<'a> {
    items: &'a [Item],
    source: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LogicParser<'a> {
    fn peek(&self) -> Option<&'a Item> {
        self.items.get(self.pos)
    }

    fn next_if(&mut self, kind: &ItemKind) -> bool {
        if self.peek().is_some_and(|item| item.kind == *kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// text used for an item in syntax error messages
    fn describe(&self, item: &Item) -> String {
        match &item.kind {
            ItemKind::And => "&&".to_string(),
            ItemKind::Or => "||".to_string(),
            ItemKind::Not => "!".to_string(),
            ItemKind::LParen => "(".to_string(),
            ItemKind::RParen => ")".to_string(),
            _ => self.source[item.span.clone()].to_string(),
        }
    }

    fn parse_or(&mut self) -> Result<Condition, ConditionError> {
        let mut lhs = self.parse_and()?;
        while self.next_if(&ItemKind::Or) {
            let rhs = self.parse_and()?;
            lhs = Condition::or(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Condition, ConditionError> {
        let mut lhs = self.parse_unary()?;
        while self.next_if(&ItemKind::And) {
            let rhs = self.parse_unary()?;
            lhs = Condition::and(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Condition, ConditionError> {
        let item = self.peek().ok_or_else(ConditionError::unexpected_end)?;

        match &item.kind {
            ItemKind::Not => {
                self.pos += 1;
                self.descend(item)?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(Condition::negate(inner))
            }
            ItemKind::LParen => {
                self.pos += 1;
                self.descend(item)?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                if !self.next_if(&ItemKind::RParen) {
                    return Err(match self.peek() {
                        Some(next) => ConditionError::unexpected_token(&self.describe(next)),
                        None => ConditionError::unexpected_end(),
                    });
                }
                Ok(inner)
            }
            ItemKind::Literal(value) => {
                self.pos += 1;
                Ok(Condition::Literal(*value))
            }
            ItemKind::Predicate(p) => {
                self.pos += 1;
                Ok(Condition::Predicate(p.clone()))
            }
            _ => Err(ConditionError::unexpected_token(&self.describe(item))),
        }
    }

    fn descend(&mut self, item: &Item) -> Result<(), ConditionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ConditionError::unexpected_token(&self.describe(item)));
        }
        Ok(())
    }
}
