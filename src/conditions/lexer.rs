//! tokenizer for normalized condition text
//!
//! every token keeps the byte span it came from so the reducer can rebuild
//! the processed condition text for error messages

use std::ops::Range;

use super::types::CompareOp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// alphabetic word, lowercased ("day", "mon", "and", ...)
    Word(String),
    /// run of ascii digits
    Number(String),
    /// ordinal like "2nd"; None when the number does not fit
    Ordinal(Option<u32>),
    /// ==, !=, <, <=, >, >=
    Compare(CompareOp),
    /// &&
    AndAnd,
    /// ||
    OrOr,
    /// !
    Bang,
    /// single & (shorthand glue)
    Amp,
    /// single | (shorthand glue)
    Pipe,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// ..
    DotDot,
    Plus,
    Minus,
    /// anything else, kept verbatim
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    fn new(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// lowercased word text, if this token is a word
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(w) => Some(w),
            _ => None,
        }
    }

    /// true when the two tokens touch with no whitespace between them
    pub fn is_adjacent_to(&self, next: &Token) -> bool {
        self.span.end == next.span.start
    }
}

/// split a condition into tokens, skipping whitespace
pub fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if b.is_ascii_alphabetic() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }
            let word = input[start..i].to_ascii_lowercase();
            tokens.push(Token::new(TokenKind::Word(word), start..i));
            continue;
        }

        if b.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let digits_end = i;
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }

            let digits = &input[start..digits_end];
            let kind = if digits_end == i {
                TokenKind::Number(digits.to_string())
            } else {
                let suffix = input[digits_end..i].to_ascii_lowercase();
                if matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") {
                    TokenKind::Ordinal(digits.parse().ok())
                } else {
                    TokenKind::Other(input[start..i].to_string())
                }
            };
            tokens.push(Token::new(kind, start..i));
            continue;
        }

        // two-character operators win over their one-character prefixes
        if let Some((op, len)) = [2, 1]
            .into_iter()
            .find_map(|len| Some((CompareOp::parse(input.get(i..i + len)?)?, len)))
        {
            tokens.push(Token::new(TokenKind::Compare(op), i..i + len));
            i += len;
            continue;
        }

        let next = bytes.get(i + 1).copied();
        let (kind, len) = match (b, next) {
            (b'&', Some(b'&')) => (TokenKind::AndAnd, 2),
            (b'|', Some(b'|')) => (TokenKind::OrOr, 2),
            (b'.', Some(b'.')) => (TokenKind::DotDot, 2),
            (b'!', _) => (TokenKind::Bang, 1),
            (b'&', _) => (TokenKind::Amp, 1),
            (b'|', _) => (TokenKind::Pipe, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            (b'[', _) => (TokenKind::LBracket, 1),
            (b']', _) => (TokenKind::RBracket, 1),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            _ => {
                // keep multi-byte characters whole
                let len = input[i..].chars().next().map_or(1, char::len_utf8);
                (TokenKind::Other(input[i..i + len].to_string()), len)
            }
        };
        tokens.push(Token::new(kind, i..i + len));
        i += len;
    }

    tokens
}
