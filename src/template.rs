//! `<ifday>` blocks in page text
//!
//! a block looks like `<ifday CONDITION>shown if true<else>shown if false</ifday>`;
//! the `<else>` part is optional. matching is case-insensitive and spans newlines.

use std::ops::Range;

use chrono::{Duration, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::conditions::{evaluate_with, Clocks};

lazy_static! {
    static ref BLOCK: Regex = Regex::new(r"(?is)<ifday\s+(.*?)>(.*?)</ifday>").unwrap();
    static ref ELSE: Regex = Regex::new(r"(?i)<else>").unwrap();
}

/// shortest cache lifetime handed out, in seconds
const MIN_CACHE_AGE: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// byte span of the whole block in the page text
    pub span: Range<usize>,
    /// trimmed condition text
    pub condition: String,
    pub if_content: String,
    pub else_content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// replace failing blocks with a visible error banner
    pub show_errors: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_errors: true }
    }
}

/// find every `<ifday>` block in `text`, in order
pub fn extract_blocks(text: &str) -> Vec<Block> {
    BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let condition = caps.get(1)?.as_str().trim().to_string();
            let body = caps.get(2)?.as_str();

            let (if_content, else_content) = match ELSE.find(body) {
                Some(m) => (&body[..m.start()], Some(body[m.end()..].to_string())),
                None => (body, None),
            };

            Some(Block {
                span: whole.range(),
                condition,
                if_content: if_content.to_string(),
                else_content,
            })
        })
        .collect()
}

/// replace every block with the content its condition selects
pub fn render(text: &str, clocks: &Clocks, options: &RenderOptions) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for block in extract_blocks(text) {
        out.push_str(&text[last..block.span.start]);
        out.push_str(&render_block(&block, clocks, options));
        last = block.span.end;
    }

    out.push_str(&text[last..]);
    out
}

/// the text a single block renders to
pub fn render_block(block: &Block, clocks: &Clocks, options: &RenderOptions) -> String {
    match evaluate_with(&block.condition, clocks) {
        Ok(true) => {
            debug!(condition = %block.condition, "condition true, showing content");
            block.if_content.clone()
        }
        Ok(false) => {
            debug!(condition = %block.condition, "condition false, hiding content");
            block.else_content.clone().unwrap_or_default()
        }
        Err(err) => {
            warn!(condition = %block.condition, error = %err, "ifday condition failed");
            if options.show_errors {
                error_banner(&block.condition, &err.message)
            } else {
                String::new()
            }
        }
    }
}

/// visible error shown in place of a failing block
pub fn error_banner(condition: &str, message: &str) -> String {
    format!(
        "<div class=\"plugin_ifday_error\">ifday plugin error evaluating condition: \"{}\"<br><strong>Details:</strong> {}</div>",
        escape_html(condition),
        escape_html(message)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// seconds a rendered page stays valid, or None when it has no `<ifday` blocks
///
/// results can only change at midnight, so pages live until the next one
pub fn cache_age(text: &str, now: NaiveDateTime) -> Option<u64> {
    if !text.to_ascii_lowercase().contains("<ifday") {
        return None;
    }

    let next_midnight = (now.date() + Duration::days(1)).and_hms_opt(0, 0, 0)?;
    let seconds = (next_midnight - now).num_seconds().max(0) as u64;
    Some(seconds.max(MIN_CACHE_AGE))
}
