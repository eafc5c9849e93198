// include-fixer/src/rewrite.rs
//! Line rewriter: picks `"..."` or `<...>` for each `#include` line.
//!
//! Works on raw bytes so sources in any ASCII-compatible encoding (Latin-1
//! comments, stray binary) pass through untouched. Matching is single-line
//! and regex based. Line continuations, conditional compilation and
//! include-like text inside block comments are not understood; such lines are
//! either matched as plain includes or passed through.

use regex::bytes::Regex;
use std::{
    borrow::Cow,
    sync::LazyLock
};
use crate::inventory::HeaderInventory;


pub const DEFAULT_PROJECT_PREFIX: &str = "serene/";

// lead (optional UTF-8 BOM) | <angle> | "quoted" | rest
static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?-u)^((?:\xEF\xBB\xBF)?\s*#\s*include\s*)(?:<([^<>"]+)>|"([^<>"]+)")(.*)$"#)
        .unwrap_or_else(|e| panic!("hardcoded include regex must compile: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Quoted,
    Angle,
}

impl Delimiter {
    fn open(self) -> u8 {
        match self {
            Delimiter::Quoted => b'"',
            Delimiter::Angle => b'<',
        }
    }

    fn close(self) -> u8 {
        match self {
            Delimiter::Quoted => b'"',
            Delimiter::Angle => b'>',
        }
    }
}

/// A matched include directive, borrowed from the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeLine<'a> {
    pub lead: &'a [u8],
    pub header: &'a [u8],
    pub delimiter: Delimiter,
    pub rest: &'a [u8],
}

impl IncludeLine<'_> {
    pub fn render(&self, delimiter: Delimiter) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.lead.len() + self.header.len() + self.rest.len() + 2);
        out.extend_from_slice(self.lead);
        out.push(delimiter.open());
        out.extend_from_slice(self.header);
        out.push(delimiter.close());
        out.extend_from_slice(self.rest);
        out
    }
}

/// Match a line body (no terminator) against the include pattern.
/// Mismatched delimiters such as `<foo.h"` do not match.
pub fn parse_include(body: &[u8]) -> Option<IncludeLine<'_>> {
    let caps = INCLUDE_RE.captures(body)?;
    let lead = caps.get(1)?.as_bytes();
    let (header, delimiter) = match (caps.get(2), caps.get(3)) {
        (Some(m), _) => (m.as_bytes(), Delimiter::Angle),
        (None, Some(m)) => (m.as_bytes(), Delimiter::Quoted),
        (None, None) => return None,
    };
    let rest = caps.get(4).map_or(&b""[..], |m| m.as_bytes());
    Some(IncludeLine { lead, header, delimiter, rest })
}

/// Output of rewriting a whole buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub text: Vec<u8>,
    pub changed_lines: usize,
}

impl Rewritten {
    pub fn changed(&self) -> bool {
        self.changed_lines > 0
    }
}

#[derive(Debug, Clone)]
pub struct IncludeRule {
    inventory: HeaderInventory,
    prefix: String,
}

impl IncludeRule {
    pub fn new(inventory: HeaderInventory, prefix: impl Into<String>) -> Self {
        Self { inventory, prefix: prefix.into() }
    }

    pub fn inventory(&self) -> &HeaderInventory {
        &self.inventory
    }

    /// Project headers (known, or under the namespace prefix) are quoted.
    /// A header name that is not UTF-8 can only match by prefix.
    pub fn delimiter_for(&self, header: &[u8]) -> Delimiter {
        let by_prefix = !self.prefix.is_empty() && header.starts_with(self.prefix.as_bytes());
        let known = std::str::from_utf8(header).is_ok_and(|h| self.inventory.contains(h));
        if by_prefix || known {
            Delimiter::Quoted
        } else {
            Delimiter::Angle
        }
    }

    /// Rewrite one line, terminator included. Borrowed when nothing changes.
    pub fn rewrite_line<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        let (body, terminator) = split_terminator(line);
        let Some(inc) = parse_include(body) else {
            return Cow::Borrowed(line);
        };
        let want = self.delimiter_for(inc.header);
        if want == inc.delimiter {
            return Cow::Borrowed(line);
        }
        let mut out = inc.render(want);
        out.extend_from_slice(terminator);
        Cow::Owned(out)
    }

    pub fn rewrite_source(&self, text: &[u8]) -> Rewritten {
        let mut out = Vec::with_capacity(text.len());
        let mut changed_lines = 0usize;
        for line in text.split_inclusive(|&b| b == b'\n') {
            match self.rewrite_line(line) {
                Cow::Borrowed(same) => out.extend_from_slice(same),
                Cow::Owned(fixed) => {
                    changed_lines += 1;
                    out.extend_from_slice(&fixed);
                }
            }
        }
        Rewritten { text: out, changed_lines }
    }
}

/* ----------------------------- helpers ----------------------------- */

fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    if let Some(body) = line.strip_suffix(b"\r\n") {
        (body, &line[body.len()..])
    } else if let Some(body) = line.strip_suffix(b"\n") {
        (body, &line[body.len()..])
    } else {
        (line, &line[line.len()..])
    }
}
