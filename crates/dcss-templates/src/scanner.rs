use std::iter::FusedIterator;

use dcss_source::Span;

use crate::literal::coerce;
use crate::literal::Literal;
use crate::quotes::find_unquoted;
use crate::quotes::split_unquoted;
use crate::tokens::FilterCall;
use crate::tokens::Placeholder;
use crate::tokens::Segment;

const SIGIL: char = '$';

/// Splits stylesheet text into literal text and placeholders.
///
/// The scanner is a lazy, single-pass iterator: text between placeholders is
/// yielded as one [`Segment::Text`], and every `$` that does not start a
/// valid placeholder stays part of the surrounding text. Concatenating the
/// source of every yielded segment reproduces the input exactly.
///
/// ```
/// use dcss_templates::{Scanner, Segment};
///
/// let segments: Vec<_> = Scanner::new("a { color: $primary; }").collect();
/// assert_eq!(segments.len(), 3);
/// assert!(matches!(&segments[1], Segment::Placeholder(p) if p.name == "primary"));
/// ```
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    current: usize,
    pending: Option<Placeholder>,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            current: 0,
            pending: None,
        }
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn text(&self, start: usize, end: usize) -> Segment<'a> {
        Segment::Text {
            text: &self.source[start..end],
            span: Span::saturating_from_bounds_usize(start, end),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(placeholder) = self.pending.take() {
            return Some(Segment::Placeholder(placeholder));
        }

        if self.is_at_end() {
            return None;
        }

        let text_start = self.current;
        let mut cursor = self.current;

        while let Some(offset) = self.source[cursor..].find(SIGIL) {
            let sigil = cursor + offset;

            if let Some(placeholder) = PlaceholderParser::new(self.source, sigil).parse() {
                self.current = placeholder.span.end_usize();
                if sigil == text_start {
                    return Some(Segment::Placeholder(placeholder));
                }
                self.pending = Some(placeholder);
                return Some(self.text(text_start, sigil));
            }

            // Not a placeholder, the `$` is plain text.
            cursor = sigil + SIGIL.len_utf8();
        }

        self.current = self.source.len();
        Some(self.text(text_start, self.current))
    }
}

impl FusedIterator for Scanner<'_> {}

/// Parses a single placeholder starting at a `$`.
///
/// Every optional part (subscript, filter call) is parsed from a checkpoint:
/// if it turns out malformed the cursor is restored and the placeholder ends
/// right before it.
struct PlaceholderParser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    start: usize,
    pos: usize,
}

impl<'a> PlaceholderParser<'a> {
    fn new(source: &'a str, start: usize) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            start,
            pos: start + SIGIL.len_utf8(),
        }
    }

    fn parse(mut self) -> Option<Placeholder> {
        let name = self.scan_name()?;

        let mut subscripts = Vec::new();
        while let Some(key) = self.parse_subscript() {
            subscripts.push(key);
        }

        let mut filters = Vec::new();
        while let Some(filter) = self.parse_filter() {
            filters.push(filter);
        }

        Some(Placeholder {
            name,
            subscripts,
            filters,
            span: Span::saturating_from_bounds_usize(self.start, self.pos),
        })
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn scan_name(&mut self) -> Option<String> {
        let name_start = self.pos;
        while self.peek().is_some_and(is_name_byte) {
            self.pos += 1;
        }
        (self.pos > name_start).then(|| self.source[name_start..self.pos].to_string())
    }

    /// `[key]`, `['key']` or `["key"]`. All three yield the same key.
    fn parse_subscript(&mut self) -> Option<String> {
        if self.peek() != Some(b'[') {
            return None;
        }

        let rest = &self.source[self.pos + 1..];
        let (key, consumed) = match rest.chars().next()? {
            quote @ ('\'' | '"') => {
                let body = &rest[1..];
                let close = body.find(quote)?;
                if !body[close + 1..].starts_with(']') {
                    return None;
                }
                (&body[..close], close + 4)
            }
            _ => {
                let close = rest.find(|ch: char| !is_bare_key_char(ch))?;
                if close == 0 || !rest[close..].starts_with(']') {
                    return None;
                }
                (&rest[..close], close + 2)
            }
        };

        self.pos += consumed;
        Some(key.to_string())
    }

    /// `|name` or `|name(arg, ...)`.
    fn parse_filter(&mut self) -> Option<FilterCall> {
        if self.peek() != Some(b'|') {
            return None;
        }

        let checkpoint = self.pos;
        self.pos += 1;
        let name_start = self.pos;

        let Some(name) = self.scan_name() else {
            self.pos = checkpoint;
            return None;
        };

        let args = if self.peek() == Some(b'(') {
            let Some(args) = self.parse_arguments() else {
                self.pos = checkpoint;
                return None;
            };
            args
        } else {
            Vec::new()
        };

        let span = Span::saturating_from_bounds_usize(name_start, self.pos);
        Some(FilterCall::new(name, args, span))
    }

    /// Argument lists end at the first unquoted `)` on the same line.
    fn parse_arguments(&mut self) -> Option<Vec<Literal>> {
        let rest = &self.source[self.pos + 1..];
        let line = rest.find(['\n', '\r']).map_or(rest, |end| &rest[..end]);
        let close = find_unquoted(line, ')')?;
        let inner = &line[..close];

        self.pos += close + 2;

        if inner.trim().is_empty() {
            return Some(Vec::new());
        }

        Some(
            split_unquoted(inner, ',')
                .into_iter()
                .map(|raw| coerce(raw.trim()))
                .collect(),
        )
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn is_bare_key_char(ch: char) -> bool {
    !matches!(ch, '[' | ']' | '\'' | '"' | '$' | '|') && !ch.is_whitespace()
}
