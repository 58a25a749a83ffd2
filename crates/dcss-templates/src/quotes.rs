/// Find positions of a delimiter character in `s`, skipping occurrences inside
/// single- or double-quoted regions.
///
/// Quotes carry no escape sequences: the next matching quote always closes
/// the region.
///
/// The callback receives the byte index of each unquoted delimiter found.
/// Return `true` from the callback to stop early.
pub(crate) fn for_each_unquoted(
    s: &str,
    delimiter: impl Fn(char) -> bool,
    mut cb: impl FnMut(usize) -> bool,
) {
    let mut quote: Option<char> = None;

    for (idx, ch) in s.char_indices() {
        match ch {
            '"' | '\'' if quote == Some(ch) => {
                quote = None;
            }
            '"' | '\'' if quote.is_none() => {
                quote = Some(ch);
            }
            _ if quote.is_some() => {}
            _ if delimiter(ch) => {
                if cb(idx) {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Byte index of the first unquoted `target` in `s`.
pub(crate) fn find_unquoted(s: &str, target: char) -> Option<usize> {
    let mut found = None;
    for_each_unquoted(
        s,
        |ch| ch == target,
        |idx| {
            found = Some(idx);
            true
        },
    );
    found
}

/// Split `s` on unquoted `separator`, keeping quoted separators in place.
pub(crate) fn split_unquoted(s: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for_each_unquoted(
        s,
        |ch| ch == separator,
        |idx| {
            pieces.push(&s[start..idx]);
            start = idx + separator.len_utf8();
            false
        },
    );

    pieces.push(&s[start..]);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquoted_delimiters_found() {
        let mut positions = Vec::new();
        for_each_unquoted(
            "a,b,c",
            |ch| ch == ',',
            |idx| {
                positions.push(idx);
                false
            },
        );
        assert_eq!(positions, vec![1, 3]);
    }

    #[test]
    fn quoted_delimiters_skipped() {
        let mut positions = Vec::new();
        for_each_unquoted(
            "a,'b,c',d",
            |ch| ch == ',',
            |idx| {
                positions.push(idx);
                false
            },
        );
        assert_eq!(positions, vec![1, 7]);
    }

    #[test]
    fn double_quotes() {
        assert_eq!(find_unquoted(r#""a)b")"#, ')'), Some(5));
    }

    #[test]
    fn mixed_quotes_do_not_close_each_other() {
        assert_eq!(find_unquoted(r#"'a"b',)"#, ','), Some(5));
    }

    #[test]
    fn unclosed_quote_hides_everything() {
        assert_eq!(find_unquoted("'abc)", ')'), None);
    }

    #[test]
    fn split_keeps_quoted_separators() {
        assert_eq!(split_unquoted("'a,b', c", ','), vec!["'a,b'", " c"]);
        assert_eq!(split_unquoted("", ','), vec![""]);
        assert_eq!(split_unquoted("a,", ','), vec!["a", ""]);
    }
}
