/// Characters that never need whitespace in front of them.
const TIGHT_BEFORE: &[char] = &['{', '}', ';', ',', '>', ')'];
/// Characters that never need whitespace after them.
const TIGHT_AFTER: &[char] = &['{', '}', ';', ':', ',', '>', '('];

/// Strip comments and redundant whitespace from compiled CSS.
///
/// Quoted strings are copied verbatim. A `;` directly before `}` is dropped.
#[must_use]
pub fn minify(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for c in chars.by_ref() {
                    if previous == '*' && c == '/' {
                        break;
                    }
                    previous = c;
                }
                pending_space = true;
            }
            c if c.is_whitespace() => pending_space = true,
            '"' | '\'' => {
                flush_space(&mut out, &mut pending_space, c);
                out.push(c);
                let mut escaped = false;
                for inner in chars.by_ref() {
                    out.push(inner);
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == c {
                        break;
                    }
                }
            }
            _ => {
                flush_space(&mut out, &mut pending_space, c);
                if c == '}' && out.ends_with(';') {
                    out.pop();
                }
                out.push(c);
            }
        }
    }

    out
}

fn flush_space(out: &mut String, pending_space: &mut bool, next: char) {
    if !std::mem::take(pending_space) || TIGHT_BEFORE.contains(&next) {
        return;
    }
    match out.chars().next_back() {
        Some(last) if !TIGHT_AFTER.contains(&last) => out.push(' '),
        _ => {}
    }
}
