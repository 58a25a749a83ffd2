use std::fmt;

use serde::Serialize;

/// A filter argument after coercion from its raw source text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Literal {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => f.write_str(s),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Float(n) => write!(f, "{n}"),
        }
    }
}

/// Convert a raw argument token into a typed [`Literal`].
///
/// Rules are tried in order:
/// 1. `'text'` becomes `String("text")`, quotes stripped, no escapes
/// 2. `true` / `false` become `Boolean`
/// 3. `-?[0-9]+` becomes `Integer`
/// 4. `[0-9]+.[0-9]+` becomes `Float`
/// 5. anything else is returned unchanged as `String`
///
/// Coercion never fails. An integer numeral that overflows `i64` falls
/// through to the bare-word rule.
#[must_use]
pub fn coerce(raw: &str) -> Literal {
    if let Some(inner) = strip_single_quotes(raw) {
        return Literal::String(inner.to_string());
    }

    match raw {
        "true" => return Literal::Boolean(true),
        "false" => return Literal::Boolean(false),
        _ => {}
    }

    if is_integer_numeral(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Literal::Integer(n);
        }
    } else if is_decimal_numeral(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            return Literal::Float(n);
        }
    }

    Literal::String(raw.to_string())
}

fn strip_single_quotes(raw: &str) -> Option<&str> {
    raw.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_integer_numeral(raw: &str) -> bool {
    is_digits(raw.strip_prefix('-').unwrap_or(raw))
}

fn is_decimal_numeral(raw: &str) -> bool {
    raw.split_once('.')
        .is_some_and(|(whole, fraction)| is_digits(whole) && is_digits(fraction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_string() {
        assert_eq!(coerce("'x'"), Literal::String("x".to_string()));
        assert_eq!(coerce("'value'"), Literal::String("value".to_string()));
        assert_eq!(coerce("''"), Literal::String(String::new()));
    }

    #[test]
    fn quoted_numerals_stay_strings() {
        assert_eq!(coerce("'4'"), Literal::String("4".to_string()));
        assert_eq!(coerce("'true'"), Literal::String("true".to_string()));
    }

    #[test]
    fn booleans_are_case_sensitive() {
        assert_eq!(coerce("true"), Literal::Boolean(true));
        assert_eq!(coerce("false"), Literal::Boolean(false));
        assert_eq!(coerce("True"), Literal::String("True".to_string()));
    }

    #[test]
    fn integers() {
        assert_eq!(coerce("4"), Literal::Integer(4));
        assert_eq!(coerce("-12"), Literal::Integer(-12));
        assert_eq!(coerce("007"), Literal::Integer(7));
    }

    #[test]
    fn integer_overflow_falls_back_to_string() {
        let raw = "99999999999999999999999";
        assert_eq!(coerce(raw), Literal::String(raw.to_string()));
    }

    #[test]
    fn floats() {
        assert_eq!(coerce("4.321"), Literal::Float(4.321));
        assert_eq!(coerce("5.5"), Literal::Float(5.5));
    }

    #[test]
    fn malformed_numerals_are_barewords() {
        for raw in ["-", "4.", ".5", "1.2.3", "-1.5", "12px", "1e3"] {
            assert_eq!(coerce(raw), Literal::String(raw.to_string()), "{raw}");
        }
    }

    #[test]
    fn bareword_fallback() {
        assert_eq!(coerce("abc"), Literal::String("abc".to_string()));
        assert_eq!(coerce("e"), Literal::String("e".to_string()));
        assert_eq!(coerce(""), Literal::String(String::new()));
    }

    #[test]
    fn lone_quote_is_not_unwrapped() {
        assert_eq!(coerce("'"), Literal::String("'".to_string()));
        assert_eq!(coerce("'abc"), Literal::String("'abc".to_string()));
    }

    #[test]
    fn recoercion_is_stable() {
        let Literal::String(once) = coerce("'x'") else {
            panic!("expected a string literal");
        };
        assert_eq!(coerce(&once), Literal::String("x".to_string()));

        let Literal::String(nested) = coerce("''x''") else {
            panic!("expected a string literal");
        };
        assert_eq!(nested, "'x'");
    }

    #[test]
    fn display() {
        assert_eq!(Literal::Float(11.0).to_string(), "11");
        assert_eq!(Literal::Float(4.321).to_string(), "4.321");
        assert_eq!(Literal::Boolean(false).to_string(), "false");
    }
}
