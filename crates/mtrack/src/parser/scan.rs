// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Low-level token scanning over one payload and over control-channel
//! reply lines.

use super::ParseError;

/// Sequential whitespace-token scanner over one datagram payload.
///
/// Provides lookahead-free consumption plus a one-token [`peek`] used to
/// detect group boundaries (the next keyword) and optional geometry.
///
/// [`peek`]: Scanner::peek
#[derive(Clone)]
pub struct Scanner<'a> {
    iter: std::str::SplitAsciiWhitespace<'a>,
    peeked: Option<&'a str>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over the full text of one payload.
    pub fn new(payload: &'a str) -> Self {
        Self {
            iter: payload.split_ascii_whitespace(),
            peeked: None,
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&'a str> {
        if self.peeked.is_none() {
            self.peeked = self.iter.next();
        }
        self.peeked
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Option<&'a str> {
        self.peeked.take().or_else(|| self.iter.next())
    }

    /// Whether the next token exists and parses as a number.
    pub fn peek_is_numeric(&mut self) -> bool {
        self.peek().is_some_and(is_numeric)
    }

    /// Consume the next token as a required `f64`.
    pub fn next_f64(&mut self, field: &'static str) -> Result<f64, ParseError> {
        let tok = self.next_token().ok_or(ParseError::UnexpectedEnd(field))?;
        tok.parse()
            .map_err(|_| ParseError::InvalidNumber(tok.to_string()))
    }

    /// Consume the next token as a required non-negative integer.
    pub fn next_usize(&mut self, field: &'static str) -> Result<usize, ParseError> {
        let tok = self.next_token().ok_or(ParseError::UnexpectedEnd(field))?;
        tok.parse()
            .map_err(|_| ParseError::InvalidNumber(tok.to_string()))
    }

    /// Consume the next token as a required `u32`.
    pub fn next_u32(&mut self, field: &'static str) -> Result<u32, ParseError> {
        let tok = self.next_token().ok_or(ParseError::UnexpectedEnd(field))?;
        tok.parse()
            .map_err(|_| ParseError::InvalidNumber(tok.to_string()))
    }

    /// Consume the next token as a required `i32`.
    pub fn next_i32(&mut self, field: &'static str) -> Result<i32, ParseError> {
        let tok = self.next_token().ok_or(ParseError::UnexpectedEnd(field))?;
        tok.parse()
            .map_err(|_| ParseError::InvalidNumber(tok.to_string()))
    }

    /// Fill a slice with required `f64` values.
    pub fn fill_f64(&mut self, out: &mut [f64], field: &'static str) -> Result<(), ParseError> {
        for slot in out {
            *slot = self.next_f64(field)?;
        }
        Ok(())
    }
}

/// Whether a token parses as a (signed, optionally fractional) number.
pub fn is_numeric(tok: &str) -> bool {
    tok.parse::<f64>().is_ok()
}

// =======================================================================
// Control-channel line helpers
// =======================================================================

/// Split the next space-delimited word off a reply line.
///
/// Returns the word and the remainder, or `None` if the line is exhausted.
pub fn next_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start_matches(' ');
    if s.is_empty() {
        return None;
    }
    match s.find(' ') {
        Some(pos) => Some((&s[..pos], &s[pos..])),
        None => Some((s, "")),
    }
}

/// Extract the next double-quoted text from a reply line.
///
/// Returns the text (without quotes) and the remainder after the closing
/// quote, or `None` if no complete quoted text is present.
pub fn quoted_text(s: &str) -> Option<(&str, &str)> {
    let start = s.find('"')?;
    let inner = &s[start + 1..];
    let end = inner.find('"')?;
    Some((&inner[..end], &inner[end + 1..]))
}

/// Parse an unsigned integer with automatic radix: `0x` prefix selects
/// hexadecimal, otherwise decimal. Used for the hex error ids in event
/// messages.
pub fn parse_uint_auto(tok: &str) -> Option<u32> {
    if let Some(hex) = tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        tok.parse().ok()
    }
}

/// Match a parameter echo at the start of a reply, insensitive to leading
/// zeros in numbers and to repeated whitespace, per the controller's
/// parameter formatting rules.
///
/// Returns the remaining text (the parameter value) after the matched
/// echo, with leading spaces stripped; `None` if the echo does not match.
pub fn match_parameter_echo<'a>(answer: &'a str, param: &str) -> Option<&'a str> {
    let mut a = answer.as_bytes();
    let mut p = param.as_bytes();
    let mut last_was_digit = false;

    while !p.is_empty() {
        if !last_was_digit {
            // skip leading zeros on both sides
            while p.first() == Some(&b'0') {
                p = &p[1..];
            }
            while a.first() == Some(&b'0') {
                a = &a[1..];
            }
            if p.is_empty() {
                break;
            }
        }

        if p[0] == b' ' || a.first() == Some(&b' ') {
            while p.first() == Some(&b' ') {
                p = &p[1..];
            }
            while a.first() == Some(&b' ') {
                a = &a[1..];
            }
            last_was_digit = false;
            continue;
        }

        if a.first() != Some(&p[0]) {
            return None;
        }
        last_was_digit = p[0].is_ascii_digit();
        a = &a[1..];
        p = &p[1..];
    }

    while a.first() == Some(&b' ') {
        a = &a[1..];
    }

    let consumed = answer.len() - a.len();
    Some(&answer[consumed..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_peek_does_not_consume() {
        let mut scan = Scanner::new("fr 17 ts 2.5");
        assert_eq!(scan.peek(), Some("fr"));
        assert_eq!(scan.peek(), Some("fr"));
        assert_eq!(scan.next_token(), Some("fr"));
        assert_eq!(scan.next_u32("frame counter").unwrap(), 17);
    }

    #[test]
    fn numeric_lookahead() {
        let mut scan = Scanner::new("-1.5 bod");
        assert!(scan.peek_is_numeric());
        assert_eq!(scan.next_f64("q").unwrap(), -1.5);
        assert!(!scan.peek_is_numeric());
    }

    #[test]
    fn malformed_number_is_an_error() {
        let mut scan = Scanner::new("abc");
        assert!(matches!(
            scan.next_f64("quality"),
            Err(ParseError::InvalidNumber(_))
        ));
        let mut scan = Scanner::new("");
        assert!(matches!(
            scan.next_f64("quality"),
            Err(ParseError::UnexpectedEnd("quality"))
        ));
    }

    #[test]
    fn fill_reads_exactly_n() {
        let mut scan = Scanner::new("1 2 3 x");
        let mut out = [0.0; 3];
        scan.fill_f64(&mut out, "loc").unwrap();
        assert_eq!(out, [1.0, 2.0, 3.0]);
        assert_eq!(scan.next_token(), Some("x"));
    }

    #[test]
    fn words_and_quotes() {
        let line = r#"wtracker err 103 0x00000042 "camera 3 lost sync""#;
        let (origin, rest) = next_word(line).unwrap();
        assert_eq!(origin, "wtracker");
        let (status, rest) = next_word(rest).unwrap();
        assert_eq!(status, "err");
        let (frame, rest) = next_word(rest).unwrap();
        assert_eq!(frame, "103");
        let (id, rest) = next_word(rest).unwrap();
        assert_eq!(parse_uint_auto(id), Some(0x42));
        let (text, _) = quoted_text(rest).unwrap();
        assert_eq!(text, "camera 3 lost sync");
    }

    #[test]
    fn parameter_echo_ignores_leading_zeros_and_spacing() {
        let value = match_parameter_echo("config  cam 007 on", "config cam 7").unwrap();
        assert_eq!(value, "on");
        assert!(match_parameter_echo("config cam 8 on", "config cam 7").is_none());
    }

    #[test]
    fn uint_auto_radix() {
        assert_eq!(parse_uint_auto("42"), Some(42));
        assert_eq!(parse_uint_auto("0x2a"), Some(42));
        assert_eq!(parse_uint_auto("zz"), None);
    }
}
