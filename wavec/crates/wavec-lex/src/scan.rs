//! Pure length-computing scanners.
//!
//! These mirror the re-lexing shape of the original `token_length`: given the
//! source text starting exactly at a token, walk forward the same way the
//! lexer itself would have and return how many bytes the token spans. None
//! of these functions allocate, report diagnostics, or know about the rest
//! of the token stream — bad input (an unterminated string, a lone `'`) just
//! scans to the end of the slice instead of panicking, since by construction
//! the lexer already emitted a diagnostic when it first produced the token.

/// Decimal digit value for base-aware digit scanning, or `16` (out of range
/// for every supported base) for anything that isn't a hex digit either.
fn digit_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 16,
    }
}

/// Consumes a run of base-aware digits starting at `i`, including digits
/// that are shaped like a digit but out of range for `base` (e.g. `9` in
/// base 8) - those are still part of the token, just invalid, and it's on
/// the caller to report them. The one byte that stops the run *without*
/// being consumed is `e`/`E` out of range for `base`, so an exponent can
/// still follow a non-decimal integer part (`0b101e2`).
fn skip_digits(bytes: &[u8], mut i: usize, base: u32) -> usize {
    while i < bytes.len() {
        if bytes[i] == b'_' {
            i += 1;
            continue;
        }
        let value = digit_value(bytes[i]) as u32;
        if value >= 16 {
            break;
        }
        if value >= base && matches!(bytes[i], b'e' | b'E') {
            break;
        }
        i += 1;
    }
    i
}

/// Length of an `Int` or `Float` token starting at `s`.
///
/// Grounded in `lex_base`/`skip_digits`/`lex_number`: an optional `0x`/`0b`/
/// `0o` base prefix, a run of base-valid digits (underscores allowed
/// anywhere), an optional `.` + more digits promoting the token to a float,
/// and an optional exponent (`e`/`E` with an optional sign) or, for base 16,
/// a `p`/`P` binary-exponent suffix.
pub fn number_len(s: &str) -> usize {
    scan_number(s).0
}

/// Like [`number_len`], but also reports whether the scanned literal is a
/// float (had a `.` fraction or an exponent/binary-exponent suffix) so the
/// lexer can pick `TokenKind::Int` vs `TokenKind::Float` without rescanning.
pub fn scan_number(s: &str) -> (usize, bool) {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut is_float = false;

    let base = if bytes.first() == Some(&b'0') {
        match bytes.get(1) {
            Some(b'b') | Some(b'B') => {
                i = 2;
                2
            }
            Some(b'o') | Some(b'O') => {
                i = 2;
                8
            }
            Some(b'x') | Some(b'X') => {
                i = 2;
                16
            }
            _ => 10,
        }
    } else {
        10
    };

    i = skip_digits(bytes, i, base);

    if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(|b| digit_value(*b) < 10) {
        i += 1;
        is_float = true;
        i = skip_digits(bytes, i, base);
    }

    match bytes.get(i) {
        Some(b'e') | Some(b'E') => {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
                j += 1;
            }
            if bytes.get(j).is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                i = skip_digits(bytes, j, 10);
            }
        }
        // A `p`/`P` binary exponent is only meaningful in base 16, but it's
        // consumed (and the token still promoted to a float) regardless of
        // base - like an out-of-base digit, a `p` suffix in the wrong base
        // is still part of the token; it's on the caller to report it.
        Some(b'p') | Some(b'P') => {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
                j += 1;
            }
            if bytes.get(j).is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                i = skip_digits(bytes, j, 10);
            }
        }
        _ => {}
    }

    (i, is_float)
}

/// Length of a `Char` token starting at `s` (including both `'` delimiters).
///
/// Grounded in `lex_char`: a `'`, then either a single character or a
/// backslash escape (`\xNN` hex byte or a single escaped char), then a
/// closing `'`. An unterminated literal (no closing quote before the line
/// ends) scans to the end of the slice.
pub fn char_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    let Some((_, quote)) = chars.next() else {
        return s.len();
    };
    debug_assert_eq!(quote, '\'');

    let Some((mut i, c)) = chars.next() else {
        return s.len();
    };

    if c == '\\' {
        match chars.next() {
            Some((j, 'x')) => {
                i = j + 1;
                for _ in 0..2 {
                    if let Some((k, h)) = chars.next() {
                        if h.is_ascii_hexdigit() {
                            i = k + h.len_utf8();
                        } else {
                            break;
                        }
                    }
                }
            }
            Some((j, esc)) => {
                i = j + esc.len_utf8();
            }
            None => return s.len(),
        }
    } else {
        i += c.len_utf8();
    }

    match s[i..].chars().next() {
        Some('\'') => i + 1,
        _ => i,
    }
}

/// Length of a `Str` or `MultilineStr` token starting at `s`.
///
/// Grounded in `lex_string`: three leading `"` mean a multiline string
/// terminated by the next `"""`; one `"` means a plain string terminated by
/// the next unescaped `"`. Either form scans to the end of the slice if
/// never closed.
pub fn string_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let multiline = bytes.starts_with(b"\"\"\"");
    let delim_len = if multiline { 3 } else { 1 };
    let mut i = delim_len;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if multiline {
            if bytes[i..].starts_with(b"\"\"\"") {
                return i + 3;
            }
        } else if bytes[i] == b'"' {
            return i + 1;
        } else if bytes[i] == b'\n' {
            return i;
        }
        i += 1;
    }

    bytes.len()
}

/// Length of an `Ident` token starting at `s`.
///
/// Grounded in `lex_identifier`: a run of alphanumeric-or-`_` characters,
/// Unicode-aware via the same classification the cursor itself uses for
/// identifier continuation.
pub fn ident_len(s: &str) -> usize {
    let mut len = 0;
    for c in s.chars() {
        if crate::unicode::is_ident_continue(c) {
            len += c.len_utf8();
        } else {
            break;
        }
    }
    len
}

/// Length of a `Comment`/`DocComment` token starting at `s` (a `//` or `///`
/// line comment, up to but not including the terminating `\n`).
pub fn line_comment_len(s: &str) -> usize {
    s.find('\n').unwrap_or(s.len())
}

/// Length of a `MultilineComment` token starting at `s`.
///
/// Grounded in `lex_string`'s `/* */` branch: nested `/* ... */` pairs are
/// tracked with a depth counter, so `/* /* */ */` is a single comment.
pub fn block_comment_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 2; // past the opening "/*"
    let mut depth = 1i32;

    while i < bytes.len() && depth > 0 {
        if bytes[i..].starts_with(b"/*") {
            depth += 1;
            i += 2;
        } else if bytes[i..].starts_with(b"*/") {
            depth -= 1;
            i += 2;
        } else {
            i += 1;
        }
    }

    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_int() {
        assert_eq!(number_len("123 "), 3);
        assert_eq!(number_len("1_000;"), 5);
    }

    #[test]
    fn hex_int() {
        assert_eq!(number_len("0xFF "), 4);
        assert_eq!(number_len("0x1_F "), 5);
    }

    #[test]
    fn binary_and_octal() {
        assert_eq!(number_len("0b101 "), 5);
        assert_eq!(number_len("0o17 "), 4);
    }

    #[test]
    fn float_with_exponent() {
        assert_eq!(number_len("1.5e10 "), 6);
        assert_eq!(number_len("1.5e-10,"), 7);
        assert_eq!(number_len("3.0 "), 3);
    }

    #[test]
    fn hex_float_with_p_exponent() {
        assert_eq!(number_len("0x1.8p3 "), 7);
    }

    #[test]
    fn dot_not_followed_by_digit_is_not_part_of_number() {
        assert_eq!(number_len("1.foo"), 1);
    }

    #[test]
    fn out_of_base_digit_still_counts_as_part_of_the_number() {
        // '2' is out of range for base 2 but still digit-shaped, so it stays
        // in the token instead of starting a new one right after the '1'.
        assert_eq!(number_len("0b12 "), 4);
        assert_eq!(number_len("0o18 "), 4);
    }

    #[test]
    fn exponent_after_non_decimal_int_part_still_scans() {
        assert_eq!(number_len("0b101e2 "), 7);
    }

    #[test]
    fn char_plain() {
        assert_eq!(char_len("'a' "), 3);
    }

    #[test]
    fn char_escape() {
        assert_eq!(char_len(r"'\n' "), 4);
    }

    #[test]
    fn char_hex_escape() {
        assert_eq!(char_len(r"'\x41' "), 6);
    }

    #[test]
    fn plain_string() {
        assert_eq!(string_len(r#""hello" "#), 7);
    }

    #[test]
    fn string_with_escape() {
        assert_eq!(string_len(r#""a\"b" "#), 6);
    }

    #[test]
    fn multiline_string() {
        assert_eq!(string_len(r#""""a\nb""" "#), 10);
    }

    #[test]
    fn identifier_ascii() {
        assert_eq!(ident_len("foo_bar1 + 1"), 8);
    }

    #[test]
    fn line_comment() {
        assert_eq!(line_comment_len("// hello\nnext"), 8);
    }

    #[test]
    fn block_comment_nested() {
        assert_eq!(block_comment_len("/* /* */ */ tail"), 11);
    }

    #[test]
    fn block_comment_unterminated_runs_to_end() {
        assert_eq!(block_comment_len("/* never closes"), 15);
    }
}
