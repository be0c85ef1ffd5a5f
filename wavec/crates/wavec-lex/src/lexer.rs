//! Main lexer implementation for the wave language.
//!
//! This module provides the `Lexer` struct which transforms source code
//! into a packed [`TokenStream`](crate::token::TokenStream). It handles all
//! token kinds: keywords, identifiers, numeric/char/string literals,
//! operators, and delimiters.

use wavec_util::{DiagnosticBuilder, FileId, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, TokenKind, TokenStream};
use crate::unicode::{is_digit_in_base, is_ident_continue, is_ident_start};

/// The main lexer for wave source code.
///
/// Drives a [`Cursor`] over the source text, pushing `(kind, start)` pairs
/// into a [`TokenStream`] rather than building owned token values - text and
/// literal values are recovered later, on demand, via
/// [`token_length`](crate::token::token_length).
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: &'a mut Handler,
    file_id: FileId,
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str, file_id: FileId, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            file_id,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Lexes the entire source into a packed [`TokenStream`], terminated by
    /// a trailing `Eof` token whose start is the source's byte length.
    pub fn tokenize(mut self) -> TokenStream {
        let mut stream = TokenStream::new();
        loop {
            let kind = self.next_token();
            let is_eof = kind == TokenKind::Eof;
            stream.push(kind, self.token_start as u32);
            if is_eof {
                break;
            }
        }
        stream
    }

    fn report_error(&mut self, message: impl Into<String>) {
        let span = Span::with_file(
            self.token_start as u32,
            self.cursor.position() as u32,
            self.file_id,
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
    }

    /// Advances past horizontal whitespace. `\n`/`\r\n` are tokens in their
    /// own right (`TokenKind::Newline`), and comments are tokens too - both
    /// are left for `next_token` to dispatch on rather than skipped here.
    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t') {
            self.cursor.advance();
        }
    }

    fn next_token(&mut self) -> TokenKind {
        self.skip_whitespace();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return TokenKind::Eof;
        }

        let kind = match self.cursor.current_char() {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semi),
            '@' => self.single(TokenKind::At),
            '~' => self.single(TokenKind::Tilde),
            '?' => self.single(TokenKind::Question),

            '+' => self.op_eq(TokenKind::Plus, TokenKind::PlusEq),
            '*' => self.op_eq(TokenKind::Star, TokenKind::StarEq),
            '%' => self.op_eq(TokenKind::Percent, TokenKind::PercentEq),
            '^' => self.op_eq(TokenKind::Caret, TokenKind::CaretEq),

            '-' => self.lex_minus(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            ':' => self.lex_colon(),
            '.' => self.lex_dot(),
            '/' => self.lex_slash(),

            '"' => self.lex_string(),
            '\'' => self.lex_char(),

            '\r' => {
                self.cursor.advance();
                if self.cursor.current_char() == '\n' {
                    self.cursor.advance();
                }
                TokenKind::Newline
            }
            '\n' => self.single(TokenKind::Newline),

            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier(),

            c => {
                self.report_error(format!("unknown character '{c}'"));
                self.cursor.advance();
                TokenKind::Bad
            }
        };

        kind
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    fn op_eq(&mut self, plain: TokenKind, with_eq: TokenKind) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            with_eq
        } else {
            plain
        }
    }

    fn lex_minus(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            TokenKind::Arrow
        } else if self.cursor.match_char('=') {
            TokenKind::MinusEq
        } else {
            TokenKind::Minus
        }
    }

    fn lex_equals(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::EqEq
        } else if self.cursor.match_char('>') {
            TokenKind::FatArrow
        } else {
            TokenKind::Eq
        }
    }

    fn lex_bang(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::BangEq
        } else {
            TokenKind::Bang
        }
    }

    fn lex_less(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                TokenKind::ShlEq
            } else {
                TokenKind::Shl
            }
        } else if self.cursor.match_char('=') {
            TokenKind::LtEq
        } else {
            TokenKind::Lt
        }
    }

    fn lex_greater(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            if self.cursor.match_char('=') {
                TokenKind::ShrEq
            } else {
                TokenKind::Shr
            }
        } else if self.cursor.match_char('=') {
            TokenKind::GtEq
        } else {
            TokenKind::Gt
        }
    }

    fn lex_ampersand(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            TokenKind::AmpAmp
        } else if self.cursor.match_char('=') {
            TokenKind::AmpEq
        } else {
            TokenKind::Amp
        }
    }

    fn lex_pipe(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            TokenKind::PipePipe
        } else if self.cursor.match_char('=') {
            TokenKind::PipeEq
        } else if self.cursor.match_char('>') {
            TokenKind::PipeGt
        } else {
            TokenKind::Pipe
        }
    }

    /// `:` alone, `:=` for short declaration, `::` for path separators.
    ///
    /// The original lexer only ever emits the plain `:` (its grammar never
    /// needed the other two), but `lexer.h` reserves `TOKEN_COLON_EQ` and
    /// `TOKEN_COLON_COLON` as real kinds, so they are lexed here too rather
    /// than left dead.
    fn lex_colon(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::ColonEq
        } else if self.cursor.match_char(':') {
            TokenKind::ColonColon
        } else {
            TokenKind::Colon
        }
    }

    fn lex_dot(&mut self) -> TokenKind {
        self.cursor.advance();
        if !self.cursor.match_char('.') {
            return TokenKind::Dot;
        }
        if self.cursor.match_char('.') {
            TokenKind::Ellipsis
        } else {
            TokenKind::DotDot
        }
    }

    fn lex_slash(&mut self) -> TokenKind {
        use crate::scan;
        match self.cursor.peek_char(1) {
            '/' => {
                let kind = if self.cursor.peek_char(2) == '/' {
                    TokenKind::DocComment
                } else {
                    TokenKind::Comment
                };
                let len = scan::line_comment_len(self.cursor.remaining());
                self.cursor.advance_bytes(len);
                kind
            }
            '*' => {
                let len = scan::block_comment_len(self.cursor.remaining());
                self.cursor.advance_bytes(len);
                TokenKind::MultilineComment
            }
            '=' => {
                self.cursor.advance_bytes(2);
                TokenKind::SlashEq
            }
            _ => {
                self.cursor.advance();
                TokenKind::Slash
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        use crate::scan;
        let remaining = self.cursor.remaining();
        let (len, is_float) = scan::scan_number(remaining);
        let text = &remaining[..len];
        self.cursor.advance_bytes(len);
        self.check_number(text);
        if is_float {
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    }

    /// Re-walks a just-scanned numeric literal to report base/shape errors
    /// that `scan::scan_number` itself stays silent on (it only computes the
    /// token's length). Mirrors `skip_digits`/`lex_number` from the original
    /// lexer: an out-of-base digit is still part of the token but gets one
    /// diagnostic per offending digit; a fractional part is only valid in
    /// base 10 or 16; a hex float needs exactly one digit before the point
    /// and a `p` exponent; a `p`/`P` exponent is only valid in base 16.
    fn check_number(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let base = if bytes.first() == Some(&b'0') {
            match bytes.get(1) {
                Some(b'b') | Some(b'B') => 2,
                Some(b'o') | Some(b'O') => 8,
                Some(b'x') | Some(b'X') => 16,
                _ => 10,
            }
        } else {
            10
        };
        let mut i = if base == 10 { 0 } else { 2 };

        let (end, int_digits) = self.check_digits(text, i, base);
        i = end;

        let mut is_hex_float = false;
        if bytes.get(i) == Some(&b'.') {
            if base != 10 && base != 16 {
                self.report_error(format!("fractional literal is not allowed in base {base}"));
            } else if base == 16 {
                is_hex_float = true;
                if int_digits != 1 {
                    self.report_error(
                        "hex floating-point literal must have exactly one digit before the point",
                    );
                }
            }
            i += 1;
            let (frac_end, _) = self.check_digits(text, i, base);
            i = frac_end;
        }

        match bytes.get(i) {
            Some(b'e') | Some(b'E') => {
                i += 1;
                if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
                    i += 1;
                }
                self.check_digits(text, i, 10);
            }
            Some(b'p') | Some(b'P') => {
                if base != 16 {
                    self.report_error(format!(
                        "'p' exponent is only valid in base 16, found base {base}"
                    ));
                }
                i += 1;
                if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
                    i += 1;
                }
                self.check_digits(text, i, 10);
            }
            _ => {
                if is_hex_float {
                    self.report_error("hex floating-point literal must have a 'p' exponent");
                }
            }
        }
    }

    /// Walks one base-aware digit run of `text` starting at `i` (mirroring
    /// `scan::skip_digits`) and reports one diagnostic per digit that's out
    /// of range for `base`. Returns where the run ended and how many digits
    /// (not counting underscores) it held.
    fn check_digits(&mut self, text: &str, mut i: usize, base: u32) -> (usize, usize) {
        let bytes = text.as_bytes();
        let mut count = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'_' {
                i += 1;
                continue;
            }
            let c = b as char;
            if !c.is_ascii_hexdigit() {
                break;
            }
            if !is_digit_in_base(c, base) {
                if c == 'e' || c == 'E' {
                    break;
                }
                self.report_error(format!("digit '{c}' is not allowed in base {base}"));
            }
            i += 1;
            count += 1;
        }
        (i, count)
    }

    fn lex_char(&mut self) -> TokenKind {
        use crate::scan;
        let remaining = self.cursor.remaining();
        let len = scan::char_len(remaining);
        let text = &remaining[..len];
        let closed = remaining.as_bytes().get(len.saturating_sub(1)) == Some(&b'\'') && len >= 2;
        self.cursor.advance_bytes(len);
        self.check_escapes(text);
        if !closed {
            self.report_error("unterminated character literal");
        }
        TokenKind::Char
    }

    fn lex_string(&mut self) -> TokenKind {
        use crate::scan;
        let remaining = self.cursor.remaining();
        let multiline = remaining.starts_with("\"\"\"");
        let len = scan::string_len(remaining);
        let text = &remaining[..len];
        let delim = if multiline { "\"\"\"" } else { "\"" };
        let closed = len > delim.len() && remaining[len - delim.len()..len] == *delim;
        self.cursor.advance_bytes(len);
        self.check_escapes(text);
        if !closed {
            self.report_error("unterminated string");
        }
        if multiline {
            TokenKind::MultilineStr
        } else {
            TokenKind::Str
        }
    }

    /// Validates every backslash escape in a char/string literal's own text
    /// (quotes included) and reports one diagnostic per invalid one. Mirrors
    /// `handle_escape` from the original lexer: `\x` needs one or two hex
    /// digits, and anything else must be one of the recognized single-char
    /// escapes (`\\ \' \" \0 \t \v \r \n \b \a`).
    fn check_escapes(&mut self, text: &str) {
        let mut chars = text.char_indices().peekable();
        while let Some((_, c)) = chars.next() {
            if c != '\\' {
                continue;
            }
            match chars.next() {
                Some((_, 'x')) => {
                    let mut digits = 0;
                    while digits < 2 {
                        match chars.peek() {
                            Some(&(_, h)) if h.is_ascii_hexdigit() => {
                                chars.next();
                                digits += 1;
                            }
                            _ => break,
                        }
                    }
                    if digits == 0 {
                        self.report_error("invalid hex escape sequence");
                    }
                }
                Some((_, '\\' | '\'' | '"' | '0' | 't' | 'v' | 'r' | 'n' | 'b' | 'a')) => {}
                Some((_, other)) => {
                    self.report_error(format!("unknown escape sequence: \\{other}"));
                }
                None => {}
            }
        }
    }

    fn lex_identifier(&mut self) -> TokenKind {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        keyword_from_ident(text).unwrap_or(TokenKind::Ident)
    }
}

/// Convenience entry point: lex `source` (registered as `file_id` in the
/// caller's source map) into a [`TokenStream`], reporting lexical errors
/// through `handler`.
pub fn lex(source: &str, file_id: FileId, handler: &mut Handler) -> TokenStream {
    Lexer::new(source, file_id, handler).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(src: &str) -> (TokenStream, usize) {
        let mut handler = Handler::new();
        let stream = lex(src, FileId::new(0), &mut handler);
        (stream, handler.error_count())
    }

    #[test]
    fn lexes_simple_declaration() {
        let (stream, errs) = lex_all("x := 1\n");
        assert_eq!(errs, 0);
        assert_eq!(
            stream.kind,
            vec![
                TokenKind::Ident,
                TokenKind::ColonEq,
                TokenKind::Int,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_keywords_vs_identifiers() {
        let (stream, _) = lex_all("if match matches");
        assert_eq!(
            stream.kind,
            vec![TokenKind::If, TokenKind::Match, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_multi_char_operators() {
        let (stream, _) = lex_all("<<= |> :: ...");
        assert_eq!(
            stream.kind,
            vec![
                TokenKind::ShlEq,
                TokenKind::PipeGt,
                TokenKind::ColonColon,
                TokenKind::Ellipsis,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_line_comment_and_doc_comment() {
        let (stream, _) = lex_all("// hi\n/// docs\n");
        assert_eq!(
            stream.kind,
            vec![
                TokenKind::Comment,
                TokenKind::Newline,
                TokenKind::DocComment,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_nested_block_comment() {
        let (stream, errs) = lex_all("/* /* nested */ */ x");
        assert_eq!(errs, 0);
        assert_eq!(
            stream.kind,
            vec![TokenKind::MultilineComment, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn reports_unterminated_string() {
        let (stream, errs) = lex_all("\"never closes");
        assert_eq!(errs, 1);
        assert_eq!(stream.kind, vec![TokenKind::Str, TokenKind::Eof]);
    }

    #[test]
    fn reports_unknown_character() {
        let (stream, errs) = lex_all("`");
        assert_eq!(errs, 1);
        assert_eq!(stream.kind, vec![TokenKind::Bad, TokenKind::Eof]);
    }

    #[test]
    fn out_of_base_digit_is_one_token_with_one_diagnostic() {
        let (stream, errs) = lex_all("0b12");
        assert_eq!(errs, 1);
        assert_eq!(stream.kind, vec![TokenKind::Int, TokenKind::Eof]);
    }

    #[test]
    fn fractional_literal_in_bad_base_reports_error() {
        let (stream, errs) = lex_all("0b1.1");
        assert_eq!(errs, 1);
        assert_eq!(stream.kind, vec![TokenKind::Float, TokenKind::Eof]);
    }

    #[test]
    fn hex_float_needs_one_leading_digit() {
        let (_, errs) = lex_all("0x12.8p3");
        assert_eq!(errs, 1);
    }

    #[test]
    fn hex_float_needs_p_exponent() {
        let (_, errs) = lex_all("0x1.8");
        assert_eq!(errs, 1);
    }

    #[test]
    fn p_exponent_requires_base_16() {
        let (_, errs) = lex_all("0b1p1");
        assert_eq!(errs, 1);
    }

    #[test]
    fn well_formed_hex_float_has_no_diagnostics() {
        let (_, errs) = lex_all("0x1.8p3");
        assert_eq!(errs, 0);
    }

    #[test]
    fn zero_digit_hex_escape_reports_error() {
        let (_, errs) = lex_all(r"'\x'");
        assert_eq!(errs, 1);
    }

    #[test]
    fn one_or_two_digit_hex_escapes_are_valid() {
        let (_, errs) = lex_all(r"'\x4'");
        assert_eq!(errs, 0);
        let (_, errs) = lex_all(r"'\x41'");
        assert_eq!(errs, 0);
    }

    #[test]
    fn unknown_escape_reports_error() {
        let (_, errs) = lex_all(r"'\q'");
        assert_eq!(errs, 1);
    }

    #[test]
    fn unknown_escape_in_string_reports_one_error_per_escape() {
        let (_, errs) = lex_all(r#""a\qb\zc""#);
        assert_eq!(errs, 2);
    }

    #[test]
    fn token_starts_round_trip_through_token_length() {
        let src = "foo + 123";
        let (stream, _) = lex_all(src);
        for i in 0..stream.len() {
            let (start, end) = stream.span_of(i, src);
            assert!(start as usize <= src.len());
            assert!(end as usize <= src.len());
        }
    }
}
