// ABOUTME: Lexer module turning a source string into a flat token sequence

use crate::diagnostics::DiagnosticSink;
use crate::token::{keyword_kind, LiteralPayload, Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a [u8],
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole source. Never fails: bad characters are reported to
    /// `sink` and scanning continues, so the parser always sees a
    /// well-formed token sequence terminated by `Eof`.
    pub fn scan_tokens(mut self, sink: &mut DiagnosticSink) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(sink);
        }

        self.tokens.push(Token::new(TokenKind::Eof, "", self.line));
        self.tokens
    }

    fn scan_token(&mut self, sink: &mut DiagnosticSink) {
        let c = self.advance();
        match c {
            b'(' => self.add_token(TokenKind::LeftParen),
            b')' => self.add_token(TokenKind::RightParen),
            b'{' => self.add_token(TokenKind::LeftBrace),
            b'}' => self.add_token(TokenKind::RightBrace),
            b',' => self.add_token(TokenKind::Comma),
            b'.' => self.add_token(TokenKind::Dot),
            b'-' => self.add_token(TokenKind::Minus),
            b'+' => self.add_token(TokenKind::Plus),
            b';' => self.add_token(TokenKind::Semicolon),
            b'*' => self.add_token(TokenKind::Star),
            b'!' => {
                let kind = if self.match_char(b'=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            b'=' => {
                let kind = if self.match_char(b'=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            b'<' => {
                let kind = if self.match_char(b'=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            b'>' => {
                let kind = if self.match_char(b'=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }
            b'/' => {
                if self.match_char(b'/') {
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            b' ' | b'\r' | b'\t' => {}
            b'\n' => self.line += 1,
            b'"' => self.string(sink),
            _ if c.is_ascii_digit() => self.number(),
            _ if is_alpha(c) => self.identifier(),
            _ => sink.report_compile_bare(self.line, "Unexpected character."),
        }
    }

    fn identifier(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }
        let text = self.lexeme_text();
        let kind = keyword_kind(&text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume the '.'
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.lexeme_text();
        let value: f64 = text.parse().expect("scanned number lexeme must parse");
        self.add_token_with_literal(TokenKind::Number, LiteralPayload::Number(value));
    }

    fn string(&mut self, sink: &mut DiagnosticSink) {
        while self.peek() != b'"' && !self.is_at_end() {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            sink.report_compile_bare(self.line, "Unterminated string.");
            return;
        }

        // the closing "
        self.advance();

        let contents = &self.source[self.start + 1..self.current - 1];
        let value = String::from_utf8_lossy(contents).into_owned();
        self.add_token_with_literal(TokenKind::String, LiteralPayload::String(value));
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() {
            b'\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> u8 {
        if self.current + 1 >= self.source.len() {
            b'\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn lexeme_text(&self) -> String {
        String::from_utf8_lossy(&self.source[self.start..self.current]).into_owned()
    }

    fn add_token(&mut self, kind: TokenKind) {
        let text = self.lexeme_text();
        self.tokens.push(Token::new(kind, text, self.line));
    }

    fn add_token_with_literal(&mut self, kind: TokenKind, literal: LiteralPayload) {
        let text = self.lexeme_text();
        self.tokens
            .push(Token::with_literal(kind, text, literal, self.line));
    }
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_alpha_numeric(c: u8) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> (Vec<Token>, DiagnosticSink) {
        let mut sink = DiagnosticSink::new();
        let tokens = Lexer::new(src).scan_tokens(&mut sink);
        (tokens, sink)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_single_char_tokens() {
        let (tokens, sink) = scan("(){},.-+;/*");
        assert!(!sink.had_compile_error());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Semicolon,
                TokenKind::Slash,
                TokenKind::Star,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        let (tokens, _) = scan("! != = == > >= < <=");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_comment_is_skipped() {
        let (tokens, _) = scan("1 // this is a comment\n2");
        assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_string_literal() {
        let (tokens, sink) = scan("\"hello world\"");
        assert!(!sink.had_compile_error());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(
            tokens[0].literal,
            Some(LiteralPayload::String("hello world".to_string()))
        );
    }

    #[test]
    fn test_multiline_string_tracks_line() {
        let (tokens, _) = scan("\"a\nb\"\nprint");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_unterminated_string_reports_error_at_start_line() {
        let (tokens, sink) = scan("\"unterminated\n\n");
        assert!(sink.had_compile_error());
        assert_eq!(sink.compile_diagnostics()[0].line, 1);
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_number_literal() {
        let (tokens, _) = scan("123 3.14");
        assert_eq!(tokens[0].literal, Some(LiteralPayload::Number(123.0)));
        assert_eq!(tokens[1].literal, Some(LiteralPayload::Number(3.14)));
    }

    #[test]
    fn test_dot_without_following_digit_is_separate_token() {
        let (tokens, _) = scan("123.");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Number, TokenKind::Dot, TokenKind::Eof]
        );
    }

    #[test]
    fn test_identifiers_and_keywords() {
        let (tokens, _) = scan("foo and while bar");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::While,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character_reports_and_continues() {
        let (tokens, sink) = scan("1 @ 2");
        assert!(sink.had_compile_error());
        assert_eq!(sink.compile_diagnostics()[0].message, "Unexpected character.");
        assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn test_whitespace_and_newlines_tracked() {
        let (tokens, _) = scan("1\n\n2");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_empty_source_yields_only_eof() {
        let (tokens, sink) = scan("");
        assert!(!sink.had_compile_error());
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_lexeme_roundtrip_ignores_whitespace_and_comments() {
        let src = "var x = 1; // comment\nprint x;";
        let (tokens, _) = scan(src);
        let joined: String = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>()
            .join("");
        assert_eq!(joined, "varx=1;printx;");
    }
}
