// ABOUTME: Diagnostic sink for compile (lex/parse) and runtime errors, kept in two buckets

use crate::token::{Token, TokenKind};
use std::fmt;

/// Where in the source a diagnostic points, mirroring the `<WHERE>` clause
/// of the compile-error format.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticLocation {
    AtEnd,
    AtToken(String),
    Bare,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub location: DiagnosticLocation,
    pub message: String,
}

impl Diagnostic {
    /// `"[line L] Error<WHERE>: MESSAGE"`
    pub fn format_compile(&self) -> String {
        let where_clause = match &self.location {
            DiagnosticLocation::AtEnd => " at end".to_string(),
            DiagnosticLocation::AtToken(lexeme) => format!(" at '{}'", lexeme),
            DiagnosticLocation::Bare => String::new(),
        };
        format!(
            "[line {}] Error{}: {}",
            self.line, where_clause, self.message
        )
    }

    /// `"MESSAGE\n[line L]"`
    pub fn format_runtime(&self) -> String {
        format!("{}\n[line {}]", self.message, self.line)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_compile())
    }
}

/// Accumulates compile and runtime diagnostics separately. Replaces the
/// source's process-wide error flags with an object threaded explicitly
/// through the lexer, parser, and interpreter.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    compile: Vec<Diagnostic>,
    runtime: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        DiagnosticSink::default()
    }

    pub fn report_compile_bare(&mut self, line: usize, message: impl Into<String>) {
        self.compile.push(Diagnostic {
            line,
            location: DiagnosticLocation::Bare,
            message: message.into(),
        });
    }

    pub fn report_compile_at_token(&mut self, token: &Token, message: impl Into<String>) {
        let location = if token.kind == TokenKind::Eof {
            DiagnosticLocation::AtEnd
        } else {
            DiagnosticLocation::AtToken(token.lexeme.clone())
        };
        self.compile.push(Diagnostic {
            line: token.line,
            location,
            message: message.into(),
        });
    }

    pub fn report_runtime(&mut self, line: usize, message: impl Into<String>) {
        self.runtime.push(Diagnostic {
            line,
            location: DiagnosticLocation::Bare,
            message: message.into(),
        });
    }

    pub fn had_compile_error(&self) -> bool {
        !self.compile.is_empty()
    }

    pub fn had_runtime_error(&self) -> bool {
        !self.runtime.is_empty()
    }

    pub fn compile_diagnostics(&self) -> &[Diagnostic] {
        &self.compile
    }

    pub fn runtime_diagnostics(&self) -> &[Diagnostic] {
        &self.runtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_compile_bare() {
        let d = Diagnostic {
            line: 3,
            location: DiagnosticLocation::Bare,
            message: "Unexpected character.".to_string(),
        };
        assert_eq!(d.format_compile(), "[line 3] Error: Unexpected character.");
    }

    #[test]
    fn test_format_compile_at_token() {
        let d = Diagnostic {
            line: 2,
            location: DiagnosticLocation::AtToken("+".to_string()),
            message: "Expect expression.".to_string(),
        };
        assert_eq!(
            d.format_compile(),
            "[line 2] Error at '+': Expect expression."
        );
    }

    #[test]
    fn test_format_compile_at_end() {
        let d = Diagnostic {
            line: 5,
            location: DiagnosticLocation::AtEnd,
            message: "Expect ';' after value.".to_string(),
        };
        assert_eq!(
            d.format_compile(),
            "[line 5] Error at end: Expect ';' after value."
        );
    }

    #[test]
    fn test_format_runtime() {
        let d = Diagnostic {
            line: 1,
            location: DiagnosticLocation::Bare,
            message: "Operands must be numbers.".to_string(),
        };
        assert_eq!(d.format_runtime(), "Operands must be numbers.\n[line 1]");
    }

    #[test]
    fn test_sink_buckets_are_independent() {
        let mut sink = DiagnosticSink::new();
        assert!(!sink.had_compile_error());
        assert!(!sink.had_runtime_error());

        sink.report_compile_bare(1, "bad char");
        assert!(sink.had_compile_error());
        assert!(!sink.had_runtime_error());

        sink.report_runtime(2, "bad op");
        assert!(sink.had_runtime_error());
        assert_eq!(sink.compile_diagnostics().len(), 1);
        assert_eq!(sink.runtime_diagnostics().len(), 1);
    }

    #[test]
    fn test_report_at_token_eof_is_at_end() {
        let mut sink = DiagnosticSink::new();
        let eof = Token::new(TokenKind::Eof, "", 4);
        sink.report_compile_at_token(&eof, "Expect expression.");
        assert_eq!(
            sink.compile_diagnostics()[0].location,
            DiagnosticLocation::AtEnd
        );
    }
}
