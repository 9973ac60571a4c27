// ABOUTME: Host-level error type for the CLI/REPL boundary, separate from diagnostics

use thiserror::Error;

/// Errors that abort the process before the diagnostics pipeline even
/// gets a chance to run (a script couldn't be read, a REPL line couldn't
/// be read back from the terminal, and so on). Never used for lex/parse/
/// runtime errors in Lox source, which go through `DiagnosticSink`
/// instead.
#[derive(Error, Debug)]
pub enum LoxError {
    #[error("failed to read script '{path}': {source}")]
    ScriptRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}
