// ABOUTME: Version and REPL banner constants

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Lox Interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "A tree-walking interpreter for Lox, written in Rust";
