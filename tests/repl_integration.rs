// ABOUTME: Integration tests for the REPL's line-by-line evaluation semantics

use lox_interpreter::diagnostics::DiagnosticSink;
use lox_interpreter::env::Environment;
use lox_interpreter::eval::Interpreter;
use lox_interpreter::lexer::Lexer;
use lox_interpreter::parser::Parser;
use lox_interpreter::token::{Token, TokenKind};
use lox_interpreter::value::Value;
use std::rc::Rc;

/// Feeds one line through the same lex/parse/interpret pipeline `main`
/// uses for each line read from the prompt.
fn eval_line(interpreter: &Interpreter, line: &str) -> DiagnosticSink {
    let mut sink = DiagnosticSink::new();
    let tokens = Lexer::new(line).scan_tokens(&mut sink);
    let statements = Parser::new(tokens, &mut sink).parse();
    if !sink.had_compile_error() {
        interpreter.interpret(&statements, &mut sink);
    }
    sink
}

fn global(env: &Rc<Environment>, name: &str) -> Value {
    let token = Token::new(TokenKind::Identifier, name, 1);
    env.get(&token).expect("variable should be defined")
}

#[test]
fn test_variables_persist_across_lines() {
    let interpreter = Interpreter::new();
    eval_line(&interpreter, "var x = 1;");
    eval_line(&interpreter, "x = x + 41;");
    assert!(matches!(
        global(&interpreter.globals, "x"),
        Value::Number(n) if n == 42.0
    ));
}

#[test]
fn test_function_defined_on_one_line_usable_on_next() {
    let interpreter = Interpreter::new();
    eval_line(&interpreter, "fun greet(name) { return name; }");
    let sink = eval_line(&interpreter, "var greeting = greet(\"hi\");");
    assert!(!sink.had_runtime_error());
    assert!(matches!(
        global(&interpreter.globals, "greeting"),
        Value::String(ref s) if s == "hi"
    ));
}

#[test]
fn test_compile_error_on_one_line_does_not_poison_later_lines() {
    let interpreter = Interpreter::new();
    let bad = eval_line(&interpreter, "var = ;");
    assert!(bad.had_compile_error());

    let good = eval_line(&interpreter, "var y = 7;");
    assert!(!good.had_compile_error());
    assert!(!good.had_runtime_error());
    assert!(matches!(
        global(&interpreter.globals, "y"),
        Value::Number(n) if n == 7.0
    ));
}

#[test]
fn test_runtime_error_on_one_line_does_not_end_session() {
    let interpreter = Interpreter::new();
    let bad = eval_line(&interpreter, "undefinedThing;");
    assert!(bad.had_runtime_error());

    let good = eval_line(&interpreter, "var z = 1;");
    assert!(!good.had_runtime_error());
    assert!(matches!(
        global(&interpreter.globals, "z"),
        Value::Number(n) if n == 1.0
    ));
}
