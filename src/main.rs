mod ast;
mod builtins;
mod config;
mod diagnostics;
mod env;
mod error;
mod eval;
mod lexer;
mod parser;
mod runtime_error;
mod token;
mod value;

use clap::Parser as ClapParser;
use config::{VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use diagnostics::DiagnosticSink;
use error::LoxError;
use eval::Interpreter;
use lexer::Lexer;
use parser::Parser;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::path::PathBuf;
use std::process::ExitCode;

/// A tree-walking interpreter for Lox
#[derive(ClapParser, Debug)]
#[command(name = "lox")]
#[command(version = VERSION)]
#[command(about = "A tree-walking interpreter for the Lox language")]
struct CliArgs {
    /// Script file to execute. With none, starts the REPL.
    #[arg(value_name = "FILE")]
    scripts: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match args.scripts.as_slice() {
        [] => {
            if let Err(err) = run_prompt() {
                eprintln!("{}", err);
                return ExitCode::from(1);
            }
            ExitCode::from(0)
        }
        [script] => match run_file(script) {
            Ok(code) => ExitCode::from(code),
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::from(1)
            }
        },
        _ => {
            eprintln!("{}", LoxError::Usage("Usage: lox [script]".to_string()));
            ExitCode::from(1)
        }
    }
}

/// Lexes, parses, and interprets a single file, returning the process
/// exit code the run should report (0 clean, 65 compile error, 70
/// runtime error).
fn run_file(path: &PathBuf) -> Result<u8, LoxError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoxError::ScriptRead {
        path: path.display().to_string(),
        source,
    })?;

    let mut sink = DiagnosticSink::new();
    let tokens = Lexer::new(&source).scan_tokens(&mut sink);
    let statements = Parser::new(tokens, &mut sink).parse();

    if sink.had_compile_error() {
        report(&sink);
        return Ok(65);
    }

    let interpreter = Interpreter::new();
    interpreter.interpret(&statements, &mut sink);

    if sink.had_runtime_error() {
        report(&sink);
        return Ok(70);
    }

    Ok(0)
}

/// Runs the interactive REPL. A single `Interpreter` (and therefore its
/// global scope) persists across lines; a compile or runtime error on one
/// line is reported but never ends the session.
fn run_prompt() -> Result<(), LoxError> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = Editor::<(), rustyline::history::DefaultHistory>::with_config(config)?;

    let history_file = ".lox_history";
    let _ = rl.load_history(history_file);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    let interpreter = Interpreter::new();

    loop {
        match rl.readline("lox> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let mut sink = DiagnosticSink::new();
                let tokens = Lexer::new(&line).scan_tokens(&mut sink);
                let statements = Parser::new(tokens, &mut sink).parse();

                if sink.had_compile_error() {
                    report(&sink);
                    continue;
                }

                interpreter.interpret(&statements, &mut sink);
                if sink.had_runtime_error() {
                    report(&sink);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}

fn report(sink: &DiagnosticSink) {
    for diagnostic in sink.compile_diagnostics() {
        eprintln!("{}", diagnostic.format_compile());
    }
    for diagnostic in sink.runtime_diagnostics() {
        eprintln!("{}", diagnostic.format_runtime());
    }
}
