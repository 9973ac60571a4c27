//! Native global functions available to every Lox program.
//!
//! Lox's standard library is deliberately tiny: `clock` is the only
//! native the language defines, used to benchmark and seed
//! pseudo-randomness in user code.

use crate::env::Environment;
use crate::value::{Callable, NativeFunction, Value};
use std::rc::Rc;

pub mod clock;

/// Registers all native globals into the interpreter's global scope.
pub fn register_builtins(env: &Rc<Environment>) {
    define_native(env, "clock", 0, clock::clock);
}

fn define_native(env: &Rc<Environment>, name: &'static str, arity: usize, func: fn(&[Value]) -> Value) {
    let native = NativeFunction { name, arity, func };
    env.define(
        name.to_string(),
        Value::Callable(Callable::Native(Rc::new(native))),
    );
}
