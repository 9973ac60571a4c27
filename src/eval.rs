// ABOUTME: Tree-walking evaluator: statement execution and expression evaluation

use crate::ast::{Expr, LiteralValue, Stmt};
use crate::diagnostics::DiagnosticSink;
use crate::env::Environment;
use crate::runtime_error::RuntimeError;
use crate::token::{Token, TokenKind};
use crate::value::{values_equal, Callable, LoxFunction, Value};
use std::rc::Rc;

/// Carries either "ran to completion" or "hit a `return`" out of statement
/// execution, replacing exception-based non-local control flow.
pub enum Signal {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    pub globals: Rc<Environment>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new();
        crate::builtins::register_builtins(&globals);
        Interpreter { globals }
    }

    /// Runs a full program against a fresh lexical scope rooted at
    /// `globals`. A single runtime error aborts the whole run and is
    /// reported through `sink`; statements already executed keep their
    /// side effects.
    pub fn interpret(&self, statements: &[Stmt], sink: &mut DiagnosticSink) {
        let env = Rc::clone(&self.globals);
        for statement in statements {
            if let Err(err) = self.execute(statement, &env) {
                sink.report_runtime(err.token.line, err.message);
                return;
            }
        }
    }

    fn execute(&self, stmt: &Stmt, env: &Rc<Environment>) -> Result<Signal, RuntimeError> {
        match stmt {
            Stmt::Block(statements) => {
                let block_env = Environment::with_parent(Rc::clone(env));
                self.execute_block(statements, block_env)
            }
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
                Ok(Signal::Normal)
            }
            Stmt::Function(decl) => {
                let function = LoxFunction {
                    declaration: Rc::clone(decl),
                    closure: Rc::clone(env),
                };
                env.define(
                    decl.name.lexeme.clone(),
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
                Ok(Signal::Normal)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.execute(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(Signal::Normal)
                }
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr, env)?;
                println!("{}", value);
                Ok(Signal::Normal)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                Ok(Signal::Return(value))
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                env.define(name.lexeme.clone(), value);
                Ok(Signal::Normal)
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition, env)?.is_truthy() {
                    match self.execute(body, env)? {
                        Signal::Normal => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            }
        }
    }

    /// Executes a list of statements in a scope nested under `env`,
    /// stopping (and propagating) on the first `Return` signal or error so
    /// the caller's scope is always left intact on every exit path.
    fn execute_block(
        &self,
        statements: &[Stmt],
        env: Rc<Environment>,
    ) -> Result<Signal, RuntimeError> {
        for statement in statements {
            match self.execute(statement, &env)? {
                Signal::Normal => {}
                signal @ Signal::Return(_) => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    fn evaluate(&self, expr: &Expr, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Assign { name, value } => {
                let value = self.evaluate(value, env)?;
                env.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right, env),
            Expr::Call {
                callee,
                paren,
                arguments,
            } => self.evaluate_call(callee, paren, arguments, env),
            Expr::Grouping(inner) => self.evaluate(inner, env),
            Expr::Literal(literal) => Ok(literal_to_value(literal)),
            Expr::Logical {
                left,
                operator,
                right,
            } => self.evaluate_logical(left, operator, right, env),
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right, env),
            Expr::Variable(name) => env.get(name),
        }
    }

    fn evaluate_logical(
        &self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left, env)?;

        if operator.kind == TokenKind::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(right, env)
    }

    fn evaluate_unary(
        &self,
        operator: &Token,
        right: &Expr,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let right = self.evaluate(right, env)?;
        match operator.kind {
            TokenKind::Minus => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
            },
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("parser only produces '-' and '!' as unary operators"),
        }
    }

    fn evaluate_binary(
        &self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left, env)?;
        let right = self.evaluate(right, env)?;

        match operator.kind {
            TokenKind::Minus => numeric_op(operator, &left, &right, |a, b| Value::Number(a - b)),
            TokenKind::Slash => numeric_op(operator, &left, &right, |a, b| Value::Number(a / b)),
            TokenKind::Star => numeric_op(operator, &left, &right, |a, b| Value::Number(a * b)),
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                _ => Err(RuntimeError::new(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenKind::Greater => {
                numeric_op(operator, &left, &right, |a, b| Value::Bool(a > b))
            }
            TokenKind::GreaterEqual => {
                numeric_op(operator, &left, &right, |a, b| Value::Bool(a >= b))
            }
            TokenKind::Less => numeric_op(operator, &left, &right, |a, b| Value::Bool(a < b)),
            TokenKind::LessEqual => {
                numeric_op(operator, &left, &right, |a, b| Value::Bool(a <= b))
            }
            TokenKind::EqualEqual => Ok(Value::Bool(values_equal(&left, &right))),
            TokenKind::BangEqual => Ok(Value::Bool(!values_equal(&left, &right))),
            _ => unreachable!("parser only produces binary operators handled above"),
        }
    }

    fn evaluate_call(
        &self,
        callee: &Expr,
        paren: &Token,
        arguments: &[Expr],
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(callee, env)?;

        let callable = match &callee {
            Value::Callable(callable) => callable,
            _ => return Err(RuntimeError::new(paren, "Can only call functions and classes.")),
        };

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.evaluate(argument, env)?);
        }

        if args.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    args.len()
                ),
            ));
        }

        self.call(callable, &args)
    }

    fn call(&self, callable: &Callable, args: &[Value]) -> Result<Value, RuntimeError> {
        match callable {
            Callable::Native(native) => Ok((native.func)(args)),
            Callable::Function(function) => {
                let call_env = Environment::with_parent(Rc::clone(&function.closure));
                for (param, arg) in function.declaration.params.iter().zip(args) {
                    call_env.define(param.lexeme.clone(), arg.clone());
                }

                match self.execute_block(&function.declaration.body, call_env)? {
                    Signal::Normal => Ok(Value::Nil),
                    Signal::Return(value) => Ok(value),
                }
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn literal_to_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Nil => Value::Nil,
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::String(s) => Value::String(s.clone()),
    }
}

fn numeric_op(
    operator: &Token,
    left: &Value,
    right: &Value,
    op: fn(f64, f64) -> Value,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(op(*a, *b)),
        _ => Err(RuntimeError::new(operator, "Operands must be numbers.")),
    }
}
