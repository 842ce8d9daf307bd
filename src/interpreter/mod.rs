mod error;
mod input;
mod operators;
mod symbol_table;
mod value;

pub use error::RuntimeError;
pub use input::LineReader;
pub use symbol_table::SymbolTable;
pub use value::{Closure, Value};

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::parser::{Chain, Expression, Statement};

#[derive(Debug, Clone)]
pub struct Config {
    /// Written to the output before every `read`.
    pub read_prompt: String,
    /// Raise `MalformedInput` when a `read` line is not an integer, instead
    /// of quietly yielding `unset`.
    pub strict_read: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_prompt: "read> ".to_string(),
            strict_read: false,
        }
    }
}

/// Reasons for evaluation to leave the normal statement order.
#[derive(Debug)]
pub(crate) enum FlowControl {
    /// A `ret` expression, travelling to the call that will produce its value.
    Return(Value),
    /// A fatal error; nothing more of the current input runs.
    Abort(RuntimeError),
}

impl From<io::Error> for FlowControl {
    fn from(value: io::Error) -> Self {
        Self::Abort(value.into())
    }
}

type Flow<T> = Result<T, FlowControl>;

/// Tree-walking evaluator over a single symbol table.
///
/// The first recoverable fault of an input is kept as the error flag. While
/// it is set, expressions evaluate to `unset` and statements do nothing. The
/// driver clears it with [`Interpreter::take_error`] before the next input.
pub struct Interpreter<'io> {
    table: SymbolTable,
    error: Option<RuntimeError>,
    /// Calls currently executing; a `ret` only unwinds while this is nonzero.
    calls: usize,
    config: Config,
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
}

impl Interpreter<'static> {
    pub fn stdio(config: Config) -> Self {
        Self::new(config, LineReader::stdin(), io::stdout())
    }
}

impl<'io> Interpreter<'io> {
    /// Creates an interpreter with the global scope already open.
    pub fn new(config: Config, input: impl BufRead + 'io, output: impl Write + 'io) -> Self {
        let mut table = SymbolTable::new();
        table.open_scope();
        Self {
            table,
            error: None,
            calls: 0,
            config,
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// Runs a program. Recoverable faults are left in the error flag; only
    /// fatal ones are returned.
    pub fn execute(&mut self, program: &Chain) -> Result<(), RuntimeError> {
        let result = match self.exec_chain(program) {
            Ok(()) | Err(FlowControl::Return(_)) => Ok(()),
            Err(FlowControl::Abort(error)) => Err(error),
        };
        self.output.flush()?;
        result
    }

    pub fn error(&self) -> Option<&RuntimeError> {
        self.error.as_ref()
    }

    /// Returns the pending fault, if any, and clears the error flag.
    pub fn take_error(&mut self) -> Option<RuntimeError> {
        self.error.take()
    }

    pub fn lookup(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.table.lookup(name)
    }

    pub fn scope_depth(&self) -> usize {
        self.table.depth()
    }

    /// Closes the global scope.
    pub fn finish(mut self) -> Result<(), RuntimeError> {
        self.output.flush()?;
        self.table.close_scope()
    }

    fn exec_chain(&mut self, chain: &Chain) -> Flow<()> {
        for statement in chain {
            self.exec(statement)?;
        }
        Ok(())
    }

    fn exec(&mut self, statement: &Statement) -> Flow<()> {
        if self.error.is_some() {
            return Ok(());
        }
        match statement {
            Statement::Block(body) => self.scoped(|interpreter| interpreter.exec_chain(body)),
            Statement::If(condition, then_block, else_block) => {
                let condition = self.eval(condition)?;
                match self.settle(condition.as_boolean())? {
                    Some(true) => self.exec(then_block),
                    Some(false) => match else_block {
                        Some(else_block) => self.exec(else_block),
                        None => Ok(()),
                    },
                    None => Ok(()),
                }
            }
            Statement::While(condition, body) => loop {
                let value = self.eval(condition)?;
                if self.settle(value.as_boolean())? != Some(true) {
                    return Ok(());
                }
                self.exec(body)?;
            },
            Statement::Auto(name, value) => {
                let value = self.eval(value)?;
                if self.error.is_none() {
                    let bound = self.table.bind(name, value);
                    self.settle(bound)?;
                }
                Ok(())
            }
            Statement::Assign(name, value) => {
                let value = self.eval(value)?;
                if self.error.is_none() {
                    let rebound = self.table.rebind(name, value);
                    self.settle(rebound)?;
                }
                Ok(())
            }
            Statement::Write(value) => {
                let value = self.eval(value)?;
                if self.error.is_none() {
                    writeln!(self.output, "{value}")?;
                }
                Ok(())
            }
            Statement::Expression(value) => {
                self.eval(value)?;
                Ok(())
            }
        }
    }

    fn eval(&mut self, expression: &Expression) -> Flow<Value> {
        if self.error.is_some() {
            return Ok(Value::Unset);
        }
        match expression {
            Expression::Identifier(name) => {
                let value = self.table.lookup(name).cloned();
                self.recover(value)
            }
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::Boolean(b) => Ok(Value::Boolean(*b)),
            Expression::Arithmetic(op, operands) => {
                let (left, right) = self.eval_operands(operands)?;
                self.recover(operators::arithmetic(*op, &left, &right))
            }
            Expression::Comparison(op, operands) => {
                let (left, right) = self.eval_operands(operands)?;
                self.recover(operators::comparison(*op, &left, &right))
            }
            Expression::Logical(op, operands) => {
                let (left, right) = self.eval_operands(operands)?;
                self.recover(operators::logical(*op, &left, &right))
            }
            Expression::Negation(operand) => {
                let value = self.eval(operand)?;
                self.recover(operators::negate(&value))
            }
            Expression::Not(operand) => {
                let value = self.eval(operand)?;
                self.recover(operators::not(&value))
            }
            Expression::Read => self.read_number(),
            Expression::Return(value) => {
                let value = self.eval(value)?;
                if self.error.is_some() {
                    return Ok(Value::Unset);
                }
                if self.calls == 0 {
                    warn!(%value, "`ret` outside of a function call, value discarded");
                    return Ok(Value::Unset);
                }
                Err(FlowControl::Return(value))
            }
            Expression::Lambda(param, body) => Ok(Value::Function(Closure::new(
                param.clone(),
                Rc::clone(body),
            ))),
            Expression::Call(parts) => self.call(parts),
        }
    }

    fn eval_operands(&mut self, operands: &(Expression, Expression)) -> Flow<(Value, Value)> {
        let left = self.eval(&operands.0)?;
        let right = self.eval(&operands.1)?;
        Ok((left, right))
    }

    // The parameter goes into the caller's innermost scope; the body, normally
    // a block, opens and closes its own.
    fn call(&mut self, parts: &(Expression, Expression)) -> Flow<Value> {
        let (callee, argument) = parts;
        let callee = self.eval(callee)?;
        let Ok(closure) = callee.as_function().cloned() else {
            self.raise(RuntimeError::NotCallable(callee.type_name()));
            return Ok(Value::Unset);
        };
        let argument = self.eval(argument)?;
        if self.error.is_some() {
            return Ok(Value::Unset);
        }
        debug!(param = closure.param(), %argument, "calling function");
        let bound = self.table.bind(closure.param(), argument);
        if self.settle(bound)?.is_none() {
            return Ok(Value::Unset);
        }
        self.calls += 1;
        let result = self.exec(closure.body());
        self.calls -= 1;
        match result {
            Ok(()) => Ok(Value::Unset),
            Err(FlowControl::Return(value)) => Ok(value),
            Err(abort) => Err(abort),
        }
    }

    fn read_number(&mut self) -> Flow<Value> {
        write!(self.output, "{}", self.config.read_prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        let text = line.trim();
        match text.parse::<i32>() {
            Ok(n) => Ok(Value::Number(n)),
            Err(_) if self.config.strict_read => {
                self.raise(RuntimeError::MalformedInput(text.to_string()));
                Ok(Value::Unset)
            }
            Err(_) if read == 0 => {
                warn!("end of input during `read`");
                Ok(Value::Unset)
            }
            Err(_) => {
                warn!(input = text, "ignoring malformed input to `read`");
                Ok(Value::Unset)
            }
        }
    }

    /// Runs `body` inside a fresh scope, closing it whatever the outcome.
    fn scoped<T>(&mut self, body: impl FnOnce(&mut Self) -> Flow<T>) -> Flow<T> {
        self.table.open_scope();
        let result = body(self);
        self.table.close_scope().map_err(FlowControl::Abort)?;
        result
    }

    fn settle<T>(&mut self, result: Result<T, RuntimeError>) -> Flow<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_fatal() => Err(FlowControl::Abort(error)),
            Err(error) => {
                self.raise(error);
                Ok(None)
            }
        }
    }

    fn recover(&mut self, result: Result<Value, RuntimeError>) -> Flow<Value> {
        Ok(self.settle(result)?.unwrap_or_default())
    }

    fn raise(&mut self, error: RuntimeError) {
        if self.error.is_none() {
            debug!(%error, "runtime error");
            self.error = Some(error);
        }
    }
}
