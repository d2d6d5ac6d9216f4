use std::io::Write;
use std::ops::ControlFlow;
use std::rc::Rc;

use grace_compiler::Compiler;
use grace_core::chunk::Chunk;
use grace_core::errors::report_errors_list;
use grace_core::objects::str_obj::StrObj;
use grace_core::objects::Object;
use grace_core::table::Table;
use grace_core::values::Value;
use grace_core::{InterpretResult, STACK_MAX};
use grace_objects::Heap;

// Submodules
mod run;


/// The result of executing a single instruction: either continue the
/// dispatch loop, or break out of it with the final interpretation result.
type OpRes = ControlFlow<InterpretResult>;

/// The Grace virtual machine.
///
/// Owns the heap, the globals table, and the value stack; borrows its two
/// output sinks (program output and diagnostics) from the host for its
/// whole lifetime.
pub struct VM<'io> {
  chunk: Chunk,
  ip: usize,
  stack: Vec<Value>,
  globals: Table,
  heap: Heap,
  out: &'io mut dyn Write,
  err: &'io mut dyn Write,
}

impl<'io> VM<'io> {
  /// A fresh virtual machine writing program output to `out` and
  /// diagnostics to `err`.
  pub fn new(out: &'io mut dyn Write, err: &'io mut dyn Write) -> Self {
    VM {
      chunk: Chunk::default(),
      ip: 0,
      stack: Vec::with_capacity(STACK_MAX),
      globals: Table::default(),
      heap: Heap::default(),
      out,
      err,
    }
  }

  /// Compiles and runs a source program.
  ///
  /// Globals, interned strings, and the rest of the heap survive into the
  /// next call, which is what lets a REPL session accumulate state. The
  /// compiled chunk does not: it is released before this returns.
  ///
  /// # Returns
  /// `InterpretResult`: The result of the source interpretation.
  pub fn interpret(&mut self, source: &str) -> InterpretResult {
    let chars: Vec<char> = source.chars().collect();

    match Compiler::compile(&chars, &mut self.heap) {
      Ok(chunk) => {
        self.chunk = chunk;
        self.ip = 0;

        let result = self.run();

        self.chunk = Chunk::default();
        result
      }
      Err(errors) => {
        report_errors_list(&errors, self.err);
        InterpretResult::CompileError
      }
    }
  }

  fn next_byte(&mut self) -> u8 {
    let byte = self.chunk.get_byte(self.ip);
    self.ip += 1;
    byte
  }

  fn next_short(&mut self) -> u16 {
    let short = self.chunk.get_short(self.ip);
    self.ip += 2;
    short
  }

  fn pop_stack(&mut self) -> Value {
    match self.stack.pop() {
      Some(val) => val,
      None => panic!("Stack is empty!"),
    }
  }

  fn push_stack(&mut self, new_val: Value) {
    self.stack.push(new_val)
  }

  /// Peeks at the value `distance` slots down from the top of the stack.
  fn peek_stack(&self, distance: usize) -> &Value {
    &self.stack[self.stack.len() - 1 - distance]
  }

  /// Reads a one-byte operand and loads the constant it indexes.
  fn read_constant(&mut self) -> Value {
    let idx = self.next_byte() as usize;
    self.chunk.get_constant(idx).clone()
  }

  /// Reads a one-byte operand that the compiler guarantees to index an
  /// interned identifier.
  fn read_identifier(&mut self) -> Rc<StrObj> {
    match self.read_constant() {
      Value::Obj(Object::Str(name)) => name,
      _ => unreachable!("Identifier operands always index interned strings."),
    }
  }

  /// Reports a runtime error and resets the stack. Every runtime error is
  /// fatal to the current run.
  ///
  /// # Parameters
  /// - `message`: The error message to display.
  fn runtime_error(&mut self, message: &str) -> OpRes {
    let line = self.chunk.get_line(self.ip - 1);

    let _ = writeln!(self.err, "{}", message);
    let _ = writeln!(self.err, "[line {}] in script", line);

    self.stack.clear();
    ControlFlow::Break(InterpretResult::RuntimeError)
  }
}
