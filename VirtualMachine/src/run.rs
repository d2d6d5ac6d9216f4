use std::io::Write;
use std::ops::ControlFlow;
use std::rc::Rc;

use grace_core::bytecode::OpCode;
use grace_core::objects::Object;
use grace_core::values::{Value, VAL_FALSE, VAL_NIL, VAL_TRUE};
use grace_core::InterpretResult;

use crate::{OpRes, VM};

/// The arithmetic operations that require two number operands.
enum NumericOp {
  Subtract,
  Multiply,
  Divide,
}

impl<'io> VM<'io> {
  /// The execution loop that dispatches one operation per instruction in
  /// the current chunk.
  pub(crate) fn run(&mut self) -> InterpretResult {
    loop {
      #[cfg(feature = "trace_execution")]
      self.print_execution();

      let exec = match OpCode::from_byte(self.next_byte()) {
        // Value loaders
        OpCode::LoadConstant => self.op_load_constant(),
        OpCode::LoadImmFalse => self.op_load_imm(VAL_FALSE),
        OpCode::LoadImmNil => self.op_load_imm(VAL_NIL),
        OpCode::LoadImmTrue => self.op_load_imm(VAL_TRUE),

        // Operators
        OpCode::Add => self.op_add(),
        OpCode::Divide => self.op_numeric(NumericOp::Divide),
        OpCode::Equals => self.op_equals(),
        OpCode::GreaterThan => self.op_greater_than(),
        OpCode::LessThan => self.op_less_than(),
        OpCode::LogicNot => self.op_logic_not(),
        OpCode::Multiply => self.op_numeric(NumericOp::Multiply),
        OpCode::Negate => self.op_negate(),
        OpCode::Subtract => self.op_numeric(NumericOp::Subtract),

        // Declarations and variable access
        OpCode::DefineGlobal => self.op_define_global(),
        OpCode::GetGlobal => self.op_get_global(),
        OpCode::GetLocal => self.op_get_local(),
        OpCode::SetGlobal => self.op_set_global(),
        OpCode::SetLocal => self.op_set_local(),

        // Control flow and jumps
        OpCode::JumpForward => self.op_jump_forward(),
        OpCode::JumpIfFalse => self.op_jump_if_false(),
        OpCode::LoopJump => self.op_loop_jump(),

        // Others
        OpCode::PopStackTop => self.op_pop_stack_top(),
        OpCode::Print => self.op_print(),
        OpCode::Return => self.op_return(),
      };

      match exec {
        ControlFlow::Continue(()) => continue,
        ControlFlow::Break(result) => return result,
      }
    }
  }

  fn op_load_constant(&mut self) -> OpRes {
    let val = self.read_constant();
    self.push_stack(val);
    ControlFlow::Continue(())
  }

  fn op_load_imm(&mut self, val: Value) -> OpRes {
    self.push_stack(val);
    ControlFlow::Continue(())
  }

  /// `+` adds two numbers or concatenates two strings; the concatenation
  /// result is interned like any other string.
  fn op_add(&mut self) -> OpRes {
    let right = self.pop_stack();
    let left = self.pop_stack();

    match (&left, &right) {
      (Value::Number(a), Value::Number(b)) => {
        self.push_stack(Value::Number(a + b));
        ControlFlow::Continue(())
      }
      (Value::Obj(Object::Str(a)), Value::Obj(Object::Str(b))) => {
        let mut chars = String::with_capacity(a.len() + b.len());
        chars.push_str(&a.chars);
        chars.push_str(&b.chars);

        let obj = self.heap.take_string(chars);
        self.push_stack(obj.into());
        ControlFlow::Continue(())
      }
      _ => self.runtime_error("Operands must be two numbers or two strings."),
    }
  }

  fn op_numeric(&mut self, op: NumericOp) -> OpRes {
    let right = self.pop_stack();
    let left = self.pop_stack();

    match (left.as_number(), right.as_number()) {
      (Some(a), Some(b)) => {
        let result = match op {
          NumericOp::Subtract => a - b,
          NumericOp::Multiply => a * b,
          NumericOp::Divide => a / b,
        };

        self.push_stack(Value::Number(result));
        ControlFlow::Continue(())
      }
      _ => self.runtime_error("Operands must be a numbers."),
    }
  }

  fn op_equals(&mut self) -> OpRes {
    let right = self.pop_stack();
    let left = self.pop_stack();
    self.push_stack(Value::Bool(left == right));
    ControlFlow::Continue(())
  }

  fn op_greater_than(&mut self) -> OpRes {
    let right = self.pop_stack();
    let left = self.pop_stack();

    match (Self::comparison_operand(&left), Self::comparison_operand(&right)) {
      (Some(a), Some(b)) => {
        self.push_stack(Value::Bool(a > b));
        ControlFlow::Continue(())
      }
      _ => self.runtime_error("Operands must be a numbers."),
    }
  }

  fn op_less_than(&mut self) -> OpRes {
    let right = self.pop_stack();
    let left = self.pop_stack();

    match (Self::comparison_operand(&left), Self::comparison_operand(&right)) {
      (Some(a), Some(b)) => {
        self.push_stack(Value::Bool(a < b));
        ControlFlow::Continue(())
      }
      _ => self.runtime_error("Operands must be a numbers."),
    }
  }

  /// Ordered comparisons accept numbers and booleans; booleans coerce to 0
  /// and 1.
  fn comparison_operand(val: &Value) -> Option<f64> {
    match val {
      Value::Number(n) => Some(*n),
      Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
      _ => None,
    }
  }

  fn op_logic_not(&mut self) -> OpRes {
    let val = self.pop_stack();
    self.push_stack(Value::Bool(val.is_falsy()));
    ControlFlow::Continue(())
  }

  fn op_negate(&mut self) -> OpRes {
    match self.pop_stack() {
      Value::Number(n) => {
        self.push_stack(Value::Number(-n));
        ControlFlow::Continue(())
      }
      _ => self.runtime_error("Operand must be a number."),
    }
  }

  fn op_print(&mut self) -> OpRes {
    let val = self.pop_stack();
    let _ = writeln!(self.out, "{}", val);
    ControlFlow::Continue(())
  }

  fn op_pop_stack_top(&mut self) -> OpRes {
    self.pop_stack();
    ControlFlow::Continue(())
  }

  /// Defining a global always writes, so later definitions of one name
  /// shadow earlier ones.
  fn op_define_global(&mut self) -> OpRes {
    let name = self.read_identifier();
    let val = self.pop_stack();

    self.globals.set(name, val);
    ControlFlow::Continue(())
  }

  fn op_get_global(&mut self) -> OpRes {
    let name = self.read_identifier();

    match self.globals.get(&name) {
      Some(val) => {
        let val = val.clone();
        self.push_stack(val);
        ControlFlow::Continue(())
      }
      None => {
        let message = format!("Undefined variable '{}'.", name.chars);
        self.runtime_error(&message)
      }
    }
  }

  /// Assignment must not create a variable. The table reports whether the
  /// set inserted a fresh key; when it did, the global was never defined,
  /// so the insert is rolled back and the run fails.
  fn op_set_global(&mut self) -> OpRes {
    let name = self.read_identifier();
    let val = self.peek_stack(0).clone();

    if self.globals.set(Rc::clone(&name), val) {
      self.globals.delete(&name);
      let message = format!("Undefined variable '{}'.", name.chars);
      return self.runtime_error(&message);
    }

    ControlFlow::Continue(())
  }

  fn op_get_local(&mut self) -> OpRes {
    let slot = self.next_byte() as usize;
    let val = self.stack[slot].clone();
    self.push_stack(val);
    ControlFlow::Continue(())
  }

  /// Assignment is an expression, so the assigned value stays on the stack.
  fn op_set_local(&mut self) -> OpRes {
    let slot = self.next_byte() as usize;
    self.stack[slot] = self.peek_stack(0).clone();
    ControlFlow::Continue(())
  }

  fn op_jump_forward(&mut self) -> OpRes {
    let jump = self.next_short() as usize;
    self.ip += jump;
    ControlFlow::Continue(())
  }

  /// A conditional branch, taken only when the condition on top of the
  /// stack is falsy. The condition is not popped here; the surrounding
  /// code pops it on both paths.
  fn op_jump_if_false(&mut self) -> OpRes {
    let jump = self.next_short() as usize;

    if self.peek_stack(0).is_falsy() {
      self.ip += jump;
    }

    ControlFlow::Continue(())
  }

  fn op_loop_jump(&mut self) -> OpRes {
    let back_jump = self.next_short() as usize;
    self.ip -= back_jump;
    ControlFlow::Continue(())
  }

  fn op_return(&mut self) -> OpRes {
    // Balanced statements leave nothing behind on the stack.
    debug_assert!(self.stack.is_empty());
    ControlFlow::Break(InterpretResult::Ok)
  }

  /// Prints the execution trace for the program. Useful for debugging the VM.
  #[cfg(feature = "trace_execution")]
  fn print_execution(&self) {
    print!("          ");
    for val in self.stack.iter() {
      print!("[ {:?} ]", val);
    }
    println!();

    let mut text = String::new();
    grace_core::bytecode::disassemble_instruction(&self.chunk, self.ip, &mut text);
    print!("{}", text);
  }
}
