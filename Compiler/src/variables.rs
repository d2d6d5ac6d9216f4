use grace_core::bytecode::OpCode;
use grace_core::tokens::{Token, TokenKind};

use crate::{Compiler, Local, MAX_LOCALS};

impl<'a> Compiler<'a> {
  /// Compiles an access to (or assignment of) the variable named by `name`.
  /// Locals resolve to a stack slot; anything unresolved is assumed to be a
  /// global and goes through the identifier index.
  pub(crate) fn named_variable(&mut self, name: &Token, can_assign: bool) {
    let (get_op, set_op, operand) = match self.resolve_local(name) {
      Some(slot) => (OpCode::GetLocal, OpCode::SetLocal, slot as u8),
      None => {
        let idx = self.identifier_constant(name);
        (OpCode::GetGlobal, OpCode::SetGlobal, idx)
      }
    };

    if can_assign && self.matches(&TokenKind::EQUALS) {
      self.expression();
      self.emit_op_code_with_byte(set_op, operand);
    } else {
      self.emit_op_code_with_byte(get_op, operand);
    }
  }

  /// Interns an identifier and adds it to the chunk's identifier index.
  pub(crate) fn identifier_constant(&mut self, name: &Token) -> u8 {
    let lexeme = self.lexeme(name);
    let obj = self.heap.copy_string(&lexeme);
    self.make_identifier(obj)
  }

  /// Consumes the identifier of a declaration.
  ///
  /// # Returns
  /// `u8`: The identifier's constant-pool index for globals, or 0 for
  /// locals, which live on the stack and need no pool slot.
  pub(crate) fn parse_variable(&mut self, message: &str) -> u8 {
    self.consume(&TokenKind::IDENTIFIER, message);

    self.declare_variable();
    if self.scope_depth > 0 {
      return 0;
    }

    let name = self.previous.clone();
    self.identifier_constant(&name)
  }

  /// Registers a local for the identifier just consumed. Globals are late
  /// bound and need no declaration.
  pub(crate) fn declare_variable(&mut self) {
    if self.scope_depth == 0 {
      return;
    }

    let name = self.previous.clone();
    self.add_local(name);
  }

  /// Marks a declared variable as usable: a local receives its scope depth,
  /// a global its define instruction.
  pub(crate) fn define_variable(&mut self, idx: u8) {
    if self.scope_depth > 0 {
      self.mark_initialized();
      return;
    }

    self.emit_op_code_with_byte(OpCode::DefineGlobal, idx);
  }

  /// Opens a new lexical scope.
  pub(crate) fn begin_scope(&mut self) {
    self.scope_depth += 1;
  }

  /// Closes the current scope, popping every local declared inside it off
  /// the stack.
  pub(crate) fn end_scope(&mut self) {
    self.scope_depth -= 1;

    while let Some(local) = self.locals.last() {
      match local.depth {
        Some(depth) if depth > self.scope_depth => {
          self.emit_op_code(OpCode::PopStackTop);
          self.locals.pop();
        }
        _ => break,
      }
    }
  }

  /// Finds the innermost local with the given name.
  ///
  /// # Returns
  /// `Option<usize>`: The local's stack slot, or `None` for globals.
  fn resolve_local(&mut self, name: &Token) -> Option<usize> {
    let src = self.source;
    let target = name.lexeme(src);

    let mut uninitialized = false;
    let mut resolved = None;

    for (slot, local) in self.locals.iter().enumerate().rev() {
      if local.name.lexeme(src) == target {
        uninitialized = local.depth.is_none();
        resolved = Some(slot);
        break;
      }
    }

    if uninitialized {
      self.error("Can't read local variable in its own initializer.");
    }

    resolved
  }

  /// Pushes a new, not-yet-initialized local onto the locals stack.
  /// Redeclaring a name that already exists in the current scope is an
  /// error; shadowing an outer scope's name is not.
  fn add_local(&mut self, name: Token) {
    if self.locals.len() == MAX_LOCALS {
      self.error("Too many local variables in function.");
      return;
    }

    let src = self.source;
    let target = name.lexeme(src);
    let mut duplicate = false;

    for local in self.locals.iter().rev() {
      // Stop at the first local that belongs to an enclosing scope.
      match local.depth {
        Some(depth) if depth < self.scope_depth => break,
        _ => {}
      }

      if local.name.lexeme(src) == target {
        duplicate = true;
        break;
      }
    }

    if duplicate {
      self.error("Already a variable with this name in this scope.");
    }

    self.locals.push(Local { name, depth: None });
  }

  fn mark_initialized(&mut self) {
    let depth = self.scope_depth;

    if let Some(local) = self.locals.last_mut() {
      local.depth = Some(depth);
    }
  }
}
