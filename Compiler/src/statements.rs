use grace_core::bytecode::OpCode;
use grace_core::tokens::TokenKind;

use crate::Compiler;

impl<'a> Compiler<'a> {
  /// Compiles a single declaration, resynchronizing at a statement boundary
  /// when the compiler is panicking by the end of it.
  pub(crate) fn declaration(&mut self) {
    if self.matches(&TokenKind::VAR_KW) {
      self.var_declaration();
    } else {
      self.statement();
    }

    if self.is_in_panic {
      self.synchronize();
    }
  }

  /// Compiles a `var` declaration. A declaration without an initializer
  /// defaults the variable to `nil`.
  fn var_declaration(&mut self) {
    let name = self.parse_variable("Expect variable name.");

    if self.matches(&TokenKind::EQUALS) {
      self.expression();
    } else {
      self.emit_op_code(OpCode::LoadImmNil);
    }

    self.consume(&TokenKind::SEMICOLON, "Expect ';' after variable declaration.");
    self.define_variable(name);
  }

  /// Compiles a single statement.
  pub(crate) fn statement(&mut self) {
    if self.matches(&TokenKind::PRINT_KW) {
      self.print_statement();
    } else if self.matches(&TokenKind::IF_KW) {
      self.if_statement();
    } else if self.matches(&TokenKind::L_CURLY) {
      self.begin_scope();
      self.block_statement();
      self.end_scope();
    } else {
      self.expression_statement();
    }
  }

  fn print_statement(&mut self) {
    self.expression();
    self.consume(&TokenKind::SEMICOLON, "Expect ';' after value.");
    self.emit_op_code(OpCode::Print);
  }

  /// An expression in statement position runs for its side effects only, so
  /// its value is discarded.
  fn expression_statement(&mut self) {
    self.expression();
    self.consume(&TokenKind::SEMICOLON, "Expect ';' after value.");
    self.emit_op_code(OpCode::PopStackTop);
  }

  /// Compiles an `if` statement. The condition stays on the stack through
  /// the conditional jump, so each branch begins by popping it.
  fn if_statement(&mut self) {
    self.consume(&TokenKind::L_PAREN, "Expect '(' after 'if'.");
    self.expression();
    self.consume(&TokenKind::R_PAREN, "Expect ')' after condition.");

    let then_jump = self.emit_jump(OpCode::JumpIfFalse);
    self.emit_op_code(OpCode::PopStackTop);
    self.statement();

    let else_jump = self.emit_jump(OpCode::JumpForward);
    self.patch_jump(then_jump);
    self.emit_op_code(OpCode::PopStackTop);

    if self.matches(&TokenKind::ELSE_KW) {
      self.statement();
    }
    self.patch_jump(else_jump);
  }

  /// Compiles the declarations inside a `{ ... }` block.
  fn block_statement(&mut self) {
    while !self.check(&TokenKind::R_CURLY) && !self.check(&TokenKind::EOF) {
      self.declaration();
    }

    self.consume(&TokenKind::R_CURLY, "Expect '}' after block.");
  }

  /// Leaves panic mode by skipping tokens up to the next statement
  /// boundary: just past a semicolon, or just before a token that can begin
  /// a statement.
  fn synchronize(&mut self) {
    self.is_in_panic = false;

    while !self.check(&TokenKind::EOF) {
      if self.previous.kind.type_match(&TokenKind::SEMICOLON) {
        return;
      }

      match self.current.kind {
        TokenKind::CLASS_KW
        | TokenKind::FUN_KW
        | TokenKind::VAR_KW
        | TokenKind::FOR_KW
        | TokenKind::IF_KW
        | TokenKind::WHILE_KW
        | TokenKind::PRINT_KW
        | TokenKind::RETURN_KW => return,
        _ => self.advance(),
      }
    }
  }
}
