use grace_core::bytecode::OpCode;
use grace_core::tokens::TokenKind;
use grace_core::values::Value;

use crate::precedence::{rule_of, ParseFn, Precedence};
use crate::Compiler;

impl<'a> Compiler<'a> {
  /// Compiles a full expression.
  pub(crate) fn expression(&mut self) {
    self.parse_precedence(Precedence::Assignment);
  }

  /// The Pratt-parsing core: compile the prefix form of the token just
  /// consumed, then keep folding infix forms for as long as the next
  /// token's precedence does not drop below `precedence`.
  ///
  /// Assignment targets are only accepted when the surrounding expression
  /// parses at assignment precedence or lower; an `=` still pending after
  /// that is a malformed target.
  pub(crate) fn parse_precedence(&mut self, precedence: Precedence) {
    self.advance();

    let can_assign = precedence <= Precedence::Assignment;

    match rule_of(&self.previous.kind).prefix {
      ParseFn::None => {
        self.error("Expect expression.");
        return;
      }
      prefix => self.dispatch_parse_fn(prefix, can_assign),
    }

    while precedence <= rule_of(&self.current.kind).precedence {
      self.advance();
      let infix = rule_of(&self.previous.kind).infix;
      self.dispatch_parse_fn(infix, can_assign);
    }

    if can_assign && self.matches(&TokenKind::EQUALS) {
      self.error("Invalid assignment target.");
    }
  }

  /// Invokes the compiling routine named by a parse rule.
  fn dispatch_parse_fn(&mut self, func: ParseFn, can_assign: bool) {
    match func {
      ParseFn::CompileBinaryExpr => self.compile_binary_expr(),
      ParseFn::CompileGrouping => self.compile_grouping(),
      ParseFn::CompileLiteral => self.compile_literal(),
      ParseFn::CompileNumeric => self.compile_numeric(),
      ParseFn::CompileString => self.compile_string(),
      ParseFn::CompileUnary => self.compile_unary(),
      ParseFn::CompileVariable => self.compile_variable(can_assign),
      ParseFn::None => {}
    }
  }

  /// Compiles a parenthesized expression.
  fn compile_grouping(&mut self) {
    self.expression();
    self.consume(&TokenKind::R_PAREN, "Expect ')' after expression.");
  }

  /// Compiles a numeric literal.
  fn compile_numeric(&mut self) {
    let lexeme = self.lexeme(&self.previous);

    match lexeme.parse::<f64>() {
      Ok(value) => self.emit_constant(Value::Number(value)),
      // Unreachable for lexemes the scanner produces, but the parse is
      // fallible and the failure needs a home.
      Err(_) => self.error("Invalid numeric literal."),
    }
  }

  /// Compiles a string literal, interning its interior. The surrounding
  /// quotes are part of the lexeme but not of the value.
  fn compile_string(&mut self) {
    let (start, end) = self.previous.span;
    let chars: String = self.source[(start + 1)..(end - 1)].iter().collect();

    let obj = self.heap.copy_string(&chars);
    self.emit_constant(obj.into());
  }

  /// Compiles the `true`, `false`, and `nil` literals.
  fn compile_literal(&mut self) {
    match self.previous.kind {
      TokenKind::TRUE_LIT => self.emit_op_code(OpCode::LoadImmTrue),
      TokenKind::FALSE_LIT => self.emit_op_code(OpCode::LoadImmFalse),
      TokenKind::NIL_LIT => self.emit_op_code(OpCode::LoadImmNil),
      _ => unreachable!("Only literal tokens have a literal parse rule."),
    }
  }

  /// Compiles a unary operator: the operand first, then the operation.
  fn compile_unary(&mut self) {
    let operator = self.previous.kind.clone();

    self.parse_precedence(Precedence::Unary);

    match operator {
      TokenKind::DASH => self.emit_op_code(OpCode::Negate),
      TokenKind::BANG => self.emit_op_code(OpCode::LogicNot),
      _ => unreachable!("Only '-' and '!' have a unary parse rule."),
    }
  }

  /// Compiles the right operand of a binary operator, then the operator
  /// itself. `!=`, `>=`, and `<=` have no instruction of their own and
  /// compile to the inverse comparison followed by a logic-not.
  fn compile_binary_expr(&mut self) {
    let operator = self.previous.kind.clone();
    let rule = rule_of(&operator);

    self.parse_precedence(rule.precedence.one_higher());

    match operator {
      TokenKind::PLUS => self.emit_op_code(OpCode::Add),
      TokenKind::DASH => self.emit_op_code(OpCode::Subtract),
      TokenKind::STAR => self.emit_op_code(OpCode::Multiply),
      TokenKind::SLASH => self.emit_op_code(OpCode::Divide),
      TokenKind::LOGIC_EQ => self.emit_op_code(OpCode::Equals),
      TokenKind::GREATER_THAN => self.emit_op_code(OpCode::GreaterThan),
      TokenKind::LESS_THAN => self.emit_op_code(OpCode::LessThan),
      TokenKind::BANG_EQ => {
        self.emit_op_code(OpCode::Equals);
        self.emit_op_code(OpCode::LogicNot);
      }
      TokenKind::GREATER_THAN_EQ => {
        self.emit_op_code(OpCode::LessThan);
        self.emit_op_code(OpCode::LogicNot);
      }
      TokenKind::LESS_THAN_EQ => {
        self.emit_op_code(OpCode::GreaterThan);
        self.emit_op_code(OpCode::LogicNot);
      }
      _ => unreachable!("Only binary operators have a binary parse rule."),
    }
  }

  /// Compiles a variable reference, or an assignment when the context
  /// allows one.
  fn compile_variable(&mut self, can_assign: bool) {
    let name = self.previous.clone();
    self.named_variable(&name, can_assign);
  }
}
