use num_traits::FromPrimitive;

use grace_core::tokens::TokenKind;

/// Represents the precedence of different expressions in ascending order:
/// a variant that appears later in the enum binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[derive(num_derive::FromPrimitive)]
#[repr(u8)]
pub enum Precedence {
  None,
  Assignment, // =
  Or,         // or
  And,        // and
  Equality,   // == !=
  Comparison, // < > <= >=
  Term,       // + -
  Factor,     // * /
  Unary,      // ! -
  Call,       // . ()
  Primary,
}

impl Precedence {
  /// Gets the next-higher precedence level. Used by left-associative binary
  /// operators to parse their right operand.
  pub fn one_higher(&self) -> Precedence {
    FromPrimitive::from_u8(*self as u8 + 1).unwrap_or(Precedence::Primary)
  }
}

/// The set of compiling functions that can be associated with a given token.
#[derive(Clone, Copy)]
pub enum ParseFn {
  CompileBinaryExpr,
  CompileGrouping,
  CompileLiteral,
  CompileNumeric,
  CompileString,
  CompileUnary,
  CompileVariable,
  None, // Do not call a parsing function.
}

/// Wraps the parsing properties of a token so that they can be easily
/// accessed throughout the compiler.
pub struct ParserRule {
  pub prefix: ParseFn,
  pub infix: ParseFn,
  pub precedence: Precedence,
}

/// Gets the parse rule associated with a token kind.
///
/// Tokens absent from the table (keywords reserved for statements and
/// unimplemented expression forms among them) parse neither as prefix nor
/// as infix.
pub fn rule_of(kind: &TokenKind) -> ParserRule {
  match kind {
    TokenKind::L_PAREN => ParserRule {
      prefix: ParseFn::CompileGrouping,
      infix: ParseFn::None,
      precedence: Precedence::None,
    },

    TokenKind::DASH => ParserRule {
      prefix: ParseFn::CompileUnary,
      infix: ParseFn::CompileBinaryExpr,
      precedence: Precedence::Term,
    },

    TokenKind::PLUS => ParserRule {
      prefix: ParseFn::None,
      infix: ParseFn::CompileBinaryExpr,
      precedence: Precedence::Term,
    },

    TokenKind::SLASH | TokenKind::STAR => ParserRule {
      prefix: ParseFn::None,
      infix: ParseFn::CompileBinaryExpr,
      precedence: Precedence::Factor,
    },

    TokenKind::BANG => ParserRule {
      prefix: ParseFn::CompileUnary,
      infix: ParseFn::None,
      precedence: Precedence::None,
    },

    TokenKind::BANG_EQ | TokenKind::LOGIC_EQ => ParserRule {
      prefix: ParseFn::None,
      infix: ParseFn::CompileBinaryExpr,
      precedence: Precedence::Equality,
    },

    TokenKind::GREATER_THAN | TokenKind::GREATER_THAN_EQ | TokenKind::LESS_THAN | TokenKind::LESS_THAN_EQ => {
      ParserRule {
        prefix: ParseFn::None,
        infix: ParseFn::CompileBinaryExpr,
        precedence: Precedence::Comparison,
      }
    }

    TokenKind::IDENTIFIER => ParserRule {
      prefix: ParseFn::CompileVariable,
      infix: ParseFn::None,
      precedence: Precedence::None,
    },

    TokenKind::STR_LIT => ParserRule {
      prefix: ParseFn::CompileString,
      infix: ParseFn::None,
      precedence: Precedence::None,
    },

    TokenKind::NUM_LIT => ParserRule {
      prefix: ParseFn::CompileNumeric,
      infix: ParseFn::None,
      precedence: Precedence::None,
    },

    TokenKind::FALSE_LIT | TokenKind::NIL_LIT | TokenKind::TRUE_LIT => ParserRule {
      prefix: ParseFn::CompileLiteral,
      infix: ParseFn::None,
      precedence: Precedence::None,
    },

    _ => ParserRule {
      prefix: ParseFn::None,
      infix: ParseFn::None,
      precedence: Precedence::None,
    },
  }
}
