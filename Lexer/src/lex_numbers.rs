use grace_core::tokens::{Token, TokenKind};

use crate::Lexer;

impl<'a> Lexer<'a> {
  /// Makes a numeric literal: one or more digits, followed by an optional
  /// fraction when a digit comes right after the dot. The dot in `123.` is
  /// left unconsumed so it can scan as its own token.
  pub(crate) fn make_numeric_token(&mut self) -> Token {
    while self.get_current().is_ascii_digit() {
      self.advance();
    }

    if self.get_current() == '.' && self.get_next().is_ascii_digit() {
      // Consume the dot.
      self.advance();

      while self.get_current().is_ascii_digit() {
        self.advance();
      }
    }

    self.make_token(TokenKind::NUM_LIT)
  }
}
