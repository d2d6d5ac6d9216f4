use grace_core::tokens::{ErrorTokenKind, Token, TokenKind};

use crate::Lexer;

impl<'a> Lexer<'a> {
  /// Makes a string literal token. The token's span includes the
  /// surrounding quotes; newlines inside the literal are permitted and
  /// counted against the line number.
  pub(crate) fn make_string_token(&mut self) -> Token {
    while !self.is_at_end() && self.get_current() != '"' {
      if self.get_current() == '\n' {
        self.line_num += 1;
      }
      self.advance();
    }

    if self.is_at_end() {
      return self.make_error_token(ErrorTokenKind::UnterminatedStr);
    }

    // The closing quote.
    self.advance();
    self.make_token(TokenKind::STR_LIT)
  }
}
