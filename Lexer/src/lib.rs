use grace_core::tokens::{make_identifier_kind, ErrorTokenKind, Token, TokenKind};

mod lex_numbers;
mod lex_strings;


/// Struct that represents the scanner.
///
/// Tokens are produced lazily: each call to [`Lexer::next_token`] scans
/// exactly one token, and after the source is exhausted every further call
/// yields `EOF`.
pub struct Lexer<'a> {
  /// A flat list of characters from the source file.
  source: &'a [char],
  /// The index of the current character.
  current: usize,
  /// The current line number.
  line_num: usize,
  /// The position of the first character for the current token in the flat
  /// source vector.
  token_start: usize,
}

impl<'a> Lexer<'a> {
  /// An initialized instance of the lexer.
  ///
  /// # Parameters
  /// - `source`: A reference to the source list of characters.
  pub fn new(source: &'a [char]) -> Self {
    Self {
      source,
      current: 0,
      line_num: 1,
      token_start: 0,
    }
  }

  /// Scans the next token in the source file.
  pub fn next_token(&mut self) -> Token {
    self.skip_whitespace();

    // Reset the start of the token.
    self.token_start = self.current;

    // If we are at the end, return the EOF token.
    if self.is_at_end() {
      return self.make_token(TokenKind::EOF);
    }

    let c = self.advance();

    // Generates an identifier/keyword token if the current character is alphabetic.
    if c.is_ascii_alphabetic() || c == '_' {
      return self.make_identifier_token();
    }

    // Generates a numeric literal if the current character is a digit.
    if c.is_ascii_digit() {
      return self.make_numeric_token();
    }

    // Generate symbol-like tokens.
    match c {
      '"' => self.make_string_token(),
      '(' => self.make_token(TokenKind::L_PAREN),
      ')' => self.make_token(TokenKind::R_PAREN),
      '{' => self.make_token(TokenKind::L_CURLY),
      '}' => self.make_token(TokenKind::R_CURLY),
      ';' => self.make_token(TokenKind::SEMICOLON),
      ',' => self.make_token(TokenKind::COMMA),
      '.' => self.make_token(TokenKind::DOT),
      '-' => self.make_token(TokenKind::DASH),
      '+' => self.make_token(TokenKind::PLUS),
      '/' => self.make_token(TokenKind::SLASH),
      '*' => self.make_token(TokenKind::STAR),
      '!' => {
        let tok = if self.matches('=') { TokenKind::BANG_EQ } else { TokenKind::BANG };
        self.make_token(tok)
      }
      '=' => {
        let tok = if self.matches('=') { TokenKind::LOGIC_EQ } else { TokenKind::EQUALS };
        self.make_token(tok)
      }
      '<' => {
        let tok = if self.matches('=') {
          TokenKind::LESS_THAN_EQ
        } else {
          TokenKind::LESS_THAN
        };
        self.make_token(tok)
      }
      '>' => {
        let tok = if self.matches('=') {
          TokenKind::GREATER_THAN_EQ
        } else {
          TokenKind::GREATER_THAN
        };
        self.make_token(tok)
      }
      _ => self.make_error_token(ErrorTokenKind::UnexpectedChar),
    }
  }

  /// Gets the previously consumed character.
  fn get_previous(&self) -> char {
    self.source[self.current - 1]
  }

  /// Gets the current character without consuming it.
  fn get_current(&self) -> char {
    if self.is_at_end() {
      '\0'
    } else {
      self.source[self.current]
    }
  }

  /// Returns the next character without consuming it.
  fn get_next(&self) -> char {
    if self.current + 1 >= self.source.len() {
      return '\0';
    }

    self.source[self.current + 1]
  }

  /// Checks if the scanner is at the end of the source.
  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  /// Matches the current character against a provided character, consuming
  /// it on a match.
  fn matches(&mut self, expected: char) -> bool {
    if self.is_at_end() || self.get_current() != expected {
      return false;
    }
    self.current += 1;
    true
  }

  /// Advances to the next char and returns the consumed char.
  fn advance(&mut self) -> char {
    self.current += 1;
    self.get_previous()
  }

  /// Skips whitespace-like characters and line comments from the source code.
  fn skip_whitespace(&mut self) {
    loop {
      if self.is_at_end() {
        break;
      }

      match self.get_current() {
        ' ' | '\r' | '\t' => self.current += 1,
        '/' if self.get_next() == '/' => {
          // A comment goes until the end of the line.
          while !self.is_at_end() && self.get_current() != '\n' {
            self.advance();
          }
        }
        '\n' => {
          self.line_num += 1;
          self.advance();
        }
        _ => break,
      }
    }
  }

  /// Generates an identifier or keyword token with the current state of the scanner.
  fn make_identifier_token(&mut self) -> Token {
    while !self.is_at_end() {
      let c = self.get_current();

      if c.is_ascii_alphanumeric() || c == '_' {
        self.advance();
      } else {
        break;
      }
    }

    let id: String = self.source[self.token_start..self.current].iter().collect();
    self.make_token(make_identifier_kind(&id))
  }

  /// Generates a token with the current state of the scanner.
  fn make_token(&self, kind: TokenKind) -> Token {
    Token {
      line_num: self.line_num,
      span: (self.token_start, self.current),
      kind,
    }
  }

  /// Generates an error token at the current lexeme.
  fn make_error_token(&self, err: ErrorTokenKind) -> Token {
    Token {
      line_num: self.line_num,
      span: (self.token_start, self.current),
      kind: TokenKind::ERROR(err),
    }
  }
}
