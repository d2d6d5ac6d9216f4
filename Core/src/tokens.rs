/// A token that represents a single unit of Grace code.
#[derive(Clone)]
pub struct Token {
  /// The token's line number.
  pub line_num: usize,
  /// The token's lexeme span in the flat source vector (start, end).
  pub span: (usize, usize),
  /// The token's type.
  pub kind: TokenKind,
}

impl Token {
  /// Gets the lexeme of this token based on its location information.
  ///
  /// # Parameters
  /// - `src`: A reference to the flat source list of characters.
  pub fn lexeme(&self, src: &[char]) -> String {
    match &self.kind {
      TokenKind::ERROR(e) => e.to_str().to_string(),
      TokenKind::EOF => "\0".to_string(),
      _ => src[self.span.0..self.span.1].iter().collect(),
    }
  }
}

/// The types of tokens in a Grace program.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq)]
#[repr(u8)]
pub enum TokenKind {
  // Symbol-based tokens
  BANG,            // !
  BANG_EQ,         // !=
  COMMA,           // ,
  DASH,            // -
  DOT,             // .
  EQUALS,          // =
  GREATER_THAN,    // >
  GREATER_THAN_EQ, // >=
  LESS_THAN,       // <
  LESS_THAN_EQ,    // <=
  LOGIC_EQ,        // ==
  L_CURLY,         // {
  L_PAREN,         // (
  PLUS,            // +
  R_CURLY,         // }
  R_PAREN,         // )
  SEMICOLON,       // ;
  SLASH,           // /
  STAR,            // *

  // Value Literals
  FALSE_LIT,
  IDENTIFIER,
  NIL_LIT,
  NUM_LIT,
  STR_LIT,
  TRUE_LIT,

  // Keywords
  AND_KW,
  CLASS_KW,
  ELSE_KW,
  FOR_KW,
  FUN_KW,
  IF_KW,
  OR_KW,
  PRINT_KW,
  RETURN_KW,
  SUPER_KW,
  THIS_KW,
  VAR_KW,
  WHILE_KW,

  /// Other Tokens
  EOF,
  ERROR(ErrorTokenKind),
}

impl TokenKind {
  /// Checks that this token is of a given type.
  ///
  /// # Parameters
  /// - `token_type`: The token type to be matched against this token.
  pub fn type_match(&self, token_type: &TokenKind) -> bool {
    std::mem::discriminant(self) == std::mem::discriminant(token_type)
  }
}

/// Maps a keyword string to a token type.
///
/// # Parameters
/// - `id`: The identifier's string name.
///
/// # Returns
/// `TokenKind`: The type of token matched for given identifier name.
pub fn make_identifier_kind(id: &str) -> TokenKind {
  match id {
    "and" => TokenKind::AND_KW,
    "class" => TokenKind::CLASS_KW,
    "else" => TokenKind::ELSE_KW,
    "false" => TokenKind::FALSE_LIT,
    "for" => TokenKind::FOR_KW,
    "fun" => TokenKind::FUN_KW,
    "if" => TokenKind::IF_KW,
    "nil" => TokenKind::NIL_LIT,
    "or" => TokenKind::OR_KW,
    "print" => TokenKind::PRINT_KW,
    "return" => TokenKind::RETURN_KW,
    "super" => TokenKind::SUPER_KW,
    "this" => TokenKind::THIS_KW,
    "true" => TokenKind::TRUE_LIT,
    "var" => TokenKind::VAR_KW,
    "while" => TokenKind::WHILE_KW,
    _ => TokenKind::IDENTIFIER,
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTokenKind {
  /// Invalid character.
  UnexpectedChar,
  /// Unterminated string.
  UnterminatedStr,
}

impl ErrorTokenKind {
  /// Converts an error token to its string message representation.
  pub fn to_str(&self) -> &str {
    match self {
      ErrorTokenKind::UnexpectedChar => "Unexpected character.",
      ErrorTokenKind::UnterminatedStr => "Unterminated string.",
    }
  }
}
