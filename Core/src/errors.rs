use std::io::Write;

use crate::tokens::{Token, TokenKind};

/// Where in the source a compile error points.
pub enum ErrorSite {
  /// A concrete lexeme.
  At(String),
  /// The end of the file.
  AtEnd,
  /// A scanner error token; the message already names the problem.
  Plain,
}

/// A single compile-time diagnostic.
pub struct ErrorReport {
  pub line: usize,
  pub site: ErrorSite,
  pub message: String,
}

impl ErrorReport {
  /// Builds a report pointing at a concrete token.
  ///
  /// # Parameters
  /// - `token`: The token the error was detected at.
  /// - `src`: A reference to the flat source list of characters.
  /// - `message`: The error message to display.
  pub fn at_token(token: &Token, src: &[char], message: &str) -> Self {
    let site = match &token.kind {
      TokenKind::EOF => ErrorSite::AtEnd,
      TokenKind::ERROR(_) => ErrorSite::Plain,
      _ => ErrorSite::At(token.lexeme(src)),
    };

    ErrorReport {
      line: token.line_num,
      site,
      message: message.to_string(),
    }
  }
}

/// Writes every collected compile error to the error sink.
///
/// # Parameters
/// - `errors`: The list of reports collected during compilation.
/// - `sink`: The diagnostics sink to write into.
pub fn report_errors_list(errors: &[ErrorReport], sink: &mut dyn Write) {
  for report in errors {
    let _ = match &report.site {
      ErrorSite::At(lexeme) => {
        writeln!(sink, "\n[line {}] Error at '{}': {}", report.line, lexeme, report.message)
      }
      ErrorSite::AtEnd => writeln!(sink, "\n[line {}] Error at end: {}", report.line, report.message),
      ErrorSite::Plain => writeln!(sink, "\n[line {}] Error: {}", report.line, report.message),
    };
  }
}
