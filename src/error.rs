//! Error types for lexing and parsing

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::{Token, TokenKind};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Failure of a single parse attempt. Parsing stops at the first error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// No lexical rule matches at this position
    #[error("Lex error at offset {}: unrecognized character {found:?}", .span.start)]
    Lex { span: Span, found: char },

    /// A token (or end of input) the grammar does not accept here
    #[error("Parse error at offset {}: {message}", .span.start)]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
        found: Option<String>,
    },
}

impl ParseError {
    /// Source range the error points at
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex { span, .. } | ParseError::Syntax { span, .. } => span.clone(),
        }
    }

    /// Byte offset where the error starts
    pub fn offset(&self) -> usize {
        self.span().start
    }

    pub fn is_lex(&self) -> bool {
        matches!(self, ParseError::Lex { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax { .. })
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str, color: bool) -> String {
        let span = self.span();
        let (message, label) = match self {
            ParseError::Lex { found, .. } => (
                "Unrecognized character".to_string(),
                format!("no token starts with {:?}", found),
            ),
            ParseError::Syntax {
                message, expected, ..
            } => {
                let label = if expected.is_empty() {
                    message.clone()
                } else {
                    format!("expected {}", expected.join(", "))
                };
                (message.clone(), label)
            }
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(color))
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let found = err.found().map(|tok| tok.to_string());

        let mut expected: Vec<String> = Vec::new();
        for pattern in err.expected() {
            let item = match pattern {
                RichPattern::Token(tok) => Some(format_expected(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some(TokenKind::Eof.to_string()),
                RichPattern::Identifier(s) => Some(format!("'{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            };
            if let Some(item) = item {
                if !expected.contains(&item) {
                    expected.push(item);
                }
            }
        }

        let message = match err.reason() {
            RichReason::ExpectedFound { .. } => {
                let found_str = found
                    .clone()
                    .unwrap_or_else(|| TokenKind::Eof.to_string());
                if expected.is_empty() {
                    format!("unexpected {}", found_str)
                } else {
                    format!("unexpected {}, expected {}", found_str, expected.join(", "))
                }
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
            found,
        }
    }
}

/// Expected tokens read as literal text: `'{'`, `'compute'`
fn format_expected(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("'{}'", s),
        Token::Punct(c) => format!("'{}'", c),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_display() {
        let err = ParseError::Lex {
            span: 4..5,
            found: '#',
        };
        assert_eq!(
            err.to_string(),
            "Lex error at offset 4: unrecognized character '#'"
        );
        assert!(err.is_lex());
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_syntax_display() {
        let err = ParseError::Syntax {
            span: 10..11,
            message: "unexpected '}', expected 'code'".to_string(),
            expected: vec!["'code'".to_string()],
            found: Some("'}'".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Parse error at offset 10: unexpected '}', expected 'code'"
        );
        assert!(err.is_syntax());
    }

    #[test]
    fn test_format_lex_report() {
        let source = "compute a # b";
        let err = ParseError::Lex {
            span: 10..11,
            found: '#',
        };
        let report = err.format(source, "input.nf", false);
        assert!(report.contains("Unrecognized character"));
        assert!(report.contains("input.nf"));
        assert!(report.contains("compute a # b"));
        assert!(report.contains("no token starts with '#'"));
    }

    #[test]
    fn test_format_syntax_report_lists_expected() {
        let source = "compute a { output: y }";
        let err = ParseError::Syntax {
            span: 12..18,
            message: "unexpected identifier 'output', expected 'input'".to_string(),
            expected: vec!["'input'".to_string()],
            found: Some("identifier 'output'".to_string()),
        };
        let report = err.format(source, "input.nf", false);
        assert!(report.contains("unexpected identifier 'output'"));
        assert!(report.contains("expected 'input'"));
    }
}
