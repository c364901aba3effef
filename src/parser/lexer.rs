//! Lexer for the nodeflow DSL using logos

use std::fmt;

use logos::Logos;

use crate::error::ParseError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Lexical rules, in priority order.
///
/// Comments and whitespace are real tokens here so that [`tokenize`] can
/// report them; [`lex`] drops them before the grammar sees the stream.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[regex(r"//[^\n]*\n?")]
    Comment,

    #[regex(r"[ \t\n\r\f]+")]
    Whitespace,

    // No escapes: the literal ends at the first closing quote
    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    String(String),

    #[regex(r"[{}:.]", |lex| lex.slice().chars().next())]
    Punct(char),

    // Keywords are identifiers too; the grammar matches them by text
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

/// Classification of a token, including the end-of-input marker used in
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Whitespace,
    String,
    Punct,
    Ident,
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Comment => TokenKind::Comment,
            Token::Whitespace => TokenKind::Whitespace,
            Token::String(_) => TokenKind::String,
            Token::Punct(_) => TokenKind::Punct,
            Token::Ident(_) => TokenKind::Ident,
        }
    }

    /// Whether the token is elided before parsing
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Comment | Token::Whitespace)
    }

    /// Build a keyword token. Keywords share the identifier token kind.
    pub fn keyword(text: &str) -> Self {
        Token::Ident(text.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Comment => write!(f, "comment"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::String(s) => write!(f, "string \"{}\"", s),
            Token::Punct(c) => write!(f, "'{}'", c),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Comment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::String => "string",
            TokenKind::Punct => "punctuation",
            TokenKind::Ident => "identifier",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// Tokenize the whole input, trivia included.
///
/// The iterator yields an error for the first unrecognized character; callers
/// are expected to stop there.
pub fn tokenize(input: &str) -> impl Iterator<Item = Result<(Token, Span), ParseError>> + '_ {
    Token::lexer(input).spanned().map(move |(tok, span)| match tok {
        Ok(tok) => Ok((tok, span)),
        Err(()) => Err(unrecognized(input, span)),
    })
}

/// Lex input into the significant tokens the grammar consumes.
///
/// Comments and whitespace are elided. Fails on the first unrecognized
/// character without returning any tokens.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    let mut tokens = Vec::new();
    for item in tokenize(input) {
        let (tok, span) = item?;
        if !tok.is_trivia() {
            tokens.push((tok, span));
        }
    }
    Ok(tokens)
}

fn unrecognized(input: &str, span: Span) -> ParseError {
    // logos may report a multi-byte error span (e.g. an unterminated string);
    // the offending character is the one the span starts on
    let found = input[span.start..].chars().next().unwrap_or('\0');
    let end = span.start + found.len_utf8();
    ParseError::Lex {
        span: span.start..end,
        found,
    }
}
