//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ParseError;
use crate::parser::ast::*;
use crate::parser::lexer::{self, Token};

type Extra<'a> = extra::Err<Rich<'a, Token>>;

/// Parse DSL source code into an AST
///
/// Lexing runs to completion first, so an unrecognized character anywhere in
/// the source is reported before any grammar error.
pub fn parse(input: &str) -> Result<Program, ParseError> {
    let tokens = lexer::lex(input)?;
    tracing::debug!(tokens = tokens.len(), "lexed source");

    let len = input.len();
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (tok, SimpleSpan::from(span)));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    match program_parser().parse(token_stream).into_result() {
        Ok(program) => {
            tracing::debug!(nodes = program.len(), "parsed program");
            Ok(program)
        }
        Err(errs) => {
            // No recovery is configured, so the first error is the only one
            // that describes the input
            let err = errs
                .into_iter()
                .next()
                .map(ParseError::from)
                .unwrap_or_else(|| ParseError::Syntax {
                    span: len..len,
                    message: "invalid program".to_string(),
                    expected: Vec::new(),
                    found: None,
                });
            tracing::debug!(offset = err.offset(), "parse failed");
            Err(err)
        }
    }
}

/// Keyword: an identifier token with exactly this text
fn keyword<'a, I>(text: &'static str) -> impl Parser<'a, I, (), Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    just(Token::keyword(text)).ignored()
}

fn punct<'a, I>(c: char) -> impl Parser<'a, I, (), Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    just(Token::Punct(c)).ignored()
}

fn identifier<'a, I>() -> impl Parser<'a, I, Identifier, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .labelled("identifier")
}

fn string_literal<'a, I>() -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    select! {
        Token::String(s) => s,
    }
    .labelled("string")
}

/// `label ':' value`
fn field<'a, I, O>(
    label: &'static str,
    value: impl Parser<'a, I, O, Extra<'a>> + Clone,
) -> impl Parser<'a, I, O, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    keyword(label).then_ignore(punct(':')).ignore_then(value)
}

/// `ident '.' ident`, captured as the joined text
fn qualified_ident<'a, I>() -> impl Parser<'a, I, QualifiedIdent, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    identifier()
        .then_ignore(punct('.'))
        .then(identifier())
        .map(|(entity, field)| QualifiedIdent::new(&entity, &field))
}

/// `'compute' Ident '{' 'input' ':' Ident 'output' ':' Ident 'code' ':' String '}'`
fn compute_node<'a, I>() -> impl Parser<'a, I, ComputeNode, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    keyword("compute")
        .ignore_then(identifier())
        .then_ignore(punct('{'))
        .then(field("input", identifier()))
        .then(field("output", identifier()))
        .then(field("code", string_literal()))
        .then_ignore(punct('}'))
        .map(|(((name, input), output), code)| ComputeNode {
            name,
            input,
            output,
            code,
        })
}

/// `'agent' Ident '{' 'watches' ':' Ident '.' Ident 'can_add' ':' Ident 'code' ':' String '}'`
fn agent_node<'a, I>() -> impl Parser<'a, I, AgentNode, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    keyword("agent")
        .ignore_then(identifier())
        .then_ignore(punct('{'))
        .then(field("watches", qualified_ident()))
        .then(field("can_add", identifier()))
        .then(field("code", string_literal()))
        .then_ignore(punct('}'))
        .map(|(((name, watches), can_add), code)| AgentNode {
            name,
            watches,
            can_add,
            code,
        })
}

fn program_parser<'a, I>() -> impl Parser<'a, I, Program, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // The leading keyword decides the alternative
    let node = choice((
        compute_node().map(Node::Compute),
        agent_node().map(Node::Agent),
    ));

    node.repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|nodes| Program { nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CANONICAL: &str = r#"
        compute double {
            input: x
            output: y
            code: "y = x * 2"
        }

        agent printer {
            watches: double.output
            can_add: compute
            code: "if y > 10 { add_node('triple', template: compute) }"
        }
    "#;

    fn compute(name: &str, input: &str, output: &str, code: &str) -> Node {
        Node::Compute(ComputeNode {
            name: Identifier::new(name),
            input: Identifier::new(input),
            output: Identifier::new(output),
            code: code.to_string(),
        })
    }

    fn syntax_error(input: &str) -> (usize, Vec<String>, Option<String>) {
        match parse(input) {
            Err(ParseError::Syntax {
                span,
                expected,
                found,
                ..
            }) => (span.start, expected, found),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_canonical_program() {
        let program = parse(CANONICAL).expect("Should parse");
        assert_eq!(program.nodes.len(), 2);
        assert_eq!(program.nodes[0], compute("double", "x", "y", "y = x * 2"));
        match &program.nodes[1] {
            Node::Agent(a) => {
                assert_eq!(a.name.as_str(), "printer");
                assert_eq!(a.watches.as_str(), "double.output");
                assert_eq!(a.can_add.as_str(), "compute");
                assert!(a.code.contains("add_node"));
            }
            other => panic!("Expected agent, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_source() {
        assert!(parse("").expect("Should parse").is_empty());
    }

    #[test]
    fn test_parse_trivia_only() {
        let program = parse("  // header\n\n\t// another\n").expect("Should parse");
        assert!(program.is_empty());
    }

    #[test]
    fn test_parse_single_line_program() {
        let program =
            parse(r#"compute f{input:a output:b code:"b=a"}"#).expect("Should parse");
        assert_eq!(program.nodes, vec![compute("f", "a", "b", "b=a")]);
    }

    #[test]
    fn test_parse_preserves_declaration_order() {
        let program = parse(
            r#"
            agent a { watches: c.out can_add: compute code: "" }
            compute c { input: i output: out code: "" }
            compute b { input: out output: o2 code: "" }
        "#,
        )
        .expect("Should parse");
        let names: Vec<_> = program.iter().map(|n| n.name().as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert_eq!(program.nodes[0].kind(), NodeKind::Agent);
    }

    #[test]
    fn test_parse_watches_captured_joined() {
        let program = parse(
            r#"agent w { watches: double . output can_add: x code: "" }"#,
        )
        .expect("Should parse");
        let agent = program.nodes[0].as_agent().expect("agent");
        assert_eq!(agent.watches.as_str(), "double.output");
        assert_eq!(agent.watches.parts(), ("double", "output"));
    }

    #[test]
    fn test_parse_keyword_as_node_name() {
        let program = parse(
            r#"
            compute agent { input: compute output: code code: "" }
            agent compute { watches: agent.output can_add: agent code: "" }
        "#,
        )
        .expect("Should parse");
        assert_eq!(program.nodes[0], compute("agent", "compute", "code", ""));
        let agent = program.nodes[1].as_agent().expect("agent");
        assert_eq!(agent.name.as_str(), "compute");
        assert_eq!(agent.watches.as_str(), "agent.output");
        assert_eq!(agent.can_add.as_str(), "agent");
    }

    #[test]
    fn test_parse_empty_code_string() {
        let program =
            parse(r#"compute n { input: a output: b code: "" }"#).expect("Should parse");
        assert_eq!(program.nodes[0].code(), "");
    }

    #[test]
    fn test_missing_closing_brace_is_syntax_error() {
        let source = CANONICAL.trim_end().trim_end_matches('}');
        let (offset, expected, found) = syntax_error(source);
        assert_eq!(offset, source.len());
        assert_eq!(expected, vec!["'}'".to_string()]);
        assert_eq!(found, None);
    }

    #[test]
    fn test_unrecognized_character_is_lex_error() {
        let err = parse("compute double {\n    input: x*\n}").unwrap_err();
        assert_eq!(
            err,
            ParseError::Lex {
                span: 29..30,
                found: '*'
            }
        );
    }

    #[test]
    fn test_lex_error_wins_over_later_syntax_error() {
        let err = parse("compute # {").unwrap_err();
        assert!(err.is_lex());
        assert_eq!(err.offset(), 8);
    }

    #[test]
    fn test_unknown_top_level_keyword() {
        let (offset, expected, found) = syntax_error("module m {}");
        assert_eq!(offset, 0);
        assert_eq!(found.as_deref(), Some("identifier 'module'"));
        assert!(expected.contains(&"'compute'".to_string()));
        assert!(expected.contains(&"'agent'".to_string()));
    }

    #[test]
    fn test_fields_out_of_order() {
        let source = r#"compute n { output: y input: x code: "" }"#;
        let (offset, expected, found) = syntax_error(source);
        assert_eq!(offset, source.find("output").unwrap());
        assert_eq!(expected, vec!["'input'".to_string()]);
        assert_eq!(found.as_deref(), Some("identifier 'output'"));
    }

    #[test]
    fn test_missing_field() {
        let source = r#"compute n { input: x code: "" }"#;
        let (offset, expected, _) = syntax_error(source);
        assert_eq!(offset, source.find("code").unwrap());
        assert_eq!(expected, vec!["'output'".to_string()]);
    }

    #[test]
    fn test_unknown_extra_field() {
        let source = r#"compute n { input: x output: y code: "" retries: z }"#;
        let (offset, expected, _) = syntax_error(source);
        assert_eq!(offset, source.find("retries").unwrap());
        assert_eq!(expected, vec!["'}'".to_string()]);
    }

    #[test]
    fn test_watches_requires_qualified_name() {
        let source = r#"agent a { watches: double can_add: x code: "" }"#;
        let (offset, expected, _) = syntax_error(source);
        assert_eq!(offset, source.find("can_add").unwrap());
        assert_eq!(expected, vec!["'.'".to_string()]);
    }

    #[test]
    fn test_code_must_be_string() {
        let source = "compute n { input: x output: y code: y }";
        let (offset, expected, found) = syntax_error(source);
        assert_eq!(offset, source.rfind('y').unwrap());
        assert_eq!(expected, vec!["string".to_string()]);
        assert_eq!(found.as_deref(), Some("identifier 'y'"));
    }

    #[test]
    fn test_input_must_be_identifier() {
        let source = r#"compute n { input: "x" output: y code: "" }"#;
        let (_, expected, found) = syntax_error(source);
        assert_eq!(expected, vec!["identifier".to_string()]);
        assert_eq!(found.as_deref(), Some("string \"x\""));
    }

    #[test]
    fn test_error_message_mentions_expected() {
        let err = parse("compute n { input x }").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at offset 18: unexpected identifier 'x', expected ':'"
        );
    }

    #[test]
    fn test_from_str() {
        let program: Program = r#"compute n { input: a output: b code: "c" }"#
            .parse()
            .expect("Should parse");
        assert_eq!(program.get("n").map(|n| n.kind()), Some(NodeKind::Compute));
        assert!(program.get("missing").is_none());
    }
}
