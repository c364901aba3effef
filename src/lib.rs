//! nodeflow - a declarative language for compute and agent graphs
//!
//! This library provides the lexer, parser and AST for the nodeflow DSL,
//! plus renderers for printing a parsed program.
//!
//! # Example
//!
//! ```rust
//! use nodeflow::{parse, Node};
//!
//! let program = parse(r#"
//!     compute double {
//!         input: x
//!         output: y
//!         code: "y = x * 2"
//!     }
//! "#).unwrap();
//!
//! assert_eq!(program.len(), 1);
//! assert!(matches!(program.nodes[0], Node::Compute(_)));
//! ```

pub mod error;
pub mod parser;
pub mod renderer;

pub use error::ParseError;
pub use parser::{
    parse, AgentNode, ComputeNode, Identifier, Node, NodeKind, Program, QualifiedIdent,
};
pub use renderer::{render_program, OutputFormat, RenderConfig, RenderError};

/// Program with one compute node and one agent watching its output
pub const EXAMPLE_PROGRAM: &str = r#"
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

/// Parse source and render it in one step
///
/// # Example
///
/// ```rust
/// use nodeflow::{parse_and_render, RenderConfig};
///
/// let text = parse_and_render(
///     r#"compute f { input: a output: b code: "b = a" }"#,
///     &RenderConfig::new().with_header(false),
/// ).unwrap();
///
/// assert!(text.starts_with("Compute Node: f"));
/// ```
pub fn parse_and_render(source: &str, config: &RenderConfig) -> Result<String, Error> {
    let program = parse(source)?;
    Ok(render_program(&program, config)?)
}

/// Errors that can occur in the parse-and-render pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
