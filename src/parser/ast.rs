//! Abstract Syntax Tree types for the nodeflow DSL
//!
//! The tree carries no source positions: two sources that differ only in
//! comments or whitespace produce equal programs.

use std::fmt;

use serde::Serialize;

/// Valid identifier (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `entity.field` reference, kept as the joined text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QualifiedIdent(String);

impl QualifiedIdent {
    pub fn new(entity: &Identifier, field: &Identifier) -> Self {
        Self(format!("{}.{}", entity, field))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split back into `(entity, field)`
    pub fn parts(&self) -> (&str, &str) {
        self.0.split_once('.').unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for QualifiedIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Root AST node - a complete program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Program {
    pub nodes: Vec<Node>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// First node declared with the given name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name().as_str() == name)
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl std::str::FromStr for Program {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// `compute name { input: a output: b code: "..." }`
    Compute(ComputeNode),
    /// `agent name { watches: n.field can_add: kind code: "..." }`
    Agent(AgentNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Compute,
    Agent,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Compute => f.write_str("Compute"),
            NodeKind::Agent => f.write_str("Agent"),
        }
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Compute(_) => NodeKind::Compute,
            Node::Agent(_) => NodeKind::Agent,
        }
    }

    pub fn name(&self) -> &Identifier {
        match self {
            Node::Compute(c) => &c.name,
            Node::Agent(a) => &a.name,
        }
    }

    /// Embedded code body, unparsed
    pub fn code(&self) -> &str {
        match self {
            Node::Compute(c) => &c.code,
            Node::Agent(a) => &a.code,
        }
    }

    pub fn as_compute(&self) -> Option<&ComputeNode> {
        match self {
            Node::Compute(c) => Some(c),
            Node::Agent(_) => None,
        }
    }

    pub fn as_agent(&self) -> Option<&AgentNode> {
        match self {
            Node::Agent(a) => Some(a),
            Node::Compute(_) => None,
        }
    }
}

/// Writes the console block for the node: a header line followed by one
/// indented line per field, in declaration order.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Node: {}", self.kind(), self.name())?;
        match self {
            Node::Compute(c) => {
                writeln!(f, "  Input: {}", c.input)?;
                writeln!(f, "  Output: {}", c.output)?;
            }
            Node::Agent(a) => {
                writeln!(f, "  Watches: {}", a.watches)?;
                writeln!(f, "  Can Add: {}", a.can_add)?;
            }
        }
        writeln!(f, "  Code: {}", self.code())
    }
}

/// Pure data transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeNode {
    pub name: Identifier,
    pub input: Identifier,
    pub output: Identifier,
    pub code: String,
}

/// Watcher that may extend the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentNode {
    pub name: Identifier,
    pub watches: QualifiedIdent,
    /// Kind of node the agent may add. Captured as written.
    pub can_add: Identifier,
    pub code: String,
}
