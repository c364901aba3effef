//! Plain-text node listing

use crate::parser::Program;

pub const HEADER: &str = "Successfully parsed program!";

/// Render each node as a block of lines, blocks separated by a blank line
pub fn render_text(program: &Program, header: bool) -> String {
    let mut out = String::new();
    if header {
        out.push_str(HEADER);
        out.push('\n');
    }
    for node in program {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&node.to_string());
    }
    out
}
