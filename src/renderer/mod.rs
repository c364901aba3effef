//! Renderers for parsed programs
//!
//! This module takes a Program and produces either the plain-text node
//! listing or a TOML document.

pub mod config;
pub mod text;

pub use config::{OutputFormat, RenderConfig};
pub use text::render_text;

use thiserror::Error;

use crate::parser::Program;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to serialize program as TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Render a program in the configured format
pub fn render_program(program: &Program, config: &RenderConfig) -> Result<String, RenderError> {
    match config.format {
        OutputFormat::Text => Ok(render_text(program, config.header)),
        OutputFormat::Toml => render_toml(program),
    }
}

/// Serialize a program as TOML, one `[[nodes]]` table per node
pub fn render_toml(program: &Program) -> Result<String, RenderError> {
    Ok(toml::to_string(program)?)
}
