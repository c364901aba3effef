//! Configuration for program rendering

/// Output format for a parsed program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable node listing
    #[default]
    Text,
    /// One `[[nodes]]` table per node
    Toml,
}

/// Configuration options for rendered output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub format: OutputFormat,

    /// Whether text output starts with a success line
    pub header: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            header: true,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set whether text output carries the header line
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }
}
