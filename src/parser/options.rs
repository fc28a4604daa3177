//! Parsing options and configuration.

/// Options for the layout-heuristic academic parser.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Minimum font size for a line to qualify as a heading.
    pub heading_min_size: f32,

    /// Font size at or above which a heading is level 1.
    pub level1_min_size: f32,

    /// Maximum character length for heading candidates.
    pub max_heading_len: usize,

    /// Title to use when none can be detected (typically the file stem).
    pub fallback_title: Option<String>,

    /// Append the provenance note at the end of the markdown output.
    pub provenance_note: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum heading font size.
    pub fn with_heading_min_size(mut self, size: f32) -> Self {
        self.heading_min_size = size;
        self
    }

    /// Set the level-1 heading font size threshold.
    pub fn with_level1_min_size(mut self, size: f32) -> Self {
        self.level1_min_size = size;
        self
    }

    /// Set the maximum heading candidate length.
    pub fn with_max_heading_len(mut self, len: usize) -> Self {
        self.max_heading_len = len;
        self
    }

    /// Set the fallback title.
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        self.fallback_title = Some(title.into());
        self
    }

    /// Disable the trailing provenance note.
    pub fn without_provenance_note(mut self) -> Self {
        self.provenance_note = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            heading_min_size: 12.0,
            level1_min_size: 14.0,
            max_heading_len: 100,
            fallback_title: None,
            provenance_note: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ParseOptions::new()
            .with_heading_min_size(11.0)
            .with_fallback_title("paper")
            .without_provenance_note();

        assert_eq!(options.heading_min_size, 11.0);
        assert_eq!(options.fallback_title.as_deref(), Some("paper"));
        assert!(!options.provenance_note);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.heading_min_size, 12.0);
        assert_eq!(options.level1_min_size, 14.0);
        assert_eq!(options.max_heading_len, 100);
        assert!(options.provenance_note);
    }
}
