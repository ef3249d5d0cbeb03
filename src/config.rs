//! Conversion settings.

/// Configuration for Markdown conversion.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Value written to the `Version` front-matter key.
    pub version_link: String,
    /// Insert BibleHub interlinear links before verse anchors.
    pub interlinear_links: bool,
    /// Repeat the top navigation line at the end of each book.
    pub repeat_navigation: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            version_link: "\"[[RcV]]\"".to_string(),
            interlinear_links: true,
            repeat_navigation: true,
        }
    }
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version_link(mut self, link: impl Into<String>) -> Self {
        self.version_link = link.into();
        self
    }

    pub fn with_interlinear_links(mut self, enabled: bool) -> Self {
        self.interlinear_links = enabled;
        self
    }

    pub fn with_repeat_navigation(mut self, enabled: bool) -> Self {
        self.repeat_navigation = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::default();
        assert_eq!(config.version_link, "\"[[RcV]]\"");
        assert!(config.interlinear_links);
        assert!(config.repeat_navigation);
    }

    #[test]
    fn test_builders() {
        let config = ConvertConfig::new()
            .with_version_link("RcV")
            .with_interlinear_links(false)
            .with_repeat_navigation(false);
        assert_eq!(config.version_link, "RcV");
        assert!(!config.interlinear_links);
        assert!(!config.repeat_navigation);
    }
}
