//! Tile source descriptors
//!
//! A [`TileSource`] captures everything the resolver needs to know about
//! one tile layer: the URL template, tile size, subdomain labels, the
//! numbering scheme (XYZ or TMS), the retina suffix resolved by the
//! caller's environment, and any extra named template substitutions.
//! The core treats the descriptor as immutable.

mod subdomain;
mod template;

pub use subdomain::{SubdomainSelector, WrappingSum};
pub use template::expand_template;

use std::collections::HashMap;

/// Immutable description of one tile layer.
///
/// # Example
///
/// ```
/// use tilevault::source::TileSource;
///
/// let osm = TileSource::new("https://{s}.tile.example.org/{z}/{x}/{y}.png")
///     .with_subdomains(["a", "b", "c"]);
/// assert_eq!(osm.tile_size, 256);
/// assert!(!osm.tms);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    /// URL template with `{x}`/`{y}`/`{z}`/`{s}` placeholders, optionally
    /// `{r}`, `{-y}`, and any key present in [`TileSource::options`].
    pub url_template: String,
    /// Tile edge length in pixels (square, positive).
    pub tile_size: u32,
    /// Subdomain labels for the `{s}` placeholder; may be empty.
    pub subdomains: Vec<String>,
    /// Whether the source serves TMS row numbering (row 0 at the south
    /// edge). Affects only the y index substituted into URLs.
    pub tms: bool,
    /// Value substituted for `{r}`; resolved by the caller's environment
    /// (typically `""` or `"@2x"`).
    pub retina_suffix: String,
    /// Extra named substitutions applied to the template (API keys,
    /// style names, ...).
    pub options: HashMap<String, String>,
}

impl TileSource {
    /// Creates a source for `url_template` with 256 px tiles, no
    /// subdomains, XYZ numbering, and no extra options.
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            tile_size: 256,
            subdomains: Vec::new(),
            tms: false,
            retina_suffix: String::new(),
            options: HashMap::new(),
        }
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_subdomains<I, S>(mut self, subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomains = subdomains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tms(mut self, tms: bool) -> Self {
        self.tms = tms;
        self
    }

    pub fn with_retina_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.retina_suffix = suffix.into();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// First configured subdomain, if any. Cache keys are built with this
    /// label so a tile's identity does not depend on round-robin state.
    #[inline]
    pub fn first_subdomain(&self) -> Option<&str> {
        self.subdomains.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let source = TileSource::new("https://tiles.example.org/{z}/{x}/{y}.png");
        assert_eq!(source.tile_size, 256);
        assert!(source.subdomains.is_empty());
        assert!(!source.tms);
        assert_eq!(source.retina_suffix, "");
        assert!(source.options.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let source = TileSource::new("https://{s}.example.org/{style}/{z}/{x}/{-y}{r}.png")
            .with_tile_size(512)
            .with_subdomains(["a", "b"])
            .with_tms(true)
            .with_retina_suffix("@2x")
            .with_option("style", "toner");

        assert_eq!(source.tile_size, 512);
        assert_eq!(source.subdomains, vec!["a", "b"]);
        assert!(source.tms);
        assert_eq!(source.retina_suffix, "@2x");
        assert_eq!(source.options.get("style").map(String::as_str), Some("toner"));
    }

    #[test]
    fn test_first_subdomain() {
        let source = TileSource::new("t").with_subdomains(["x", "y"]);
        assert_eq!(source.first_subdomain(), Some("x"));
        assert_eq!(TileSource::new("t").first_subdomain(), None);
    }
}
