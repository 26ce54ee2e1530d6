//! Parser configuration.

/// Whether the caller intends to mutate the parsed tree.
///
/// Stored and reported by the parser. Parsing behaves the same in both
/// modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessMode {
    #[default]
    ReadOnly,
    ReadWrite,
}

/// How the scanner treats quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanMode {
    /// Quotes are ordinary characters. A quoted value containing a
    /// delimiter is split at that delimiter. This matches how existing
    /// serialized data was produced.
    #[default]
    Compatible,
    /// Delimiters inside `"…"` or `'…'` spans are skipped.
    QuoteAware,
}

/// Parser configuration.
///
/// ```
/// use stepjson_core::{AccessMode, ParserConfig, ScanMode};
///
/// let config = ParserConfig::new()
///     .with_access_mode(AccessMode::ReadWrite)
///     .with_scan_mode(ScanMode::QuoteAware);
/// assert_eq!(config.scan_mode(), ScanMode::QuoteAware);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    access: AccessMode,
    scan: ScanMode,
    max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            access: AccessMode::default(),
            scan: ScanMode::default(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Nesting limit used unless overridden. Matches serde_json.
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Default configuration: read-only, quote-oblivious scanning, and
    /// [`DEFAULT_MAX_DEPTH`](Self::DEFAULT_MAX_DEPTH) nesting.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access_mode(mut self, access: AccessMode) -> Self {
        self.access = access;
        self
    }

    pub fn with_scan_mode(mut self, scan: ScanMode) -> Self {
        self.scan = scan;
        self
    }

    /// Limit on simultaneously open containers.
    ///
    /// Cloning, comparing and rendering a tree recurse once per level, so
    /// raise this only for trees that are dropped or walked iteratively.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn access_mode(&self) -> AccessMode {
        self.access
    }

    #[inline]
    pub fn scan_mode(&self) -> ScanMode {
        self.scan
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
