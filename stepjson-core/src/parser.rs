//! Resumable delimiter-scanning parser.
//!
//! The parser is an explicit state object. Each call to
//! [`Parser::resume`] processes tokens until the pause policy asks it to
//! stop or the input runs out. Everything needed to continue lives in the
//! struct: the scan cursor, the stack of open containers, the pending key
//! and the current expectation. A suspended parser picks up exactly where
//! it left off; nothing is rescanned.
//!
//! # Grammar
//!
//! The scanner only looks for structural characters. In value position it
//! searches for `{ } , [ ]`; in key position for `} :`. Whatever lies
//! between two delimiters is a token, trimmed of quotes and whitespace.
//! Malformed input that still yields delimiters (a stray `:` in value
//! position, a stray `,` while no container is open) is skipped rather
//! than reported.
//!
//! # Example
//!
//! ```
//! use stepjson_core::{EveryToken, ParseStatus, Parser};
//!
//! let mut parser = Parser::new(r#"{"a":"1","b":[2,3]}"#, EveryToken);
//! let mut ticks = 0;
//! while parser.resume()? == ParseStatus::Suspended {
//!     ticks += 1;
//!     assert!(parser.progress() < 100);
//! }
//! assert_eq!(parser.progress(), 100);
//! assert!(ticks > 1);
//!
//! let root = parser.take_result().unwrap();
//! assert_eq!(root.to_string_compact(), "{a:1,b:[2,3]}");
//! # Ok::<(), stepjson_core::ParseError>(())
//! ```

use std::mem;

use tracing::{debug, debug_span, trace, warn};

use crate::config::{AccessMode, ParserConfig};
use crate::element::{Element, List, Object, Primitive};
use crate::error::ParseError;
use crate::pause::{Never, PausePolicy};
use crate::scan::{self, DelimiterSet, Scanner};

/// Outcome of one [`Parser::resume`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// The pause policy asked to stop; call `resume` again later.
    Suspended,
    /// The whole input has been consumed and the tree is ready.
    Complete,
}

/// What the scanner is looking for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Key,
    Value,
}

impl Expect {
    #[inline]
    fn delimiters(self) -> DelimiterSet {
        match self {
            Self::Key => DelimiterSet::Key,
            Self::Value => DelimiterSet::Value,
        }
    }
}

/// An open container on the parse stack.
#[derive(Debug)]
enum Container {
    List(List),
    Object(Object),
}

impl Container {
    /// Append a finished child, keyed by its own key for objects.
    fn attach(&mut self, child: Element) {
        match self {
            Self::List(l) => l.push(child),
            Self::Object(o) => {
                o.insert_element(child);
            }
        }
    }

    fn into_element(self) -> Element {
        match self {
            Self::List(l) => l.into(),
            Self::Object(o) => o.into(),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Scanning,
    Complete,
    Failed(ParseError),
}

/// Incremental parser over one fully buffered source text.
#[derive(Debug)]
pub struct Parser<P = Never> {
    source: String,
    pause: P,
    config: ParserConfig,
    scanner: Scanner,
    phase: Phase,
    expect: Expect,
    /// First byte not yet consumed.
    next: usize,
    /// Open containers, innermost last.
    stack: Vec<Container>,
    pending_key: String,
    /// Set right after a container opens or closes.
    after_structure: bool,
    /// Most recently closed top-level container.
    result: Option<Element>,
    tokens: usize,
}

// ============================================================================
// Construction and accessors
// ============================================================================

impl<P: PausePolicy> Parser<P> {
    /// Create a parser with the default configuration.
    pub fn new(source: impl Into<String>, pause: P) -> Self {
        Self::with_config(source, pause, ParserConfig::default())
    }

    pub fn with_config(source: impl Into<String>, pause: P, config: ParserConfig) -> Self {
        Self {
            source: source.into(),
            pause,
            config,
            scanner: Scanner::new(config.scan_mode()),
            phase: Phase::Scanning,
            expect: Expect::Value,
            next: 0,
            stack: Vec::new(),
            pending_key: String::new(),
            after_structure: false,
            result: None,
            tokens: 0,
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    #[inline]
    pub fn access_mode(&self) -> AccessMode {
        self.config.access_mode()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    /// Number of delimiters processed so far.
    #[inline]
    pub fn tokens_scanned(&self) -> usize {
        self.tokens
    }

    /// Share of the source consumed, as a percentage.
    ///
    /// Never decreases, and is 100 exactly once the parse has completed.
    pub fn progress(&self) -> u32 {
        if self.is_complete() {
            return 100;
        }
        let len = self.source.len();
        if len == 0 {
            return 0;
        }
        // `next` only reaches `len` on completion, so this stays below 100.
        (100 * self.next as u64 / len as u64) as u32
    }

    /// The parsed root, once complete.
    pub fn result(&self) -> Option<&Element> {
        if self.is_complete() {
            self.result.as_ref()
        } else {
            None
        }
    }

    /// Take ownership of the parsed root, once complete.
    pub fn take_result(&mut self) -> Option<Element> {
        if self.is_complete() {
            self.result.take()
        } else {
            None
        }
    }

    /// Consume the parser, returning the parsed root if complete.
    pub fn into_result(mut self) -> Option<Element> {
        self.take_result()
    }

    /// Resume until complete, ignoring pause requests.
    ///
    /// Returns [`ParseError::NoDocument`] if the result was already taken.
    pub fn run_to_completion(mut self) -> Result<Element, ParseError> {
        while self.resume()? == ParseStatus::Suspended {}
        self.result.ok_or(ParseError::NoDocument)
    }
}

// ============================================================================
// Scanning
// ============================================================================

impl<P: PausePolicy> Parser<P> {
    /// Process tokens until the pause policy fires or the input ends.
    ///
    /// The policy is consulted after each token, and only while input
    /// remains. Once complete, further calls return `Complete`. Once
    /// failed, further calls return the same error.
    pub fn resume(&mut self) -> Result<ParseStatus, ParseError> {
        match &self.phase {
            Phase::Scanning => {}
            Phase::Complete => return Ok(ParseStatus::Complete),
            Phase::Failed(err) => return Err(err.clone()),
        }

        let _span = debug_span!("resume", offset = self.next).entered();
        loop {
            if self.next >= self.source.len() {
                return self.finish();
            }
            if let Err(err) = self.step() {
                return Err(self.fail(err));
            }
            if self.next < self.source.len() && self.pause.should_pause() {
                debug!(offset = self.next, tokens = self.tokens, "suspending");
                return Ok(ParseStatus::Suspended);
            }
        }
    }

    /// Consume one delimiter and the token before it.
    fn step(&mut self) -> Result<(), ParseError> {
        let set = self.expect.delimiters();
        let bytes = self.source.as_bytes();
        let Some(at) = self.scanner.find(bytes, self.next, set) else {
            // Nothing open and only whitespace left: let `finish` decide.
            if self.stack.is_empty() && scan::is_blank(&self.source[self.next..]) {
                self.next = self.source.len();
                return Ok(());
            }
            return Err(ParseError::UnexpectedEnd {
                expected: set,
                offset: self.next.checked_sub(1),
            });
        };
        let found = bytes[at];
        let mut end = at + 1;
        self.tokens += 1;
        trace!(offset = at, delimiter = %(found as char), expect = ?self.expect, "token");

        match self.expect {
            Expect::Value => {
                match found {
                    b'[' => {
                        let key = mem::take(&mut self.pending_key);
                        self.open(Container::List(List::with_key(key)), at)?;
                    }
                    b'{' => {
                        let key = mem::take(&mut self.pending_key);
                        self.open(Container::Object(Object::with_key(key)), at)?;
                    }
                    b',' | b'}' | b']' => {
                        self.push_value(self.next, at);
                        if found != b',' {
                            end = self.skip_comma(end);
                            end = self.close(end);
                        }
                    }
                    _ => {}
                }
                self.expect_for_top();
            }
            Expect::Key => match found {
                b':' => {
                    self.pending_key = scan::trim_token(&self.source[self.next..at]).to_owned();
                    self.after_structure = false;
                    self.expect = Expect::Value;
                }
                b'}' => {
                    end = self.skip_comma(end);
                    end = self.close(end);
                    self.expect_for_top();
                }
                _ => {}
            },
        }

        self.next = end;
        Ok(())
    }

    /// Push a new container opened by the bracket at `at`.
    fn open(&mut self, container: Container, at: usize) -> Result<(), ParseError> {
        let limit = self.config.max_depth();
        if self.stack.len() >= limit {
            return Err(ParseError::TooDeep { limit, offset: at });
        }
        self.stack.push(container);
        self.after_structure = true;
        Ok(())
    }

    /// Turn the token in `start..end` into a primitive on the open container.
    fn push_value(&mut self, start: usize, end: usize) {
        let raw = &self.source[start..end];
        let after_structure = mem::replace(&mut self.after_structure, false);
        if after_structure && scan::is_blank(raw) {
            return;
        }
        let primitive = Primitive::new(mem::take(&mut self.pending_key), scan::trim_token(raw));
        match self.stack.last_mut() {
            Some(top) => top.attach(primitive.into()),
            None => debug!(offset = end, "value outside any container, skipping"),
        }
    }

    /// Pop the innermost container and hand it to its parent, or make it
    /// the result. Returns the updated scan end.
    fn close(&mut self, end: usize) -> usize {
        let Some(closed) = self.stack.pop() else {
            debug!(offset = end - 1, "close without open container, skipping");
            return end;
        };
        self.after_structure = true;

        match self.stack.last_mut() {
            Some(parent) => {
                parent.attach(closed.into_element());
                end
            }
            None => {
                if self.result.is_some() {
                    debug!(offset = end - 1, "new top-level container replaces earlier one");
                }
                self.result = Some(closed.into_element());
                let rest = &self.source[end.min(self.source.len())..];
                if scan::is_blank(rest) {
                    self.source.len()
                } else {
                    end
                }
            }
        }
    }

    /// A comma directly after a closing bracket belongs to the close.
    #[inline]
    fn skip_comma(&self, end: usize) -> usize {
        if self.source.as_bytes().get(end) == Some(&b',') {
            end + 1
        } else {
            end
        }
    }

    /// Objects want a key next; lists and the top level want a value.
    fn expect_for_top(&mut self) {
        match self.stack.last() {
            Some(Container::Object(_)) => self.expect = Expect::Key,
            _ => {
                self.pending_key.clear();
                self.expect = Expect::Value;
            }
        }
    }

    fn finish(&mut self) -> Result<ParseStatus, ParseError> {
        let offset = self.source.len().checked_sub(1);
        if !self.stack.is_empty() {
            return Err(self.fail(ParseError::Unclosed {
                depth: self.stack.len(),
                offset,
            }));
        }
        if self.result.is_none() {
            return Err(self.fail(ParseError::NoDocument));
        }
        self.next = self.source.len();
        self.phase = Phase::Complete;
        debug!(tokens = self.tokens, "parse complete");
        Ok(ParseStatus::Complete)
    }

    /// Poison the parser and drop all partial state.
    fn fail(&mut self, err: ParseError) -> ParseError {
        warn!(error = %err, "parse failed");
        self.stack.clear();
        self.result = None;
        self.phase = Phase::Failed(err.clone());
        err
    }
}

// ============================================================================
// One-shot entry points
// ============================================================================

/// Parse `source` in one go with the default configuration.
///
/// ```
/// let root = stepjson_core::parse("[1,2,3]").unwrap();
/// assert_eq!(root.as_list().unwrap().len(), 3);
/// ```
pub fn parse(source: &str) -> Result<Element, ParseError> {
    parse_with(source, ParserConfig::default())
}

/// Parse `source` in one go with an explicit configuration.
pub fn parse_with(source: &str, config: ParserConfig) -> Result<Element, ParseError> {
    Parser::with_config(source, Never, config).run_to_completion()
}

// ============================================================================
// Tests
// ============================================================================
