//! Delimiter scanning.
//!
//! The parser never walks the input byte by byte. It asks this module for
//! the next occurrence of any delimiter in the active set and treats the
//! text in between as one token. All delimiters are ASCII, so every offset
//! returned here is a valid `str` boundary.
//!
//! Searches are built on `memchr`. The value set has five members, more
//! than `memchr3` takes, so it is split into `{ } ,` and `[ ]` with the
//! second search bounded by the first hit. The brace hit is kept in the
//! [`Scanner`] until the cursor passes it, so a whole parse stays linear.

use std::fmt;

use memchr::{memchr, memchr2, memchr3};

use crate::config::ScanMode;

/// Characters stripped from both ends of every key and value token.
pub const TRIM_CHARS: &[char] = &['"', '\'', ' ', '\n', '\r', '\t', '\u{c}'];

/// The delimiter set the scanner is currently hunting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelimiterSet {
    /// Value expected: `{ } , [ ]`.
    Value,
    /// Key expected: `} :`.
    Key,
}

impl DelimiterSet {
    /// Member bytes, in the order error messages list them.
    #[inline]
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Self::Value => b"{},[]",
            Self::Key => b"}:",
        }
    }

    /// Check whether `b` belongs to this set.
    #[inline]
    pub fn contains(self, b: u8) -> bool {
        self.bytes().contains(&b)
    }
}

impl fmt::Display for DelimiterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        for (i, &b) in self.bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}'", b as char)?;
        }
        f.write_str(" ]")
    }
}

/// Trim quote and whitespace characters from a raw token.
#[inline]
pub fn trim_token(raw: &str) -> &str {
    raw.trim_matches(TRIM_CHARS)
}

/// Check whether a raw token holds nothing but whitespace.
///
/// Quotes count as content: `""` is not blank.
#[inline]
pub fn is_blank(raw: &str) -> bool {
    raw.bytes().all(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t' | 0x0c))
}

/// Stateful delimiter search over one haystack.
///
/// Remembers the next `{ } ,` hit between calls. A run of brackets
/// would otherwise rescan the same brace-free stretch once per bracket.
/// The cache stays valid while searches start at or before the hit, so
/// a cursor that only moves forward reads every byte a bounded number
/// of times over the whole parse.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    mode: ScanMode,
    /// `(searched_from, hit)` of the last brace search.
    brace: Option<(usize, Option<usize>)>,
}

impl Scanner {
    pub fn new(mode: ScanMode) -> Self {
        Self { mode, brace: None }
    }

    #[inline]
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Find the next delimiter of `set` at or after `from`.
    ///
    /// Returns the absolute offset of the delimiter, or `None` if the
    /// input ends first. Pass the same haystack on every call.
    pub fn find(&mut self, haystack: &[u8], from: usize, set: DelimiterSet) -> Option<usize> {
        match self.mode {
            ScanMode::Compatible => self.find_plain(haystack, from, set),
            ScanMode::QuoteAware => self.find_quote_aware(haystack, from, set),
        }
    }

    fn next_brace(&mut self, haystack: &[u8], from: usize) -> Option<usize> {
        if let Some((searched_from, hit)) = self.brace {
            if searched_from <= from && hit.map_or(true, |at| at >= from) {
                return hit;
            }
        }
        let hit = haystack
            .get(from..)
            .and_then(|rest| memchr3(b'{', b'}', b',', rest))
            .map(|at| from + at);
        self.brace = Some((from, hit));
        hit
    }

    fn find_plain(&mut self, haystack: &[u8], from: usize, set: DelimiterSet) -> Option<usize> {
        match set {
            DelimiterSet::Key => {
                let rest = haystack.get(from..)?;
                memchr2(b'}', b':', rest).map(|at| from + at)
            }
            DelimiterSet::Value => {
                let brace = self.next_brace(haystack, from);
                let window = haystack.get(from..brace.unwrap_or(haystack.len()))?;
                match memchr2(b'[', b']', window) {
                    Some(at) => Some(from + at),
                    None => brace,
                }
            }
        }
    }

    /// Like [`Scanner::find_plain`], but delimiters inside `"…"` or `'…'`
    /// spans are skipped. A quote preceded by an odd number of backslashes
    /// does not close its span. An unterminated span runs to the end of
    /// the input.
    fn find_quote_aware(&mut self, haystack: &[u8], from: usize, set: DelimiterSet) -> Option<usize> {
        let mut pos = from;
        let mut next_delim = self.find_plain(haystack, pos, set);

        loop {
            let bound = next_delim.unwrap_or(haystack.len());
            let quote = haystack
                .get(pos..bound)
                .and_then(|window| memchr2(b'"', b'\'', window))
                .map(|at| pos + at);

            let Some(open) = quote else {
                return next_delim;
            };
            let close = find_closing_quote(haystack, open)?;
            pos = close + 1;

            // The cached delimiter is still the next one if the span closed
            // before reaching it.
            if next_delim.map_or(true, |d| d < pos) {
                next_delim = self.find_plain(haystack, pos, set);
            }
        }
    }
}

fn find_closing_quote(haystack: &[u8], open: usize) -> Option<usize> {
    let quote = haystack[open];
    let mut pos = open + 1;
    loop {
        let at = pos + memchr(quote, haystack.get(pos..)?)?;
        let backslashes = haystack[open + 1..at]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count();
        if backslashes % 2 == 0 {
            return Some(at);
        }
        pos = at + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(input: &str, from: usize, set: DelimiterSet) -> Option<usize> {
        Scanner::new(ScanMode::Compatible).find(input.as_bytes(), from, set)
    }

    fn quoted(input: &str, from: usize, set: DelimiterSet) -> Option<usize> {
        Scanner::new(ScanMode::QuoteAware).find(input.as_bytes(), from, set)
    }

    /// Search from every offset with one scanner, alternating sets, and
    /// check each answer against a fresh scanner.
    fn assert_cache_agrees(input: &str, mode: ScanMode) {
        let mut reused = Scanner::new(mode);
        for from in 0..=input.len() {
            for set in [DelimiterSet::Value, DelimiterSet::Key] {
                let cached = reused.find(input.as_bytes(), from, set);
                let fresh = Scanner::new(mode).find(input.as_bytes(), from, set);
                assert_eq!(cached, fresh, "from {from} in {set}");
            }
        }
    }

    #[test]
    fn test_value_set_finds_first_of_five() {
        assert_eq!(plain("abc,def", 0, DelimiterSet::Value), Some(3));
        assert_eq!(plain("ab[c,", 0, DelimiterSet::Value), Some(2));
        assert_eq!(plain("a]b}", 0, DelimiterSet::Value), Some(1));
        assert_eq!(plain("xx{", 0, DelimiterSet::Value), Some(2));
        assert_eq!(plain("no delimiters", 0, DelimiterSet::Value), None);
    }

    #[test]
    fn test_bracket_after_brace_is_not_reported_first() {
        assert_eq!(plain("a,[", 0, DelimiterSet::Value), Some(1));
    }

    #[test]
    fn test_bracket_only_remainder() {
        assert_eq!(plain("abc]", 0, DelimiterSet::Value), Some(3));
    }

    #[test]
    fn test_key_set_ignores_value_delimiters() {
        assert_eq!(plain("\"a,b[\":", 0, DelimiterSet::Key), Some(6));
        assert_eq!(plain("  }", 0, DelimiterSet::Key), Some(2));
        assert_eq!(plain("a,b", 0, DelimiterSet::Key), None);
    }

    #[test]
    fn test_search_starts_at_offset() {
        assert_eq!(plain("a,b,c", 2, DelimiterSet::Value), Some(3));
        assert_eq!(plain("a,b", 3, DelimiterSet::Value), None);
        assert_eq!(plain("a,b", 10, DelimiterSet::Value), None);
    }

    #[test]
    fn test_compatible_mode_splits_inside_quotes() {
        assert_eq!(plain("\"a,b\",", 0, DelimiterSet::Value), Some(2));
    }

    #[test]
    fn test_quote_aware_skips_quoted_delimiters() {
        assert_eq!(quoted("\"a,b\",", 0, DelimiterSet::Value), Some(5));
        assert_eq!(quoted("'x:y':", 0, DelimiterSet::Key), Some(5));
        assert_eq!(quoted("\"{[]}\" ]", 0, DelimiterSet::Value), Some(7));
    }

    #[test]
    fn test_quote_aware_escaped_quote() {
        assert_eq!(quoted(r#""a\",b","#, 0, DelimiterSet::Value), Some(7));
        assert_eq!(quoted(r#""a\\",b"#, 0, DelimiterSet::Value), Some(5));
    }

    #[test]
    fn test_quote_aware_unterminated_span() {
        assert_eq!(quoted("\"abc,def", 0, DelimiterSet::Value), None);
    }

    #[test]
    fn test_quote_aware_matches_plain_without_quotes() {
        let input = "{a:1,b:[2,3]}";
        for from in 0..input.len() {
            assert_eq!(
                quoted(input, from, DelimiterSet::Value),
                plain(input, from, DelimiterSet::Value)
            );
        }
    }

    #[test]
    fn test_reused_scanner_matches_fresh_searches() {
        for input in ["[[[[x]]]],{a:[1,2]}", "{a:1}", "[[[[[[", "'[,]' [\"{\"]", ""] {
            assert_cache_agrees(input, ScanMode::Compatible);
            assert_cache_agrees(input, ScanMode::QuoteAware);
        }
    }

    #[test]
    fn test_brace_hit_is_reused_across_bracket_run() {
        let input = format!("{}x,", "[".repeat(64));
        let mut scanner = Scanner::new(ScanMode::Compatible);
        for from in 0..64 {
            assert_eq!(scanner.find(input.as_bytes(), from, DelimiterSet::Value), Some(from));
            assert_eq!(scanner.brace, Some((0, Some(65))));
        }
        assert_eq!(scanner.find(input.as_bytes(), 64, DelimiterSet::Value), Some(65));
    }

    #[test]
    fn test_backward_search_refreshes_cache() {
        let mut scanner = Scanner::new(ScanMode::Compatible);
        assert_eq!(scanner.find(b"a,b,c", 2, DelimiterSet::Value), Some(3));
        assert_eq!(scanner.find(b"a,b,c", 0, DelimiterSet::Value), Some(1));
    }

    #[test]
    fn test_trim_token() {
        assert_eq!(trim_token("  \"hello\"\n"), "hello");
        assert_eq!(trim_token("'a b'"), "a b");
        assert_eq!(trim_token("\t\u{c}x\r"), "x");
        assert_eq!(trim_token("\"\""), "");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t"));
        assert!(!is_blank("\"\""));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_display_lists_members() {
        assert_eq!(DelimiterSet::Value.to_string(), "[ '{', '}', ',', '[', ']' ]");
        assert_eq!(DelimiterSet::Key.to_string(), "[ '}', ':' ]");
    }
}
