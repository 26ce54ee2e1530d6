//! Compact and pretty rendering of element trees.
//!
//! Output is lossy with respect to quoting: every value is written as a
//! bare token, never re-quoted. A compact rendering of a tree whose keys
//! and values contain no delimiters parses back to an equal tree.
//!
//! Pretty mode indents each child by two spaces. A child's rendering is
//! produced first and every line break in it is then shifted one level,
//! so nesting compounds without threading a depth counter through.

use std::fmt;

use crate::element::{Element, List, Object, Primitive};

const INDENT: &str = "\n  ";

impl Element {
    /// Render the element and its subtree.
    pub fn render(&self, pretty: bool) -> String {
        let mut out = String::new();
        self.render_into(pretty, &mut out);
        out
    }

    #[inline]
    pub fn to_string_pretty(&self) -> String {
        self.render(true)
    }

    #[inline]
    pub fn to_string_compact(&self) -> String {
        self.render(false)
    }

    fn render_into(&self, pretty: bool, out: &mut String) {
        match self {
            Self::Primitive(p) => p.render_into(pretty, out),
            Self::List(l) => l.render_into(pretty, out),
            Self::Object(o) => o.render_into(pretty, out),
        }
    }
}

impl Primitive {
    pub fn render(&self, pretty: bool) -> String {
        let mut out = String::new();
        self.render_into(pretty, &mut out);
        out
    }

    fn render_into(&self, pretty: bool, out: &mut String) {
        if !self.is_set() {
            return;
        }
        push_key(self.key(), pretty, out);
        out.push_str(self.raw_value());
    }
}

impl List {
    pub fn render(&self, pretty: bool) -> String {
        let mut out = String::new();
        self.render_into(pretty, &mut out);
        out
    }

    fn render_into(&self, pretty: bool, out: &mut String) {
        push_key(self.key(), pretty, out);
        push_children(('[', ']'), self.iter(), pretty, out);
    }
}

impl Object {
    pub fn render(&self, pretty: bool) -> String {
        let mut out = String::new();
        self.render_into(pretty, &mut out);
        out
    }

    fn render_into(&self, pretty: bool, out: &mut String) {
        push_key(self.key(), pretty, out);
        push_children(('{', '}'), self.iter(), pretty, out);
    }
}

fn push_key(key: &str, pretty: bool, out: &mut String) {
    if key.is_empty() {
        return;
    }
    out.push_str(key);
    out.push_str(if pretty { ": " } else { ":" });
}

fn push_children<'e>(
    (open, close): (char, char),
    children: impl Iterator<Item = &'e Element>,
    pretty: bool,
    out: &mut String,
) {
    out.push(open);
    let mut any = false;
    for child in children {
        if any {
            out.push(',');
        }
        any = true;
        if pretty {
            out.push_str(INDENT);
            out.push_str(&child.render(true).replace('\n', INDENT));
        } else {
            child.render_into(false, out);
        }
    }
    if pretty && any {
        out.push('\n');
    }
    out.push(close);
}

/// Compact by default; `{:#}` renders pretty.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(f.alternate()))
    }
}
