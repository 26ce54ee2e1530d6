//! Element tree for parsed documents.
//!
//! A document is a tree of [`Element`]s. Containers ([`List`], [`Object`])
//! own their children outright; there are no parent pointers and no
//! shared nodes, so dropping the root drops the whole tree.
//!
//! # Example
//!
//! ```
//! use stepjson_core::{parse, Element};
//!
//! let root = parse(r#"{"name":"drill","speeds":[1,2,3]}"#).unwrap();
//! let object = root.as_object().unwrap();
//!
//! assert_eq!(object.get("name").and_then(Element::as_primitive).unwrap().raw_value(), "drill");
//! assert_eq!(object.get("speeds").and_then(Element::as_list).unwrap().len(), 3);
//! ```

use std::{mem, slice};

use rustc_hash::FxHashMap;

// ============================================================================
// Core Types
// ============================================================================

/// The kind tag of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Primitive,
    List,
    Object,
}

/// One node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Scalar text between two delimiters.
    Primitive(Primitive),
    /// Ordered, unkeyed members.
    List(List),
    /// Keyed members.
    Object(Object),
}

/// A scalar value, kept as the trimmed text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
    key: String,
    value: Option<String>,
}

/// An ordered sequence of elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    key: String,
    items: Vec<Element>,
}

/// A mapping from key to element.
///
/// Each member stores its own key. Members iterate and render in
/// insertion order; equality ignores order. Keyed lookup and insertion
/// go through a hash index, so building an object is linear in its size.
#[derive(Debug, Clone, Default)]
pub struct Object {
    key: String,
    members: Vec<Element>,
    /// Member key to position in `members`.
    index: FxHashMap<String, usize>,
}

// ============================================================================
// Element
// ============================================================================

impl Element {
    /// The element's key. Empty for a document root and for list members.
    #[inline]
    pub fn key(&self) -> &str {
        match self {
            Self::Primitive(p) => &p.key,
            Self::List(l) => &l.key,
            Self::Object(o) => &o.key,
        }
    }

    /// Rename the element.
    ///
    /// Renaming a member that is still inside an [`Object`] does not
    /// re-check key uniqueness; use [`Object::rename`] for that.
    pub fn set_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        match self {
            Self::Primitive(p) => p.key = key,
            Self::List(l) => l.key = key,
            Self::Object(o) => o.key = key,
        }
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Primitive(_) => ElementKind::Primitive,
            Self::List(_) => ElementKind::List,
            Self::Object(_) => ElementKind::Object,
        }
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// True for lists and objects.
    #[inline]
    pub fn is_container(&self) -> bool {
        !self.is_primitive()
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_primitive_mut(&mut self) -> Option<&mut Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Number of direct children. Zero for primitives.
    pub fn len(&self) -> usize {
        match self {
            Self::Primitive(_) => 0,
            Self::List(l) => l.len(),
            Self::Object(o) => o.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over direct children in order. Empty for primitives.
    pub fn children(&self) -> slice::Iter<'_, Element> {
        match self {
            Self::Primitive(_) => slice::Iter::default(),
            Self::List(l) => l.items.iter(),
            Self::Object(o) => o.members.iter(),
        }
    }
}

impl From<Primitive> for Element {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<List> for Element {
    fn from(l: List) -> Self {
        Self::List(l)
    }
}

impl From<Object> for Element {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

// ============================================================================
// Primitive
// ============================================================================

impl Primitive {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// A primitive whose value has not been set. Renders as nothing.
    pub fn unset(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw text, or `""` when unset.
    #[inline]
    pub fn raw_value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Replace the value.
    ///
    /// The tree sends no change notifications; consumers that cache a
    /// rendering of this node must invalidate it themselves.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }
}

// ============================================================================
// List
// ============================================================================

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            items: Vec::new(),
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an element. List members are unkeyed, so its key is cleared.
    pub fn push(&mut self, element: impl Into<Element>) {
        let mut element = element.into();
        if !element.key().is_empty() {
            element.set_key("");
        }
        self.items.push(element);
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.items.get_mut(index)
    }

    pub fn contains(&self, element: &Element) -> bool {
        self.items.contains(element)
    }

    /// Remove and return the element at `index`, shifting later members.
    pub fn remove(&mut self, index: usize) -> Option<Element> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove the first member equal to `element`.
    pub fn remove_item(&mut self, element: &Element) -> bool {
        match self.items.iter().position(|e| e == element) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, Element> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Element> {
        self.items.iter_mut()
    }
}

impl std::ops::Index<usize> for List {
    type Output = Element;

    fn index(&self, index: usize) -> &Element {
        &self.items[index]
    }
}

impl<'l> IntoIterator for &'l List {
    type Item = &'l Element;
    type IntoIter = slice::Iter<'l, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(mut self) -> Self::IntoIter {
        mem::take(&mut self.items).into_iter()
    }
}

impl<E: Into<Element>> FromIterator<E> for List {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut list = List::new();
        for element in iter {
            list.push(element);
        }
        list
    }
}

// ============================================================================
// Object
// ============================================================================

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            members: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Insert `element` under `key`, setting the element's key to match.
    ///
    /// An existing member with the same key is replaced in place and
    /// returned (last write wins).
    pub fn insert(&mut self, key: impl Into<String>, element: impl Into<Element>) -> Option<Element> {
        let mut element = element.into();
        element.set_key(key);
        self.insert_element(element)
    }

    /// Insert an element under its own key.
    pub(crate) fn insert_element(&mut self, element: Element) -> Option<Element> {
        match self.position(element.key()) {
            Some(index) => {
                tracing::debug!(key = element.key(), "duplicate key, replacing earlier member");
                Some(mem::replace(&mut self.members[index], element))
            }
            None => {
                self.index.insert(element.key().to_owned(), self.members.len());
                self.members.push(element);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.position(key).map(|index| &self.members[index])
    }

    /// Mutable access to the member under `key`.
    ///
    /// Changing the member's key through [`Element::set_key`] leaves it
    /// indexed under the old key; use [`Object::rename`] instead.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Element> {
        self.position(key).map(|index| &mut self.members[index])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Member under `key`, or `default` when absent.
    pub fn get_or<'o>(&'o self, key: &str, default: &'o Element) -> &'o Element {
        self.get(key).unwrap_or(default)
    }

    /// Remove and return the member under `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Element> {
        let index = self.index.remove(key)?;
        Some(self.remove_at(index))
    }

    /// Move the member under `from` to `to`.
    ///
    /// A member already under `to` is replaced and returned. Returns
    /// `None` without changes when `from` is absent.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Option<Option<Element>> {
        let to = to.into();
        let mut index = self.position(from)?;
        if from == to {
            return Some(None);
        }
        let replaced = self.index.remove(&to).map(|existing| {
            if existing < index {
                index -= 1;
            }
            self.remove_at(existing)
        });
        self.index.remove(from);
        self.index.insert(to.clone(), index);
        self.members[index].set_key(to);
        Some(replaced)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(Element::key)
    }

    pub fn iter(&self) -> slice::Iter<'_, Element> {
        self.members.iter()
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.index.clear();
    }

    #[inline]
    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Remove the member at `index` once it is gone from the index,
    /// shifting the positions of later members.
    fn remove_at(&mut self, index: usize) -> Element {
        for position in self.index.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        self.members.remove(index)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.members.len() == other.members.len()
            && self
                .members
                .iter()
                .all(|m| other.get(m.key()).is_some_and(|o| o == m))
    }
}

impl std::ops::Index<&str> for Object {
    type Output = Element;

    fn index(&self, key: &str) -> &Element {
        match self.get(key) {
            Some(element) => element,
            None => panic!("no member with key {key:?}"),
        }
    }
}

impl<'o> IntoIterator for &'o Object {
    type Item = &'o Element;
    type IntoIter = slice::Iter<'o, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

// ============================================================================
// Drop
// ============================================================================

// Dropping a nested tree through the derived glue recurses once per level.
// Containers with container children hand them to a worklist instead.

impl Drop for List {
    fn drop(&mut self) {
        if self.items.iter().any(Element::is_container) {
            drop_flat(mem::take(&mut self.items));
        }
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        if self.members.iter().any(Element::is_container) {
            drop_flat(mem::take(&mut self.members));
        }
    }
}

fn drop_flat(mut pending: Vec<Element>) {
    while let Some(mut element) = pending.pop() {
        match &mut element {
            Element::Primitive(_) => {}
            Element::List(l) => pending.append(&mut l.items),
            Element::Object(o) => pending.append(&mut o.members),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
