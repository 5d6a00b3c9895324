//! HTML node tree.
//!
//! A tree is built from two node shapes: a [`LeafNode`] that produces text
//! directly and a [`ParentNode`] that wraps an ordered, non-empty list of
//! children in a tag. Text and attribute values are emitted verbatim; no
//! escaping is performed.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Elements that never have content or a closing tag.
const VOID_TAGS: &[&str] = &["img", "br", "hr"];

/// Insertion-ordered attribute list.
///
/// Attributes render in the order they were first inserted. Inserting an
/// existing key overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder-style [`Attrs::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as ` key="value"` pairs, in order.
    pub fn to_html(&self) -> String {
        self.iter()
            .map(|(k, v)| format!(" {k}=\"{v}\""))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// A node that renders its value directly, optionally wrapped in a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

impl LeafNode {
    pub fn new(tag: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.map(str::to_string),
            value: value.into(),
            attrs: Attrs::new(),
        }
    }

    /// Untagged text.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(None, value)
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    fn is_void(&self) -> bool {
        self.tag
            .as_deref()
            .is_some_and(|t| VOID_TAGS.contains(&t))
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.value.is_empty() && !self.is_void() {
            return Err(RenderError::EmptyLeafValue {
                tag: self.tag.clone(),
            });
        }
        Ok(())
    }

    pub fn to_html(&self) -> Result<String, RenderError> {
        self.validate()?;
        Ok(match &self.tag {
            None => self.value.clone(),
            Some(tag) if self.is_void() => format!("<{tag}{}>", self.attrs.to_html()),
            Some(tag) => format!("<{tag}{}>{}</{tag}>", self.attrs.to_html(), self.value),
        })
    }
}

/// A tagged node wrapping one or more children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentNode {
    pub tag: String,
    pub children: Vec<HtmlNode>,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

impl ParentNode {
    pub fn new(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        Self {
            tag: tag.into(),
            children,
            attrs: Attrs::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Check this node's own prerequisites (not its children's).
    fn check(&self) -> Result<(), RenderError> {
        if self.tag.is_empty() {
            return Err(RenderError::MissingTag);
        }
        if self.children.is_empty() {
            return Err(RenderError::EmptyChildren {
                tag: self.tag.clone(),
            });
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        self.check()?;
        self.children.iter().try_for_each(HtmlNode::validate)
    }

    pub fn to_html(&self) -> Result<String, RenderError> {
        self.check()?;
        let mut out = format!("<{}{}>", self.tag, self.attrs.to_html());
        for child in &self.children {
            out.push_str(&child.to_html()?);
        }
        out.push_str(&format!("</{}>", self.tag));
        Ok(out)
    }
}

/// A node in the HTML tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum HtmlNode {
    Leaf(LeafNode),
    Parent(ParentNode),
}

impl HtmlNode {
    /// Shorthand for a tagged leaf.
    pub fn leaf(tag: Option<&str>, value: impl Into<String>) -> Self {
        HtmlNode::Leaf(LeafNode::new(tag, value))
    }

    /// Shorthand for an untagged text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        HtmlNode::Leaf(LeafNode::text(value))
    }

    pub fn parent(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Parent(ParentNode::new(tag, children))
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf(leaf) => leaf.tag.as_deref(),
            HtmlNode::Parent(parent) => Some(&parent.tag),
        }
    }

    pub fn attrs(&self) -> &Attrs {
        match self {
            HtmlNode::Leaf(leaf) => &leaf.attrs,
            HtmlNode::Parent(parent) => &parent.attrs,
        }
    }

    /// Children of a parent node; empty for leaves.
    pub fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Leaf(_) => &[],
            HtmlNode::Parent(parent) => &parent.children,
        }
    }

    /// Walk the subtree and check every render prerequisite without building
    /// any output.
    pub fn validate(&self) -> Result<(), RenderError> {
        match self {
            HtmlNode::Leaf(leaf) => leaf.validate(),
            HtmlNode::Parent(parent) => parent.validate(),
        }
    }

    pub fn to_html(&self) -> Result<String, RenderError> {
        match self {
            HtmlNode::Leaf(leaf) => leaf.to_html(),
            HtmlNode::Parent(parent) => parent.to_html(),
        }
    }
}

impl From<LeafNode> for HtmlNode {
    fn from(leaf: LeafNode) -> Self {
        HtmlNode::Leaf(leaf)
    }
}

impl From<ParentNode> for HtmlNode {
    fn from(parent: ParentNode) -> Self {
        HtmlNode::Parent(parent)
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
