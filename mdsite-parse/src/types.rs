use serde::{Deserialize, Serialize};

/// Kind of an inline text span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    Plain,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

impl TextType {
    /// Whether nodes of this kind carry a url.
    pub fn has_url(self) -> bool {
        matches!(self, TextType::Link | TextType::Image)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextType::Plain => "plain",
            TextType::Bold => "bold",
            TextType::Italic => "italic",
            TextType::Code => "code",
            TextType::Link => "link",
            TextType::Image => "image",
        }
    }
}

impl std::fmt::Display for TextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed span of inline text.
///
/// `url` is `Some` exactly when `text_type` is [`TextType::Link`] or
/// [`TextType::Image`]. Use the constructors rather than a struct literal to
/// keep that true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    pub text_type: TextType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TextNode {
    /// A span of a url-less kind. Link and image spans go through
    /// [`TextNode::link`] and [`TextNode::image`]; one built here has no url
    /// and fails to map with [`InlineError::MissingUrl`].
    ///
    /// [`InlineError::MissingUrl`]: crate::error::InlineError::MissingUrl
    pub fn new(text: impl Into<String>, text_type: TextType) -> Self {
        Self {
            text: text.into(),
            text_type,
            url: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextType::Plain)
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            text_type: TextType::Link,
            url: Some(url.into()),
        }
    }

    /// An image span; `alt` is stored as the node text.
    pub fn image(alt: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: alt.into(),
            text_type: TextType::Image,
            url: Some(url.into()),
        }
    }

    pub fn is_plain(&self) -> bool {
        self.text_type == TextType::Plain
    }
}

/// Classification of a top-level Markdown block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    /// Heading with level 1–6.
    Heading { level: u8 },
    Code,
    Quote,
    UnorderedList,
    OrderedList,
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
