use serde::{Deserialize, Serialize};

/// Errors raised by the inline passes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InlineError {
    #[error("Unmatched '{delimiter}' delimiter in \"{text}\"")]
    UnmatchedDelimiter { delimiter: String, text: String },

    #[error("{kind} node \"{text}\" has no url")]
    MissingUrl { kind: String, text: String },
}

/// Errors raised when an HTML node tree breaks a render prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Leaf node <{}> has an empty value", .tag.as_deref().unwrap_or("text"))]
    EmptyLeafValue { tag: Option<String> },

    #[error("Parent node has no tag")]
    MissingTag,

    #[error("Parent node <{tag}> has no children")]
    EmptyChildren { tag: String },
}

/// Any failure while turning one block into an HTML subtree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Inline(#[from] InlineError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors from the page helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("No '# ' title heading found")]
    NoTitleHeading,
}

/// Errors from [`crate::page::render_page`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Title(#[from] TitleError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A diagnostic message produced during conversion.
///
/// Diagnostics are non-fatal: the converter substitutes a fallback for the
/// offending block and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Zero-based index of the block that produced the diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}
