//! `mdsite-parse` — Markdown to HTML for the mdsite static site generator.
//!
//! Converts a fixed subset of Markdown (headings, paragraphs, fenced code,
//! quotes, ordered and unordered lists, and the inline spans bold, italic,
//! code, link and image) into an HTML node tree, and renders that tree to a
//! string. Emphasis and links do not nest, and no HTML escaping is done.
//!
//! # Quick start
//!
//! ```
//! let result = mdsite_parse::markdown_to_html_node("# Hello\n\nSome **bold** text");
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(
//!     result.to_html().unwrap(),
//!     "<div><h1>Hello</h1><p>Some <b>bold</b> text</p></div>"
//! );
//! ```

pub mod blocks;
pub mod convert;
pub mod error;
pub mod html;
pub mod inline;
pub mod page;
pub mod types;

pub use convert::{ConvertResult, block_to_html_node, markdown_to_html_node};
pub use error::*;
pub use html::{Attrs, HtmlNode, LeafNode, ParentNode};
pub use page::{RenderedPage, extract_title, fill_template, render_page};
pub use types::*;

/// Convert a Markdown document straight to an HTML string.
pub fn render_markdown(markdown: &str) -> String {
    // Conversion validates every block, so the root always renders.
    markdown_to_html_node(markdown)
        .to_html()
        .unwrap_or_default()
}
