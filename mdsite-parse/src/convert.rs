//! Markdown document to HTML node tree.
//!
//! `markdown_to_html_node` never fails. A block whose handler returns an
//! error is replaced with a paragraph holding its raw text, and the error is
//! recorded as a [`Diagnostic`] on the result.

use serde::Serialize;

use crate::blocks::{block_to_block_type, heading_level, markdown_to_blocks, ordered_marker};
use crate::error::{ConvertError, Diagnostic, InlineError, RenderError, Severity};
use crate::html::{Attrs, HtmlNode, LeafNode};
use crate::inline::text_to_children;
use crate::types::BlockType;

/// Stand-in text for containers that would otherwise be empty.
const BLANK: &str = " ";

/// Result of converting a document.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    /// Root `<div>` holding one subtree per block.
    pub root: HtmlNode,
    /// Non-fatal diagnostics, one per block that fell back.
    pub diagnostics: Vec<Diagnostic>,
}

impl ConvertResult {
    /// Render the root tree.
    ///
    /// Every block subtree was validated during conversion, so this only
    /// fails if `root` was modified afterwards.
    pub fn to_html(&self) -> Result<String, RenderError> {
        self.root.to_html()
    }
}

/// Convert a whole Markdown document into a `<div>` tree.
pub fn markdown_to_html_node(markdown: &str) -> ConvertResult {
    let mut diagnostics = Vec::new();

    let mut children: Vec<HtmlNode> = markdown_to_blocks(markdown)
        .iter()
        .filter(|block| !block.trim().is_empty())
        .enumerate()
        .map(|(index, block)| {
            block_to_html_node(block).unwrap_or_else(|err| {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    message: format!("block rendered as plain text: {err}"),
                    block: Some(index),
                    code: Some(error_code(&err).into()),
                });
                raw_paragraph(block)
            })
        })
        .collect();

    if children.is_empty() {
        children.push(raw_paragraph(BLANK));
    }

    ConvertResult {
        root: HtmlNode::parent("div", children),
        diagnostics,
    }
}

/// Classify and render one block, then check the subtree renders.
pub fn block_to_html_node(block: &str) -> Result<HtmlNode, ConvertError> {
    let node = match block_to_block_type(block) {
        BlockType::Paragraph => paragraph_to_html_node(block)?,
        BlockType::Heading { level } => heading_to_html_node(block, level)?,
        BlockType::Code => code_to_html_node(block),
        BlockType::Quote => quote_to_html_node(block)?,
        BlockType::UnorderedList => unordered_list_to_html_node(block)?,
        BlockType::OrderedList => ordered_list_to_html_node(block)?,
    };
    node.validate()?;
    Ok(node)
}

fn error_code(err: &ConvertError) -> &'static str {
    match err {
        ConvertError::Inline(InlineError::UnmatchedDelimiter { .. }) => "W001",
        ConvertError::Inline(InlineError::MissingUrl { .. }) => "W002",
        ConvertError::Render(_) => "W003",
    }
}

fn raw_paragraph(text: &str) -> HtmlNode {
    HtmlNode::parent("p", vec![HtmlNode::text(text)])
}

/// Inline-parse `text`; an empty result becomes one plain leaf so the
/// enclosing parent always has a child.
fn inline_children(text: &str) -> Result<Vec<HtmlNode>, ConvertError> {
    let children = text_to_children(text)?;
    if !children.is_empty() {
        return Ok(children);
    }
    let fallback = if text.is_empty() { BLANK } else { text };
    Ok(vec![HtmlNode::text(fallback)])
}

// ------------------------------------------------------------------
// Per-block handlers
// ------------------------------------------------------------------

fn paragraph_to_html_node(block: &str) -> Result<HtmlNode, ConvertError> {
    Ok(HtmlNode::parent("p", inline_children(block)?))
}

fn heading_to_html_node(block: &str, level: u8) -> Result<HtmlNode, ConvertError> {
    let tag = format!("h{level}");
    if heading_level(block) != Some(level) {
        return Ok(HtmlNode::parent("h1", vec![HtmlNode::text(block)]));
    }
    let text = &block[level as usize + 1..];
    Ok(HtmlNode::parent(tag, inline_children(text)?))
}

fn code_to_html_node(block: &str) -> HtmlNode {
    let (info, content) = split_code_fence(block);
    let content = if content.is_empty() { BLANK } else { content };

    let mut code = LeafNode::new(Some("code"), content);
    if let Some(lang) = info {
        code = code.with_attrs(Attrs::new().with("class", format!("language-{lang}")));
    }
    HtmlNode::parent("pre", vec![code.into()])
}

/// Strip the fences from a code block.
///
/// Returns the info string of the opening fence (if any) and the text between
/// the fence lines. A single-line block such as ```` ```x``` ```` has no info
/// string; everything between the fences is content.
fn split_code_fence(block: &str) -> (Option<&str>, &str) {
    let Some((first, rest)) = block.split_once('\n') else {
        let inner = block
            .strip_prefix("```")
            .and_then(|b| b.strip_suffix("```"))
            .unwrap_or("");
        return (None, inner);
    };

    let info = first.trim_start_matches('`').trim();
    let info = (!info.is_empty()).then_some(info);

    let body = rest.strip_suffix("```").unwrap_or(rest);
    let body = body.strip_suffix('\n').unwrap_or(body);
    (info, body)
}

fn quote_to_html_node(block: &str) -> Result<HtmlNode, ConvertError> {
    let text = block
        .split('\n')
        .map(|line| {
            let line = line.strip_prefix('>').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(HtmlNode::parent("blockquote", inline_children(&text)?))
}

fn unordered_list_to_html_node(block: &str) -> Result<HtmlNode, ConvertError> {
    list_to_html_node(block, "ul", |line| line.strip_prefix("- ").unwrap_or(line))
}

fn ordered_list_to_html_node(block: &str) -> Result<HtmlNode, ConvertError> {
    list_to_html_node(block, "ol", |line| {
        ordered_marker(line).map_or(line, |(_, rest)| rest)
    })
}

fn list_to_html_node(
    block: &str,
    tag: &str,
    strip_marker: impl Fn(&str) -> &str,
) -> Result<HtmlNode, ConvertError> {
    let mut items = block
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Ok(HtmlNode::parent("li", inline_children(strip_marker(line))?)))
        .collect::<Result<Vec<_>, ConvertError>>()?;

    if items.is_empty() {
        items.push(HtmlNode::parent("li", vec![HtmlNode::text(BLANK)]));
    }
    Ok(HtmlNode::parent(tag, items))
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
