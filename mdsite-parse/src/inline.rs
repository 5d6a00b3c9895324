//! Inline span scanner.
//!
//! Turns the text of a block into a flat list of [`TextNode`]s, one lexical
//! construct at a time, and maps each node onto an HTML leaf.
//!
//! Passes only ever look inside [`TextType::Plain`] nodes, so a span that an
//! earlier pass already typed is never re-split. That is what keeps emphasis
//! and links from nesting.
//!
//! Delimiter passes run before image and link extraction, but skip any
//! delimiter that sits inside a `[..](..)` or `![..](..)` range. A `_` in a
//! url stays part of the link, while a code span may still contain link
//! syntax verbatim.

use crate::error::InlineError;
use crate::html::{Attrs, HtmlNode, LeafNode};
use crate::types::{TextNode, TextType};

/// Delimiter passes, applied in this order before images and links.
///
/// `**` has to run before `_`/`` ` `` so the bold markers are consumed before
/// any single-character pass sees them.
const DELIMITER_PASSES: [(&str, TextType); 3] = [
    ("**", TextType::Bold),
    ("_", TextType::Italic),
    ("`", TextType::Code),
];

/// Parse inline markup in `text` into typed spans.
///
/// Order: `**`, `_`, `` ` ``, then images, then links.
pub fn text_to_textnodes(text: &str) -> Result<Vec<TextNode>, InlineError> {
    let nodes = DELIMITER_PASSES.iter().try_fold(
        vec![TextNode::plain(text)],
        |nodes, (delimiter, text_type)| split_nodes_delimiter(nodes, delimiter, *text_type),
    )?;
    Ok(split_nodes_link(split_nodes_image(nodes)))
}

/// Parse inline markup in `text` and map every span to an HTML leaf.
pub fn text_to_children(text: &str) -> Result<Vec<HtmlNode>, InlineError> {
    text_to_textnodes(text)?
        .iter()
        .map(text_node_to_html_node)
        .collect()
}

/// Map one inline span onto an HTML leaf.
pub fn text_node_to_html_node(node: &TextNode) -> Result<HtmlNode, InlineError> {
    let leaf = match node.text_type {
        TextType::Plain => LeafNode::text(&node.text),
        TextType::Bold => LeafNode::new(Some("b"), &node.text),
        TextType::Italic => LeafNode::new(Some("i"), &node.text),
        TextType::Code => LeafNode::new(Some("code"), &node.text),
        TextType::Link => LeafNode::new(Some("a"), &node.text)
            .with_attrs(Attrs::new().with("href", require_url(node)?)),
        TextType::Image => LeafNode::new(Some("img"), "").with_attrs(
            Attrs::new()
                .with("src", require_url(node)?)
                .with("alt", &node.text),
        ),
    };
    Ok(leaf.into())
}

fn require_url(node: &TextNode) -> Result<&str, InlineError> {
    node.url.as_deref().ok_or_else(|| InlineError::MissingUrl {
        kind: node.text_type.to_string(),
        text: node.text.clone(),
    })
}

// ------------------------------------------------------------------
// Delimiter pass
// ------------------------------------------------------------------

/// Split every plain node on `delimiter`, alternating plain and `text_type`
/// segments (plain first).
///
/// Empty segments are dropped. A segment's kind comes from its position, so
/// dropping one never merges its neighbours. An odd number of delimiters in a
/// node is an error. Delimiters inside image or link markup do not count.
pub fn split_nodes_delimiter(
    nodes: Vec<TextNode>,
    delimiter: &str,
    text_type: TextType,
) -> Result<Vec<TextNode>, InlineError> {
    debug_assert!(!delimiter.is_empty());
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        if !node.is_plain() {
            out.push(node);
            continue;
        }

        let sections = split_outside_markup(&node.text, delimiter);
        if sections.len() % 2 == 0 {
            return Err(InlineError::UnmatchedDelimiter {
                delimiter: delimiter.to_string(),
                text: node.text,
            });
        }

        out.extend(
            sections
                .into_iter()
                .enumerate()
                .filter(|(_, section)| !section.is_empty())
                .map(|(i, section)| {
                    if i % 2 == 0 {
                        TextNode::plain(section)
                    } else {
                        TextNode::new(section, text_type)
                    }
                }),
        );
    }

    Ok(out)
}

/// Split `text` on every `delimiter` that is not inside image or link markup.
fn split_outside_markup<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    let protected: Vec<(usize, usize)> = scan_markup(text, true)
        .into_iter()
        .chain(scan_markup(text, false))
        .map(|m| (m.start, m.end))
        .collect();

    let mut sections = Vec::new();
    let mut cursor = 0;
    for (at, _) in text.match_indices(delimiter) {
        if protected.iter().any(|&(start, end)| (start..end).contains(&at)) {
            continue;
        }
        sections.push(&text[cursor..at]);
        cursor = at + delimiter.len();
    }
    sections.push(&text[cursor..]);
    sections
}

// ------------------------------------------------------------------
// Image / link pass
// ------------------------------------------------------------------

/// One `[label](url)` occurrence, with the byte range it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Markup<'a> {
    start: usize,
    end: usize,
    label: &'a str,
    url: &'a str,
}

/// Return `(alt, url)` for every `![alt](url)` in `text`, left to right.
pub fn extract_markdown_images(text: &str) -> Vec<(String, String)> {
    to_pairs(scan_markup(text, true))
}

/// Return `(text, url)` for every `[text](url)` in `text` that is not an
/// image, left to right.
pub fn extract_markdown_links(text: &str) -> Vec<(String, String)> {
    to_pairs(scan_markup(text, false))
}

fn to_pairs(found: Vec<Markup<'_>>) -> Vec<(String, String)> {
    found
        .into_iter()
        .map(|m| (m.label.to_string(), m.url.to_string()))
        .collect()
}

/// Split images out of every plain node.
pub fn split_nodes_image(nodes: Vec<TextNode>) -> Vec<TextNode> {
    split_nodes_markup(nodes, true)
}

/// Split links out of every plain node.
pub fn split_nodes_link(nodes: Vec<TextNode>) -> Vec<TextNode> {
    split_nodes_markup(nodes, false)
}

fn split_nodes_markup(nodes: Vec<TextNode>, images: bool) -> Vec<TextNode> {
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        if !node.is_plain() {
            out.push(node);
            continue;
        }

        let text = node.text.as_str();
        let mut cursor = 0;
        for m in scan_markup(text, images) {
            if m.start > cursor {
                out.push(TextNode::plain(&text[cursor..m.start]));
            }
            out.push(if images {
                TextNode::image(m.label, m.url)
            } else {
                TextNode::link(m.label, m.url)
            });
            cursor = m.end;
        }
        if cursor < text.len() {
            out.push(TextNode::plain(&text[cursor..]));
        }
    }

    out
}

/// Scan `text` for bracketed markup.
///
/// With `images` set, only `![..](..)` is matched; otherwise only `[..](..)`
/// whose `[` is not preceded by `!`. Matches never overlap; a failed
/// candidate resumes at the next byte.
fn scan_markup(text: &str, images: bool) -> Vec<Markup<'_>> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut results = Vec::new();
    let mut pos = 0;

    while pos < len {
        let open = if images {
            (bytes[pos] == b'!' && pos + 1 < len && bytes[pos + 1] == b'[').then_some(pos + 1)
        } else {
            (bytes[pos] == b'[' && !(pos > 0 && bytes[pos - 1] == b'!')).then_some(pos)
        };

        match open.and_then(|open| try_parse_markup(text, open)) {
            Some((label, url, end)) => {
                results.push(Markup {
                    start: pos,
                    end,
                    label,
                    url,
                });
                pos = end;
            }
            None => pos += 1,
        }
    }

    results
}

/// Parse `[label](url)` starting at `open` (the `[` byte).
///
/// Returns the label, the url and the byte offset just past the `)`.
fn try_parse_markup(text: &str, open: usize) -> Option<(&str, &str, usize)> {
    let rest = &text[open + 1..];
    let close = rest.find(['[', ']'])?;
    if rest.as_bytes()[close] != b']' {
        return None;
    }
    let label = &rest[..close];

    let after = rest[close + 1..].strip_prefix('(')?;
    let paren = after.find(['(', ')'])?;
    if after.as_bytes()[paren] != b')' {
        return None;
    }
    let url = &after[..paren];

    // `[` + label + `](` + url + `)`
    let end = open + 1 + close + 2 + paren + 1;
    Some((label, url, end))
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(s: &str) -> TextNode {
        TextNode::plain(s)
    }

    #[test]
    fn split_bold() {
        let nodes = split_nodes_delimiter(vec![plain("a **b** c")], "**", TextType::Bold).unwrap();
        assert_eq!(
            nodes,
            vec![plain("a "), TextNode::new("b", TextType::Bold), plain(" c")]
        );
    }

    #[test]
    fn split_multiple_spans() {
        let nodes =
            split_nodes_delimiter(vec![plain("`a` and `b`")], "`", TextType::Code).unwrap();
        assert_eq!(
            nodes,
            vec![
                TextNode::new("a", TextType::Code),
                plain(" and "),
                TextNode::new("b", TextType::Code),
            ]
        );
    }

    #[test]
    fn split_drops_empty_segments_without_merging() {
        let nodes = split_nodes_delimiter(vec![plain("a____b")], "_", TextType::Italic).unwrap();
        // "a", "", "", "", "b": both plain runs stay separate
        assert_eq!(nodes, vec![plain("a"), plain("b")]);
    }

    #[test]
    fn split_unmatched_delimiter_fails() {
        let err =
            split_nodes_delimiter(vec![plain("a **b c")], "**", TextType::Bold).unwrap_err();
        assert_eq!(
            err,
            InlineError::UnmatchedDelimiter {
                delimiter: "**".into(),
                text: "a **b c".into(),
            }
        );
    }

    #[test]
    fn split_leaves_typed_nodes_alone() {
        let input = vec![
            TextNode::new("snake_case_name", TextType::Code),
            TextNode::link("a_b", "https://x.io/a_b"),
        ];
        let nodes = split_nodes_delimiter(input.clone(), "_", TextType::Italic).unwrap();
        assert_eq!(nodes, input);
    }

    #[test]
    fn split_no_delimiter_is_identity() {
        let nodes = split_nodes_delimiter(vec![plain("nothing here")], "**", TextType::Bold).unwrap();
        assert_eq!(nodes, vec![plain("nothing here")]);
    }

    #[test]
    fn extract_images() {
        assert_eq!(
            extract_markdown_images("![a](u1) and ![b](u2)"),
            vec![("a".to_string(), "u1".to_string()), ("b".to_string(), "u2".to_string())]
        );
    }

    #[test]
    fn extract_links() {
        assert_eq!(
            extract_markdown_links("[a](u1) text [b](u2)"),
            vec![("a".to_string(), "u1".to_string()), ("b".to_string(), "u2".to_string())]
        );
    }

    #[test]
    fn extract_links_skips_images() {
        assert_eq!(
            extract_markdown_links("![img](i.png) and [link](l.html)"),
            vec![("link".to_string(), "l.html".to_string())]
        );
        assert!(extract_markdown_images("[link](l.html)").is_empty());
    }

    #[test]
    fn extract_rejects_nested_brackets() {
        assert_eq!(
            extract_markdown_links("[a [b](u)"),
            vec![("b".to_string(), "u".to_string())]
        );
        assert!(extract_markdown_links("[a](b(c))").is_empty());
        assert!(extract_markdown_links("[a] (u)").is_empty());
    }

    #[test]
    fn extract_empty_groups() {
        assert_eq!(
            extract_markdown_links("[](u)"),
            vec![(String::new(), "u".to_string())]
        );
    }

    #[test]
    fn split_images_keeps_surrounding_text() {
        let nodes = split_nodes_image(vec![plain(
            "This is ![cat](https://i.imgur.com/cat.png) and ![dog](dog.png)",
        )]);
        assert_eq!(
            nodes,
            vec![
                plain("This is "),
                TextNode::image("cat", "https://i.imgur.com/cat.png"),
                plain(" and "),
                TextNode::image("dog", "dog.png"),
            ]
        );
    }

    #[test]
    fn split_links_with_trailing_text() {
        let nodes = split_nodes_link(vec![plain("[to boot dev](https://www.boot.dev) rocks")]);
        assert_eq!(
            nodes,
            vec![TextNode::link("to boot dev", "https://www.boot.dev"), plain(" rocks")]
        );
    }

    #[test]
    fn split_links_identical_repeats() {
        let nodes = split_nodes_link(vec![plain("[x](u) [x](u)")]);
        assert_eq!(
            nodes,
            vec![TextNode::link("x", "u"), plain(" "), TextNode::link("x", "u")]
        );
    }

    #[test]
    fn split_links_ignores_images() {
        let input = vec![plain("![a](b)")];
        assert_eq!(split_nodes_link(input.clone()), input);
    }

    #[test]
    fn split_markup_drops_empty_plain() {
        assert!(split_nodes_link(vec![plain("")]).is_empty());
    }

    #[test]
    fn full_inline_chain() {
        let nodes = text_to_textnodes(
            "This is **text** with an _italic_ word and a `code block` and an ![obi wan image](https://i.imgur.com/fJRm4Vk.jpeg) and a [link](https://boot.dev)",
        )
        .unwrap();
        assert_eq!(
            nodes,
            vec![
                plain("This is "),
                TextNode::new("text", TextType::Bold),
                plain(" with an "),
                TextNode::new("italic", TextType::Italic),
                plain(" word and a "),
                TextNode::new("code block", TextType::Code),
                plain(" and an "),
                TextNode::image("obi wan image", "https://i.imgur.com/fJRm4Vk.jpeg"),
                plain(" and a "),
                TextNode::link("link", "https://boot.dev"),
            ]
        );
    }

    #[test]
    fn underscores_in_urls_are_not_italic() {
        let nodes = text_to_textnodes("see [docs](https://x.io/my_page)").unwrap();
        assert_eq!(
            nodes,
            vec![plain("see "), TextNode::link("docs", "https://x.io/my_page")]
        );
    }

    #[test]
    fn underscores_in_image_urls_are_not_italic() {
        let nodes = text_to_textnodes("_look_ ![a_b](img/my_cat.png)").unwrap();
        assert_eq!(
            nodes,
            vec![
                TextNode::new("look", TextType::Italic),
                plain(" "),
                TextNode::image("a_b", "img/my_cat.png"),
            ]
        );
    }

    #[test]
    fn code_span_keeps_link_syntax() {
        let nodes = text_to_textnodes("Write `[text](url)` for a link and **see** this").unwrap();
        assert_eq!(
            nodes,
            vec![
                plain("Write "),
                TextNode::new("[text](url)", TextType::Code),
                plain(" for a link and "),
                TextNode::new("see", TextType::Bold),
                plain(" this"),
            ]
        );
    }

    #[test]
    fn bold_around_link_stays_balanced() {
        let nodes = text_to_textnodes("**read [the docs](/d)** now").unwrap();
        assert_eq!(
            nodes,
            vec![
                TextNode::new("read [the docs](/d)", TextType::Bold),
                plain(" now"),
            ]
        );
    }

    #[test]
    fn split_skips_delimiters_inside_markup() {
        let nodes = split_nodes_delimiter(
            vec![plain("[a_b](u_v) and _c_")],
            "_",
            TextType::Italic,
        )
        .unwrap();
        assert_eq!(
            nodes,
            vec![plain("[a_b](u_v) and "), TextNode::new("c", TextType::Italic)]
        );
    }

    #[test]
    fn map_every_kind() {
        let cases = [
            (plain("Hello"), "Hello"),
            (TextNode::new("b", TextType::Bold), "<b>b</b>"),
            (TextNode::new("i", TextType::Italic), "<i>i</i>"),
            (TextNode::new("c", TextType::Code), "<code>c</code>"),
            (TextNode::link("home", "/"), r#"<a href="/">home</a>"#),
            (TextNode::image("alt text", "a.png"), r#"<img src="a.png" alt="alt text">"#),
        ];
        for (node, expected) in cases {
            let html = text_node_to_html_node(&node).unwrap();
            assert_eq!(html.to_html().unwrap(), expected, "mapping {node:?}");
        }
    }

    #[test]
    fn map_plain_is_untagged() {
        let html = text_node_to_html_node(&plain("Hello")).unwrap();
        assert_eq!(html, HtmlNode::text("Hello"));
        assert!(html.attrs().is_empty());
    }

    #[test]
    fn map_link_without_url_fails() {
        let broken = TextNode {
            text: "x".into(),
            text_type: TextType::Link,
            url: None,
        };
        assert!(matches!(
            text_node_to_html_node(&broken),
            Err(InlineError::MissingUrl { .. })
        ));
    }

    #[test]
    fn url_kind_without_url_fails_to_map() {
        let node = TextNode::new("x", TextType::Image);
        assert_eq!(node.url, None);
        assert_eq!(
            text_node_to_html_node(&node).unwrap_err(),
            InlineError::MissingUrl {
                kind: "image".into(),
                text: "x".into(),
            }
        );
    }

    #[test]
    fn non_ascii_text_survives_scanning() {
        let nodes = text_to_textnodes("héllo ![ç](ü.png) wörld").unwrap();
        assert_eq!(
            nodes,
            vec![plain("héllo "), TextNode::image("ç", "ü.png"), plain(" wörld")]
        );
    }
}
