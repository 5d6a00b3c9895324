//! Block segmentation and classification.
//!
//! A document is cut into blocks on blank lines, and each block is typed by
//! looking at its first characters and line prefixes. Classification never
//! fails: anything unrecognised is a paragraph.

use crate::types::BlockType;

const CODE_FENCE: &str = "```";
const CONTINUATION_INDENT: &str = "\n    ";

/// Split a document into its top-level blocks.
///
/// Blocks are separated by `"\n\n"`. Each block has leading and trailing
/// newlines and spaces trimmed, and indented continuation lines
/// (`"\n    "`) pulled back to column zero. Blocks that end up empty are
/// dropped.
pub fn markdown_to_blocks(markdown: &str) -> Vec<String> {
    let normalised = markdown.replace("\r\n", "\n");
    normalised
        .split("\n\n")
        .map(|chunk| {
            chunk
                .trim_matches(['\n', ' '])
                .replace(CONTINUATION_INDENT, "\n")
        })
        .filter(|block| !block.is_empty())
        .collect()
}

/// Classify one block. The first matching rule wins.
pub fn block_to_block_type(block: &str) -> BlockType {
    if block.starts_with(CODE_FENCE) && block.ends_with(CODE_FENCE) {
        return BlockType::Code;
    }
    if let Some(level) = heading_level(block) {
        return BlockType::Heading { level };
    }

    let lines: Vec<&str> = block.split('\n').collect();
    if lines.iter().all(|line| line.starts_with('>')) {
        BlockType::Quote
    } else if lines.iter().all(|line| line.starts_with("- ")) {
        BlockType::UnorderedList
    } else if is_consecutive_ordered_list(&lines) {
        BlockType::OrderedList
    } else {
        BlockType::Paragraph
    }
}

/// Heading level for a block opening with 1–6 `#` followed by a space.
pub fn heading_level(block: &str) -> Option<u8> {
    let hashes = block.bytes().take_while(|&b| b == b'#').count();
    if (1..=6).contains(&hashes) && block.as_bytes().get(hashes) == Some(&b' ') {
        Some(hashes as u8)
    } else {
        None
    }
}

/// Whether the non-blank lines read `1. `, `2. `, `3. `, … with no gaps.
///
/// Lines are trimmed before the check. A block with no non-blank lines is
/// not a list.
pub fn is_consecutive_ordered_list(lines: &[&str]) -> bool {
    let mut expected = 1;
    let mut seen_any = false;

    for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        match ordered_marker(line) {
            Some((number, _)) if number == expected => {
                expected += 1;
                seen_any = true;
            }
            _ => return false,
        }
    }

    seen_any
}

/// Split an ordered-list line into its number and the text after `"N. "`.
pub fn ordered_marker(line: &str) -> Option<(usize, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix(". ")?;
    let number = line[..digits].parse().ok()?;
    Some((number, rest))
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
