use crate::block::{Block, BlockKind};
use crate::error::ParseError;

const FENCE: &str = "```";

/// Split a document into trimmed, non-empty blocks on blank lines
pub fn segment(markdown: &str) -> Vec<&str> {
    markdown
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Parse markdown text into a list of classified blocks
pub fn parse(markdown: &str) -> Vec<Block<'_>> {
    segment(markdown)
        .into_iter()
        .map(|text| Block {
            kind: classify(text),
            text,
        })
        .collect()
}

/// Classify a single block. The first matching rule wins; list and quote
/// rules must hold for every line or the block is a paragraph.
pub fn classify(block: &str) -> BlockKind {
    let lines: Vec<&str> = block.split('\n').collect();

    if lines.len() == 1 && heading_marker(block).is_some() {
        return BlockKind::Heading;
    }

    if is_code_fence(&lines) {
        return BlockKind::Code;
    }

    if block.starts_with('>') {
        return if lines.iter().all(|line| line.starts_with('>')) {
            BlockKind::Quote
        } else {
            BlockKind::Paragraph
        };
    }

    if block.starts_with("- ") {
        return if lines.iter().all(|line| line.starts_with("- ")) {
            BlockKind::UnorderedList
        } else {
            BlockKind::Paragraph
        };
    }

    if block.starts_with("1. ") {
        let numbered = lines
            .iter()
            .enumerate()
            .all(|(i, line)| line.starts_with(&ordered_prefix(i + 1)));
        return if numbered {
            BlockKind::OrderedList
        } else {
            BlockKind::Paragraph
        };
    }

    BlockKind::Paragraph
}

fn is_code_fence(lines: &[&str]) -> bool {
    lines.len() >= 3 && lines[0].starts_with(FENCE) && lines[lines.len() - 1] == FENCE
}

/// Split a heading line into its level and text.
///
/// A heading is one to six `#`, a single space, then at least one character.
pub(crate) fn heading_marker(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let text = line[level..].strip_prefix(' ')?;
    if text.is_empty() {
        return None;
    }
    Some((level, text))
}

/// Marker expected in front of the `number`-th ordered list item.
pub(crate) fn ordered_prefix(number: usize) -> String {
    format!("{number}. ")
}

/// Find the page title: the first line made of a single `#`, a space and
/// some non-blank content. Returns the content trimmed.
pub fn extract_title(markdown: &str) -> Result<String, ParseError> {
    markdown
        .lines()
        .find_map(|line| {
            let title = line.strip_prefix("# ")?.trim();
            (!title.is_empty()).then(|| title.to_string())
        })
        .ok_or(ParseError::MissingTitle)
}
