use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::{SpanKind, TextSpan};
use crate::error::ParseError;
use crate::node::{Attributes, Node};

/// `![alt](url)`
static IMAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\[\]]*)\]\(([^\(\)]*)\)").unwrap());

/// `[text](url)`; matches preceded by `!` are images and get skipped by the caller.
static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]\(([^\(\)]*)\)").unwrap());

/// Delimiter passes in the order they run. `**` must come before `*`.
const DELIMITERS: [(&str, SpanKind); 5] = [
    ("`", SpanKind::Code),
    ("**", SpanKind::Bold),
    ("__", SpanKind::Bold),
    ("*", SpanKind::Italic),
    ("_", SpanKind::Italic),
];

/// Split a run of inline Markdown into formatted spans, left to right.
pub fn tokenize(text: &str) -> Result<Vec<TextSpan>, ParseError> {
    let mut spans = vec![TextSpan::text(text)];
    for (delimiter, kind) in DELIMITERS {
        spans = split_delimiter(spans, delimiter, kind)?;
    }
    let spans = split_images(spans);
    Ok(split_links(spans))
}

/// Split every plain span on `delimiter`, turning the delimited parts into
/// `kind` spans. Spans already classified by an earlier pass are untouched.
pub fn split_delimiter(
    spans: Vec<TextSpan>,
    delimiter: &'static str,
    kind: SpanKind,
) -> Result<Vec<TextSpan>, ParseError> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if !span.is_text() || !span.text.contains(delimiter) {
            out.push(span);
            continue;
        }
        split_text(&span.text, delimiter, kind, &mut out)?;
    }
    Ok(out)
}

fn split_text(
    text: &str,
    delimiter: &'static str,
    kind: SpanKind,
    out: &mut Vec<TextSpan>,
) -> Result<(), ParseError> {
    let parts: Vec<&str> = text.split(delimiter).collect();
    if parts.len() % 2 == 0 {
        return Err(ParseError::UnbalancedDelimiter {
            delimiter,
            text: text.to_string(),
        });
    }

    for (i, part) in parts.into_iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i % 2 == 1 {
            out.push(TextSpan::new(part, kind));
        } else if part.contains(delimiter) {
            // Each re-scan sees strictly fewer occurrences than its caller.
            split_text(part, delimiter, kind, out)?;
        } else {
            out.push(TextSpan::text(part));
        }
    }
    Ok(())
}

/// Extract `![alt](url)` markers from plain spans.
pub fn split_images(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    split_markers(spans, &IMAGE_PATTERN, SpanKind::Image)
}

/// Extract `[text](url)` markers that are not images from plain spans.
pub fn split_links(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    split_markers(spans, &LINK_PATTERN, SpanKind::Link)
}

fn split_markers(spans: Vec<TextSpan>, pattern: &Regex, kind: SpanKind) -> Vec<TextSpan> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if !span.is_text() {
            out.push(span);
            continue;
        }

        let text = span.text.as_str();
        let mut last = 0;
        let mut pos = 0;
        while let Some(caps) = pattern.captures_at(text, pos) {
            let Some(whole) = caps.get(0) else { break };
            if kind == SpanKind::Link && text[..whole.start()].ends_with('!') {
                pos = whole.start() + 1;
                continue;
            }
            push_plain(&text[last..whole.start()], &mut out);
            out.push(TextSpan {
                text: caps[1].to_string(),
                kind,
                url: Some(caps[2].to_string()),
            });
            last = whole.end();
            pos = whole.end();
        }
        push_plain(&text[last..], &mut out);
    }
    out
}

fn push_plain(text: &str, out: &mut Vec<TextSpan>) {
    if !text.is_empty() {
        out.push(TextSpan::text(text));
    }
}

/// Convert one span into the HTML node that renders it.
pub fn span_to_node(span: TextSpan) -> Node {
    let TextSpan { text, kind, url } = span;
    // An empty url renders like a missing one.
    let url = url.filter(|url| !url.is_empty());

    match kind {
        SpanKind::Text => Node::text(text),
        SpanKind::Bold => Node::leaf("b", text),
        SpanKind::Italic => Node::leaf("i", text),
        SpanKind::Code => Node::leaf("code", text),
        SpanKind::Link => {
            let mut attrs = Attributes::new();
            if let Some(url) = url {
                attrs.insert("href", url);
            }
            Node::leaf("a", text).with_attributes(attrs)
        }
        SpanKind::Image => {
            let mut attrs = Attributes::new();
            if let Some(url) = url {
                attrs.insert("src", url);
            }
            attrs.insert("alt", text);
            Node::leaf("img", "").with_attributes(attrs)
        }
    }
}
