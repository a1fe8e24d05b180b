mod block;
mod config;
mod error;
mod html;
mod inline;
mod node;
mod parser;
pub mod site;

pub use block::{Block, BlockKind, SpanKind, TextSpan};
pub use config::{Config, PathsConfig, SiteConfig, TemplateConfig};
pub use error::{InvalidNode, ParseError, SiteError};
pub use inline::span_to_node;
pub use node::{Attributes, Node};

/// Split a document into its blank-line separated blocks.
pub fn segment(markdown: &str) -> Vec<&str> {
    parser::segment(markdown)
}

/// Classify a single block of markdown.
pub fn classify(block: &str) -> BlockKind {
    parser::classify(block)
}

/// Parse markdown text into a vector of classified blocks.
pub fn parse(markdown: &str) -> Vec<Block<'_>> {
    parser::parse(markdown)
}

/// Split inline markdown into text spans.
pub fn tokenize(text: &str) -> Result<Vec<TextSpan>, ParseError> {
    inline::tokenize(text)
}

/// Convert markdown to an HTML tree rooted at a `div`.
pub fn convert(markdown: &str) -> Result<Node, ParseError> {
    let blocks = parse(markdown);
    html::blocks_to_html(&blocks)
}

/// Convert markdown to an HTML string.
pub fn markdown_to_html(markdown: &str) -> Result<String, ParseError> {
    convert(markdown)?.render()
}

/// Extract the text of the first level-one heading.
pub fn extract_title(markdown: &str) -> Result<String, ParseError> {
    parser::extract_title(markdown)
}
