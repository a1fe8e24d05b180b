use crate::block::{Block, BlockKind};
use crate::error::ParseError;
use crate::inline::{span_to_node, tokenize};
use crate::node::Node;
use crate::parser::{heading_marker, ordered_prefix};

/// Convert classified blocks into a single `div` tree
pub fn blocks_to_html(blocks: &[Block]) -> Result<Node, ParseError> {
    let children = blocks
        .iter()
        .map(block_to_node)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::parent("div", children))
}

/// Compile one block into the node that renders it.
pub fn block_to_node(block: &Block) -> Result<Node, ParseError> {
    let text = block.text;
    match block.kind {
        BlockKind::Paragraph => paragraph_to_node(text),
        BlockKind::Heading => heading_to_node(text),
        BlockKind::Code => Ok(code_to_node(text)),
        BlockKind::Quote => quote_to_node(text),
        BlockKind::UnorderedList => unordered_list_to_node(text),
        BlockKind::OrderedList => ordered_list_to_node(text),
    }
}

/// Tokenize inline text and convert every span to a node.
fn text_to_children(text: &str) -> Result<Vec<Node>, ParseError> {
    Ok(tokenize(text)?.into_iter().map(span_to_node).collect())
}

fn paragraph_to_node(block: &str) -> Result<Node, ParseError> {
    let text = block.split('\n').collect::<Vec<_>>().join(" ");
    Ok(Node::parent("p", text_to_children(&text)?))
}

fn heading_to_node(block: &str) -> Result<Node, ParseError> {
    let Some((level, text)) = heading_marker(block) else {
        return paragraph_to_node(block);
    };
    Ok(Node::parent(format!("h{level}"), text_to_children(text)?))
}

// Code is emitted verbatim: no inline parsing between the fences.
fn code_to_node(block: &str) -> Node {
    let lines: Vec<&str> = block.split('\n').collect();
    let content = match lines.len() {
        0..=2 => String::new(),
        n => lines[1..n - 1].join("\n"),
    };
    Node::parent("pre", vec![Node::parent("code", vec![Node::text(content)])])
}

fn quote_to_node(block: &str) -> Result<Node, ParseError> {
    let text = block
        .split('\n')
        .map(|line| line.strip_prefix('>').unwrap_or(line).trim())
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Node::parent("blockquote", text_to_children(&text)?))
}

fn unordered_list_to_node(block: &str) -> Result<Node, ParseError> {
    let items = block
        .split('\n')
        .map(|line| list_item(line.strip_prefix('-').unwrap_or(line).trim()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::parent("ul", items))
}

fn ordered_list_to_node(block: &str) -> Result<Node, ParseError> {
    let items = block
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let text = line.strip_prefix(&ordered_prefix(i + 1)).unwrap_or(line);
            list_item(text)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::parent("ol", items))
}

fn list_item(text: &str) -> Result<Node, ParseError> {
    Ok(Node::parent("li", text_to_children(text)?))
}

#[cfg(test)]
mod tests {
    use crate::error::{InvalidNode, ParseError};
    use crate::node::Node;
    use crate::{convert, markdown_to_html};
    use pretty_assertions::assert_eq;

    fn html(markdown: &str) -> String {
        markdown_to_html(markdown).unwrap()
    }

    #[test]
    fn heading() {
        assert_eq!(html("# Heading"), "<div><h1>Heading</h1></div>");
    }

    #[test]
    fn heading_levels() {
        assert_eq!(
            html("### Third\n\n###### Sixth"),
            "<div><h3>Third</h3><h6>Sixth</h6></div>"
        );
    }

    #[test]
    fn heading_with_inline_markup() {
        assert_eq!(
            html("## The **bold** part"),
            "<div><h2>The <b>bold</b> part</h2></div>"
        );
    }

    #[test]
    fn paragraphs() {
        let md = "
This is **bolded** paragraph
text in a p
tag here

This is another paragraph with _italic_ text and `code` here

";
        assert_eq!(
            html(md),
            "<div><p>This is <b>bolded</b> paragraph text in a p tag here</p><p>This is another paragraph with <i>italic</i> text and <code>code</code> here</p></div>"
        );
    }

    #[test]
    fn code_block() {
        assert_eq!(
            html("```\ncode here\n```"),
            "<div><pre><code>code here</code></pre></div>"
        );
    }

    #[test]
    fn code_block_is_not_inline_parsed() {
        let md = "```\nThis is text that _should_ remain\nthe **same** even with inline stuff\n```";
        assert_eq!(
            html(md),
            "<div><pre><code>This is text that _should_ remain\nthe **same** even with inline stuff</code></pre></div>"
        );
    }

    #[test]
    fn code_block_with_odd_delimiters_does_not_fail() {
        assert_eq!(
            html("```\nlet x = a * b; // `\n```"),
            "<div><pre><code>let x = a * b; // `</code></pre></div>"
        );
    }

    #[test]
    fn code_block_drops_info_string() {
        assert_eq!(
            html("```rust\nlet x = 1;\n```"),
            "<div><pre><code>let x = 1;</code></pre></div>"
        );
    }

    #[test]
    fn blockquote() {
        assert_eq!(
            html("> This is a\n> blockquote block\n>with **style**"),
            "<div><blockquote>This is a blockquote block with <b>style</b></blockquote></div>"
        );
    }

    #[test]
    fn lists() {
        let md = "
- This is a list
- with items
- and _more_ items

1. This is an `ordered` list
2. with items
3. and more items

";
        assert_eq!(
            html(md),
            "<div><ul><li>This is a list</li><li>with items</li><li>and <i>more</i> items</li></ul><ol><li>This is an <code>ordered</code> list</li><li>with items</li><li>and more items</li></ol></div>"
        );
    }

    #[test]
    fn ordered_list_with_two_digit_numbers() {
        let md = (1..=10)
            .map(|n| format!("{n}. item"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(html(&md), format!("<div><ol>{}</ol></div>", "<li>item</li>".repeat(10)));
    }

    #[test]
    fn skipped_number_is_a_paragraph() {
        assert_eq!(html("1. a\n3. b"), "<div><p>1. a 3. b</p></div>");
    }

    #[test]
    fn mixed_quote_is_a_paragraph() {
        assert_eq!(html(">a\nb"), "<div><p>>a b</p></div>");
    }

    #[test]
    fn links_and_images() {
        assert_eq!(
            html("A [link](https://boot.dev) and ![img](/cat.png)"),
            "<div><p>A <a href=\"https://boot.dev\">link</a> and <img src=\"/cat.png\" alt=\"img\"></img></p></div>"
        );
    }

    #[test]
    fn convert_builds_the_expected_tree() {
        assert_eq!(
            convert("# Title\n\nSome *text*").unwrap(),
            Node::parent(
                "div",
                vec![
                    Node::parent("h1", vec![Node::text("Title")]),
                    Node::parent("p", vec![Node::text("Some "), Node::leaf("i", "text")]),
                ]
            )
        );
    }

    #[test]
    fn convert_root_holds_one_child_per_block() {
        let root = convert("# T\n\n[home](/)\n\n- a\n- b").unwrap();
        assert_eq!(root.tag(), Some("div"));
        let tags: Vec<_> = root.children().iter().map(|child| child.tag()).collect();
        assert_eq!(tags, vec![Some("h1"), Some("p"), Some("ul")]);

        let link = &root.children()[1].children()[0];
        assert_eq!(link.tag(), Some("a"));
        assert_eq!(link.attributes().get("href"), Some("/"));
        assert!(link.children().is_empty());
        assert_eq!(root.children()[2].children().len(), 2);
    }

    #[test]
    fn convert_is_repeatable() {
        let md = "# T\n\n- a\n- **b**\n\n> q";
        assert_eq!(convert(md).unwrap(), convert(md).unwrap());
        assert_eq!(html(md), html(md));
    }

    #[test]
    fn unbalanced_delimiter_fails_the_whole_document() {
        assert!(matches!(
            convert("# Fine\n\nbroken `code"),
            Err(ParseError::UnbalancedDelimiter { delimiter: "`", .. })
        ));
    }

    #[test]
    fn empty_document_cannot_render() {
        assert_eq!(
            markdown_to_html(""),
            Err(ParseError::InvalidNode(InvalidNode::NoChildren))
        );
    }
}
