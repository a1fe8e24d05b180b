use crate::error::{InvalidNode, ParseError};

/// Attribute map that serializes in insertion order
#[derive(Debug, Clone, Default, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, replacing the value in place if the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as ` key="value"` pairs. Values are emitted verbatim.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        for (key, value) in self.iter() {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
    }
}

// Two maps are equal when they hold the same pairs, whatever the order.
impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (key, value) in iter {
            attrs.insert(key, value);
        }
        attrs
    }
}

/// HTML document tree
///
/// Nodes are plain values: built once while compiling a block and never
/// mutated afterwards. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A terminal node. Without a tag the value is emitted as raw text.
    Leaf {
        tag: Option<String>,
        value: Option<String>,
        attributes: Attributes,
    },
    /// A structural node owning an ordered list of children.
    Parent {
        tag: Option<String>,
        children: Vec<Node>,
        attributes: Attributes,
    },
}

impl Node {
    /// Untagged literal text.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Leaf {
            tag: None,
            value: Some(value.into()),
            attributes: Attributes::new(),
        }
    }

    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Node::Leaf {
            tag: Some(tag.into()),
            value: Some(value.into()),
            attributes: Attributes::new(),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Parent {
            tag: Some(tag.into()),
            children,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(mut self, attrs: Attributes) -> Self {
        match &mut self {
            Node::Leaf { attributes, .. } | Node::Parent { attributes, .. } => *attributes = attrs,
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Leaf { tag, .. } | Node::Parent { tag, .. } => tag.as_deref(),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Node::Leaf { attributes, .. } | Node::Parent { attributes, .. } => attributes,
        }
    }

    /// Children of a parent node; leaves have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Leaf { .. } => &[],
            Node::Parent { children, .. } => children,
        }
    }

    /// Render this node and its descendants to an HTML string.
    pub fn render(&self) -> Result<String, ParseError> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }

    fn render_into(&self, out: &mut String) -> Result<(), ParseError> {
        match self {
            Node::Leaf {
                tag,
                value,
                attributes,
            } => {
                let value = value
                    .as_deref()
                    .ok_or(ParseError::InvalidNode(InvalidNode::MissingValue))?;
                match tag {
                    None => out.push_str(value),
                    Some(tag) => {
                        open_tag(tag, attributes, out);
                        out.push_str(value);
                        close_tag(tag, out);
                    }
                }
            }
            Node::Parent {
                tag,
                children,
                attributes,
            } => {
                let tag = tag
                    .as_deref()
                    .ok_or(ParseError::InvalidNode(InvalidNode::MissingTag))?;
                if children.is_empty() {
                    return Err(ParseError::InvalidNode(InvalidNode::NoChildren));
                }
                open_tag(tag, attributes, out);
                for child in children {
                    child.render_into(out)?;
                }
                close_tag(tag, out);
            }
        }
        Ok(())
    }
}

fn open_tag(tag: &str, attributes: &Attributes, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    attributes.write_html(out);
    out.push('>');
}

fn close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
