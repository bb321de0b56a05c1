//! # Document Model
//!
//! The input representation for the renderer: a tree of markdown nodes as an
//! external parser produces it. The default producer is [`crate::markdown`],
//! but the tree is plain serde data, so any parser that can emit JSON in this
//! shape can feed the renderer directly.
//!
//! The tree is closed: every kind of node the renderer understands is a
//! variant here, and the renderer matches on all of them. Inline styling is
//! not part of the model's contract with the renderer. Emphasis, links and
//! images survive only as the text they contain.

pub mod page;

use serde::{Deserialize, Serialize};

pub use page::{MarginSize, Orientation, PageGeometry, PageSize, PageSpec};

/// A node in the parsed document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DocumentNode {
    /// The root. Children are block nodes.
    Document { children: Vec<DocumentNode> },

    /// A heading of level 1 through 6.
    Heading {
        level: u8,
        #[serde(default)]
        children: Vec<DocumentNode>,
    },

    Paragraph {
        #[serde(default)]
        children: Vec<DocumentNode>,
    },

    BlockQuote {
        #[serde(default)]
        children: Vec<DocumentNode>,
    },

    BulletList {
        #[serde(default)]
        items: Vec<DocumentNode>,
    },

    /// An ordered list. Numbering starts at `start` and increases by one per item.
    OrderedList {
        #[serde(default = "default_start")]
        start: u64,
        #[serde(default)]
        items: Vec<DocumentNode>,
    },

    ListItem {
        #[serde(default)]
        children: Vec<DocumentNode>,
    },

    /// A fenced or indented code block. `literal` is the raw code text.
    CodeBlock { literal: String },

    ThematicBreak,

    // ── Inline nodes ──
    Text { literal: String },

    /// Inline code span.
    Code { literal: String },

    SoftBreak,

    LineBreak,

    Emphasis {
        #[serde(default)]
        children: Vec<DocumentNode>,
    },

    Strong {
        #[serde(default)]
        children: Vec<DocumentNode>,
    },

    Link {
        #[serde(default)]
        children: Vec<DocumentNode>,
    },

    /// An image. Rendered as its alt text.
    Image {
        #[serde(default)]
        children: Vec<DocumentNode>,
    },
}

fn default_start() -> u64 {
    1
}

impl DocumentNode {
    /// Convenience constructor for a text leaf.
    pub fn text(literal: impl Into<String>) -> Self {
        DocumentNode::Text {
            literal: literal.into(),
        }
    }

    /// Convenience constructor for a paragraph holding a single text leaf.
    pub fn paragraph(text: impl Into<String>) -> Self {
        DocumentNode::Paragraph {
            children: vec![DocumentNode::text(text)],
        }
    }

    /// Convenience constructor for a code block.
    pub fn code_block(literal: impl Into<String>) -> Self {
        DocumentNode::CodeBlock {
            literal: literal.into(),
        }
    }

    /// Is this an inline node (text, code span, emphasis, ...)?
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            DocumentNode::Text { .. }
                | DocumentNode::Code { .. }
                | DocumentNode::SoftBreak
                | DocumentNode::LineBreak
                | DocumentNode::Emphasis { .. }
                | DocumentNode::Strong { .. }
                | DocumentNode::Link { .. }
                | DocumentNode::Image { .. }
        )
    }

    /// Child nodes, for every variant that has them.
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Document { children }
            | DocumentNode::Heading { children, .. }
            | DocumentNode::Paragraph { children }
            | DocumentNode::BlockQuote { children }
            | DocumentNode::ListItem { children }
            | DocumentNode::Emphasis { children }
            | DocumentNode::Strong { children }
            | DocumentNode::Link { children }
            | DocumentNode::Image { children } => children,
            DocumentNode::BulletList { items } | DocumentNode::OrderedList { items, .. } => items,
            DocumentNode::CodeBlock { .. }
            | DocumentNode::ThematicBreak
            | DocumentNode::Text { .. }
            | DocumentNode::Code { .. }
            | DocumentNode::SoftBreak
            | DocumentNode::LineBreak => &[],
        }
    }

    /// Flatten this node to plain text.
    ///
    /// Text and code literals are concatenated in document order; emphasis,
    /// links and images contribute only their contents. A soft break becomes
    /// a space and a hard break a newline. Block children of a container
    /// (a quote holding two paragraphs, a list item holding a nested list)
    /// are joined with a newline.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Read a tree serialized as JSON, e.g. by an external parser.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::error::RenderError::Input(format!("invalid document tree: {e}")))
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            DocumentNode::Text { literal } | DocumentNode::Code { literal } => out.push_str(literal),
            DocumentNode::CodeBlock { literal } => out.push_str(literal.trim_end_matches('\n')),
            DocumentNode::SoftBreak => out.push(' '),
            DocumentNode::LineBreak => out.push('\n'),
            DocumentNode::ThematicBreak => {}
            _ => {
                let mut previous_was_block = false;
                for child in self.children() {
                    let is_block = !child.is_inline();
                    if is_block && !out.is_empty() && (previous_was_block || !out.ends_with('\n')) {
                        out.push('\n');
                    }
                    child.collect_text(out);
                    previous_was_block = is_block;
                }
            }
        }
    }
}

/// Document metadata embedded in the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emph(children: Vec<DocumentNode>) -> DocumentNode {
        DocumentNode::Emphasis { children }
    }

    #[test]
    fn plain_text_descends_through_inline_markup() {
        let node = DocumentNode::Paragraph {
            children: vec![
                DocumentNode::text("Hello "),
                emph(vec![DocumentNode::Strong {
                    children: vec![DocumentNode::text("bold")],
                }]),
                DocumentNode::text(" and "),
                DocumentNode::Link {
                    children: vec![DocumentNode::text("a link")],
                },
                DocumentNode::text(" plus "),
                DocumentNode::Code {
                    literal: "code()".to_string(),
                },
            ],
        };
        assert_eq!(node.plain_text(), "Hello bold and a link plus code()");
    }

    #[test]
    fn soft_and_hard_breaks() {
        let node = DocumentNode::Paragraph {
            children: vec![
                DocumentNode::text("one"),
                DocumentNode::SoftBreak,
                DocumentNode::text("two"),
                DocumentNode::LineBreak,
                DocumentNode::text("three"),
            ],
        };
        assert_eq!(node.plain_text(), "one two\nthree");
    }

    #[test]
    fn block_children_are_separated() {
        let quote = DocumentNode::BlockQuote {
            children: vec![
                DocumentNode::paragraph("first"),
                DocumentNode::paragraph("second"),
            ],
        };
        assert_eq!(quote.plain_text(), "first\nsecond");
    }

    #[test]
    fn list_item_with_nested_list() {
        let item = DocumentNode::ListItem {
            children: vec![
                DocumentNode::paragraph("outer"),
                DocumentNode::BulletList {
                    items: vec![
                        DocumentNode::ListItem {
                            children: vec![DocumentNode::paragraph("inner a")],
                        },
                        DocumentNode::ListItem {
                            children: vec![DocumentNode::paragraph("inner b")],
                        },
                    ],
                },
            ],
        };
        assert_eq!(item.plain_text(), "outer\ninner a\ninner b");
    }

    #[test]
    fn empty_nodes_flatten_to_empty() {
        assert_eq!(DocumentNode::Paragraph { children: vec![] }.plain_text(), "");
        assert_eq!(DocumentNode::ThematicBreak.plain_text(), "");
    }

    #[test]
    fn json_round_trip_shape() {
        let json = r#"{
            "type": "Document",
            "children": [
                { "type": "Heading", "level": 2, "children": [ { "type": "Text", "literal": "Title" } ] },
                { "type": "OrderedList", "start": 5, "items": [] },
                { "type": "ThematicBreak" }
            ]
        }"#;
        let doc: DocumentNode = serde_json::from_str(json).unwrap();
        let children = doc.children();
        assert_eq!(children.len(), 3);
        assert!(matches!(children[0], DocumentNode::Heading { level: 2, .. }));
        assert!(matches!(children[1], DocumentNode::OrderedList { start: 5, .. }));
        assert_eq!(children[2], DocumentNode::ThematicBreak);
    }

    #[test]
    fn bad_tree_json_is_input_error() {
        let err = DocumentNode::from_json(r#"{ "type": "Table" }"#).unwrap_err();
        assert!(err.to_string().starts_with("Input error: invalid document tree"));
    }

    #[test]
    fn ordered_list_start_defaults_to_one() {
        let list: DocumentNode = serde_json::from_str(r#"{ "type": "OrderedList" }"#).unwrap();
        assert_eq!(list, DocumentNode::OrderedList { start: 1, items: vec![] });
    }
}
