//! Markdown source to [`DocumentNode`] tree, via comrak.
//!
//! CommonMark with comrak's default options. Parsing never fails: malformed
//! markdown just produces the tree CommonMark says it does. Node kinds the
//! renderer has no block routine for are folded into the nearest thing it
//! does understand (raw HTML becomes a paragraph of its source text).

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::options::Options;
use comrak::{parse_document, Arena};

use crate::model::DocumentNode;

/// Parse markdown into a document tree.
pub fn parse(markdown: &str) -> DocumentNode {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, markdown, &options);
    let children = convert_children(root);
    log::debug!("parsed {} top-level block(s)", children.len());
    DocumentNode::Document { children }
}

fn convert_children<'a>(node: &'a AstNode<'a>) -> Vec<DocumentNode> {
    node.children().filter_map(convert).collect()
}

fn convert<'a>(node: &'a AstNode<'a>) -> Option<DocumentNode> {
    let data = node.data.borrow();
    let converted = match &data.value {
        NodeValue::Document => DocumentNode::Document {
            children: convert_children(node),
        },
        NodeValue::Heading(heading) => DocumentNode::Heading {
            level: heading.level,
            children: convert_children(node),
        },
        NodeValue::Paragraph => DocumentNode::Paragraph {
            children: convert_children(node),
        },
        NodeValue::BlockQuote => DocumentNode::BlockQuote {
            children: convert_children(node),
        },
        NodeValue::List(list) => match list.list_type {
            ListType::Ordered => DocumentNode::OrderedList {
                start: list.start as u64,
                items: convert_children(node),
            },
            ListType::Bullet => DocumentNode::BulletList {
                items: convert_children(node),
            },
        },
        NodeValue::Item(_) => DocumentNode::ListItem {
            children: convert_children(node),
        },
        NodeValue::CodeBlock(block) => DocumentNode::CodeBlock {
            literal: block.literal.clone(),
        },
        NodeValue::HtmlBlock(block) => DocumentNode::paragraph(block.literal.trim_end()),
        NodeValue::ThematicBreak => DocumentNode::ThematicBreak,
        NodeValue::Text(text) => DocumentNode::text(text.to_string()),
        NodeValue::Code(code) => DocumentNode::Code {
            literal: code.literal.clone(),
        },
        NodeValue::HtmlInline(html) => DocumentNode::text(html.to_string()),
        NodeValue::SoftBreak => DocumentNode::SoftBreak,
        NodeValue::LineBreak => DocumentNode::LineBreak,
        NodeValue::Emph => DocumentNode::Emphasis {
            children: convert_children(node),
        },
        NodeValue::Strong => DocumentNode::Strong {
            children: convert_children(node),
        },
        NodeValue::Link(_) => DocumentNode::Link {
            children: convert_children(node),
        },
        NodeValue::Image(_) => DocumentNode::Image {
            children: convert_children(node),
        },
        // Extension nodes are off with default options. Keep whatever text
        // they hold rather than dropping it.
        _ => {
            let children = convert_children(node);
            if children.is_empty() {
                return None;
            }
            DocumentNode::Paragraph { children }
        }
    };
    Some(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(markdown: &str) -> Vec<DocumentNode> {
        match parse(markdown) {
            DocumentNode::Document { children } => children,
            other => panic!("expected a document, got {other:?}"),
        }
    }

    #[test]
    fn headings_and_paragraphs() {
        let doc = blocks("# Title\n\nSome *emphasized* text.\n\n###### Small\n");
        assert_eq!(doc.len(), 3);
        assert!(matches!(doc[0], DocumentNode::Heading { level: 1, .. }));
        assert_eq!(doc[0].plain_text(), "Title");
        assert_eq!(doc[1].plain_text(), "Some emphasized text.");
        assert!(matches!(doc[2], DocumentNode::Heading { level: 6, .. }));
    }

    #[test]
    fn ordered_list_keeps_start() {
        let doc = blocks("5. five\n6. six\n7. seven\n");
        match &doc[0] {
            DocumentNode::OrderedList { start, items } => {
                assert_eq!(*start, 5);
                assert_eq!(items.len(), 3);
                assert_eq!(items[2].plain_text(), "seven");
            }
            other => panic!("expected an ordered list, got {other:?}"),
        }
    }

    #[test]
    fn bullet_list_items() {
        let doc = blocks("- apples\n- pears\n");
        match &doc[0] {
            DocumentNode::BulletList { items } => {
                assert_eq!(items.len(), 2);
                assert!(matches!(items[0], DocumentNode::ListItem { .. }));
            }
            other => panic!("expected a bullet list, got {other:?}"),
        }
    }

    #[test]
    fn fenced_code_keeps_literal() {
        let doc = blocks("```rust\nfn main() {\n    let x = 1;\n}\n```\n");
        assert_eq!(doc[0], DocumentNode::code_block("fn main() {\n    let x = 1;\n}\n"));
    }

    #[test]
    fn quote_and_rule() {
        let doc = blocks("> quoted\n> text\n\n---\n");
        assert!(matches!(doc[0], DocumentNode::BlockQuote { .. }));
        assert_eq!(doc[0].plain_text(), "quoted text");
        assert_eq!(doc[1], DocumentNode::ThematicBreak);
    }

    #[test]
    fn inline_code_and_links_flatten() {
        let doc = blocks("Call `render()` or see [the docs](https://example.com).\n");
        assert_eq!(doc[0].plain_text(), "Call render() or see the docs.");
    }

    #[test]
    fn html_block_becomes_paragraph() {
        let doc = blocks("<div>\nraw\n</div>\n");
        assert!(matches!(doc[0], DocumentNode::Paragraph { .. }));
        assert_eq!(doc[0].plain_text(), "<div>\nraw\n</div>");
    }

    #[test]
    fn empty_input_is_empty_document() {
        assert!(blocks("").is_empty());
    }
}
