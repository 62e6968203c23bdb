//! DOM → Markdown rendering.
//!
//! The publishing format accepts a small Markdown dialect for text
//! components: emphasis, links, lists and line breaks. Anything richer is
//! either matched by a dedicated component before it gets here or reduced to
//! its text.

use crate::dom::{Dom, NodeData, NodeId};

use super::escape::{calculate_inline_code_ticks, collapse_whitespace, escape_markdown};

#[derive(Debug, Clone)]
struct ListContext {
    is_ordered: bool,
    counter: usize,
}

struct MarkdownWriter<'a> {
    dom: &'a Dom,
    out: String,
    list_stack: Vec<ListContext>,
    in_pre: bool,
}

impl<'a> MarkdownWriter<'a> {
    fn new(dom: &'a Dom) -> Self {
        Self {
            dom,
            out: String::new(),
            list_stack: Vec::new(),
            in_pre: false,
        }
    }

    fn walk_children(&mut self, id: NodeId) {
        for child in self.dom.children(id) {
            self.walk_node(child);
        }
    }

    /// Render children into a scratch buffer.
    fn capture_children(&mut self, id: NodeId) -> String {
        let saved = std::mem::take(&mut self.out);
        self.walk_children(id);
        std::mem::replace(&mut self.out, saved)
    }

    fn end_block(&mut self) {
        let trimmed = self.out.trim_end_matches([' ', '\n']).len();
        self.out.truncate(trimmed);
        self.out.push_str("\n\n");
    }

    fn walk_node(&mut self, id: NodeId) {
        let Some(node) = self.dom.get(id) else {
            return;
        };

        let tag = match &node.data {
            NodeData::Text(text) => {
                if self.in_pre {
                    self.out.push_str(&escape_markdown(text));
                } else {
                    self.out.push_str(&escape_markdown(&collapse_whitespace(text)));
                }
                return;
            }
            NodeData::Element { name, .. } => name.local.as_ref(),
            _ => return,
        };

        match tag {
            "strong" | "b" => self.wrap_children(id, "**"),
            "em" | "i" | "cite" => self.wrap_children(id, "_"),
            "a" => {
                let inner = self.capture_children(id);
                match self.dom.get_attr(id, "href").map(str::trim) {
                    Some(href) if !href.is_empty() && !inner.trim().is_empty() => {
                        self.out.push('[');
                        self.out.push_str(&inner);
                        self.out.push_str("](");
                        self.out.push_str(href);
                        self.out.push(')');
                    }
                    _ => self.out.push_str(&inner),
                }
            }
            "code" if !self.in_pre => {
                let content = self.dom.text(id);
                let ticks = "`".repeat(calculate_inline_code_ticks(&content));
                self.out.push_str(&ticks);
                self.out.push_str(&content);
                self.out.push_str(&ticks);
            }
            "br" => self.out.push('\n'),
            "img" | "script" | "style" | "iframe" | "noscript" => {}
            "p" | "div" | "blockquote" | "figure" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.walk_children(id);
                self.end_block();
            }
            "pre" => {
                let was_pre = self.in_pre;
                self.in_pre = true;
                self.walk_children(id);
                self.in_pre = was_pre;
                self.end_block();
            }
            "ul" | "ol" => {
                let start = self
                    .dom
                    .get_attr(id, "start")
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(1);
                self.list_stack.push(ListContext {
                    is_ordered: tag == "ol",
                    counter: start.saturating_sub(1),
                });
                if self.list_stack.len() > 1 && !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                for child in self.dom.child_elements(id).collect::<Vec<_>>() {
                    self.walk_node(child);
                }
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.end_block();
                }
            }
            "li" => {
                let depth = self.list_stack.len().saturating_sub(1);
                let bullet = match self.list_stack.last_mut() {
                    Some(ctx) if ctx.is_ordered => {
                        ctx.counter += 1;
                        format!("{}. ", ctx.counter)
                    }
                    _ => "- ".to_string(),
                };
                self.out.push_str(&"    ".repeat(depth));
                self.out.push_str(&bullet);
                let inner = self.capture_children(id);
                self.out.push_str(inner.trim());
                self.out.push('\n');
            }
            _ => self.walk_children(id),
        }
    }

    fn wrap_children(&mut self, id: NodeId, marker: &str) {
        let inner = self.capture_children(id);
        if inner.trim().is_empty() {
            self.out.push_str(&inner);
            return;
        }
        // Markers must hug the text, so surrounding spaces move outside.
        let leading = &inner[..inner.len() - inner.trim_start().len()];
        let trailing = &inner[inner.trim_end().len()..];
        self.out.push_str(leading);
        self.out.push_str(marker);
        self.out.push_str(inner.trim());
        self.out.push_str(marker);
        self.out.push_str(trailing);
    }
}

/// Render a block element (paragraph, list, preformatted text) as Markdown.
///
/// The result ends with a blank line so that consecutive blocks can be
/// concatenated and still render as separate paragraphs.
pub fn render_block(dom: &Dom, id: NodeId) -> String {
    let mut writer = MarkdownWriter::new(dom);
    writer.walk_node(id);
    if !writer.out.ends_with("\n\n") {
        writer.end_block();
    }
    let text = writer.out.trim_start().to_string();
    if text.trim().is_empty() {
        String::new()
    } else {
        text
    }
}

/// Render only the inline content of `id`, trimmed, with no block spacing.
pub fn render_inline(dom: &Dom, id: NodeId) -> String {
    let mut writer = MarkdownWriter::new(dom);
    writer.walk_children(id);
    writer.out.trim().to_string()
}
