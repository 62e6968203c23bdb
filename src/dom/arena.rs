//! Arena-allocated DOM.
//!
//! html5ever parses into this tree through [`DomSink`](super::DomSink). Nodes
//! live in one vector and link to each other by index, so component matchers
//! can hold plain `NodeId`s while they inspect the document.

use std::collections::HashMap;

use html5ever::{LocalName, QualName};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for "no node".
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Payload of a DOM node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-split `class` attribute.
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
    Doctype,
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node and its tree links.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
    id_map: HashMap<String, NodeId>,
}

impl Dom {
    /// Create an empty DOM holding only the document node.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
            id_map: HashMap::new(),
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the DOM holds nothing but the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let mut element_id = None;
        let mut classes = Vec::new();
        for attr in &attrs {
            match attr.name.local.as_ref() {
                "id" => element_id = Some(attr.value.clone()),
                "class" => {
                    classes = attr.value.split_whitespace().map(str::to_string).collect();
                }
                _ => {}
            }
        }

        let node_id = self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            classes,
        }));
        if let Some(element_id) = element_id {
            self.id_map.insert(element_id, node_id);
        }
        node_id
    }

    /// New detached element with the name and attributes of `like`, minus
    /// its `id` so lookups keep finding the original.
    pub fn clone_element(&mut self, like: NodeId) -> Option<NodeId> {
        let (name, attrs) = match &self.get(like)?.data {
            NodeData::Element { name, attrs, .. } => (name.clone(), attrs.clone()),
            _ => return None,
        };
        let attrs = attrs
            .into_iter()
            .filter(|a| a.name.local.as_ref() != "id")
            .collect();
        Some(self.create_element(name, attrs))
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    pub fn create_doctype(&mut self) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last_child;
            node.next_sibling = NodeId::NONE;
        }
        if let Some(last) = self.get_mut(last_child) {
            last.next_sibling = child;
        }
        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
        }
        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }
        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.first_child = new_node;
        }
    }

    /// Append text to `parent`, extending a trailing text node if there is one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);
        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }
        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        let children: Vec<_> = self.children(from).collect();
        for child in children {
            self.detach(child);
            self.append(to, child);
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        ChildrenIter {
            dom: self,
            current: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Element children only.
    pub fn child_elements(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).filter(|&c| self.is_element(c))
    }

    /// Children that carry content: elements and non-blank text.
    pub fn significant_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).filter(|&c| match self.get(c).map(|n| &n.data) {
            Some(NodeData::Element { .. }) => true,
            Some(NodeData::Text(t)) => !t.trim().is_empty(),
            _ => false,
        })
    }

    /// All descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// First node (depth-first, document order) matching `predicate`.
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.find_within(self.document, predicate)
    }

    /// First descendant of `root` (or `root` itself) matching `predicate`.
    pub fn find_within<F>(&self, root: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    return Some(id);
                }
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        None
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| matches!(&node.data, NodeData::Element { name, .. } if name.local.as_ref() == tag))
    }

    /// First descendant of `root` (or `root`) with the given tag.
    pub fn find_tag_within(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.find_within(root, |node| {
            matches!(&node.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
        })
    }

    /// Every descendant of `root` with the given tag, in document order.
    pub fn descendants_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.is_tag(id, tag))
            .collect()
    }

    /// First element in the document carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<NodeId> {
        self.find(|node| {
            matches!(&node.data, NodeData::Element { classes, .. } if classes.iter().any(|c| c == class))
        })
    }

    /// Every descendant of `root` carrying `class`, in document order.
    pub fn descendants_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map.get(id).copied()
    }

    /// The `<body>` element, or the document when there is none.
    pub fn body(&self) -> NodeId {
        self.find_by_tag("body").unwrap_or(self.document)
    }

    /// The document's root element (normally `<html>`).
    pub fn root_element(&self) -> Option<NodeId> {
        self.child_elements(self.document).next()
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.dom.get(id).map_or(NodeId::NONE, |n| n.next_sibling);
        Some(id)
    }
}

/// Element accessors.
impl Dom {
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Tag name as a string slice, or `""` for non-elements.
    pub fn tag(&self, id: NodeId) -> &str {
        self.element_name(id).map_or("", |n| n.as_ref())
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == tag
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.as_str())
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get_attr(id, "id")
    }

    pub fn element_classes(&self, id: NodeId) -> &[String] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Content of a text node.
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text(&self, id: NodeId) -> String {
        if let Some(text) = self.text_content(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.text_content(d))
            .collect()
    }

    /// True when the subtree has no visible text.
    pub fn is_blank(&self, id: NodeId) -> bool {
        self.text(id).trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use html5ever::{LocalName, ns};

    use super::*;

    fn qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    fn attr(name: &str, value: &str) -> Attribute {
        Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_create_element_extracts_id_and_classes() {
        let mut dom = Dom::new();
        let div = dom.create_element(
            qname("div"),
            vec![attr("id", "main"), attr("class", "gallery  wide")],
        );
        dom.append(dom.document(), div);

        assert_eq!(dom.tag(div), "div");
        assert_eq!(dom.element_id(div), Some("main"));
        assert_eq!(dom.get_by_id("main"), Some(div));
        assert!(dom.has_class(div, "gallery"));
        assert!(dom.has_class(div, "wide"));
        assert!(!dom.has_class(div, "gal"));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut dom = Dom::new();
        let parent = dom.create_element(qname("div"), vec![]);
        let a = dom.create_element(qname("p"), vec![]);
        let b = dom.create_element(qname("p"), vec![]);
        let c = dom.create_element(qname("p"), vec![]);
        dom.append(dom.document(), parent);
        dom.append(parent, a);
        dom.append(parent, b);
        dom.append(parent, c);

        dom.detach(b);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![a, c]);
        assert!(dom.get(b).unwrap().parent.is_none());
    }

    #[test]
    fn test_reparent_children_keeps_order() {
        let mut dom = Dom::new();
        let from = dom.create_element(qname("div"), vec![]);
        let to = dom.create_element(qname("section"), vec![]);
        let a = dom.create_element(qname("p"), vec![]);
        let b = dom.create_element(qname("p"), vec![]);
        dom.append(from, a);
        dom.append(from, b);

        dom.reparent_children(from, to);

        assert_eq!(dom.children(from).count(), 0);
        assert_eq!(dom.children(to).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_text_merging_and_deep_text() {
        let mut dom = Dom::new();
        let p = dom.create_element(qname("p"), vec![]);
        let em = dom.create_element(qname("em"), vec![]);
        dom.append(dom.document(), p);
        dom.append_text(p, "Hello, ");
        dom.append_text(p, "big ");
        dom.append(p, em);
        dom.append_text(em, "World");

        assert_eq!(dom.children(p).count(), 2);
        assert_eq!(dom.text(p), "Hello, big World");
        assert!(!dom.is_blank(p));
    }

    #[test]
    fn test_descendants_by_class_in_document_order() {
        let mut dom = Dom::new();
        let outer = dom.create_element(qname("div"), vec![attr("class", "embed")]);
        let inner = dom.create_element(qname("div"), vec![attr("class", "embed")]);
        let other = dom.create_element(qname("span"), vec![]);
        dom.append(dom.document(), outer);
        dom.append(outer, other);
        dom.append(outer, inner);

        assert_eq!(dom.descendants_by_class(dom.document(), "embed"), vec![outer, inner]);
        assert_eq!(dom.find_by_class("embed"), Some(outer));
    }
}
